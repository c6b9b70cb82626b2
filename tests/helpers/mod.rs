#![allow(unused_imports)]
pub mod capture;
pub mod job_helpers;
pub mod test_app;
pub mod test_db;

pub use capture::*;
pub use job_helpers::*;
pub use test_app::*;
pub use test_db::*;
