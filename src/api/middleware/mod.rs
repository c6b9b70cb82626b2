pub mod error;
pub mod auth;

pub use error::*;
pub use auth::*;
