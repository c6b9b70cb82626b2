pub mod catalog;
pub mod job;
pub mod queue;

pub use catalog::*;
pub use job::*;
pub use queue::*;
