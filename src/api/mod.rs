pub mod middleware;
pub mod cron;
pub mod functions;
pub mod jobs;
pub mod router;

pub use middleware::*;
pub use router::*;
