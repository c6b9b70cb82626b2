pub mod broker;
pub mod dispatcher;
pub mod registry;
pub mod runner;
pub mod triggers;
pub mod webhook_signature;
pub mod workers;

pub use broker::*;
pub use dispatcher::*;
pub use registry::*;
pub use runner::*;
pub use triggers::*;
pub use webhook_signature::*;
pub use workers::*;
