pub mod errors;
pub mod logging;

pub use errors::{DeskError, DeskResult};
pub use logging::{init_logging, LoggingConfig, OperationTimer, RequestContext, StructuredLogEntry};
