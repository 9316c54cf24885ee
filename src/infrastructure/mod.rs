pub mod error_logging;
pub mod logging;

pub use error_logging::{ErrorReporter, ErrorType};
pub use logging::{Logger, LoggerTrait};
