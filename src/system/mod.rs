pub mod logging;
pub mod signal;

pub use logging::init_logging;
