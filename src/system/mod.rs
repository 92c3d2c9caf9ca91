//! System-level modules
//!
//! Process setup shared by the binary: logging initialisation.

pub mod logging;

pub use logging::init_logging;
