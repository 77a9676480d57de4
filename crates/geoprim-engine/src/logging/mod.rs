//! Logging setup.
//!
//! The engine only talks to the `log` facade. `init_logging` is a
//! convenience for hosts and tools that do not bring their own backend.

mod init;

pub use init::{init_logging, LoggingConfig};
