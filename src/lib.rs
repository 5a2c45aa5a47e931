//! assh - advanced ssh config
//!
//! This library holds the command-line bootstrap shared by every `assh`
//! command: locating the running binary, resolving the global flags against
//! their environment bindings, building the structured logger, and
//! dispatching to a child command.

pub mod cli;
pub mod commands;
pub mod config;
pub mod env;
pub mod error;
pub mod logging;
pub mod path;

// Re-export commonly used types for convenience
pub use commands::{Bootstrap, CommandRegistry, Context, Subcommand};
pub use config::ResolvedConfig;
pub use error::{ChildExit, Error, Result};
pub use logging::{LogConfig, LogMode, LogSink, Logger};
pub use path::ExecutablePath;
