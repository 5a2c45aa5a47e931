//! Error taxonomy for the bootstrap core.
//!
//! Everything that can go wrong before a child command body runs is one of
//! these variants. Command bodies themselves report through `anyhow`.

use std::io;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The running binary cannot report its own location.
    #[error("cannot determine executable path")]
    ExecutablePath(#[source] io::Error),

    /// A bound environment variable does not coerce to its flag's type.
    #[error("invalid value {value:?} in {var} for --{key}: expected a boolean")]
    Coercion {
        key: &'static str,
        var: &'static str,
        value: String,
    },

    /// A bound environment variable is not valid unicode.
    #[error("invalid value {value:?} in {var} for --{key}: not valid unicode")]
    NotUnicode {
        key: &'static str,
        var: &'static str,
        value: String,
    },

    /// A declared flag default does not coerce to its flag's type.
    #[error("invalid default {value:?} declared for --{key}")]
    InvalidDefault { key: &'static str, value: &'static str },

    /// The structured logger's sink could not be built.
    #[error("failed to initialize logger")]
    Logger(#[source] io::Error),

    /// Writing a variable into the process environment was refused.
    #[error("cannot set {key}: {reason}")]
    EnvMutation { key: String, reason: &'static str },
}

/// Raised by a child unit whose external program exited unsuccessfully.
///
/// `main` maps this to the same process exit status.
#[derive(Debug, thiserror::Error)]
#[error("{program} exited with status {code}")]
pub struct ChildExit {
    pub program: String,
    pub code: i32,
}
