//! Location of the running `assh` binary.
//!
//! Generated wrapper scripts invoke `assh` by absolute path, so the path is
//! resolved once at start-up and kept in a form that can be embedded unquoted
//! in shell text: forward slashes only, whitespace backslash-escaped.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Absolute, shell-safe path of the running binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutablePath(String);

impl ExecutablePath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The filesystem path, with the whitespace escapes removed.
    pub fn to_path_buf(&self) -> PathBuf {
        let mut out = String::with_capacity(self.0.len());
        let mut chars = self.0.chars().peekable();
        while let Some(c) = chars.next() {
            match chars.peek() {
                Some(next) if c == '\\' && next.is_whitespace() => {}
                _ => out.push(c),
            }
        }
        PathBuf::from(out)
    }
}

impl From<&Path> for ExecutablePath {
    fn from(path: &Path) -> Self {
        ExecutablePath(normalize(path))
    }
}

impl fmt::Display for ExecutablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve the path of the running binary.
///
/// Fails only when the operating system cannot report the executable or the
/// current directory needed to make it absolute; callers treat that as fatal.
pub fn resolve() -> Result<ExecutablePath> {
    let exe = std::env::current_exe().map_err(Error::ExecutablePath)?;
    let abs = absolute(&exe)?;
    Ok(ExecutablePath(normalize(&abs)))
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(Error::ExecutablePath)?;
    Ok(cwd.join(path))
}

/// Convert an absolute path into its canonical textual form.
pub fn normalize(path: &Path) -> String {
    let text = path.to_string_lossy();
    let slashed = if std::path::MAIN_SEPARATOR == '/' {
        text.into_owned()
    } else {
        text.replace(std::path::MAIN_SEPARATOR, "/")
    };
    escape_spaces(&slashed)
}

/// Backslash-escape every whitespace character.
pub fn escape_spaces(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if c.is_whitespace() {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
