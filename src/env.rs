//! Access to environment variables.
//!
//! The bootstrap reads `ASSH_CONFIG`/`ASSH_DEBUG` and may write `ASSH_DEBUG`.
//! Going through [`Environment`] instead of `std::env` lets a run be driven
//! against an isolated set of variables.

use std::collections::HashMap;
use std::ffi::OsString;

use crate::error::{Error, Result};

pub trait Environment {
    /// Raw value of `key`, or `None` when unset.
    fn var_os(&self, key: &str) -> Option<OsString>;

    /// Set `key` to `value`.
    fn set_var(&mut self, key: &str, value: &str) -> Result<()>;
}

/// The real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var_os(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }

    fn set_var(&mut self, key: &str, value: &str) -> Result<()> {
        validate(key, value)?;
        std::env::set_var(key, value);
        Ok(())
    }
}

/// An environment held in memory; nothing leaks into the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryEnv {
    vars: HashMap<String, OsString>,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, key: &str, value: impl Into<OsString>) -> Self {
        self.vars.insert(key.to_string(), value.into());
        self
    }

    /// Value of `key` as text; `None` when unset or not valid unicode.
    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).and_then(|value| value.to_str())
    }
}

impl Environment for MemoryEnv {
    fn var_os(&self, key: &str) -> Option<OsString> {
        self.vars.get(key).cloned()
    }

    fn set_var(&mut self, key: &str, value: &str) -> Result<()> {
        validate(key, value)?;
        self.vars.insert(key.to_string(), value.into());
        Ok(())
    }
}

// std::env::set_var panics on these; report them instead.
fn validate(key: &str, value: &str) -> Result<()> {
    let reason = if key.is_empty() {
        Some("empty variable name")
    } else if key.contains('=') {
        Some("variable name contains '='")
    } else if key.contains('\0') {
        Some("variable name contains a NUL byte")
    } else if value.contains('\0') {
        Some("value contains a NUL byte")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(Error::EnvMutation {
            key: key.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_env_round_trips() {
        let mut env = MemoryEnv::new().with_var("ASSH_CONFIG", "/etc/assh.yml");
        assert_eq!(env.var("ASSH_CONFIG"), Some("/etc/assh.yml"));
        assert_eq!(env.var_os("ASSH_DEBUG"), None);

        env.set_var("ASSH_DEBUG", "1").unwrap();
        assert_eq!(env.var_os("ASSH_DEBUG"), Some(OsString::from("1")));
    }

    #[test]
    fn rejects_invalid_names_and_values() {
        let mut env = MemoryEnv::new();
        assert!(matches!(
            env.set_var("", "1"),
            Err(Error::EnvMutation { .. })
        ));
        assert!(env.set_var("A=B", "1").is_err());
        assert!(env.set_var("ASSH_DEBUG", "1\0").is_err());
        assert_eq!(env.var("ASSH_DEBUG"), None);
    }

    #[cfg(unix)]
    #[test]
    fn raw_values_are_kept() {
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(b"/tmp/\xffcfg.yml".to_vec());
        let env = MemoryEnv::new().with_var("ASSH_CONFIG", raw.clone());
        assert_eq!(env.var_os("ASSH_CONFIG"), Some(raw));
        assert_eq!(env.var("ASSH_CONFIG"), None);
    }
}
