/*! Global flags and their environment bindings.

Every `assh` command shares four global flags. Two of them can also be set
from the environment:

| flag | short | env |
|---|---|---|
| `--config` | `-c` | `ASSH_CONFIG` |
| `--debug` | `-D` | `ASSH_DEBUG` |
| `--verbose` | `-V` | |
| `--help` | `-h` | |

The effective value of a setting is, in order: the flag when given on the
command line, the bound environment variable when set and non-empty, the
declared default.
*/

use std::ffi::{OsStr, OsString};

use once_cell::unsync::OnceCell;

use crate::env::Environment;
use crate::error::{Error, Result};

/// Value type of a global flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    Bool,
    String,
}

/// Declaration of a global flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalFlag {
    pub name: &'static str,
    pub short: char,
    pub kind: FlagKind,
    pub default: &'static str,
    pub env: Option<&'static str>,
    pub usage: &'static str,
}

pub const DEFAULT_CONFIG_PATH: &str = "~/.assh.yml";
pub const CONFIG_ENV: &str = "ASSH_CONFIG";
pub const DEBUG_ENV: &str = "ASSH_DEBUG";

pub const HELP: GlobalFlag = GlobalFlag {
    name: "help",
    short: 'h',
    kind: FlagKind::Bool,
    default: "false",
    env: None,
    usage: "print usage",
};

pub const CONFIG: GlobalFlag = GlobalFlag {
    name: "config",
    short: 'c',
    kind: FlagKind::String,
    default: DEFAULT_CONFIG_PATH,
    env: Some(CONFIG_ENV),
    usage: "Location of config file",
};

pub const DEBUG: GlobalFlag = GlobalFlag {
    name: "debug",
    short: 'D',
    kind: FlagKind::Bool,
    default: "false",
    env: Some(DEBUG_ENV),
    usage: "Enable debug mode",
};

pub const VERBOSE: GlobalFlag = GlobalFlag {
    name: "verbose",
    short: 'V',
    kind: FlagKind::Bool,
    default: "false",
    env: None,
    usage: "Enable verbose mode",
};

/// All global flags, in declaration order.
pub const GLOBAL_FLAGS: [GlobalFlag; 4] = [HELP, CONFIG, DEBUG, VERBOSE];

/// Parse boolean text.
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`, nothing else.
pub fn parse_bool(raw: &str) -> std::result::Result<bool, String> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        other => Err(format!("invalid boolean value: {other:?}")),
    }
}

/// Conversion from raw environment/default text into a setting's type.
pub trait Coerce: Sized {
    fn coerce(raw: &str) -> Option<Self>;
}

impl Coerce for bool {
    fn coerce(raw: &str) -> Option<Self> {
        parse_bool(raw).ok()
    }
}

impl Coerce for String {
    fn coerce(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

/// Effective value of `flag`.
///
/// `cli` is `Some` exactly when the flag was given on the command line; `env`
/// is the raw value of the bound variable, if any. An empty variable counts as
/// unset. A variable that does not coerce is an error, never a silent default.
pub fn resolve<T: Coerce>(flag: &GlobalFlag, cli: Option<T>, env: Option<&str>) -> Result<T> {
    if let Some(value) = cli {
        return Ok(value);
    }

    if let (Some(var), Some(raw)) = (flag.env, env.filter(|raw| !raw.is_empty())) {
        return T::coerce(raw).ok_or_else(|| Error::Coercion {
            key: flag.name,
            var,
            value: raw.to_string(),
        });
    }

    T::coerce(flag.default).ok_or(Error::InvalidDefault {
        key: flag.name,
        value: flag.default,
    })
}

/// [`resolve`] over the raw value of the bound variable.
///
/// The variable is only decoded when the flag was not given; a value that is
/// not valid unicode is then an error.
pub fn resolve_os<T: Coerce>(flag: &GlobalFlag, cli: Option<T>, env: Option<&OsStr>) -> Result<T> {
    if cli.is_some() {
        return resolve(flag, cli, None);
    }
    let text = match (flag.env, env) {
        (Some(var), Some(raw)) => Some(raw.to_str().ok_or_else(|| Error::NotUnicode {
            key: flag.name,
            var,
            value: raw.to_string_lossy().into_owned(),
        })?),
        _ => None,
    };
    resolve(flag, None, text)
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagValues {
    pub config: Option<String>,
    pub debug: Option<bool>,
    pub verbose: Option<bool>,
}

/// Merged view of flags, bound environment variables and defaults.
///
/// Bound variables are read once, when the store is built. Each key is
/// resolved on first read and cached.
#[derive(Debug)]
pub struct ConfigStore {
    flags: FlagValues,
    config_env: Option<OsString>,
    debug_env: Option<OsString>,
    config: OnceCell<String>,
    debug: OnceCell<bool>,
    verbose: OnceCell<bool>,
}

impl ConfigStore {
    pub fn new(flags: FlagValues, env: &dyn Environment) -> Self {
        let bound = |flag: &GlobalFlag| flag.env.and_then(|var| env.var_os(var));
        Self {
            flags,
            config_env: bound(&CONFIG),
            debug_env: bound(&DEBUG),
            config: OnceCell::new(),
            debug: OnceCell::new(),
            verbose: OnceCell::new(),
        }
    }

    pub fn config(&self) -> Result<&str> {
        self.config
            .get_or_try_init(|| {
                resolve_os(
                    &CONFIG,
                    self.flags.config.clone(),
                    self.config_env.as_deref(),
                )
            })
            .map(String::as_str)
    }

    pub fn debug(&self) -> Result<bool> {
        self.debug
            .get_or_try_init(|| resolve_os(&DEBUG, self.flags.debug, self.debug_env.as_deref()))
            .copied()
    }

    pub fn verbose(&self) -> Result<bool> {
        self.verbose
            .get_or_try_init(|| resolve(&VERBOSE, self.flags.verbose, None))
            .copied()
    }

    /// Resolve every key.
    pub fn snapshot(&self) -> Result<ResolvedConfig> {
        Ok(ResolvedConfig {
            config: self.config()?.to_string(),
            debug: self.debug()?,
            verbose: self.verbose()?,
        })
    }
}

/// The single effective configuration of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub config: String,
    pub debug: bool,
    pub verbose: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            config: DEFAULT_CONFIG_PATH.to_string(),
            debug: false,
            verbose: false,
        }
    }
}
