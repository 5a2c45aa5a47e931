//! `assh` command-line surface.
//!
//! The global flags live in [`GlobalArgs`] and are marked `global`, so
//! `assh -D ping host` and `assh ping -D host` mean the same thing, and
//! `-h/--help` works on every command. Child commands take their
//! arguments opaquely: once the first child argument is seen, everything after
//! it belongs to the child.

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::{self, FlagValues};

/// Semantic version plus source revision, e.g. `0.1.0 (a1b2c3d)`.
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("ASSH_VCS_REF"), ")");

#[derive(Debug, Parser)]
#[command(name = "assh")]
#[command(about = "assh - advanced ssh config")]
#[command(version = VERSION)]
#[command(disable_version_flag = true)]
#[command(disable_help_flag = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    #[arg(
        short = config::HELP.short,
        long = config::HELP.name,
        help = config::HELP.usage,
        action = ArgAction::Help,
        global = true
    )]
    help: Option<bool>,

    #[arg(
        short = config::CONFIG.short,
        long = config::CONFIG.name,
        help = config::CONFIG.usage,
        value_name = "PATH",
        global = true
    )]
    pub config: Option<String>,

    #[arg(
        short = config::DEBUG.short,
        long = config::DEBUG.name,
        help = config::DEBUG.usage,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = config::parse_bool,
        global = true
    )]
    pub debug: Option<bool>,

    #[arg(
        short = config::VERBOSE.short,
        long = config::VERBOSE.name,
        help = config::VERBOSE.usage,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = config::parse_bool,
        global = true
    )]
    pub verbose: Option<bool>,
}

impl GlobalArgs {
    /// Values given explicitly on the command line.
    pub fn flag_values(&self) -> FlagValues {
        FlagValues {
            config: self.config.clone(),
            debug: self.debug,
            verbose: self.verbose,
        }
    }
}

/// Arguments handed untouched to a child unit.
#[derive(Debug, Clone, Default, Args)]
pub struct Passthrough {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Send packets to the SSH server and display stats
    Ping(Passthrough),
    /// Connect to the SSH server
    Proxy(Passthrough),
    /// Display system-wide information
    Info(Passthrough),
    /// Manage ssh and assh configuration
    Config(Passthrough),
    /// Manage control sockets
    Sockets(Passthrough),
    /// Initialize assh, then run ssh/scp/rsync...
    Wrapper(Passthrough),
}

impl Commands {
    /// Child names in registration order.
    pub const NAMES: [&'static str; 6] = ["ping", "proxy", "info", "config", "sockets", "wrapper"];

    pub fn name(&self) -> &'static str {
        match self {
            Commands::Ping(_) => "ping",
            Commands::Proxy(_) => "proxy",
            Commands::Info(_) => "info",
            Commands::Config(_) => "config",
            Commands::Sockets(_) => "sockets",
            Commands::Wrapper(_) => "wrapper",
        }
    }

    pub fn args(&self) -> &[String] {
        match self {
            Commands::Ping(p)
            | Commands::Proxy(p)
            | Commands::Info(p)
            | Commands::Config(p)
            | Commands::Sockets(p)
            | Commands::Wrapper(p) => &p.args,
        }
    }
}
