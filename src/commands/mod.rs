//! Child commands and the bootstrap sequence that runs before them.
//!
//! [`Bootstrap::run`] takes a parsed [`Cli`] through these steps, stopping at
//! the first error:
//!
//! 1. resolve `--debug`; when true, export `ASSH_DEBUG=1`;
//! 2. build the logger from the resolved debug/verbose modes;
//! 3. run the selected child inside the logger's scope.
//!
//! No child body runs unless steps 1 and 2 succeed.

mod external;
mod info;

pub use external::External;
pub use info::Info;

use anyhow::anyhow;

use crate::cli::{Cli, Commands, GlobalArgs};
use crate::config::{ConfigStore, ResolvedConfig, DEBUG_ENV};
use crate::env::Environment;
use crate::logging::{self, LogSink, Logger};
use crate::path::ExecutablePath;

/// A child command body.
pub trait Subcommand {
    fn run(&self, ctx: &Context, args: &[String]) -> anyhow::Result<()>;
}

/// What a child body gets to see of the bootstrap.
#[derive(Debug, Clone)]
pub struct Context {
    pub binary_path: ExecutablePath,
    pub config: ResolvedConfig,
    pub logger: Logger,
}

/// The fixed set of child units, by name.
pub struct CommandRegistry {
    units: Vec<(&'static str, Box<dyn Subcommand>)>,
}

impl CommandRegistry {
    /// `info` runs in-process; every other child is an external program.
    pub fn builtin() -> Self {
        let units = Commands::NAMES
            .iter()
            .map(|&name| {
                let unit: Box<dyn Subcommand> = match name {
                    "info" => Box::new(Info),
                    other => Box::new(External::new(other)),
                };
                (name, unit)
            })
            .collect();
        Self { units }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Subcommand> {
        self.units
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, unit)| unit.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.units.iter().map(|(name, _)| *name)
    }

    /// Swap the unit registered under `name`, returning the previous one.
    pub fn replace(
        &mut self,
        name: &str,
        unit: Box<dyn Subcommand>,
    ) -> anyhow::Result<Box<dyn Subcommand>> {
        let slot = self
            .units
            .iter_mut()
            .find(|(n, _)| *n == name)
            .ok_or_else(|| anyhow!("unknown command: {name}"))?;
        Ok(std::mem::replace(&mut slot.1, unit))
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Everything assembled at start-up, before any flag is read.
pub struct Bootstrap {
    binary_path: ExecutablePath,
    registry: CommandRegistry,
    sink: LogSink,
}

impl Bootstrap {
    pub fn new(binary_path: ExecutablePath) -> Self {
        Self {
            binary_path,
            registry: CommandRegistry::builtin(),
            sink: LogSink::default(),
        }
    }

    pub fn with_sink(mut self, sink: LogSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_unit(mut self, name: &str, unit: Box<dyn Subcommand>) -> anyhow::Result<Self> {
        self.registry.replace(name, unit)?;
        Ok(self)
    }

    pub fn binary_path(&self) -> &ExecutablePath {
        &self.binary_path
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// The clap command tree.
    pub fn command(&self) -> clap::Command {
        <Cli as clap::CommandFactory>::command()
    }

    /// Resolve the global flags, export the debug posture and build the
    /// logger. Runs once per invocation, before any child body.
    pub fn prepare(&self, global: &GlobalArgs, env: &mut dyn Environment) -> crate::Result<Context> {
        let store = ConfigStore::new(global.flag_values(), env);

        let debug = store.debug()?;
        if debug {
            env.set_var(DEBUG_ENV, "1")?;
        }

        let logger = logging::initialize(debug, store.verbose()?, &self.sink)?;
        let config = store.snapshot()?;

        Ok(Context {
            binary_path: self.binary_path.clone(),
            config,
            logger,
        })
    }

    /// Prepare, then dispatch to the selected child.
    pub fn run(&self, cli: &Cli, env: &mut dyn Environment) -> anyhow::Result<()> {
        let ctx = self.prepare(&cli.global, env)?;

        let name = cli.command.name();
        let unit = self
            .registry
            .get(name)
            .ok_or_else(|| anyhow!("unknown command: {name}"))?;

        ctx.logger.in_scope(|| {
            tracing::debug!(
                command = name,
                config = %ctx.config.config,
                verbose = ctx.config.verbose,
                binary = %ctx.binary_path,
                "Dispatching command"
            );
            unit.run(&ctx, cli.command.args())
        })
    }
}
