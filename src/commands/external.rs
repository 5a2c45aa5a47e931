use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context as _, Result};

use super::{Context, Subcommand};
use crate::config::{CONFIG_ENV, DEBUG_ENV};
use crate::error::ChildExit;

/// A child command implemented by a separate `assh-<name>` program.
///
/// The program is looked up next to the running `assh` first, then on `PATH`.
/// It inherits the environment, receives the resolved config path in
/// `ASSH_CONFIG`, and sees `ASSH_DEBUG=1` exactly when this run is in debug
/// mode.
#[derive(Debug, Clone)]
pub struct External {
    name: &'static str,
}

impl External {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }

    pub fn program(&self) -> String {
        format!("assh-{}", self.name)
    }

    fn locate(&self, ctx: &Context) -> PathBuf {
        let program = self.program();
        let sibling = ctx
            .binary_path
            .to_path_buf()
            .parent()
            .map(|dir| dir.join(&program));
        match sibling {
            Some(path) if path.is_file() => path,
            _ => PathBuf::from(program),
        }
    }
}

impl Subcommand for External {
    fn run(&self, ctx: &Context, args: &[String]) -> Result<()> {
        let program = self.locate(ctx);
        tracing::debug!(program = %program.display(), ?args, "Spawning child command");

        let mut command = process::Command::new(&program);
        command.args(args).env(CONFIG_ENV, &ctx.config.config);
        if ctx.config.debug {
            command.env(DEBUG_ENV, "1");
        } else {
            command.env_remove(DEBUG_ENV);
        }

        let status = match command.status() {
            Ok(status) => status,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                bail!(
                    "{}: command not available ({} not found next to {} or in PATH)",
                    self.name,
                    self.program(),
                    ctx.binary_path
                );
            }
            Err(err) => {
                return Err(err).with_context(|| format!("spawn {}", program.display()));
            }
        };

        if status.success() {
            return Ok(());
        }

        let code = status.code().unwrap_or(1);
        tracing::info!(program = %program.display(), code, "Child command failed");
        Err(ChildExit {
            program: self.program(),
            code,
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolvedConfig;
    use crate::logging::{self, LogSink};
    use crate::path::ExecutablePath;

    fn context_in(dir: &std::path::Path) -> Context {
        let sink = LogSink::writer(io::sink);
        Context {
            binary_path: ExecutablePath::from(dir.join("assh").as_path()),
            config: ResolvedConfig::default(),
            logger: logging::initialize(false, false, &sink).unwrap(),
        }
    }

    #[cfg(unix)]
    fn script(dir: &std::path::Path, name: &str, body: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn program_name() {
        assert_eq!(External::new("ping").program(), "assh-ping");
    }

    #[test]
    fn falls_back_to_path_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_in(dir.path());
        assert_eq!(External::new("ping").locate(&ctx), PathBuf::from("assh-ping"));
    }

    #[test]
    fn prefers_sibling_program() {
        let dir = tempfile::tempdir().unwrap();
        let sibling = dir.path().join("assh-proxy");
        std::fs::write(&sibling, "").unwrap();
        let ctx = context_in(dir.path());
        assert_eq!(External::new("proxy").locate(&ctx), sibling);
    }

    #[test]
    fn missing_program_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_in(dir.path());
        let unit = External::new("sockets-test-missing");
        let err = unit.run(&ctx, &[]).unwrap_err();
        assert!(err.to_string().contains("assh-sockets-test-missing"));
        assert!(err.downcast_ref::<ChildExit>().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn child_exit_status_is_propagated() {
        let dir = tempfile::tempdir().unwrap();
        script(dir.path(), "assh-wrapper", "exit 3");

        let ctx = context_in(dir.path());
        let err = External::new("wrapper").run(&ctx, &[]).unwrap_err();
        let exit = err.downcast_ref::<ChildExit>().unwrap();
        assert_eq!(exit.code, 3);
        assert_eq!(exit.program, "assh-wrapper");
    }

    #[cfg(unix)]
    #[test]
    #[serial_test::serial]
    fn child_gets_the_resolved_debug_posture() {
        let dir = tempfile::tempdir().unwrap();
        script(
            dir.path(),
            "assh-ping",
            r#"[ "$ASSH_DEBUG" = "$EXPECT_DEBUG" ] || exit 4"#,
        );

        std::env::set_var("ASSH_DEBUG", "1");
        let mut ctx = context_in(dir.path());

        std::env::set_var("EXPECT_DEBUG", "");
        let quiet = External::new("ping").run(&ctx, &[]);

        ctx.config.debug = true;
        std::env::remove_var("ASSH_DEBUG");
        std::env::set_var("EXPECT_DEBUG", "1");
        let debug = External::new("ping").run(&ctx, &[]);

        std::env::remove_var("EXPECT_DEBUG");
        quiet.unwrap();
        debug.unwrap();
    }
}
