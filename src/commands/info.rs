use std::io::{self, Write};

use anyhow::{bail, Context as _, Result};

use super::{Context, Subcommand};
use crate::cli::VERSION;

/// `assh info`: report how this invocation was bootstrapped.
pub struct Info;

impl Subcommand for Info {
    fn run(&self, ctx: &Context, args: &[String]) -> Result<()> {
        if !args.is_empty() {
            bail!("info takes no arguments, got: {}", args.join(" "));
        }
        let mut out = io::stdout().lock();
        write_report(&mut out, ctx).context("write info report")
    }
}

pub(crate) fn write_report(out: &mut impl Write, ctx: &Context) -> io::Result<()> {
    writeln!(out, "Version: {VERSION}")?;
    writeln!(out, "Debug mode: {}", ctx.config.debug)?;
    writeln!(out, "Verbose mode: {}", ctx.config.verbose)?;
    writeln!(out, "Config file: {}", ctx.config.config)?;
    writeln!(out, "CLI path: {}", ctx.binary_path)?;
    writeln!(
        out,
        "OS/Arch: {}/{}",
        std::env::consts::OS,
        std::env::consts::ARCH
    )?;
    out.flush()
}
