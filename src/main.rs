use std::process::ExitCode;

use clap::Parser;

use assh::cli::Cli;
use assh::env::ProcessEnv;
use assh::{path, Bootstrap, ChildExit};

fn main() -> ExitCode {
    // Nothing else can work without knowing where the binary lives.
    let binary_path = match path::resolve() {
        Ok(path) => path,
        Err(err) => {
            eprintln!("assh: {:#}", anyhow::Error::from(err));
            return ExitCode::FAILURE;
        }
    };

    let cli = Cli::parse();

    match Bootstrap::new(binary_path).run(&cli, &mut ProcessEnv) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // The child already reported its own failure.
            if let Some(exit) = err.downcast_ref::<ChildExit>() {
                return ExitCode::from(u8::try_from(exit.code).unwrap_or(1));
            }
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
