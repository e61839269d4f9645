// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fixel — fix your pixel.
//
// Entry point. Initialises logging, loads settings, and runs one enhancement
// from the command line.

mod cli;
mod session;

use std::process::ExitCode;

use clap::Parser;
use fixel_core::error::Result;
use fixel_core::human_errors::humanize_error;
use fixel_core::FixelConfig;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Fixel starting");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "enhancement failed");
            let human = humanize_error(&err);
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => FixelConfig::load(path)?,
        None => FixelConfig::default(),
    };

    match cli.command.to_job(&config)? {
        None => println!("{}", config.to_json_pretty()?),
        Some(job) => {
            let outcome = session::run(&job)?;
            println!(
                "{} saved to {} ({}x{}, {} channel(s))",
                job.enhancement.name(),
                outcome.output.display(),
                outcome.width,
                outcome.height,
                outcome.channels
            );
            if let Some(path) = outcome.compare {
                println!("Before/after comparison saved to {}", path.display());
            }
        }
    }
    Ok(())
}
