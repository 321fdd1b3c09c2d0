// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Flowdeck CLI entrypoint.
//!
//! The editor owns the terminal, so it only logs when `--log-file` is given. Headless subcommands
//! log to stderr.

use std::error::Error;
use std::fs::File;
use std::process;
use std::str::FromStr;

use clap::Parser;
use env_logger::{Env, Target};
use log::{debug, error, info, LevelFilter};

use flowdeck::cli::{self, Args};

fn init_logging(args: &Args) -> Result<(), Box<dyn Error>> {
    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    let mut builder = env_logger::Builder::from_env(Env::default());
    match &args.log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .filter_level(log_level)
                .target(Target::Pipe(Box::new(file)));
        }
        None if args.is_interactive() => {
            builder.filter_level(LevelFilter::Off);
        }
        None => {
            builder.filter_level(log_level);
        }
    }
    builder.init();
    Ok(())
}

fn main() {
    let args = Args::parse();

    if let Err(err) = init_logging(&args) {
        eprintln!("failed to open log file: {err}");
        process::exit(1);
    }

    info!(log_level = args.log_level; "Starting Flowdeck");
    debug!(args:?; "Parsed arguments");

    if let Err(err) = cli::run(&args) {
        error!(err:% = err; "Failed");
        eprintln!("error: {err}");
        process::exit(1);
    }

    info!("Completed successfully");
}
