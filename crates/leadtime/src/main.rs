// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! leadtime: release lead-time analysis
//!
//! This binary resolves the pull requests shipped between two release tags and
//! prints how long each waited between merge and release.

use std::io::Write;

use clap::Parser;
use leadtime::config::Config;
use tracing::debug;

fn main() {
    let config = Config::parse();

    // Logs go to stderr, the report to stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    debug!(end_tag = %config.end_tag, limit = ?config.limit, format = ?config.format, "Starting leadtime");

    match leadtime::run(&config) {
        Ok(report) => {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = stdout.write_all(report.as_bytes()) {
                eprintln!("Error: failed to write report: {e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}
