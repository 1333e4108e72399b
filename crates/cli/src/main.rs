// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jrun`: submit, inspect, and run the job queue described in this
//! workspace (spec §6 CLI surface). A single binary, mirroring the
//! original tool's single console-script entry point with one
//! subcommand per verb.

mod color;
mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jrun", version, about = "Durable job queue, worker, and log fabric", styles = color::styles())]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a new job
    Add {
        /// Shell command to execute
        command: String,
        /// Source directory to snapshot as the job's working directory
        #[arg(short = 'd', long = "dir")]
        dir: Option<PathBuf>,
    },
    /// List jobs grouped by status
    List {
        /// Remove all done/failed jobs and their archives after listing
        #[arg(long)]
        prune: bool,
    },
    /// Delete a todo job
    Delete {
        /// Job id, as printed by `jrun list`
        id: String,
    },
    /// Start the worker and the submission/observer surface
    Run {
        /// Worker idle poll interval, in milliseconds
        #[arg(long)]
        freq: Option<u64>,
        /// Address to bind the submission/observer surface to
        #[arg(long)]
        bind: Option<String>,
        /// State directory (queue/dep/log roots live under it)
        #[arg(short = 'd', long = "dir")]
        dir: Option<PathBuf>,
        /// Run the worker in the foreground with a console logger; no
        /// HTTP surface, no archive, no subscribers
        #[arg(long)]
        no_http: bool,
    },
    /// Stream a job's log over `/log-trace`
    Log {
        /// Job id to observe
        id: String,
        /// Daemon host:port, e.g. 127.0.0.1:8000
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Add { command, dir } => commands::add::run(command, dir),
        Command::List { prune } => commands::list::run(prune),
        Command::Delete { id } => commands::delete::run(id),
        Command::Run { freq, bind, dir, no_http } => commands::run::run(freq, bind, dir, no_http).await,
        Command::Log { id, url } => commands::log::run(id, url).await,
    }
}
