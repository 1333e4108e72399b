// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod add;
pub mod delete;
pub mod list;
pub mod log;
pub mod run;

use anyhow::Result;
use jrun_daemon::Config;

/// Storage roots for the local, no-network commands (`add`, `list`,
/// `delete`): same `JRUN_STATE_DIR`-driven resolution `jrun run` uses, so
/// the CLI and a running daemon agree on where jobs live.
fn state_config() -> Result<Config> {
    Config::from_env().map_err(Into::into)
}
