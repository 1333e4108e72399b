// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jrun log` — connect as an observer and print each received line.

use anyhow::{Context, Result};
use futures_util::StreamExt;
use jrun_wire::LOG_TRACE_PATH;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

pub async fn run(id: String, url: String) -> Result<()> {
    let uri = format!("ws://{url}{LOG_TRACE_PATH}?id={id}");
    let (mut ws, _) = connect_async(&uri).await.with_context(|| format!("not found: {uri}"))?;

    while let Some(message) = ws.next().await {
        match message.context("connection closed")? {
            Message::Text(line) => print!("{line}"),
            Message::Close(_) => break,
            _ => {}
        }
    }
    Ok(())
}
