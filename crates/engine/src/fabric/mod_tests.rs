// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::error::FabricError;
use crate::logger::StreamingLogger;
use jrun_core::JobId;

fn id(n: i64) -> JobId {
    JobId::from_epoch_micros(n)
}

#[test]
fn read_streamer_backend_tag_matches_the_registry() {
    assert_eq!(ReadStreamerBackend::Local.tag(), "local");
}

#[tokio::test]
async fn end_to_end_live_broadcast_matches_the_seeded_scenario() {
    use crate::logger::JobSink;

    let dir = tempfile::tempdir().unwrap();
    let (logger, worker_rx) = StreamingLogger::new(16);
    let fabric = LogFabric::spawn(dir.path(), worker_rx);

    let target = id(1);
    fabric.read_streamer.add_client(&target, "observer".into()).await.unwrap();

    logger.emit(LogModel::new(target.clone(), "test")).await.unwrap();
    logger.emit(LogModel::new(target.clone(), "test")).await.unwrap();

    assert_eq!(fabric.read_streamer.get("observer").await.unwrap(), "test");
    assert_eq!(fabric.read_streamer.get("observer").await.unwrap(), "test");

    fabric.read_streamer.delete("observer");
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let err = fabric.read_streamer.get("observer").await.unwrap_err();
    assert!(matches!(err, FabricError::Missing));
}
