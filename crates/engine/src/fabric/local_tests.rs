// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::fabric::{FileHandler, QueueHandler};
use std::time::Duration;

fn id(n: i64) -> JobId {
    JobId::from_epoch_micros(n)
}

async fn new_streamer() -> (Arc<LocalReadStreamer>, Arc<QueueHandler>, Arc<FileHandler>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let queue_handler = Arc::new(QueueHandler::new());
    let file_handler = Arc::new(FileHandler::new(dir.path()));
    let streamer = Arc::new(LocalReadStreamer::new(queue_handler.clone(), file_handler.clone()));
    (streamer, queue_handler, file_handler, dir)
}

#[tokio::test]
async fn get_on_an_unregistered_key_fails_with_missing() {
    let (streamer, ..) = new_streamer().await;
    let err = streamer.get("nope").await.unwrap_err();
    assert!(matches!(err, FabricError::Missing));
}

#[tokio::test]
async fn live_lines_reach_a_subscriber_in_order() {
    let (streamer, queue_handler, ..) = new_streamer().await;
    let target = id(1);
    streamer.add_client(&target, "sub-a".into()).await.unwrap();

    queue_handler.send(&target, "first").await.unwrap();
    queue_handler.send(&target, "second").await.unwrap();

    assert_eq!(streamer.get("sub-a").await.unwrap(), "first");
    assert_eq!(streamer.get("sub-a").await.unwrap(), "second");
}

#[tokio::test]
async fn live_broadcast_fans_out_to_every_subscriber() {
    let (streamer, queue_handler, ..) = new_streamer().await;
    let target = id(1);
    streamer.add_client(&target, "a".into()).await.unwrap();
    streamer.add_client(&target, "b".into()).await.unwrap();

    queue_handler.send(&target, "test").await.unwrap();
    queue_handler.send(&target, "test").await.unwrap();

    assert_eq!(streamer.get("a").await.unwrap(), "test");
    assert_eq!(streamer.get("a").await.unwrap(), "test");
    assert_eq!(streamer.get("b").await.unwrap(), "test");
    assert_eq!(streamer.get("b").await.unwrap(), "test");
}

#[tokio::test]
async fn late_joiner_receives_archive_then_marker_then_live_tail_with_no_gap() {
    let (streamer, queue_handler, file_handler, _dir) = new_streamer().await;
    let target = id(1);

    file_handler.send(&target, "archived-1").await.unwrap();
    file_handler.send(&target, "archived-2").await.unwrap();

    streamer.add_client(&target, "late".into()).await.unwrap();
    queue_handler.send(&target, "live-1").await.unwrap();

    assert_eq!(streamer.get("late").await.unwrap(), "archived-1\narchived-2\n");
    assert_eq!(streamer.get("late").await.unwrap(), LOADING_MARKER);
    assert_eq!(streamer.get("late").await.unwrap(), "live-1");
}

#[tokio::test]
async fn a_subscriber_with_no_archive_gets_no_marker() {
    let (streamer, queue_handler, ..) = new_streamer().await;
    let target = id(1);
    streamer.add_client(&target, "fresh".into()).await.unwrap();
    queue_handler.send(&target, "hello").await.unwrap();
    assert_eq!(streamer.get("fresh").await.unwrap(), "hello");
}

#[tokio::test]
async fn delete_tears_down_the_subscription_and_the_sole_subscribers_log_queue() {
    let (streamer, queue_handler, ..) = new_streamer().await;
    let target = id(1);
    streamer.add_client(&target, "only".into()).await.unwrap();

    streamer.delete("only");
    tokio::time::sleep(Duration::from_millis(10)).await;

    let err = streamer.get("only").await.unwrap_err();
    assert!(matches!(err, FabricError::Missing));
    // the id's live queue was freed; a fresh subscriber starts clean.
    streamer.add_client(&target, "next".into()).await.unwrap();
    queue_handler.send(&target, "after re-add").await.unwrap();
    assert_eq!(streamer.get("next").await.unwrap(), "after re-add");
}

#[tokio::test]
async fn double_delete_is_silent() {
    let (streamer, ..) = new_streamer().await;
    streamer.add_client(&id(1), "k".into()).await.unwrap();
    streamer.delete("k");
    streamer.delete("k");
}

#[tokio::test]
async fn deleting_one_of_two_subscribers_leaves_the_other_receiving_live_lines() {
    let (streamer, queue_handler, ..) = new_streamer().await;
    let target = id(1);
    streamer.add_client(&target, "a".into()).await.unwrap();
    streamer.add_client(&target, "b".into()).await.unwrap();

    streamer.delete("a");
    queue_handler.send(&target, "still here").await.unwrap();
    assert_eq!(streamer.get("b").await.unwrap(), "still here");
}
