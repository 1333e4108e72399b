// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use jrun_core::FakeClock;
use tempfile::tempdir;

fn queue(root: &std::path::Path) -> FileQueue<FakeClock> {
    FileQueue::with_clock(root, None, FakeClock::new()).unwrap()
}

#[test]
fn enqueue_dequeue_preserves_submission_order() {
    let tmp = tempdir().unwrap();
    let q = queue(tmp.path());

    q.enqueue("cmd3", None).unwrap();
    q.enqueue("cmd2", None).unwrap();
    q.enqueue("cmd4", None).unwrap();

    assert_eq!(q.dequeue().unwrap().unwrap().command, "cmd3");
    assert_eq!(q.dequeue().unwrap().unwrap().command, "cmd2");
    assert_eq!(q.dequeue().unwrap().unwrap().command, "cmd4");
    assert!(q.dequeue().unwrap().is_none());
}

#[test]
fn enqueue_restamps_on_id_collision() {
    let tmp = tempdir().unwrap();
    let clock = FakeClock::new();
    let q = FileQueue::with_clock(tmp.path(), None, clock).unwrap();

    let a = q.enqueue("first", None).unwrap();
    let b = q.enqueue("second", None).unwrap();
    assert_ne!(a.id, b.id);
    assert!(a.id < b.id);
}

#[test]
fn status_bucket_walk_matches_scenario_2() {
    let tmp = tempdir().unwrap();
    let q = queue(tmp.path());

    for cmd in ["cmd1", "cmd2", "cmd3", "cmd4"] {
        q.enqueue(cmd, None).unwrap();
    }

    let done_job = q.dequeue().unwrap().unwrap();
    q.worked(&done_job.id, Outcome::Done).unwrap();

    let failed_job = q.dequeue().unwrap().unwrap();
    q.worked(&failed_job.id, Outcome::Failed).unwrap();

    // third job left in `doing`
    q.dequeue().unwrap().unwrap();
    // fourth job left `todo`

    let done = q.list(true, Some(Status::Done)).unwrap();
    assert_eq!(done[0].command, "cmd1");

    let failed = q.list(true, Some(Status::Failed)).unwrap();
    assert_eq!(failed[0].command, "cmd2");

    let doing = q.list(true, Some(Status::Doing)).unwrap();
    assert_eq!(doing[0].command, "cmd3");

    let todo = q.list(true, Some(Status::Todo)).unwrap();
    assert_eq!(todo[0].command, "cmd4");

    assert_eq!(q.list(true, None).unwrap().len(), 4);

    q.prune().unwrap();
    assert_eq!(q.list(true, None).unwrap().len(), 2);
    assert!(q.list(true, Some(Status::Done)).unwrap().is_empty());
    assert!(q.list(true, Some(Status::Failed)).unwrap().is_empty());
}

#[test]
fn worked_on_id_not_in_doing_is_a_silent_no_op() {
    let tmp = tempdir().unwrap();
    let q = queue(tmp.path());

    let job = q.enqueue("cmd", None).unwrap();
    // never dequeued -- still `todo`
    q.worked(&job.id, Outcome::Done).unwrap();
    q.worked(&job.id, Outcome::Done).unwrap();

    assert_eq!(q.list(true, Some(Status::Todo)).unwrap().len(), 1);
    assert!(q.list(true, Some(Status::Done)).unwrap().is_empty());
}

#[test]
fn pop_removes_a_todo_job() {
    let tmp = tempdir().unwrap();
    let q = queue(tmp.path());

    let job = q.enqueue("cmd", None).unwrap();
    q.pop(&job.id).unwrap();
    assert!(q.list(true, None).unwrap().is_empty());
}

#[test]
fn pop_fails_when_id_is_not_in_todo() {
    let tmp = tempdir().unwrap();
    let q = queue(tmp.path());

    let job = q.enqueue("cmd", None).unwrap();
    q.dequeue().unwrap();

    let err = q.pop(&job.id).unwrap_err();
    assert!(matches!(err, QueueError::NotFound { .. }));
}

#[test]
fn list_fast_path_omits_command_and_workdir() {
    let tmp = tempdir().unwrap();
    let q = queue(tmp.path());
    q.enqueue("secret command", None).unwrap();

    let jobs = q.list(false, None).unwrap();
    assert_eq!(jobs.len(), 1);
    assert!(jobs[0].command.is_empty());
    assert!(jobs[0].workdir.as_os_str().is_empty());
}

#[test]
fn non_conforming_filenames_are_ignored() {
    let tmp = tempdir().unwrap();
    let q = queue(tmp.path());
    q.enqueue("cmd", None).unwrap();
    std::fs::write(tmp.path().join("README.md"), b"not a job").unwrap();
    std::fs::write(tmp.path().join(".gitignore"), b"*.log").unwrap();

    assert_eq!(q.list(true, None).unwrap().len(), 1);
}
