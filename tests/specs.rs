// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace-level end-to-end tests: the `jrun` binary, driven as a
//! black box, against the seeded scenarios (spec §8). Each test gets
//! its own isolated `JRUN_STATE_DIR` via `tempfile`; tests that bind a
//! fixed TCP port run `#[serial]` to avoid colliding with each other.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command as StdCommand, Stdio};
use std::time::{Duration, Instant};

use assert_cmd::cargo::CommandCargoExt;
use assert_cmd::Command;
use serial_test::serial;
use tempfile::tempdir;

fn jrun(state_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("jrun").expect("jrun binary builds");
    cmd.env("JRUN_STATE_DIR", state_dir).env("NO_COLOR", "1");
    cmd
}

fn spawn_jrun(state_dir: &Path, args: &[&str]) -> Child {
    StdCommand::cargo_bin("jrun")
        .expect("jrun binary builds")
        .env("JRUN_STATE_DIR", state_dir)
        .env("NO_COLOR", "1")
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("jrun spawns")
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Extracts the id from `jrun add`'s `- ID: <id>` output line.
fn extract_id(stdout: &str) -> String {
    stdout
        .lines()
        .find_map(|l| l.trim().strip_prefix("- ID: "))
        .expect("add prints an ID line")
        .trim()
        .to_string()
}

/// Number of jobs `jrun list` reports directly under a `<status>:` header.
fn count_in_status(state_dir: &Path, status: &str) -> usize {
    let output = jrun(state_dir).arg("list").output().expect("list runs");
    let stdout = String::from_utf8(output.stdout).expect("utf8 output");
    let header = format!("{status}:");
    let mut counting = false;
    let mut count = 0;
    for line in stdout.lines() {
        if line.trim_end() == header {
            counting = true;
            continue;
        }
        if counting {
            if line.starts_with(' ') {
                count += 1;
            } else {
                break;
            }
        }
    }
    count
}

fn wait_until(mut condition: impl FnMut() -> bool, timeout: Duration) {
    let start = Instant::now();
    while !condition() {
        assert!(start.elapsed() < timeout, "condition did not become true within {timeout:?}");
        std::thread::sleep(Duration::from_millis(25));
    }
}

#[test]
fn sequential_submit_preserves_fifo_order() {
    let dir = tempdir().unwrap();
    jrun(dir.path()).args(["add", "cmd3"]).assert().success();
    std::thread::sleep(Duration::from_millis(10));
    jrun(dir.path()).args(["add", "cmd2"]).assert().success();
    std::thread::sleep(Duration::from_millis(10));
    jrun(dir.path()).args(["add", "cmd4"]).assert().success();

    let output = jrun(dir.path()).arg("list").output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let pos3 = stdout.find("cmd3").expect("cmd3 listed");
    let pos2 = stdout.find("cmd2").expect("cmd2 listed");
    let pos4 = stdout.find("cmd4").expect("cmd4 listed");
    assert!(pos3 < pos2 && pos2 < pos4, "expected submission order in listing, got:\n{stdout}");
}

#[test]
fn add_rejects_an_empty_command() {
    let dir = tempdir().unwrap();
    jrun(dir.path()).args(["add", "   "]).assert().failure();
    assert_eq!(count_in_status(dir.path(), "todo"), 0);
}

#[test]
fn add_snapshots_the_given_source_directory() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src-proj");
    std::fs::create_dir_all(src.join("a")).unwrap();
    std::fs::create_dir_all(src.join("b")).unwrap();
    std::fs::write(src.join("a/a.txt"), "hello").unwrap();
    std::fs::write(src.join("b/b.txt"), "world").unwrap();

    let output = jrun(dir.path()).args(["add", "echo hi", "-d"]).arg(&src).output().unwrap();
    assert!(output.status.success());
    let id = extract_id(&String::from_utf8(output.stdout).unwrap());

    let snapshot = dir.path().join("dep").join(&id).join("src-proj");
    assert!(snapshot.join("a/a.txt").is_file());
    assert!(snapshot.join("b/b.txt").is_file());
}

#[test]
fn delete_removes_a_todo_job_and_its_snapshot() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src-proj");
    std::fs::create_dir_all(&src).unwrap();
    std::fs::write(src.join("f.txt"), "x").unwrap();

    let output = jrun(dir.path()).args(["add", "echo hi", "-d"]).arg(&src).output().unwrap();
    let id = extract_id(&String::from_utf8(output.stdout).unwrap());

    jrun(dir.path()).args(["delete", &id]).assert().success();

    let list = jrun(dir.path()).arg("list").output().unwrap();
    assert!(String::from_utf8(list.stdout).unwrap().contains("No jobs"));
    assert!(!dir.path().join("dep").join(&id).exists());
}

#[test]
fn delete_of_an_unknown_id_fails() {
    let dir = tempdir().unwrap();
    jrun(dir.path()).args(["delete", "2026-01-01-00-00-00-000000"]).assert().failure();
}

#[test]
fn worker_runs_a_job_to_completion_in_foreground_mode() {
    let dir = tempdir().unwrap();
    jrun(dir.path()).args(["add", "echo hello-world"]).assert().success();

    let mut worker = spawn_jrun(dir.path(), &["run", "--no-http", "--freq", "20"]);
    wait_until(|| count_in_status(dir.path(), "done") == 1, Duration::from_secs(10));
    kill(&mut worker);

    assert_eq!(count_in_status(dir.path(), "todo"), 0);
}

#[test]
fn worker_marks_a_failing_command_failed() {
    let dir = tempdir().unwrap();
    jrun(dir.path()).args(["add", "exit 7"]).assert().success();

    let mut worker = spawn_jrun(dir.path(), &["run", "--no-http", "--freq", "20"]);
    wait_until(|| count_in_status(dir.path(), "failed") == 1, Duration::from_secs(10));
    kill(&mut worker);
}

#[test]
fn list_prune_clears_terminal_jobs_and_archives() {
    let dir = tempdir().unwrap();
    jrun(dir.path()).args(["add", "true"]).assert().success();

    let mut worker = spawn_jrun(dir.path(), &["run", "--no-http", "--freq", "20"]);
    wait_until(|| count_in_status(dir.path(), "done") == 1, Duration::from_secs(10));
    kill(&mut worker);

    jrun(dir.path()).args(["list", "--prune"]).assert().success();
    assert_eq!(count_in_status(dir.path(), "done"), 0);

    let list = jrun(dir.path()).arg("list").output().unwrap();
    assert!(String::from_utf8(list.stdout).unwrap().contains("No jobs"));
}

#[test]
#[serial]
fn full_daemon_archives_output_for_a_completed_job() {
    let dir = tempdir().unwrap();
    let output = jrun(dir.path()).args(["add", "printf 'line-one\\nline-two\\n'"]).output().unwrap();
    let id = extract_id(&String::from_utf8(output.stdout).unwrap());

    let mut daemon = spawn_jrun(dir.path(), &["run", "--bind", "127.0.0.1:18765", "--freq", "20"]);
    wait_until(|| count_in_status(dir.path(), "done") == 1, Duration::from_secs(10));
    kill(&mut daemon);

    let archive = std::fs::read_to_string(dir.path().join("log").join(&id)).unwrap();
    assert!(archive.contains("line-one"));
    assert!(archive.contains("line-two"));
    assert!(archive.contains("Task finished"));
}

#[test]
#[serial]
fn log_command_replays_the_archived_prefix_for_a_late_joiner() {
    let dir = tempdir().unwrap();
    let output = jrun(dir.path()).args(["add", "printf 'alpha\\nbeta\\n'"]).output().unwrap();
    let id = extract_id(&String::from_utf8(output.stdout).unwrap());

    let mut daemon = spawn_jrun(dir.path(), &["run", "--bind", "127.0.0.1:18766", "--freq", "20"]);
    wait_until(|| count_in_status(dir.path(), "done") == 1, Duration::from_secs(10));

    let mut observer = spawn_jrun(dir.path(), &["log", &id, "127.0.0.1:18766"]);
    let mut stdout = observer.stdout.take().unwrap();
    let reader = std::thread::spawn(move || {
        let mut buf = String::new();
        let _ = stdout.read_to_string(&mut buf);
        buf
    });

    std::thread::sleep(Duration::from_millis(500));
    kill(&mut observer);
    let buf = reader.join().expect("reader thread does not panic");
    kill(&mut daemon);

    assert!(buf.contains("alpha"), "expected archived prefix in observer output, got:\n{buf}");
    assert!(buf.contains("beta"));
    assert!(buf.contains("-------------- loading -------------"));
}
