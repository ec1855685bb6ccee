// tests/file_actions.rs

mod common;
use crate::common::builders::{ActionSpecBuilder, EventBuilder};
use crate::common::{init_tracing, write_file};

use std::io;
use std::path::Path;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use pollwatch::errors::ActionError;
use pollwatch::exec::transfer::{MoveSteps, StepFuture, TokioMoveSteps, move_file_with};
use pollwatch::exec::{Executor, RunnerRegistry};
use pollwatch::watch::ChangeEvent;

fn real_executor(dry_run: bool) -> Executor {
    Executor::new(
        RunnerRegistry::with_default_runners(),
        dry_run,
        CancellationToken::new(),
    )
}

fn event_for(root: &Path, rel: &str) -> ChangeEvent {
    EventBuilder::create(root, rel).build()
}

#[tokio::test]
async fn copy_creates_parent_dirs() {
    init_tracing();
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("in");
    let backup = tmp.path().join("backup");
    write_file(&root.join("docs/a.pdf"), b"pdf");

    let dest = format!("{}/{{relpath}}", backup.display());
    let action = ActionSpecBuilder::copy("backup", &dest).build();

    let outcome = real_executor(false)
        .execute(&event_for(&root, "docs/a.pdf"), &action)
        .await;

    assert!(outcome.success, "{:?}", outcome.error);
    assert_eq!(std::fs::read(backup.join("docs/a.pdf")).unwrap(), b"pdf");
    assert!(root.join("docs/a.pdf").exists());
}

#[tokio::test]
async fn copy_refuses_existing_destination_without_overwrite() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();
    write_file(&root.join("a.txt"), b"new");
    write_file(&root.join("out/a.txt"), b"old");

    let dest = format!("{}/out/{{name}}", root.display());
    let action = ActionSpecBuilder::copy("c", &dest).build();

    let outcome = real_executor(false)
        .execute(&event_for(&root, "a.txt"), &action)
        .await;

    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("destination exists"));
    assert_eq!(std::fs::read(root.join("out/a.txt")).unwrap(), b"old");
}

#[tokio::test]
async fn copy_with_overwrite_replaces_destination() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();
    write_file(&root.join("a.txt"), b"new");
    write_file(&root.join("out/a.txt"), b"old");

    let dest = format!("{}/out/{{name}}", root.display());
    let action = ActionSpecBuilder::copy("c", &dest).overwrite(true).build();

    let outcome = real_executor(false)
        .execute(&event_for(&root, "a.txt"), &action)
        .await;

    assert!(outcome.success, "{:?}", outcome.error);
    assert_eq!(std::fs::read(root.join("out/a.txt")).unwrap(), b"new");
}

#[tokio::test]
async fn dry_run_copy_touches_nothing() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("in");
    write_file(&root.join("a.txt"), b"data");
    let target_dir = tmp.path().join("never/created");

    let dest = format!("{}/{{name}}", target_dir.display());
    let action = ActionSpecBuilder::copy("c", &dest).build();

    let outcome = real_executor(true)
        .execute(&event_for(&root, "a.txt"), &action)
        .await;

    assert!(outcome.success);
    assert!(outcome.dry_run);
    assert!(!tmp.path().join("never").exists());
}

#[tokio::test]
async fn move_into_archive_subdirectory() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();
    write_file(&root.join("a.log"), b"log");

    let action = ActionSpecBuilder::move_to("archive", "{dir}/archive/{name}").build();

    let outcome = real_executor(false)
        .execute(&event_for(&root, "a.log"), &action)
        .await;

    assert!(outcome.success, "{:?}", outcome.error);
    assert!(!root.join("a.log").exists());
    assert_eq!(std::fs::read(root.join("archive/a.log")).unwrap(), b"log");
}

#[tokio::test]
async fn move_refuses_existing_destination() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();
    write_file(&root.join("a.log"), b"new");
    write_file(&root.join("archive/a.log"), b"old");

    let action = ActionSpecBuilder::move_to("archive", "{dir}/archive/{name}").build();

    let outcome = real_executor(false)
        .execute(&event_for(&root, "a.log"), &action)
        .await;

    assert!(!outcome.success);
    assert!(root.join("a.log").exists());
    assert_eq!(std::fs::read(root.join("archive/a.log")).unwrap(), b"old");
}

#[tokio::test]
async fn rename_is_relative_to_source_directory() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();
    write_file(&root.join("sub/photo.jpeg"), b"img");

    let action = ActionSpecBuilder::rename("normalize", "{stem}.jpg").build();

    let outcome = real_executor(false)
        .execute(&event_for(&root, "sub/photo.jpeg"), &action)
        .await;

    assert!(outcome.success, "{:?}", outcome.error);
    assert!(!root.join("sub/photo.jpeg").exists());
    assert_eq!(std::fs::read(root.join("sub/photo.jpg")).unwrap(), b"img");
}

#[tokio::test]
async fn empty_destination_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();
    write_file(&root.join("a"), b"x");

    let action = ActionSpecBuilder::copy("c", "  ").build();
    let outcome = real_executor(false).execute(&event_for(&root, "a"), &action).await;

    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("dest"));
}

/// Rename always fails as if across devices; remove fails when asked to.
struct CrossDeviceSteps {
    fail_remove: bool,
}

impl MoveSteps for CrossDeviceSteps {
    fn rename<'a>(&'a self, _from: &'a Path, _to: &'a Path) -> StepFuture<'a> {
        Box::pin(async { Err(io::Error::other("cross-device link")) })
    }

    fn remove<'a>(&'a self, path: &'a Path) -> StepFuture<'a> {
        if self.fail_remove {
            Box::pin(async { Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only")) })
        } else {
            TokioMoveSteps.remove(path)
        }
    }
}

#[tokio::test]
async fn move_falls_back_to_copy_and_remove() {
    init_tracing();
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("a.log");
    let dest = tmp.path().join("other/a.log");
    write_file(&src, b"log");

    move_file_with(&CrossDeviceSteps { fail_remove: false }, &src, &dest, false)
        .await
        .unwrap();

    assert!(!src.exists());
    assert_eq!(std::fs::read(&dest).unwrap(), b"log");
}

#[tokio::test]
async fn failed_source_removal_keeps_the_copy() {
    init_tracing();
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("a.log");
    let dest = tmp.path().join("other/a.log");
    write_file(&src, b"log");

    let err = move_file_with(&CrossDeviceSteps { fail_remove: true }, &src, &dest, false)
        .await
        .unwrap_err();

    match err {
        ActionError::SourceNotRemoved { from, to, .. } => {
            assert_eq!(from, src);
            assert_eq!(to, dest);
        }
        other => panic!("expected SourceNotRemoved, got {other:?}"),
    }
    assert!(src.exists());
    assert_eq!(std::fs::read(&dest).unwrap(), b"log");
}

#[cfg(unix)]
mod exec {
    use super::*;

    #[tokio::test]
    async fn exec_runs_templated_command_in_cwd() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().to_path_buf();
        write_file(&root.join("a.txt"), b"x");

        let action = ActionSpecBuilder::exec("mark", "touch {stem}.done")
            .cwd("{dir}")
            .build();

        let outcome = real_executor(false)
            .execute(&event_for(&root, "a.txt"), &action)
            .await;

        assert!(outcome.success, "{:?}", outcome.error);
        assert!(root.join("a.done").exists());
    }

    #[tokio::test]
    async fn non_zero_exit_is_a_failure() {
        let tmp = TempDir::new().unwrap();
        let action = ActionSpecBuilder::exec("nope", "false").build();

        let outcome = real_executor(false)
            .execute(&event_for(tmp.path(), "a"), &action)
            .await;

        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("exit code 1"));
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_failure() {
        let tmp = TempDir::new().unwrap();
        let action = ActionSpecBuilder::exec("ghost", "definitely-not-a-real-binary-xyz")
            .retries(1)
            .build();

        let outcome = real_executor(false)
            .execute(&event_for(tmp.path(), "a"), &action)
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.attempts, 2);
        assert!(outcome.error.unwrap().contains("failed to spawn"));
    }

    #[tokio::test]
    async fn empty_command_is_a_no_op() {
        let tmp = TempDir::new().unwrap();
        let action = ActionSpecBuilder::exec("blank", "   ").build();

        let outcome = real_executor(false)
            .execute(&event_for(tmp.path(), "a"), &action)
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.attempts, 1);
    }
}
