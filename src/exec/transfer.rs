// src/exec/transfer.rs

//! `copy`, `move` and `rename` actions.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use tokio::fs;
use tracing::{debug, warn};

use crate::config::{ActionKind, ActionSpec, TransferSpec};
use crate::errors::ActionError;
use crate::exec::runner::{ActionRunner, RunnerFuture};
use crate::exec::template::expand;
use crate::watch::ChangeEvent;

/// Handles all three file-transfer action kinds.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferRunner;

impl ActionRunner for TransferRunner {
    fn run<'a>(&'a self, event: &'a ChangeEvent, action: &'a ActionSpec) -> RunnerFuture<'a> {
        Box::pin(async move {
            match &action.kind {
                ActionKind::Copy(spec) => {
                    let dest = destination(event, spec, false)?;
                    copy_file(&event.path, &dest, spec.overwrite).await
                }
                ActionKind::Move(spec) => {
                    let dest = destination(event, spec, false)?;
                    move_file(&event.path, &dest, spec.overwrite).await
                }
                ActionKind::Rename(spec) => {
                    let dest = destination(event, spec, true)?;
                    move_file(&event.path, &dest, spec.overwrite).await
                }
                other => Err(ActionError::UnsupportedAction(other.action_type())),
            }
        })
    }
}

/// Expand the destination template.
///
/// For renames with a relative path the result is taken relative to the
/// source's parent directory.
pub fn destination(
    event: &ChangeEvent,
    spec: &TransferSpec,
    relative_to_source: bool,
) -> Result<PathBuf, ActionError> {
    let expanded = expand(&spec.dest, event);
    if expanded.trim().is_empty() {
        return Err(ActionError::EmptyTemplate("dest"));
    }

    match event.path.parent() {
        Some(parent) if relative_to_source && !event.rel_path.is_empty() => {
            Ok(parent.join(expanded))
        }
        _ => Ok(PathBuf::from(expanded)),
    }
}

/// Copy `src` to `dest`, creating parent directories.
///
/// Fails without touching `dest` if it exists and `overwrite` is false.
pub async fn copy_file(src: &Path, dest: &Path, overwrite: bool) -> Result<(), ActionError> {
    ensure_destination_free(dest, overwrite).await?;
    create_parent_dirs(dest).await?;

    let bytes = fs::copy(src, dest)
        .await
        .map_err(|e| ActionError::io(format!("copying {:?} to {:?}", src, dest), e))?;
    debug!(?src, ?dest, bytes, "copied file");
    Ok(())
}

pub type StepFuture<'a> = Pin<Box<dyn Future<Output = io::Result<()>> + Send + 'a>>;

/// The two filesystem steps of a move that can fail on their own.
pub trait MoveSteps: Send + Sync {
    fn rename<'a>(&'a self, from: &'a Path, to: &'a Path) -> StepFuture<'a>;
    fn remove<'a>(&'a self, path: &'a Path) -> StepFuture<'a>;
}

/// `tokio::fs` implementation used by the real runners.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioMoveSteps;

impl MoveSteps for TokioMoveSteps {
    fn rename<'a>(&'a self, from: &'a Path, to: &'a Path) -> StepFuture<'a> {
        Box::pin(fs::rename(from, to))
    }

    fn remove<'a>(&'a self, path: &'a Path) -> StepFuture<'a> {
        Box::pin(fs::remove_file(path))
    }
}

/// Move `src` to `dest`, creating parent directories.
pub async fn move_file(src: &Path, dest: &Path, overwrite: bool) -> Result<(), ActionError> {
    move_file_with(&TokioMoveSteps, src, dest, overwrite).await
}

/// Tries an atomic rename first. If that fails (e.g. across devices) the
/// file is copied and the source removed; if the removal fails the copy is
/// left in place and [`ActionError::SourceNotRemoved`] is returned.
pub async fn move_file_with(
    steps: &dyn MoveSteps,
    src: &Path,
    dest: &Path,
    overwrite: bool,
) -> Result<(), ActionError> {
    ensure_destination_free(dest, overwrite).await?;
    create_parent_dirs(dest).await?;

    let rename_err = match steps.rename(src, dest).await {
        Ok(()) => {
            debug!(?src, ?dest, "renamed file");
            return Ok(());
        }
        Err(e) => e,
    };

    warn!(
        ?src,
        ?dest,
        error = %rename_err,
        "rename failed; falling back to copy + remove"
    );

    fs::copy(src, dest)
        .await
        .map_err(|e| ActionError::io(format!("copying {:?} to {:?}", src, dest), e))?;

    steps
        .remove(src)
        .await
        .map_err(|cause| ActionError::SourceNotRemoved {
            from: src.to_path_buf(),
            to: dest.to_path_buf(),
            cause,
        })
}

async fn ensure_destination_free(dest: &Path, overwrite: bool) -> Result<(), ActionError> {
    if overwrite {
        return Ok(());
    }
    let exists = fs::try_exists(dest)
        .await
        .map_err(|e| ActionError::io(format!("checking {:?}", dest), e))?;
    if exists {
        return Err(ActionError::DestinationExists(dest.to_path_buf()));
    }
    Ok(())
}

async fn create_parent_dirs(dest: &Path) -> Result<(), ActionError> {
    match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .await
            .map_err(|e| ActionError::io(format!("creating dir {:?}", parent), e)),
        _ => Ok(()),
    }
}
