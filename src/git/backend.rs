use crate::errors::{Result, StackError};
use crate::git::repository::{GitRepository, PullOutcome};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Synchronization capabilities a backend may provide.
///
/// Adapters cover only part of the surface: the embedded library has no
/// rebase and no working-tree merge, and the subprocess adapter does not
/// pull. `StackError::Unsupported` tells the caller to route the call to
/// another backend.
pub trait SyncBackend {
    /// Pull `branch` from `remote` into the current checkout.
    fn pull(&self, remote: &str, branch: &str) -> Result<PullOutcome>;

    /// Rebase the current branch onto `parent`.
    fn rebase_onto(&self, parent: &str) -> Result<()>;

    /// Merge `source` into the current checkout.
    fn merge_from(&self, source: &str) -> Result<()>;
}

/// Adapter backed by the embedded git library.
pub struct EmbeddedBackend<'r> {
    repo: &'r GitRepository,
}

impl<'r> EmbeddedBackend<'r> {
    pub fn new(repo: &'r GitRepository) -> Self {
        Self { repo }
    }
}

impl SyncBackend for EmbeddedBackend<'_> {
    fn pull(&self, remote: &str, branch: &str) -> Result<PullOutcome> {
        self.repo.pull(remote, branch)
    }

    fn rebase_onto(&self, _parent: &str) -> Result<()> {
        Err(StackError::Unsupported("rebase"))
    }

    fn merge_from(&self, _source: &str) -> Result<()> {
        Err(StackError::Unsupported("merge"))
    }
}

/// Adapter that spawns the `git` binary in the working tree.
///
/// stdout/stderr are inherited so git's own diagnostics (conflict markers,
/// merge summaries) reach the user unfiltered.
pub struct ProcessBackend {
    workdir: PathBuf,
}

impl ProcessBackend {
    pub fn new(workdir: &Path) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
        }
    }

    fn run_git(&self, args: &[&str]) -> Result<()> {
        tracing::debug!("Running git {}", args.join(" "));

        let status = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| StackError::operation(format!("Could not run git: {e}")))?;

        if !status.success() {
            return Err(StackError::operation(format!(
                "git {} exited with {status}",
                args.join(" ")
            )));
        }

        Ok(())
    }
}

impl SyncBackend for ProcessBackend {
    fn pull(&self, _remote: &str, _branch: &str) -> Result<PullOutcome> {
        Err(StackError::Unsupported("pull"))
    }

    fn rebase_onto(&self, parent: &str) -> Result<()> {
        self.run_git(&["rebase", parent])
    }

    fn merge_from(&self, source: &str) -> Result<()> {
        self.run_git(&["merge", source])
    }
}
