use crate::config::{StackSettings, SyncMode};
use crate::errors::{Result, StackError};
use crate::git::{EmbeddedBackend, GitRepository, ProcessBackend, SyncBackend};
use crate::stack::Stack;

/// Applies the configured sync mode across a stack, branch by branch.
///
/// The engine talks to version control through the `SyncBackend` capability
/// interface and holds a preferred and a fallback adapter; which backend
/// satisfied a call is of no concern to the traversal logic.
pub struct SyncEngine<'a> {
    repo: &'a GitRepository,
    preferred: Box<dyn SyncBackend + 'a>,
    fallback: Box<dyn SyncBackend + 'a>,
    remote: String,
    mode: SyncMode,
}

impl<'a> SyncEngine<'a> {
    pub fn new(repo: &'a GitRepository, settings: &StackSettings) -> Self {
        Self {
            repo,
            preferred: Box::new(EmbeddedBackend::new(repo)),
            fallback: Box::new(ProcessBackend::new(repo.path())),
            remote: settings.remote.clone(),
            mode: settings.sync_mode,
        }
    }

    /// Sync every stacked branch with its parent, bottom to top.
    ///
    /// The first failure aborts the run; branches already synced stay
    /// synced. `on_synced` is called after each completed branch, so a
    /// partial run reports exactly what it finished.
    pub fn sync_stack(&self, stack: &Stack, mut on_synced: impl FnMut(&str, &str)) -> Result<()> {
        for (index, branch) in stack.branches().iter().enumerate() {
            if !self.repo.branch_exists(branch) {
                return Err(StackError::BranchNotFound(branch.clone()));
            }

            // enumerate() stays in bounds, so the parent always derives
            let parent = stack.parent_of(index).unwrap();
            if !self.repo.branch_exists(parent) {
                return Err(StackError::BranchNotFound(parent.to_string()));
            }

            self.repo.checkout_branch(branch)?;

            match self.mode {
                SyncMode::Rebase => {
                    // The parent ref must resolve before handing off to the
                    // external tool
                    self.repo.branch_commit_id(parent)?;
                    self.rebase_onto(parent)?;
                }
                SyncMode::Merge => self.absorb(parent)?,
                SyncMode::Reset => {
                    let target = self.repo.branch_commit_id(parent)?;
                    self.repo.hard_reset_to(target)?;
                }
            }

            on_synced(branch, parent);
        }

        Ok(())
    }

    /// Merge one stacked branch into its parent; returns the parent name.
    ///
    /// The merged branch is left in the stack — closing it out is a separate
    /// `remove`.
    pub fn merge_branch(&self, stack: &Stack, branch: &str) -> Result<String> {
        let parent = stack.parent_of_branch(branch)?.to_string();

        if !self.repo.branch_exists(&parent) {
            return Err(StackError::BranchNotFound(parent));
        }
        if !self.repo.branch_exists(branch) {
            return Err(StackError::BranchNotFound(branch.to_string()));
        }

        self.repo.checkout_branch(&parent)?;
        self.absorb(branch)?;

        Ok(parent)
    }

    fn rebase_onto(&self, parent: &str) -> Result<()> {
        match self.preferred.rebase_onto(parent) {
            Err(e) if e.is_unsupported() => self.fallback.rebase_onto(parent),
            other => other,
        }
    }

    /// Absorb `source` into the current checkout: prefer a remote-aware
    /// pull, degrade to a local merge of the already-resolved ref when the
    /// pull fails (offline, or the source only ever existed locally).
    /// "Already up to date" counts as success.
    fn absorb(&self, source: &str) -> Result<()> {
        match self.preferred.pull(&self.remote, source) {
            Ok(_) => Ok(()),
            Err(_) => {
                // The local ref must resolve before merging
                self.repo.branch_commit_id(source)?;
                self.merge_from(source)
            }
        }
    }

    fn merge_from(&self, source: &str) -> Result<()> {
        match self.preferred.merge_from(source) {
            Err(e) if e.is_unsupported() => self.fallback.merge_from(source),
            other => other,
        }
    }
}
