use crate::errors::{Result, StackError};
use git2::build::CheckoutBuilder;
use git2::{Oid, Repository, Signature};
use std::path::{Path, PathBuf};

/// Outcome of a pull that completed without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    /// The current branch already contained the remote tip
    UpToDate,
    /// The current branch was fast-forwarded or merged
    Updated,
}

/// Tip commit details for a branch, as shown by `status`.
#[derive(Debug, Clone)]
pub struct BranchTip {
    pub message: String,
    pub short_hash: String,
}

/// Wrapper around git2::Repository with safe operations
pub struct GitRepository {
    repo: Repository,
    path: PathBuf,
}

impl GitRepository {
    /// Open a Git repository at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)
            .map_err(|e| StackError::config(format!("Not a git repository: {e}")))?;

        let workdir = repo
            .workdir()
            .ok_or_else(|| StackError::config("Repository has no working directory"))?
            .to_path_buf();

        Ok(Self {
            repo,
            path: workdir,
        })
    }

    /// Get repository path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the current branch name
    pub fn current_branch(&self) -> Result<String> {
        let head = self
            .repo
            .head()
            .map_err(|e| StackError::operation(format!("Could not get HEAD: {e}")))?;

        if let Some(name) = head.shorthand() {
            Ok(name.to_string())
        } else {
            // Detached HEAD - return commit hash
            let commit = head
                .peel_to_commit()
                .map_err(|e| StackError::operation(format!("Could not get HEAD commit: {e}")))?;
            Ok(format!("HEAD@{}", commit.id()))
        }
    }

    /// Check if a local branch exists
    pub fn branch_exists(&self, name: &str) -> bool {
        self.repo.find_branch(name, git2::BranchType::Local).is_ok()
    }

    /// Create a new branch pointing at the current HEAD
    pub fn create_branch_from_head(&self, name: &str) -> Result<()> {
        let head = self
            .repo
            .head()
            .map_err(|e| StackError::operation(format!("Could not get HEAD: {e}")))?;
        let commit = head
            .peel_to_commit()
            .map_err(|e| StackError::operation(format!("Could not get HEAD commit: {e}")))?;

        self.repo
            .branch(name, &commit, false)
            .map_err(|e| StackError::operation(format!("Could not create branch '{name}': {e}")))?;

        tracing::info!("Created branch '{}'", name);
        Ok(())
    }

    /// Switch to a branch
    pub fn checkout_branch(&self, name: &str) -> Result<()> {
        let branch = self
            .repo
            .find_branch(name, git2::BranchType::Local)
            .map_err(|_| StackError::BranchNotFound(name.to_string()))?;

        let tree = branch.get().peel_to_tree().map_err(|e| {
            StackError::operation(format!("Could not get tree for branch '{name}': {e}"))
        })?;

        self.repo
            .checkout_tree(tree.as_object(), None)
            .map_err(|e| {
                StackError::operation(format!("Could not checkout branch '{name}': {e}"))
            })?;

        self.repo
            .set_head(&format!("refs/heads/{name}"))
            .map_err(|e| {
                StackError::operation(format!("Could not update HEAD to '{name}': {e}"))
            })?;

        tracing::info!("Switched to branch '{}'", name);
        Ok(())
    }

    /// Resolve a local branch to its tip commit id
    pub fn branch_commit_id(&self, name: &str) -> Result<Oid> {
        let branch = self
            .repo
            .find_branch(name, git2::BranchType::Local)
            .map_err(|_| StackError::BranchNotFound(name.to_string()))?;

        let commit = branch.get().peel_to_commit().map_err(|e| {
            StackError::operation(format!("Could not get commit for branch '{name}': {e}"))
        })?;

        Ok(commit.id())
    }

    /// Tip commit message and short hash for a branch
    pub fn branch_tip(&self, name: &str) -> Result<BranchTip> {
        let oid = self.branch_commit_id(name)?;
        let commit = self.repo.find_commit(oid)?;

        let message = commit.message().unwrap_or("").trim().to_string();
        let mut short_hash = oid.to_string();
        short_hash.truncate(7);

        Ok(BranchTip {
            message,
            short_hash,
        })
    }

    /// Hard-reset the current branch, index, and working tree to a commit
    pub fn hard_reset_to(&self, target: Oid) -> Result<()> {
        let object = self.repo.find_object(target, None)?;

        self.repo
            .reset(&object, git2::ResetType::Hard, None)
            .map_err(|e| StackError::operation(format!("Could not reset to {target}: {e}")))?;

        tracing::info!("Hard reset to {}", target);
        Ok(())
    }

    /// Push a branch to the given remote; a forced push uses a `+` refspec
    pub fn push_branch(&self, remote_name: &str, branch: &str, force: bool) -> Result<()> {
        tracing::info!("Pushing '{}' to '{}'", branch, remote_name);

        let mut remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|e| StackError::config(format!("No remote '{remote_name}' found: {e}")))?;

        let refspec = if force {
            format!("+refs/heads/{branch}:refs/heads/{branch}")
        } else {
            format!("refs/heads/{branch}:refs/heads/{branch}")
        };

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(Self::remote_callbacks());

        remote
            .push(&[&refspec], Some(&mut push_options))
            .map_err(|e| StackError::operation(format!("Failed to push '{branch}': {e}")))?;

        tracing::debug!("Pushed '{}'", branch);
        Ok(())
    }

    /// Pull a remote branch into the current checkout (fetch + merge).
    ///
    /// Fast-forwards when possible, otherwise performs a 3-way merge and
    /// commits the result. Conflicts surface as an error; callers decide
    /// whether to fall back to the external tool.
    pub fn pull(&self, remote_name: &str, branch: &str) -> Result<PullOutcome> {
        tracing::info!("Pulling '{}' from '{}'", branch, remote_name);

        let mut remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|e| StackError::config(format!("No remote '{remote_name}' found: {e}")))?;

        // Fetch with the configured refspecs so the remote-tracking ref for
        // the branch is updated
        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(Self::remote_callbacks());
        remote
            .fetch::<&str>(&[], Some(&mut fetch_options), None)
            .map_err(|e| StackError::operation(format!("Fetch from '{remote_name}' failed: {e}")))?;

        let remote_ref = format!("refs/remotes/{remote_name}/{branch}");
        let remote_oid = self.repo.refname_to_id(&remote_ref).map_err(|e| {
            StackError::operation(format!("Remote branch {remote_name}/{branch} not found: {e}"))
        })?;
        let remote_commit = self.repo.find_commit(remote_oid)?;

        let head_commit = self.head_commit()?;
        if head_commit.id() == remote_commit.id() {
            tracing::debug!("Already up to date");
            return Ok(PullOutcome::UpToDate);
        }

        let merge_base = self.repo.merge_base(head_commit.id(), remote_commit.id())?;

        if merge_base == remote_commit.id() {
            // Remote tip is already contained in the current branch
            return Ok(PullOutcome::UpToDate);
        }

        if merge_base == head_commit.id() {
            // Fast-forward: move the current branch ref and refresh the tree
            let mut head_ref = self.repo.head()?;
            head_ref.set_target(remote_oid, "pull: fast-forward")?;
            let mut checkout = CheckoutBuilder::new();
            checkout.force();
            self.repo.checkout_head(Some(&mut checkout))?;
            tracing::debug!("Fast-forwarded to {}", remote_oid);
            return Ok(PullOutcome::Updated);
        }

        // True merge
        let base_commit = self.repo.find_commit(merge_base)?;
        let mut index = self.repo.merge_trees(
            &base_commit.tree()?,
            &head_commit.tree()?,
            &remote_commit.tree()?,
            None,
        )?;

        if index.has_conflicts() {
            return Err(StackError::operation(format!(
                "Pull of '{branch}' has conflicts that need manual resolution"
            )));
        }

        let merged_tree_oid = index.write_tree_to(&self.repo)?;
        let merged_tree = self.repo.find_tree(merged_tree_oid)?;

        let signature = self.signature()?;
        let message = format!("Merge branch '{branch}' from {remote_name}");

        self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            &message,
            &merged_tree,
            &[&head_commit, &remote_commit],
        )?;

        // Bring the working tree up to the merge result
        let mut checkout = CheckoutBuilder::new();
        checkout.force();
        self.repo.checkout_head(Some(&mut checkout))?;

        tracing::debug!("Merged '{}' into the current branch", branch);
        Ok(PullOutcome::Updated)
    }

    /// Get the HEAD commit object
    fn head_commit(&self) -> Result<git2::Commit<'_>> {
        let head = self
            .repo
            .head()
            .map_err(|e| StackError::operation(format!("Could not get HEAD: {e}")))?;
        head.peel_to_commit()
            .map_err(|e| StackError::operation(format!("Could not get HEAD commit: {e}")))
    }

    /// Get a signature for merge commits
    fn signature(&self) -> Result<Signature<'static>> {
        if let Ok(config) = self.repo.config() {
            if let (Ok(name), Ok(email)) = (
                config.get_string("user.name"),
                config.get_string("user.email"),
            ) {
                return Signature::now(&name, &email).map_err(StackError::Git);
            }
        }

        Signature::now("stackpr", "stackpr@localhost").map_err(StackError::Git)
    }

    /// Credential callbacks shared by push and fetch
    fn remote_callbacks() -> git2::RemoteCallbacks<'static> {
        let mut callbacks = git2::RemoteCallbacks::new();

        // Use existing authentication from the ssh agent or credential helper
        callbacks.credentials(|_url, username_from_url, _allowed_types| {
            if let Some(username) = username_from_url {
                git2::Cred::ssh_key_from_agent(username)
            } else {
                git2::Cred::default()
            }
        });

        callbacks
    }
}
