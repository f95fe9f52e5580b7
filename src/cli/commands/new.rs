use crate::cli::output::Output;
use crate::config::StackSettings;
use crate::errors::Result;
use crate::git::get_current_repository;
use crate::stack::Stack;
use std::path::Path;

/// Create (or adopt) a branch and append it to the stack.
pub fn run(settings: &mut StackSettings, config_path: &Path, branch: &str) -> Result<()> {
    let repo = get_current_repository()?;

    // Captured before any checkout: an unset base records the branch the
    // user started from, not the branch being created.
    let head = repo.current_branch()?;

    if repo.branch_exists(branch) {
        println!("Branch {branch} already exists");
    } else {
        repo.create_branch_from_head(branch)?;
        repo.checkout_branch(branch)?;
    }

    let mut stack = Stack::new(settings.base.clone(), settings.branches.clone());
    if stack.append(branch, &head) {
        let (base, branches) = stack.into_parts();
        settings.base = base;
        settings.branches = branches;
        settings.save_to_file(config_path)?;
    }

    Output::success(format!("Created branch {branch}"));
    Ok(())
}
