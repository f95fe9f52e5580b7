use crate::cli::output::Output;
use crate::config::StackSettings;
use crate::errors::{Result, StackError};
use crate::git::get_current_repository;
use crate::stack::{Stack, SyncEngine};

/// Merge one stacked branch into its parent.
///
/// The branch stays in the stack afterwards; removing it is an explicit
/// separate step.
pub fn run(settings: &StackSettings, branch: &str) -> Result<()> {
    let stack = Stack::new(settings.base.clone(), settings.branches.clone());
    if !stack.contains(branch) {
        return Err(StackError::NotInStack(branch.to_string()));
    }

    if settings.base.is_empty() {
        return Err(StackError::config(
            "Base branch not set; run 'stackpr init' or create a branch first",
        ));
    }

    let repo = get_current_repository()?;
    let engine = SyncEngine::new(&repo, settings);
    let parent = engine.merge_branch(&stack, branch)?;

    Output::success(format!("Merged {branch} into {parent}"));
    Ok(())
}
