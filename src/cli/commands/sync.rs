use crate::cli::output::Output;
use crate::config::StackSettings;
use crate::errors::{Result, StackError};
use crate::git::get_current_repository;
use crate::stack::{Stack, SyncEngine};

/// Sync every stacked branch with its parent using the configured mode.
pub fn run(settings: &StackSettings) -> Result<()> {
    if settings.base.is_empty() {
        return Err(StackError::config(
            "Base branch not set; run 'stackpr init' or create a branch first",
        ));
    }

    let repo = get_current_repository()?;
    let stack = Stack::new(settings.base.clone(), settings.branches.clone());
    let engine = SyncEngine::new(&repo, settings);

    engine.sync_stack(&stack, |branch, parent| {
        Output::success(format!("Synced {branch} with {parent}"));
    })
}
