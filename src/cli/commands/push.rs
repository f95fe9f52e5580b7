use crate::cli::output::Output;
use crate::config::StackSettings;
use crate::errors::{Result, StackError};
use crate::git::get_current_repository;

/// Push every stacked branch to the configured remote, in stack order.
///
/// The first failure aborts; branches already pushed stand. The force flag
/// applies uniformly to every branch in the run.
pub fn run(settings: &StackSettings, force: bool, debug: bool) -> Result<()> {
    let repo = get_current_repository()?;

    if debug {
        println!("Debug: Pushing to remote {}", settings.remote);
        println!("Debug: Branches to push: {:?}", settings.branches);
    }

    for branch in &settings.branches {
        if !repo.branch_exists(branch) {
            return Err(StackError::BranchNotFound(branch.clone()));
        }

        if debug {
            println!(
                "Debug: Pushing branch {branch} (refspec: {}refs/heads/{branch}:refs/heads/{branch})",
                if force { "+" } else { "" }
            );
        }

        repo.push_branch(&settings.remote, branch, force)?;
        Output::success(format!("Pushed {branch}"));
    }

    Ok(())
}
