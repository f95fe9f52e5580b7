use crate::cli::output::Output;
use crate::config::StackSettings;
use crate::errors::Result;
use crate::git::get_current_repository;

/// Show the tip commit of each stacked branch.
///
/// This is a best-effort overview: missing or unreadable branches warn and
/// the listing continues.
pub fn run(settings: &StackSettings) -> Result<()> {
    let repo = get_current_repository()?;

    for branch in &settings.branches {
        if !repo.branch_exists(branch) {
            Output::warning(format!("Branch {branch} does not exist"));
            continue;
        }

        match repo.branch_tip(branch) {
            Ok(tip) => println!("{branch}: {} ({})", tip.message, tip.short_hash),
            Err(e) => Output::warning(format!("Could not read {branch}: {e}")),
        }
    }

    Ok(())
}
