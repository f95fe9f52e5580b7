use crate::cli::output::Output;
use crate::config::StackSettings;
use crate::errors::Result;
use crate::stack::Stack;
use std::path::Path;

/// Remove one branch from the stack.
///
/// Only the stack entry goes away; the git branch itself is untouched.
pub fn run(settings: &mut StackSettings, config_path: &Path, branch: &str) -> Result<()> {
    let mut stack = Stack::new(settings.base.clone(), settings.branches.clone());
    stack.remove(branch)?;

    let (base, branches) = stack.into_parts();
    settings.base = base;
    settings.branches = branches;
    settings.save_to_file(config_path)?;

    Output::success(format!("Removed {branch} from stack"));
    Ok(())
}
