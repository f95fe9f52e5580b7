use crate::cli::output::Output;
use crate::config::StackSettings;
use crate::errors::Result;
use crate::stack::Stack;
use std::path::Path;

/// Replace the stack order with the given permutation of the current
/// branches.
pub fn run(settings: &mut StackSettings, config_path: &Path, new_order: Vec<String>) -> Result<()> {
    let mut stack = Stack::new(settings.base.clone(), settings.branches.clone());
    stack.reorder(new_order)?;

    let (base, branches) = stack.into_parts();
    settings.base = base;
    settings.branches = branches;
    settings.save_to_file(config_path)?;

    println!("Reordered branches:");
    for (index, branch) in settings.branches.iter().enumerate() {
        Output::numbered_item(index + 1, branch);
    }

    Ok(())
}
