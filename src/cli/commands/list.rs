use crate::cli::output::Output;
use crate::config::StackSettings;
use crate::errors::Result;

/// Print the stack, bottom to top, 1-indexed.
pub fn run(settings: &StackSettings) -> Result<()> {
    if settings.branches.is_empty() {
        println!("No stacked branches");
        return Ok(());
    }

    println!("Stacked branches:");
    for (index, branch) in settings.branches.iter().enumerate() {
        Output::numbered_item(index + 1, branch);
    }

    Ok(())
}
