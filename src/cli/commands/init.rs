use crate::cli::output::Output;
use crate::config::{StackSettings, SyncMode};
use crate::errors::Result;
use std::path::Path;

/// Write the default configuration and point the base at main.
///
/// An existing branches list survives re-initialization; only the scalar
/// settings are reset.
pub fn run(settings: &mut StackSettings, config_path: &Path) -> Result<()> {
    settings.remote = "origin".to_string();
    settings.sync_mode = SyncMode::Rebase;
    settings.save_to_file(config_path)?;
    Output::success(format!("Initialized {}", config_path.display()));

    settings.set_value("base", "main")?;
    settings.save_to_file(config_path)?;
    Output::success("Set base to main");

    Ok(())
}
