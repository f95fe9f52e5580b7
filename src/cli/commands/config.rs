use crate::cli::output::Output;
use crate::config::StackSettings;
use crate::errors::Result;
use std::path::Path;

/// View a single configuration key, or set it and persist the document.
pub fn run(
    settings: &mut StackSettings,
    config_path: &Path,
    key: &str,
    value: Option<&str>,
) -> Result<()> {
    match value {
        None => {
            println!("{key}: {}", settings.get_value(key)?);
            Ok(())
        }
        Some(value) => {
            settings.set_value(key, value)?;
            settings.save_to_file(config_path)?;
            Output::success(format!("Set {key} to {value}"));
            Ok(())
        }
    }
}
