pub mod settings;

pub use settings::{StackSettings, SyncMode};

use std::path::{Path, PathBuf};

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".stackpr.yaml";

/// Resolve the config file path, honoring an explicit override.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(DEFAULT_CONFIG_FILE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_default() {
        assert_eq!(config_path(None), PathBuf::from(".stackpr.yaml"));
    }

    #[test]
    fn test_config_path_override() {
        let explicit = PathBuf::from("/tmp/other.yaml");
        assert_eq!(config_path(Some(&explicit)), explicit);
    }
}
