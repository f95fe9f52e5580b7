use crate::errors::{Result, StackError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// How a child branch absorbs changes from its parent during `sync`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    Rebase,
    Merge,
    Reset,
}

impl Default for SyncMode {
    fn default() -> Self {
        SyncMode::Rebase
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncMode::Rebase => "rebase",
            SyncMode::Merge => "merge",
            SyncMode::Reset => "reset",
        };
        f.write_str(s)
    }
}

impl FromStr for SyncMode {
    type Err = StackError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rebase" => Ok(SyncMode::Rebase),
            "merge" => Ok(SyncMode::Merge),
            "reset" => Ok(SyncMode::Reset),
            other => Err(StackError::config(format!(
                "Invalid syncMode '{other}'. Must be 'rebase', 'merge', or 'reset'"
            ))),
        }
    }
}

/// The persisted `.stackpr.yaml` document.
///
/// Loaded once per invocation and passed into the command handlers; written
/// back exactly when a state-changing command completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StackSettings {
    /// Remote used for push/pull
    pub remote: String,
    /// Branch beneath the entire stack; empty until set by `init` or `new`
    pub base: String,
    /// Stack order, bottom to top
    pub branches: Vec<String>,
    pub sync_mode: SyncMode,
}

impl Default for StackSettings {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            base: String::new(),
            branches: Vec::new(),
            sync_mode: SyncMode::default(),
        }
    }
}

impl StackSettings {
    /// Load settings from a file; a missing file yields the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| StackError::config(format!("Failed to read config file: {e}")))?;

        let settings: StackSettings = serde_yaml::from_str(&content)
            .map_err(|e| StackError::config(format!("Failed to parse config file: {e}")))?;

        Ok(settings)
    }

    /// Save settings to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| StackError::config(format!("Failed to serialize config: {e}")))?;

        fs::write(path, content)
            .map_err(|e| StackError::config(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Get a configuration value by key.
    pub fn get_value(&self, key: &str) -> Result<String> {
        match key {
            "remote" => Ok(self.remote.clone()),
            "base" => Ok(self.base.clone()),
            "syncMode" => Ok(self.sync_mode.to_string()),
            "branches" => Ok(format!("[{}]", self.branches.join(", "))),
            _ => Err(StackError::config(format!("Unknown config key: {key}"))),
        }
    }

    /// Update a configuration value by key.
    ///
    /// `syncMode` is validated here, at the edit boundary; `remote` and
    /// `base` accept any string and are checked by the commands that use
    /// them. The list-typed `branches` key is managed through
    /// `new`/`remove`/`reorder`, not direct assignment.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "remote" => self.remote = value.to_string(),
            "base" => self.base = value.to_string(),
            "syncMode" => self.sync_mode = value.parse()?,
            "branches" => {
                return Err(StackError::config(
                    "'branches' cannot be set directly; use 'new', 'remove', or 'reorder'",
                ))
            }
            _ => return Err(StackError::config(format!("Unknown config key: {key}"))),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = StackSettings::default();
        assert_eq!(settings.remote, "origin");
        assert_eq!(settings.base, "");
        assert!(settings.branches.is_empty());
        assert_eq!(settings.sync_mode, SyncMode::Rebase);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let settings = StackSettings::load_from_file(&tmp.path().join(".stackpr.yaml")).unwrap();
        assert_eq!(settings, StackSettings::default());
    }

    #[test]
    fn test_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".stackpr.yaml");

        let mut settings = StackSettings::default();
        settings.base = "main".to_string();
        settings.branches = vec!["feature-a".to_string(), "feature-b".to_string()];
        settings.sync_mode = SyncMode::Merge;
        settings.save_to_file(&path).unwrap();

        let reloaded = StackSettings::load_from_file(&path).unwrap();
        assert_eq!(reloaded, settings);
    }

    #[test]
    fn test_parses_flow_style_document() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".stackpr.yaml");
        std::fs::write(
            &path,
            "remote: origin\nbase: main\nbranches: [feature-a, feature-b]\nsyncMode: reset\n",
        )
        .unwrap();

        let settings = StackSettings::load_from_file(&path).unwrap();
        assert_eq!(settings.base, "main");
        assert_eq!(settings.branches, vec!["feature-a", "feature-b"]);
        assert_eq!(settings.sync_mode, SyncMode::Reset);
    }

    #[test]
    fn test_sync_mode_rejected_at_edit_boundary() {
        let mut settings = StackSettings::default();
        settings.sync_mode = SyncMode::Merge;

        let err = settings.set_value("syncMode", "squash").unwrap_err();
        assert!(matches!(err, StackError::Config(_)));
        // Rejection leaves the stored value unchanged
        assert_eq!(settings.sync_mode, SyncMode::Merge);

        settings.set_value("syncMode", "reset").unwrap();
        assert_eq!(settings.sync_mode, SyncMode::Reset);
    }

    #[test]
    fn test_scalar_keys_unvalidated() {
        let mut settings = StackSettings::default();
        settings.set_value("remote", "upstream").unwrap();
        settings.set_value("base", "does-not-exist-yet").unwrap();
        assert_eq!(settings.get_value("remote").unwrap(), "upstream");
        assert_eq!(settings.get_value("base").unwrap(), "does-not-exist-yet");
    }

    #[test]
    fn test_branches_key_not_directly_settable() {
        let mut settings = StackSettings::default();
        let err = settings.set_value("branches", "a,b").unwrap_err();
        assert!(matches!(err, StackError::Config(_)));
    }

    #[test]
    fn test_unknown_key() {
        let mut settings = StackSettings::default();
        assert!(settings.get_value("nope").is_err());
        assert!(settings.set_value("nope", "x").is_err());
    }
}
