//! Engine configuration persistence
//!
//! Stores engine defaults in `~/.config/formdoc/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::TitleLevel;

/// Editing mode of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditorMode {
    #[default]
    Edit,
    Clean,
    Readonly,
    /// Only control values may be edited
    Form,
    Print,
    /// Ignores `disabled` and `deletable`
    Design,
}

impl EditorMode {
    /// Whether the mode rejects every content mutation
    pub fn is_readonly(self) -> bool {
        matches!(self, EditorMode::Readonly | EditorMode::Print)
    }
}

/// Engine configuration that persists across sessions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Mode new sessions start in
    #[serde(default)]
    pub mode: EditorMode,
    #[serde(default)]
    pub control: ControlConfig,
    #[serde(default)]
    pub checkbox: OptionConfig,
    #[serde(default)]
    pub radio: OptionConfig,
    #[serde(default)]
    pub title: TitleConfig,
    #[serde(default)]
    pub mode_rule: ModeRuleConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Control brackets and role colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_postfix")]
    pub postfix: String,
    #[serde(default = "default_placeholder_color")]
    pub placeholder_color: String,
    #[serde(default = "default_bracket_color")]
    pub bracket_color: String,
}

fn default_prefix() -> String {
    "{".to_string()
}

fn default_postfix() -> String {
    "}".to_string()
}

fn default_placeholder_color() -> String {
    "#9c9b9b".to_string()
}

fn default_bracket_color() -> String {
    "#000000".to_string()
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            postfix: default_postfix(),
            placeholder_color: default_placeholder_color(),
            bracket_color: default_bracket_color(),
        }
    }
}

/// Checkbox/radio option layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionConfig {
    /// Letter spacing after the last label character of each option
    #[serde(default = "default_gap")]
    pub gap: f32,
}

fn default_gap() -> f32 {
    5.0
}

impl Default for OptionConfig {
    fn default() -> Self {
        Self { gap: default_gap() }
    }
}

/// Default font sizes per title level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleConfig {
    #[serde(default = "default_title_sizes")]
    pub sizes: [u32; 6],
}

fn default_title_sizes() -> [u32; 6] {
    [26, 24, 22, 20, 18, 16]
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            sizes: default_title_sizes(),
        }
    }
}

impl TitleConfig {
    pub fn size_for(&self, level: TitleLevel) -> u32 {
        let slot = match level {
            TitleLevel::First => 0,
            TitleLevel::Second => 1,
            TitleLevel::Third => 2,
            TitleLevel::Fourth => 3,
            TitleLevel::Fifth => 4,
            TitleLevel::Sixth => 5,
        };
        self.sizes[slot]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeRuleConfig {
    #[serde(default)]
    pub form: FormModeRule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormModeRule {
    /// Whether whole controls may be deleted in form mode
    #[serde(default = "default_true")]
    pub control_deletable: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FormModeRule {
    fn default() -> Self {
        Self {
            control_deletable: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryConfig {
    /// Maximum number of undo snapshots kept
    #[serde(default = "default_max_history")]
    pub max_size: usize,
}

fn default_max_history() -> usize {
    100
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_history(),
        }
    }
}

impl EngineConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from an explicit path, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: EngineConfig = serde_yaml::from_str("checkbox:\n  gap: 8\n").unwrap();
        assert_eq!(config.checkbox.gap, 8.0);
        assert_eq!(config.radio.gap, 5.0);
        assert_eq!(config.control.prefix, "{");
        assert!(config.mode_rule.form.control_deletable);
        assert_eq!(config.history.max_size, 100);
    }

    #[test]
    fn test_title_sizes() {
        let config = TitleConfig::default();
        assert_eq!(config.size_for(TitleLevel::First), 26);
        assert_eq!(config.size_for(TitleLevel::Sixth), 16);
    }

    #[test]
    fn test_readonly_modes() {
        assert!(EditorMode::Readonly.is_readonly());
        assert!(EditorMode::Print.is_readonly());
        assert!(!EditorMode::Form.is_readonly());
    }
}
