use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from todo.toml. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Ask for y/n before deleting a task
    #[serde(default = "default_true")]
    pub confirm_delete: bool,
    /// Show the key hint line in the status row
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Hex overrides for theme slots (e.g. `overdue = "#FF6347"`)
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            confirm_delete: true,
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.ui.confirm_delete);
        assert!(config.ui.show_key_hints);
        assert!(config.ui.colors.is_empty());
    }

    #[test]
    fn partial_ui_table_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r##"
[ui]
confirm_delete = false

[ui.colors]
overdue = "#AA0000"
"##,
        )
        .unwrap();
        assert!(!config.ui.confirm_delete);
        assert!(config.ui.show_key_hints);
        assert_eq!(config.ui.colors.get("overdue").unwrap(), "#AA0000");
    }
}
