//! Editor session configuration.

use rcmap_select::tool::Tool;
use serde::{Deserialize, Serialize};

use crate::EditorError;

/// Settings for a [`MapEditor`](crate::map::MapEditor) session.
///
/// Every field is optional in JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Tool active when the session starts. Default: translate.
    pub initial_tool: Tool,
    /// Tool switched to after a paste. Default: translate.
    pub paste_tool: Tool,
    /// Also log skipped records at `warn` level while loading. Default: on.
    pub log_skipped_records: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            initial_tool: Tool::Translate,
            paste_tool: Tool::Translate,
            log_skipped_records: true,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Config`] if the JSON is malformed or has a field
    /// of the wrong type.
    pub fn from_json_str(json: &str) -> Result<Self, EditorError> {
        serde_json::from_str(json).map_err(|e| EditorError::Config {
            details: e.to_string(),
        })
    }

    pub fn to_json_string(&self) -> String {
        // Serializing plain enums and bools cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
