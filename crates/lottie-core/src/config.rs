use serde::{Deserialize, Serialize};

/// Tunables for the editing engine. Every field falls back to its default
/// when missing from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Frames within which a write lands on an existing keyframe.
    pub keyframe_tolerance: f32,
    pub history_limit: usize,
    /// Default incoming ease handle (`i`).
    pub ease_in: f32,
    /// Default outgoing ease handle (`o`).
    pub ease_out: f32,
    pub default_font_size: f32,
    pub default_font: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            keyframe_tolerance: 0.1,
            history_limit: 50,
            ease_in: 0.833,
            ease_out: 0.167,
            default_font_size: 48.0,
            default_font: "Roboto".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
