//! Canvas configuration.
//!
//! All options are injected at canvas construction by the host application;
//! the canvas never reads configuration from disk itself. The struct derives
//! serde so hosts can embed it in their own settings files.

use serde::{Deserialize, Serialize};

use crate::undo::DEFAULT_NUM_BACKUPS;

/// What a double-click does while drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoubleClickAction {
    /// Finalize the in-progress shape if it can be closed.
    Close,
}

/// Configuration for an editing canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Hit-test tolerance in device pixels. Divided by the zoom factor when
    /// compared against image-space distances.
    pub epsilon: f32,
    /// Double-click behavior while drawing; `None` disables it.
    pub double_click: Option<DoubleClickAction>,
    /// Undo history depth.
    pub num_backups: usize,
    /// Whether the drawing preview snaps to the first vertex.
    pub snapping: bool,
    /// Arrow-key nudge distance in image pixels.
    pub move_speed: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            epsilon: 10.0,
            double_click: Some(DoubleClickAction::Close),
            num_backups: DEFAULT_NUM_BACKUPS,
            snapping: true,
            move_speed: 5.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CanvasConfig::default();
        assert_eq!(config.epsilon, 10.0);
        assert_eq!(config.double_click, Some(DoubleClickAction::Close));
        assert_eq!(config.num_backups, 10);
        assert!(config.snapping);
    }

    #[test]
    fn test_null_double_click_disables_it() {
        let config: CanvasConfig =
            serde_json::from_str(r#"{"double_click": null, "epsilon": 8.0}"#).unwrap();
        assert_eq!(config.double_click, None);
        assert_eq!(config.epsilon, 8.0);
        assert_eq!(config.num_backups, 10);
    }

    #[test]
    fn test_round_trip() {
        let config = CanvasConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"close\""));
        let back: CanvasConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
