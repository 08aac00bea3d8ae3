//! Editor tuning knobs.

use crate::schedule::{Duration, millis};
use serde::{Deserialize, Serialize};

/// Editor configuration.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Maximum number of undo steps to keep.
    pub max_undo_history: usize,
    /// Smallest width/height a resize or pinch may produce.
    pub min_element_size: f64,
    /// Offset applied to both axes when duplicating.
    pub duplicate_offset: f64,
    /// Rotation snap increment in degrees.
    pub rotation_snap_degrees: f64,
    /// How long a solved puzzle stays visible before closing.
    pub solve_close_delay_ms: u64,
    /// Quiet period before puzzle state is written back.
    pub persist_debounce_ms: u64,
    /// How long a play-mode message overlay is shown.
    pub message_duration_ms: u64,
    /// Block element creation until a user identity is set.
    pub require_identity: bool,
    /// Fire each item combination only once per session.
    pub single_use_combinations: bool,
    /// Pick radius around transform handles, in canvas units.
    pub handle_hit_tolerance: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_undo_history: 50,
            min_element_size: 20.0,
            duplicate_offset: 20.0,
            rotation_snap_degrees: 15.0,
            solve_close_delay_ms: 2500,
            persist_debounce_ms: 300,
            message_duration_ms: 3000,
            require_identity: true,
            single_use_combinations: false,
            handle_hit_tolerance: 12.0,
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON, falling back to defaults on error.
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|e| {
            log::warn!("Invalid editor config, using defaults: {e}");
            Self::default()
        })
    }

    pub fn solve_close_delay(&self) -> Duration {
        millis(self.solve_close_delay_ms)
    }

    pub fn persist_debounce(&self) -> Duration {
        millis(self.persist_debounce_ms)
    }

    pub fn message_duration(&self) -> Duration {
        millis(self.message_duration_ms)
    }

    pub fn rotation_snap(&self) -> f64 {
        self.rotation_snap_degrees.to_radians()
    }
}
