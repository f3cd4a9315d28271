//! Engine configuration.

use crate::plan::PlanError;
use serde::{Deserialize, Serialize};

/// Tunable settings for the interaction engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Grid pitch in feet.
    pub grid_size_ft: f64,
    /// Snap dragged, placed and resized entities to the grid.
    pub grid_snap: bool,
    /// Compute alignment guides while dragging.
    pub smart_guides: bool,
    /// Pixels kept free around the fitted room.
    pub canvas_margin_px: f64,
    /// Offset applied to copies, in feet on both axes.
    pub copy_offset_ft: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_size_ft: 1.0,
            grid_snap: true,
            smart_guides: true,
            canvas_margin_px: 40.0,
            copy_offset_ft: 3.0,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, PlanError> {
        serde_json::from_str(json).map_err(|e| {
            log::warn!("Invalid engine config: {e}");
            PlanError::Serialization(e.to_string())
        })
    }

    /// Grid pitch to snap with, or `None` when snapping is off.
    pub fn snap_grid(&self) -> Option<f64> {
        (self.grid_snap && self.grid_size_ft > 0.0).then_some(self.grid_size_ft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json(r#"{ "grid_size_ft": 0.5, "smart_guides": false }"#).unwrap();
        assert!((config.grid_size_ft - 0.5).abs() < f64::EPSILON);
        assert!(!config.smart_guides);
        assert!(config.grid_snap);
        assert!((config.copy_offset_ft - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            EngineConfig::from_json("{ nope"),
            Err(PlanError::Serialization(_))
        ));
    }

    #[test]
    fn test_snap_grid() {
        let mut config = EngineConfig::default();
        assert_eq!(config.snap_grid(), Some(1.0));
        config.grid_snap = false;
        assert_eq!(config.snap_grid(), None);
    }
}
