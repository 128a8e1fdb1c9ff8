//! # Analysis Settings
//!
//! Numerical resolution of the pressure model, rule constants that the
//! rules leave to the designer, and the loading conditions to assess.
//! Every field has a default, so a settings file only needs the values it
//! changes:
//!
//! ```json
//! { "grid_resolution": 20, "air_pipe_height": 0.9 }
//! ```
//!
//! ## Loading conditions
//!
//! | Condition | Draught | Dynamics | Skipped spaces | Enveloped spaces |
//! |-----------|---------|----------|----------------|------------------|
//! | Full Load | T_sc | S, S+D | WB | - |
//! | Water Ballast | T_min | S, S+D | DC, LC | WB |

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::blocks::SpaceType;
use crate::errors::{CsrError, CsrResult};

/// Load components combined into a design pressure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dynamics {
    /// Static only
    #[serde(rename = "S")]
    Static,
    /// Dynamic only
    #[serde(rename = "D")]
    Dynamic,
    /// Static plus dynamic
    #[serde(rename = "S+D")]
    StaticDynamic,
}

impl Dynamics {
    pub fn code(&self) -> &'static str {
        match self {
            Dynamics::Static => "S",
            Dynamics::Dynamic => "D",
            Dynamics::StaticDynamic => "S+D",
        }
    }

    /// Acceptance criteria set: AC-S for static loads, AC-SD otherwise
    pub fn acceptance(&self) -> Acceptance {
        match self {
            Dynamics::Static => Acceptance::Static,
            _ => Acceptance::StaticDynamic,
        }
    }

    pub fn includes_static(&self) -> bool {
        matches!(self, Dynamics::Static | Dynamics::StaticDynamic)
    }

    pub fn includes_dynamic(&self) -> bool {
        matches!(self, Dynamics::Dynamic | Dynamics::StaticDynamic)
    }
}

impl std::fmt::Display for Dynamics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Acceptance criteria set of the rule formulae
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Acceptance {
    /// AC-S
    Static,
    /// AC-SD
    StaticDynamic,
}

impl Acceptance {
    pub fn code(&self) -> &'static str {
        match self {
            Acceptance::Static => "AC-S",
            Acceptance::StaticDynamic => "AC-SD",
        }
    }
}

/// Draught at which a loading condition is assessed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Draught {
    /// Scantling draught T_sc
    Scantling,
    /// Minimum (ballast) draught T_min
    Minimum,
}

/// A loading condition: which draught, which load components, which spaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadingCondition {
    pub name: String,
    pub draught: Draught,
    pub dynamics: BTreeSet<Dynamics>,
    /// Spaces assumed empty in this condition
    #[serde(default)]
    pub skip: BTreeSet<SpaceType>,
    /// Spaces whose dynamic pressure is enveloped over every EDW
    #[serde(default)]
    pub max_value: BTreeSet<SpaceType>,
}

impl LoadingCondition {
    pub fn full_load() -> Self {
        LoadingCondition {
            name: "Full Load".to_string(),
            draught: Draught::Scantling,
            dynamics: [Dynamics::Static, Dynamics::StaticDynamic].into_iter().collect(),
            skip: [SpaceType::WaterBallast].into_iter().collect(),
            max_value: BTreeSet::new(),
        }
    }

    pub fn water_ballast() -> Self {
        LoadingCondition {
            name: "Water Ballast".to_string(),
            draught: Draught::Minimum,
            dynamics: [Dynamics::Static, Dynamics::StaticDynamic].into_iter().collect(),
            skip: [SpaceType::DryCargo, SpaceType::LiquidCargo].into_iter().collect(),
            max_value: [SpaceType::WaterBallast].into_iter().collect(),
        }
    }
}

/// Settings of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Grid points generated per block boundary segment
    pub grid_resolution: usize,
    /// Intermediate points registered along a bilge arc
    pub bilge_samples: usize,
    /// Pressure samples stored along each panel
    pub panel_samples: usize,
    /// Offset of the buffer coordinates closing the sea and atmosphere blocks (m)
    pub buffer_distance: f64,
    /// Height of air pipes above the tank top (m)
    pub air_pipe_height: f64,
    /// Relief valve setting of liquid cargo tanks (kPa)
    pub vapour_pressure: f64,
    /// Repose angle for dry cargo without an explicit value (deg)
    pub repose_angle_deg: f64,
    /// Corrosion reduction assumed while sizing (mm)
    pub corrosion_placeholder_mm: f64,
    pub loading_conditions: Vec<LoadingCondition>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            grid_resolution: 10,
            bilge_samples: 5,
            panel_samples: 11,
            buffer_distance: 2.0,
            air_pipe_height: 0.76,
            vapour_pressure: 25.0,
            repose_angle_deg: 30.0,
            corrosion_placeholder_mm: 1.0,
            loading_conditions: vec![LoadingCondition::full_load(), LoadingCondition::water_ballast()],
        }
    }
}

impl AnalysisSettings {
    pub fn validate(&self) -> CsrResult<()> {
        if self.grid_resolution == 0 {
            return Err(CsrError::input_schema("settings", "grid_resolution must be at least 1"));
        }
        if self.panel_samples < 2 {
            return Err(CsrError::input_schema("settings", "panel_samples must be at least 2"));
        }
        if !(0.0..90.0).contains(&self.repose_angle_deg) {
            return Err(CsrError::input_schema("settings", "repose_angle_deg must lie in [0, 90)"));
        }
        if self.buffer_distance <= 0.0 {
            return Err(CsrError::input_schema("settings", "buffer_distance must be positive"));
        }
        for lc in &self.loading_conditions {
            if lc.dynamics.is_empty() {
                return Err(CsrError::input_schema(
                    format!("loading condition '{}'", lc.name),
                    "at least one of S, D, S+D is required",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = AnalysisSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.loading_conditions.len(), 2);
    }

    #[test]
    fn test_partial_settings_file() {
        let settings: AnalysisSettings = serde_json::from_str(r#"{ "grid_resolution": 20 }"#).unwrap();
        assert_eq!(settings.grid_resolution, 20);
        assert_eq!(settings.air_pipe_height, 0.76);
    }

    #[test]
    fn test_dynamics_codes() {
        let json = serde_json::to_string(&LoadingCondition::full_load()).unwrap();
        assert!(json.contains(r#""dynamics":["S","S+D"]"#));
        assert!(json.contains(r#""skip":["WB"]"#));
        assert_eq!(Dynamics::Static.acceptance().code(), "AC-S");
        assert_eq!(Dynamics::StaticDynamic.acceptance().code(), "AC-SD");
    }

    #[test]
    fn test_empty_dynamics_rejected() {
        let mut settings = AnalysisSettings::default();
        settings.loading_conditions[0].dynamics.clear();
        assert!(settings.validate().is_err());
    }
}
