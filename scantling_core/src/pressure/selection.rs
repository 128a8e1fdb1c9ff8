//! Design pressure of a panel for one loading condition
//!
//! The design pressure is the worst of the scenarios
//! `{HSM-1, HSM-2, BSP-1P, BSP-2P} × dynamics` where dynamics is the
//! condition's subset of S, D and S+D. Spaces in the condition's skip set
//! are treated as empty. Spaces in its max-value set contribute their
//! dynamic pressure enveloped over all fourteen EDWs instead of the
//! scenario's own wave.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::blocks::SpaceType;
use crate::geometry::panel::sample_at;
use crate::geometry::{PanelPressure, StiffenedPanel};
use crate::loads::{Edw, PressureCase};
use crate::settings::{Dynamics, LoadingCondition};

/// Governing pressure distribution handed to the scantling engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignPressure {
    pub panel_id: u32,
    pub condition: String,
    pub edw: Edw,
    pub dynamics: Dynamics,
    /// Sample positions as fractions of the plate length
    pub fractions: Vec<f64>,
    /// Pressure at each sample (kPa), positive from the stiffener side
    pub values: Vec<f64>,
    /// Largest magnitude, with its sign
    pub peak: f64,
}

impl DesignPressure {
    /// Pressure at a fraction of the plate length
    pub fn at(&self, fraction: f64) -> f64 {
        sample_at(&self.fractions, &self.values, fraction)
    }
}

fn add_into(total: &mut Vec<f64>, values: &[f64]) {
    if total.len() < values.len() {
        total.resize(values.len(), 0.0);
    }
    for (t, v) in total.iter_mut().zip(values) {
        *t += v;
    }
}

/// Pointwise envelope (largest magnitude, signed) of one block over every EDW
fn enveloped(panel: &StiffenedPanel, block: &str) -> Vec<f64> {
    let mut envelope: Vec<f64> = Vec::new();
    for edw in Edw::all() {
        let Some(contribution) = panel
            .pressure
            .get(&PressureCase::Dynamic(edw))
            .and_then(|p| p.block(block))
        else {
            continue;
        };
        if envelope.len() < contribution.values.len() {
            envelope.resize(contribution.values.len(), 0.0);
        }
        for (e, v) in envelope.iter_mut().zip(&contribution.values) {
            if v.abs() > e.abs() {
                *e = *v;
            }
        }
    }
    envelope
}

/// Dynamic part of a scenario
fn dynamic_part(panel: &StiffenedPanel, edw: Edw, condition: &LoadingCondition) -> Vec<f64> {
    let pressure = panel.pressure_or_zero(PressureCase::Dynamic(edw));
    let excluded: BTreeSet<SpaceType> = condition.skip.union(&condition.max_value).copied().collect();
    let mut total = pressure.total(&excluded);

    let enveloped_blocks: BTreeSet<&str> = panel
        .pressure
        .values()
        .flat_map(|p| p.contributions.iter())
        .filter(|c| condition.max_value.contains(&c.space) && !condition.skip.contains(&c.space))
        .map(|c| c.block.as_str())
        .collect();
    for block in enveloped_blocks {
        add_into(&mut total, &enveloped(panel, block));
    }
    total
}

/// Worst scenario of a panel for a loading condition
pub fn design_pressure(panel: &StiffenedPanel, condition: &LoadingCondition) -> DesignPressure {
    let statics = panel.pressure_or_zero(PressureCase::Static);
    let static_total = statics.total(&condition.skip);
    let fractions = if statics.fractions.is_empty() {
        panel
            .pressure
            .values()
            .map(|p| p.fractions.clone())
            .find(|f| !f.is_empty())
            .unwrap_or_default()
    } else {
        statics.fractions.clone()
    };

    let mut worst: Option<DesignPressure> = None;
    for edw in Edw::DESIGN {
        let dynamic = dynamic_part(panel, edw, condition);
        for &dynamics in &condition.dynamics {
            let mut values = vec![0.0; fractions.len()];
            if dynamics.includes_static() {
                add_into(&mut values, &static_total);
            }
            if dynamics.includes_dynamic() {
                add_into(&mut values, &dynamic);
            }
            let peak = PanelPressure::peak(&values);
            let better = worst.as_ref().map_or(true, |w| peak.abs() > w.peak.abs());
            if better {
                worst = Some(DesignPressure {
                    panel_id: panel.id,
                    condition: condition.name.clone(),
                    edw,
                    dynamics,
                    fractions: fractions.clone(),
                    values,
                    peak,
                });
            }
        }
    }

    worst.unwrap_or_else(|| DesignPressure {
        panel_id: panel.id,
        condition: condition.name.clone(),
        edw: Edw::HSM_1,
        dynamics: Dynamics::Static,
        values: vec![0.0; fractions.len()],
        fractions,
        peak: 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BlockPressure;
    use crate::geometry::PlateTag;
    use crate::section::tests::panel;
    use approx::assert_relative_eq;

    fn contribution(block: &str, space: SpaceType, values: Vec<f64>) -> BlockPressure {
        BlockPressure {
            block: block.to_string(),
            space,
            values,
        }
    }

    fn loaded_panel() -> StiffenedPanel {
        let mut p = panel(7, (11.0, 1.8), (0.0, 1.8), 15.0, PlateTag::InnerBottom);
        let fractions = vec![0.0, 1.0];

        let mut statics = PanelPressure::new(fractions.clone());
        statics.contributions.push(contribution("HOLD", SpaceType::DryCargo, vec![200.0, 210.0]));
        statics.contributions.push(contribution("WB1", SpaceType::WaterBallast, vec![-220.0, -220.0]));
        p.set_pressure(PressureCase::Static, statics);

        for edw in Edw::all() {
            let s = edw.sign();
            let mut dynamic = PanelPressure::new(fractions.clone());
            dynamic.contributions.push(contribution("HOLD", SpaceType::DryCargo, vec![40.0 * s, 40.0 * s]));
            let wb = if edw == Edw::new(crate::loads::EdwRoot::Bsr, crate::loads::Phase::Two) {
                -90.0
            } else {
                -30.0 * s
            };
            dynamic.contributions.push(contribution("WB1", SpaceType::WaterBallast, vec![wb, wb]));
            p.set_pressure(PressureCase::Dynamic(edw), dynamic);
        }
        p
    }

    #[test]
    fn test_full_load_skips_ballast() {
        let p = loaded_panel();
        let design = design_pressure(&p, &LoadingCondition::full_load());
        // 210 static + 40 from the phase one waves
        assert_relative_eq!(design.peak, 250.0);
        assert_eq!(design.dynamics, Dynamics::StaticDynamic);
        assert_eq!(design.edw.phase(), crate::loads::Phase::One);
        assert_relative_eq!(design.at(0.5), 245.0);
    }

    #[test]
    fn test_ballast_envelope_over_every_wave() {
        let p = loaded_panel();
        let design = design_pressure(&p, &LoadingCondition::water_ballast());
        // −220 static, BSR-2P governs the enveloped ballast dynamics
        assert_relative_eq!(design.peak, -310.0);
        assert_eq!(design.dynamics, Dynamics::StaticDynamic);
    }

    #[test]
    fn test_static_only_condition() {
        let p = loaded_panel();
        let mut condition = LoadingCondition::full_load();
        condition.dynamics = [Dynamics::Static].into_iter().collect();
        let design = design_pressure(&p, &condition);
        assert_relative_eq!(design.peak, 210.0);
        assert_eq!(design.edw, Edw::HSM_1);
    }

    #[test]
    fn test_unloaded_panel_is_zero() {
        let p = panel(3, (0.0, 0.0), (4.0, 0.0), 12.0, PlateTag::Shell);
        let design = design_pressure(&p, &LoadingCondition::full_load());
        assert_eq!(design.peak, 0.0);
    }
}
