//! # Pressure Engine
//!
//! Populates the pressure grid of every block for the static case and for
//! each of the fourteen EDWs at one loading draught, then projects the block
//! pressures onto the panels.
//!
//! | Block | Static | Dynamic |
//! |-------|--------|---------|
//! | Sea | hydrostatic ρg(T − z) | wave pressure by EDW family, zoned about the waterline |
//! | Atmosphere | 0 | wave pressure, at least the green sea minimum |
//! | WB / OIL / FW | head to tank top + ½ air pipe | liquid inertia about the reference point |
//! | LC | head to tank top + vapour pressure | liquid inertia with full-tank factors |
//! | DC | K_c weighted head to the hold top | cargo inertia |
//! | VOID | 0 | 0 |
//!
//! ## Example
//!
//! ```no_run
//! use scantling_core::pressure::{populate, design_pressure};
//! use scantling_core::settings::{AnalysisSettings, LoadingCondition};
//! # fn run(section: &mut scantling_core::section::ShipSection) -> scantling_core::CsrResult<()> {
//! let settings = AnalysisSettings::default();
//! let condition = LoadingCondition::full_load();
//! let t_sc = section.particulars.t_sc;
//! populate(section, t_sc, &settings)?;
//! let design = design_pressure(&section.panels[&1], &condition);
//! println!("panel 1: {:.1} kPa ({})", design.peak, design.edw);
//! # Ok(())
//! # }
//! ```

pub mod external;
pub mod internal;
pub mod projection;
pub mod selection;

pub use projection::{project_case, sample_fractions};
pub use selection::{design_pressure, DesignPressure};

use crate::blocks::{Block, SpaceType};
use crate::errors::CsrResult;
use crate::loads::{Edw, LoadCase, PressureCase};
use crate::section::ShipSection;
use crate::settings::AnalysisSettings;
use crate::units::RHO_SEA;

/// Load cases of all fourteen EDWs at loading draught `t_lc`
pub fn build_load_cases(section: &ShipSection, t_lc: f64) -> CsrResult<Vec<LoadCase>> {
    Edw::all()
        .map(|edw| LoadCase::new(edw, t_lc, &section.particulars))
        .collect()
}

/// Static pressure over a block grid at loading draught `t_lc`
pub fn static_block_pressure(block: &Block, t_lc: f64, settings: &AnalysisSettings) -> Vec<f64> {
    match block.space {
        SpaceType::Sea => block
            .grid()
            .iter()
            .map(|g| external::hydrostatic(RHO_SEA, t_lc, g.point.y))
            .collect(),
        SpaceType::Atmosphere => vec![0.0; block.grid().len()],
        _ => internal::static_pressure(block, settings),
    }
}

/// Dynamic pressure over a block grid for one load case
pub fn dynamic_block_pressure(block: &Block, case: &LoadCase) -> Vec<f64> {
    match block.space {
        SpaceType::Sea => block
            .grid()
            .iter()
            .map(|g| external::sea_wave(case, g.point.x, g.point.y))
            .collect(),
        SpaceType::Atmosphere => block
            .grid()
            .iter()
            .map(|g| external::weather_deck(case, g.point.x, g.point.y))
            .collect(),
        _ => internal::dynamic_pressure(block, case),
    }
}

/// Fill every block grid and every panel pressure map at loading draught `t_lc`.
///
/// Returns the load cases used, one per EDW.
pub fn populate(section: &mut ShipSection, t_lc: f64, settings: &AnalysisSettings) -> CsrResult<Vec<LoadCase>> {
    let cases = build_load_cases(section, t_lc)?;
    log::info!("building loads at T_lc = {:.2} m ({} waves)", t_lc, cases.len());

    for block in section.all_blocks_mut() {
        block.pressure.clear();
        let statics = static_block_pressure(block, t_lc, settings);
        block.set_pressure(PressureCase::Static, statics);
        for case in &cases {
            let dynamic = dynamic_block_pressure(block, case);
            block.set_pressure(PressureCase::Dynamic(case.edw), dynamic);
        }
    }

    project_case(section, PressureCase::Static, settings.panel_samples);
    for case in &cases {
        project_case(section, PressureCase::Dynamic(case.edw), settings.panel_samples);
    }
    Ok(cases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::tests::box_section;
    use crate::settings::LoadingCondition;

    #[test]
    fn test_populate_fills_every_case() {
        let mut section = box_section();
        let settings = AnalysisSettings::default();
        let cases = populate(&mut section, 15.3, &settings).unwrap();
        assert_eq!(cases.len(), 14);
        for block in section.all_blocks() {
            assert_eq!(block.pressure.len(), 15);
            for values in block.pressure.values() {
                assert_eq!(values.len(), block.grid().len());
            }
        }
        for panel in section.panels.values() {
            assert_eq!(panel.pressure.len(), 15);
        }
    }

    #[test]
    fn test_loading_draught_above_scantling_is_fatal() {
        let mut section = box_section();
        let err = populate(&mut section, 16.0, &AnalysisSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "RULE_DOMAIN");
    }

    #[test]
    fn test_bottom_design_pressure_is_sea_dominated() {
        let mut section = box_section();
        let settings = AnalysisSettings::default();
        populate(&mut section, 15.3, &settings).unwrap();
        let mut condition = LoadingCondition::full_load();
        condition.skip.insert(SpaceType::DryCargo);
        let design = design_pressure(&section.panels[&1], &condition);
        assert!(design.peak < -150.0);
        assert_eq!(design.values.len(), settings.panel_samples);
    }
}
