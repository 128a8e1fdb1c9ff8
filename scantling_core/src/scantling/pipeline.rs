//! # Analysis Pipeline
//!
//! Runs a section through the staged assessment:
//!
//! ```text
//! Load → CorrodeAssign → ┬→ BuildLoads → EvaluatePanels → SectionCheck ┐ → CorrodeAdd → Done
//!                        └────────────── per loading condition ─────────┘
//! ```
//!
//! Rule requirements accumulate over the loading conditions: a later
//! condition never lowers a thickness an earlier one required. Rule
//! violations are collected and returned; every other error stops the run.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::buckling::{max_compression, size_buckling, BucklingResult};
use super::corrosion::{apply_corrosion, assign_placeholder, CorrosionAddition};
use super::global::{check_section, GlobalCheck};
use super::minimum::plate_minimum;
use super::plating::{size_plating, PlatingResult};
use super::stiffeners::{size_stiffeners, StiffenerResult};
use crate::errors::{CsrError, CsrResult};
use crate::geometry::{PanelPressure, PlateTag, Point, StiffenedPanel};
use crate::loads::{Edw, LoadCase, PressureCase};
use crate::pressure::{design_pressure, populate, DesignPressure};
use crate::section::{HullGirderProperties, ShipSection};
use crate::settings::{AnalysisSettings, LoadingCondition};
use crate::units::{Meters, Millimeters};

/// Stage of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Load,
    CorrodeAssign,
    BuildLoads,
    EvaluatePanels,
    SectionCheck,
    CorrodeAdd,
    Done,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::CorrodeAssign => "corrode-assign",
            Stage::BuildLoads => "build loads",
            Stage::EvaluatePanels => "evaluate panels",
            Stage::SectionCheck => "section check",
            Stage::CorrodeAdd => "corrode-add",
            Stage::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// Everything derived for one panel in one loading condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelScantling {
    pub panel_id: u32,
    pub tag: PlateTag,
    pub design: DesignPressure,
    /// Rule minimum of the plating
    pub t_minimum: Millimeters,
    pub plating: PlatingResult,
    pub buckling: BucklingResult,
    pub stiffeners: Option<StiffenerResult>,
}

impl PanelScantling {
    pub fn violations(&self) -> impl Iterator<Item = &CsrError> {
        self.buckling
            .violations
            .iter()
            .chain(self.stiffeners.iter().flat_map(|s| s.violations.iter()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionOutcome {
    pub name: String,
    /// Loading draught (m)
    pub t_lc: f64,
    /// Peak total pressure (kPa) of every strength panel per pressure case
    pub pressures: BTreeMap<u32, BTreeMap<PressureCase, f64>>,
    pub panels: BTreeMap<u32, PanelScantling>,
    pub global: GlobalCheck,
}

/// Result of a full run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub conditions: Vec<ConditionOutcome>,
    pub corrosion: Vec<CorrosionAddition>,
    /// Hull girder check with the corrosion additions in place
    pub final_check: GlobalCheck,
    /// Panel violations of every condition followed by those of the final check
    pub violations: Vec<CsrError>,
}

impl AnalysisOutcome {
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }
}

fn enter(stage: Stage) {
    log::info!("stage: {}", stage);
}

fn clear_requirements(section: &mut ShipSection) {
    for panel in section.panels.values_mut() {
        panel.plate.thickness.clear_requirements();
        for stiffener in &mut panel.stiffeners {
            for leg in stiffener.legs_mut() {
                leg.thickness.clear_requirements();
            }
        }
    }
}

fn load_case(cases: &[LoadCase], edw: Edw) -> CsrResult<&LoadCase> {
    cases
        .iter()
        .find(|c| c.edw == edw)
        .ok_or_else(|| CsrError::numeric("load cases", format!("no load case built for {}", edw)))
}

fn case_peaks(section: &ShipSection) -> BTreeMap<u32, BTreeMap<PressureCase, f64>> {
    let none = BTreeSet::new();
    section
        .strength_panels()
        .map(|panel| {
            let peaks = panel
                .pressure
                .iter()
                .map(|(case, pressure)| (*case, PanelPressure::peak(&pressure.total(&none))))
                .collect();
            (panel.id, peaks)
        })
        .collect()
}

/// Largest compressive hull girder stress of a panel over the design waves
fn design_compression(cases: &[LoadCase], girder: &HullGirderProperties, panel: &StiffenedPanel) -> CsrResult<f64> {
    let mut sigma_c: f64 = 0.0;
    for edw in Edw::DESIGN {
        let case = load_case(cases, edw)?;
        let compression = max_compression(panel, |pt: Point| case.hull_girder_stress(pt.x, pt.y, girder, true));
        sigma_c = sigma_c.max(compression);
    }
    Ok(sigma_c)
}

/// Size one panel for a loading condition
fn evaluate_panel(
    section: &mut ShipSection,
    id: u32,
    condition: &LoadingCondition,
    cases: &[LoadCase],
    girder: &HullGirderProperties,
) -> CsrResult<PanelScantling> {
    let l_sc = section.particulars.l_sc;
    let (design, keel, sigma_c) = {
        let panel = section.panel(id)?;
        (
            design_pressure(panel, condition),
            section.is_keel(panel),
            design_compression(cases, girder, panel)?,
        )
    };
    let case = load_case(cases, design.edw)?;
    let include_wave = design.dynamics.includes_dynamic();
    let sigma = |pt: Point| case.hull_girder_stress(pt.x, pt.y, girder, include_wave);

    let panel = section
        .panels
        .get_mut(&id)
        .ok_or_else(|| CsrError::input_schema(format!("panel {}", id), "unknown panel id"))?;

    let plating = size_plating(panel, &design, &sigma);
    let t_minimum = plate_minimum(panel.tag(), keel, l_sc);
    let calculated: Meters = plating.t_required.into();
    let empirical: Meters = t_minimum.into();
    let thickness = &mut panel.plate.thickness;
    thickness.calculated = thickness.calculated.max(calculated.0);
    thickness.empirical = thickness.empirical.max(empirical.0);

    let buckling = size_buckling(panel, sigma_c);
    panel.update();

    let stiffeners = size_stiffeners(panel, &design, l_sc, &sigma);
    panel.update();

    log::debug!(
        "panel {} ({}): P = {:.1} kPa [{} {}], t_net = {:.2} mm",
        id,
        panel.tag(),
        design.peak,
        design.edw,
        design.dynamics,
        panel.plate.net_mm().0
    );

    Ok(PanelScantling {
        panel_id: id,
        tag: panel.tag(),
        design,
        t_minimum,
        plating,
        buckling,
        stiffeners,
    })
}

/// Assess every loading condition, add corrosion and check the hull girder.
///
/// The section is left with its final thicknesses.
pub fn run(section: &mut ShipSection, settings: &AnalysisSettings) -> CsrResult<AnalysisOutcome> {
    enter(Stage::Load);
    settings.validate()?;
    clear_requirements(section);

    enter(Stage::CorrodeAssign);
    assign_placeholder(section, Millimeters(settings.corrosion_placeholder_mm));
    section.update();

    let mut conditions = Vec::new();
    let mut violations = Vec::new();

    for condition in &settings.loading_conditions {
        log::info!("loading condition: {}", condition.name);

        enter(Stage::BuildLoads);
        let t_lc = section.particulars.draught(condition.draught);
        let cases = populate(section, t_lc, settings)?;
        let girder = section.hull_girder();
        let pressures = case_peaks(section);

        enter(Stage::EvaluatePanels);
        let ids: Vec<u32> = section.strength_panels().map(|p| p.id).collect();
        let mut panels = BTreeMap::new();
        for id in ids {
            let scantling = evaluate_panel(section, id, condition, &cases, &girder)?;
            violations.extend(scantling.violations().cloned());
            panels.insert(id, scantling);
        }

        enter(Stage::SectionCheck);
        section.update();
        let global = check_section(section);
        for v in &global.violations {
            log::warn!("{}: {}", condition.name, v);
        }

        conditions.push(ConditionOutcome {
            name: condition.name.clone(),
            t_lc,
            pressures,
            panels,
            global,
        });
    }

    enter(Stage::CorrodeAdd);
    let corrosion = apply_corrosion(section);
    section.update();
    let final_check = check_section(section);
    violations.extend(final_check.violations.iter().cloned());

    enter(Stage::Done);
    log::info!(
        "{} panels sized over {} conditions, {} violations",
        section.strength_panels().count(),
        conditions.len(),
        violations.len()
    );

    Ok(AnalysisOutcome {
        conditions,
        corrosion,
        final_check,
        violations,
    })
}
