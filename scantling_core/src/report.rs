//! # Report Aggregator
//!
//! Collects the outcome of a run into five tables keyed by panel:
//!
//! | Table | One row per |
//! |-------|-------------|
//! | `pressures` | strength panel and loading condition: peak per case and the design scenario |
//! | `plating` | strength panel: thickness record of the base plate |
//! | `stiffener_legs` | web or flange of a stiffened panel |
//! | `panels` | strength panel: layout, effective breadth and section modulus |
//! | `section` | loading condition, then the final check with corrosion added |
//!
//! Panel rows are grouped by plate tag and ordered by id within a group.
//! Every report carries a run id and a timestamp so exported tables can be
//! traced back to the run that produced them.
//!
//! Plot data (section outlines and pressure grids) is emitted separately by
//! [`ship_plot`] and [`pressure_plot`]; drawing it is left to other tools.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::blocks::SpaceType;
use crate::errors::CsrError;
use crate::geometry::{Plate, PlateTag, Point, StiffenedPanel, StiffenerForm, Thickness, ThicknessBasis};
use crate::loads::{Edw, PressureCase};
use crate::materials::MaterialGrade;
use crate::scantling::{AnalysisOutcome, GlobalCheck};
use crate::section::ShipSection;
use crate::settings::Dynamics;

// ============================================================================
// Table rows
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressureRow {
    pub panel_id: u32,
    pub tag: PlateTag,
    pub condition: String,
    /// Peak total pressure per case (kPa)
    pub cases: BTreeMap<PressureCase, f64>,
    pub design_edw: Edw,
    pub design_dynamics: Dynamics,
    pub design_kpa: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatingRow {
    pub panel_id: u32,
    pub tag: PlateTag,
    pub material: MaterialGrade,
    pub length_m: f64,
    pub t_calculated_mm: f64,
    pub t_empirical_mm: f64,
    pub t_buckling_mm: f64,
    pub t_net_mm: f64,
    pub t_corrosion_mm: f64,
    pub t_as_built_mm: f64,
    /// Requirement setting the net thickness
    pub governing: Requirement,
    /// Condition with the largest pressure requirement
    pub governing_condition: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    Calculated,
    Empirical,
    Buckling,
    /// Not sized; the as-given thickness stands
    Unsized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Leg {
    Web,
    Flange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StiffenerLegRow {
    pub panel_id: u32,
    pub tag: PlateTag,
    pub form: StiffenerForm,
    pub leg: Leg,
    pub length_mm: f64,
    pub t_calculated_mm: f64,
    pub t_empirical_mm: f64,
    pub t_net_mm: f64,
    pub t_corrosion_mm: f64,
    pub t_as_built_mm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelRow {
    pub panel_id: u32,
    pub tag: PlateTag,
    pub stiffener_count: usize,
    pub spacing_mm: f64,
    pub span_m: f64,
    pub b_eff_mm: f64,
    /// Net cross-sectional area of plate and stiffeners (m²)
    pub area_net_m2: f64,
    pub z_rule_cm3: f64,
    /// Net section modulus with attached plate (cm³)
    pub z_net_cm3: f64,
    pub violations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRow {
    pub stage: String,
    pub kappa: f64,
    pub m_total_knm: f64,
    pub z_required_m3: f64,
    pub z_min_m3: f64,
    pub z_deck_m3: f64,
    pub z_keel_m3: f64,
    pub i_xx_m4: f64,
    pub i_min_m4: f64,
    pub passed: bool,
}

impl SectionRow {
    fn from_check(stage: impl Into<String>, check: &GlobalCheck) -> Self {
        SectionRow {
            stage: stage.into(),
            kappa: check.kappa,
            m_total_knm: check.m_total,
            z_required_m3: check.z_required,
            z_min_m3: check.z_min,
            z_deck_m3: check.z_deck,
            z_keel_m3: check.z_keel,
            i_xx_m4: check.i_xx,
            i_min_m4: check.i_min,
            passed: check.passed(),
        }
    }
}

// ============================================================================
// Report
// ============================================================================

/// Tabulated result of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub engine_version: String,
    /// Neutral axis height of the final section, n50 basis (m)
    pub neutral_axis_m: f64,
    pub pressures: Vec<PressureRow>,
    pub plating: Vec<PlatingRow>,
    pub stiffener_legs: Vec<StiffenerLegRow>,
    pub panels: Vec<PanelRow>,
    pub section: Vec<SectionRow>,
    pub violations: Vec<CsrError>,
}

fn mm(metres: f64) -> f64 {
    metres * 1000.0
}

/// Corrosion addition as a positive margin in mm, never `-0.0`
fn corrosion_mm(reduction: f64) -> f64 {
    let t_c = -mm(reduction);
    if t_c == 0.0 {
        0.0
    } else {
        t_c
    }
}

fn governing(t: &Thickness) -> Requirement {
    match t.controlling() {
        None => Requirement::Unsized,
        Some(net) if net == t.calculated => Requirement::Calculated,
        Some(net) if net == t.empirical => Requirement::Empirical,
        Some(_) => Requirement::Buckling,
    }
}

/// Strength panels grouped by tag, by id within a tag
fn ordered(section: &ShipSection) -> Vec<&StiffenedPanel> {
    let mut panels: Vec<&StiffenedPanel> = section.strength_panels().collect();
    panels.sort_by_key(|p| (p.tag(), p.id));
    panels
}

fn leg_row(panel: &StiffenedPanel, form: StiffenerForm, leg: Leg, plate: &Plate) -> StiffenerLegRow {
    let t = &plate.thickness;
    StiffenerLegRow {
        panel_id: panel.id,
        tag: panel.tag(),
        form,
        leg,
        length_mm: mm(plate.length()),
        t_calculated_mm: mm(t.calculated),
        t_empirical_mm: mm(t.empirical),
        t_net_mm: mm(t.net),
        t_corrosion_mm: corrosion_mm(t.corrosion),
        t_as_built_mm: mm(t.as_built),
    }
}

impl Report {
    /// Tabulate a finished run; `section` is the section after the run.
    pub fn build(section: &ShipSection, outcome: &AnalysisOutcome) -> Report {
        let panels = ordered(section);

        let mut pressures = Vec::new();
        for condition in &outcome.conditions {
            for panel in &panels {
                let Some(scantling) = condition.panels.get(&panel.id) else {
                    continue;
                };
                pressures.push(PressureRow {
                    panel_id: panel.id,
                    tag: panel.tag(),
                    condition: condition.name.clone(),
                    cases: condition.pressures.get(&panel.id).cloned().unwrap_or_default(),
                    design_edw: scantling.design.edw,
                    design_dynamics: scantling.design.dynamics,
                    design_kpa: scantling.design.peak,
                });
            }
        }

        let plating = panels
            .iter()
            .map(|panel| {
                let t = &panel.plate.thickness;
                let governing_condition = outcome
                    .conditions
                    .iter()
                    .filter_map(|c| c.panels.get(&panel.id).map(|p| (c.name.as_str(), p.plating.t_required.0)))
                    .fold(None, |best: Option<(&str, f64)>, (name, required)| match best {
                        Some((_, b)) if b >= required => best,
                        _ => Some((name, required)),
                    })
                    .map(|(name, _)| name.to_string());
                PlatingRow {
                    panel_id: panel.id,
                    tag: panel.tag(),
                    material: panel.plate.material,
                    length_m: panel.plate.length(),
                    t_calculated_mm: mm(t.calculated),
                    t_empirical_mm: mm(t.empirical),
                    t_buckling_mm: mm(t.buckling),
                    t_net_mm: mm(t.net),
                    t_corrosion_mm: corrosion_mm(t.corrosion),
                    t_as_built_mm: mm(t.as_built),
                    governing: governing(t),
                    governing_condition,
                }
            })
            .collect();

        let mut stiffener_legs = Vec::new();
        for panel in &panels {
            let (Some(profile), Some(stiffener)) = (panel.profile, panel.stiffeners.first()) else {
                continue;
            };
            stiffener_legs.push(leg_row(panel, profile.form, Leg::Web, stiffener.web()));
            if let Some(flange) = stiffener.flange() {
                stiffener_legs.push(leg_row(panel, profile.form, Leg::Flange, flange));
            }
        }

        let panel_rows = panels
            .iter()
            .map(|panel| {
                let b_eff_mm = mm(panel.effective_breadth());
                let t_p = mm(panel.plate.thickness.net);
                let z_rule = panel.stiffeners.iter().map(|s| s.z_rule).fold(0.0, f64::max);
                let z_net = panel
                    .stiffeners
                    .first()
                    .map_or(0.0, |s| s.z_with_attached_plate(t_p, b_eff_mm, ThicknessBasis::Net).0);
                let violations = outcome
                    .violations
                    .iter()
                    .filter(|v| matches!(v, CsrError::RuleViolation { panel_id: Some(id), .. } if *id == panel.id))
                    .count();
                PanelRow {
                    panel_id: panel.id,
                    tag: panel.tag(),
                    stiffener_count: panel.stiffeners.len(),
                    spacing_mm: panel.layout.spacing_mm,
                    span_m: panel.layout.psm_spacing_m,
                    b_eff_mm,
                    area_net_m2: panel.area(ThicknessBasis::Net),
                    z_rule_cm3: z_rule,
                    z_net_cm3: z_net,
                    violations,
                }
            })
            .collect();

        let mut section_rows: Vec<SectionRow> = outcome
            .conditions
            .iter()
            .map(|c| SectionRow::from_check(c.name.clone(), &c.global))
            .collect();
        section_rows.push(SectionRow::from_check("Final", &outcome.final_check));

        let report = Report {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            neutral_axis_m: section.global.n50.y_o,
            pressures,
            plating,
            stiffener_legs,
            panels: panel_rows,
            section: section_rows,
            violations: outcome.violations.clone(),
        };
        log::debug!("report {} built with {} plating rows", report.run_id, report.plating.len());
        report
    }
}

// ============================================================================
// Plot data
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelOutline {
    pub id: u32,
    pub tag: PlateTag,
    pub null: bool,
    /// The plate polyline first, then one segment per stiffener leg
    pub lines: Vec<Vec<Point>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockOutline {
    pub name: String,
    pub space: SpaceType,
    pub centroid: Point,
    pub outline: Vec<Point>,
}

/// Drawing data of the section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipPlot {
    pub panels: Vec<PanelOutline>,
    pub blocks: Vec<BlockOutline>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockPressurePlot {
    pub name: String,
    pub space: SpaceType,
    pub points: Vec<Point>,
    pub normals: Vec<Point>,
    /// Pressure at every grid point per case (kPa)
    pub cases: BTreeMap<PressureCase, Vec<f64>>,
}

pub fn ship_plot(section: &ShipSection, arc_samples: usize) -> ShipPlot {
    ShipPlot {
        panels: section
            .panels
            .values()
            .map(|p| PanelOutline {
                id: p.id,
                tag: p.tag(),
                null: p.null,
                lines: p.render_lines(arc_samples),
            })
            .collect(),
        blocks: section
            .all_blocks()
            .map(|b| BlockOutline {
                name: b.name.clone(),
                space: b.space,
                centroid: b.centroid(),
                outline: b.coords().iter().map(|c| c.point).collect(),
            })
            .collect(),
    }
}

/// Block pressure grids as last populated
pub fn pressure_plot(section: &ShipSection) -> Vec<BlockPressurePlot> {
    section
        .all_blocks()
        .map(|b| BlockPressurePlot {
            name: b.name.clone(),
            space: b.space,
            points: b.grid().iter().map(|g| g.point).collect(),
            normals: b.grid().iter().map(|g| g.normal).collect(),
            cases: b.pressure.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::tests::demo_section;
    use crate::scantling::run;
    use crate::section::tests::box_section;
    use crate::settings::AnalysisSettings;

    fn box_report() -> (ShipSection, Report) {
        let mut section = box_section();
        let outcome = run(&mut section, &AnalysisSettings::default()).unwrap();
        let report = Report::build(&section, &outcome);
        (section, report)
    }

    #[test]
    fn test_table_sizes() {
        let (_, report) = box_report();
        assert_eq!(report.pressures.len(), 8);
        assert_eq!(report.plating.len(), 4);
        // three T-bar panels, web and flange each
        assert_eq!(report.stiffener_legs.len(), 6);
        assert_eq!(report.panels.len(), 4);
        assert_eq!(report.section.len(), 3);
        assert_eq!(report.section[2].stage, "Final");
        assert_eq!(report.pressures[0].cases.len(), 15);
    }

    #[test]
    fn test_plating_row_matches_section() {
        let (section, report) = box_report();
        let row = report.plating.iter().find(|r| r.panel_id == 1).unwrap();
        let plate = &section.panels[&1].plate;
        assert_eq!(row.t_net_mm, plate.net_mm().0);
        assert_eq!(row.t_as_built_mm, plate.as_built_mm().0);
        assert!((row.t_as_built_mm - row.t_net_mm - row.t_corrosion_mm).abs() < 1e-9);
        assert_ne!(row.governing, Requirement::Unsized);
        assert!(row.governing_condition.is_some());
    }

    #[test]
    fn test_girder_corrosion_is_positive_zero() {
        let (_, report) = box_report();
        let girder = report.plating.iter().find(|r| r.panel_id == 4).unwrap();
        assert_eq!(girder.tag, PlateTag::Girder);
        assert_eq!(girder.t_corrosion_mm, 0.0);
        assert!(girder.t_corrosion_mm.is_sign_positive());
        assert_eq!(format!("{:.1}", girder.t_corrosion_mm), "0.0");
        assert!(report.plating.iter().all(|r| r.t_corrosion_mm >= 0.0));
    }

    #[test]
    fn test_rows_grouped_by_tag() {
        let mut section = demo_section();
        let outcome = run(&mut section, &AnalysisSettings::default()).unwrap();
        let report = Report::build(&section, &outcome);

        // 14 panels, two of them null
        assert_eq!(report.plating.len(), 12);
        assert_eq!(report.pressures.len(), 24);
        let keys: Vec<(PlateTag, u32)> = report.plating.iter().map(|r| (r.tag, r.panel_id)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(keys[0], (PlateTag::Shell, 1));
        assert_eq!(keys.last().map(|k| k.0), Some(PlateTag::Girder));
    }

    #[test]
    fn test_report_serializes_with_run_id() {
        let (_, report) = box_report();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["run_id"].as_str().unwrap(), report.run_id.to_string());
        assert!(value["plating"][0]["governing"].is_string());
        let back: Report = serde_json::from_value(value).unwrap();
        assert_eq!(back.run_id, report.run_id);
    }

    #[test]
    fn test_runs_get_distinct_ids() {
        let (_, a) = box_report();
        let (_, b) = box_report();
        assert_ne!(a.run_id, b.run_id);
    }

    #[test]
    fn test_ship_plot() {
        let section = box_section();
        let plot = ship_plot(&section, 8);
        assert_eq!(plot.panels.len(), 4);
        // one user block plus sea and atmosphere
        assert_eq!(plot.blocks.len(), 3);
        let bottom = plot.panels.iter().find(|p| p.id == 1).unwrap();
        // plate, then web and flange of each stiffener
        assert_eq!(bottom.lines.len(), 1 + 2 * section.panels[&1].stiffeners.len());
    }

    #[test]
    fn test_pressure_plot_follows_grid() {
        let mut section = box_section();
        crate::pressure::populate(&mut section, 15.3, &AnalysisSettings::default()).unwrap();
        for block in pressure_plot(&section) {
            assert_eq!(block.points.len(), block.normals.len());
            assert_eq!(block.cases.len(), 15);
            for values in block.cases.values() {
                assert_eq!(values.len(), block.points.len());
            }
        }
    }
}
