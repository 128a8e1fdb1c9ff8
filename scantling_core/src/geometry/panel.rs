//! # Stiffened Panels
//!
//! A stiffened panel is the primary structural unit of the section: one base
//! plate with a row of longitudinal stiffeners laid out along it.
//!
//! ## Stiffener layout
//!
//! Stiffener roots are placed at `s_pad + k·spacing` measured along the plate
//! (along the arc for bilges) while they stay within `length − e_pad`. With
//! `skip = n > 0` every n-th position is left empty, which is how a
//! stringer or girder crossing the panel is modelled.
//!
//! ```text
//!   s_pad   spacing   spacing          e_pad
//!  |<--->|<------->|<------->|   ...  |<--->|
//!  ●─────┴─────────┴─────────┴────────────── ●
//! start                                     end
//! ```
//!
//! ## Pressure map
//!
//! Each panel stores, per [`PressureCase`], the pressures projected onto its
//! outward normal at evenly spaced sample positions, kept separately for
//! every block that bounds it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::plate::{Plate, PlateTag, SectionProps, ThicknessBasis};
use super::stiffener::{Stiffener, StiffenerDimensions, StiffenerForm};
use super::{AxisSpec, Point};
use crate::blocks::SpaceType;
use crate::errors::{CsrError, CsrResult};
use crate::loads::PressureCase;
use crate::materials::MaterialGrade;
use crate::units::Millimeters;

/// Spacing rules for the stiffeners of a panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StiffenerLayout {
    pub spacing_mm: f64,
    pub s_pad_mm: f64,
    pub e_pad_mm: f64,
    /// Leave every n-th position empty (0 = none)
    pub skip: u32,
    /// Primary supporting member spacing, the stiffener span (m)
    pub psm_spacing_m: f64,
}

impl StiffenerLayout {
    fn validate(&self, panel_id: u32) -> CsrResult<()> {
        let entity = format!("panel {}", panel_id);
        if !(self.spacing_mm.is_finite() && self.spacing_mm > 0.0) {
            return Err(CsrError::input_schema(entity, "spacing_mm must be positive"));
        }
        if self.s_pad_mm < 0.0 || self.e_pad_mm < 0.0 {
            return Err(CsrError::input_schema(entity, "paddings must not be negative"));
        }
        if !(self.psm_spacing_m.is_finite() && self.psm_spacing_m > 0.0) {
            return Err(CsrError::input_schema(entity, "PSM_spacing_m must be positive"));
        }
        Ok(())
    }

    /// Stiffener positions along a plate of `length` metres
    pub fn positions(&self, length: f64) -> Vec<f64> {
        let spacing = self.spacing_mm / 1000.0;
        let first = self.s_pad_mm / 1000.0;
        let last = length - self.e_pad_mm / 1000.0;
        let mut positions = Vec::new();
        let mut k: u32 = 0;
        loop {
            let d = first + f64::from(k) * spacing;
            if d > last + 1.0e-9 {
                break;
            }
            if self.skip == 0 || (k + 1) % self.skip != 0 {
                positions.push(d);
            }
            k += 1;
        }
        positions
    }
}

/// Profile used for every stiffener of a panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StiffenerProfile {
    pub form: StiffenerForm,
    pub dimensions: StiffenerDimensions,
    pub material: MaterialGrade,
}

/// Pressure of one bounding block, projected on the panel normal (kPa)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockPressure {
    pub block: String,
    pub space: SpaceType,
    pub values: Vec<f64>,
}

/// Pressure on a panel for one case.
///
/// Positive values push along the plate's outward normal, i.e. they act
/// from the stiffener side.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PanelPressure {
    /// Sample positions as fractions of the plate length
    pub fractions: Vec<f64>,
    pub contributions: Vec<BlockPressure>,
}

impl PanelPressure {
    pub fn new(fractions: Vec<f64>) -> Self {
        PanelPressure {
            fractions,
            contributions: Vec::new(),
        }
    }

    /// Pressure of one block, if it bounds the panel
    pub fn block(&self, name: &str) -> Option<&BlockPressure> {
        self.contributions.iter().find(|c| c.block == name)
    }

    /// Summed pressure at every sample, leaving out the `skip` space types
    pub fn total(&self, skip: &BTreeSet<SpaceType>) -> Vec<f64> {
        let mut total = vec![0.0; self.fractions.len()];
        for c in self.contributions.iter().filter(|c| !skip.contains(&c.space)) {
            for (t, v) in total.iter_mut().zip(&c.values) {
                *t += v;
            }
        }
        total
    }

    /// Largest magnitude in a sampled distribution, keeping its sign
    pub fn peak(values: &[f64]) -> f64 {
        values
            .iter()
            .copied()
            .fold(0.0, |acc: f64, v| if v.abs() > acc.abs() { v } else { acc })
    }
}

/// Linear interpolation in a sampled distribution
pub fn sample_at(fractions: &[f64], values: &[f64], f: f64) -> f64 {
    if fractions.is_empty() || values.len() != fractions.len() {
        return 0.0;
    }
    if f <= fractions[0] {
        return values[0];
    }
    for i in 1..fractions.len() {
        if f <= fractions[i] {
            let span = fractions[i] - fractions[i - 1];
            if span <= 0.0 {
                return values[i];
            }
            let w = (f - fractions[i - 1]) / span;
            return values[i - 1] + w * (values[i] - values[i - 1]);
        }
    }
    values[values.len() - 1]
}

/// A plate with its stiffeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StiffenedPanel {
    pub id: u32,
    pub plate: Plate,
    pub profile: Option<StiffenerProfile>,
    pub layout: StiffenerLayout,
    /// Excluded from hull girder properties and sizing
    pub null: bool,
    pub stiffeners: Vec<Stiffener>,
    /// Stiffener positions as fractions of the plate length
    roots: Vec<f64>,
    pub pressure: BTreeMap<PressureCase, PanelPressure>,
    net: SectionProps,
    n50: SectionProps,
}

impl StiffenedPanel {
    /// Build a panel and lay out its stiffeners.
    pub fn new(
        id: u32,
        plate: Plate,
        profile: Option<StiffenerProfile>,
        layout: StiffenerLayout,
        null: bool,
    ) -> CsrResult<Self> {
        layout.validate(id)?;
        let length = plate.length();
        let roots: Vec<f64> = layout.positions(length).into_iter().map(|d| d / length).collect();

        let stiffeners = match profile {
            Some(p) => roots
                .iter()
                .map(|&f| {
                    let tangent = plate.tangent_at(f);
                    Stiffener::new(
                        p.form,
                        p.dimensions,
                        p.material,
                        plate.point_at(f),
                        tangent.y.atan2(tangent.x),
                        plate.tag,
                    )
                })
                .collect::<CsrResult<Vec<_>>>()
                .map_err(|e| match e {
                    CsrError::InputSchema { reason, .. } => {
                        CsrError::input_schema(format!("panel {} stiffeners", id), reason)
                    }
                    other => other,
                })?,
            None => Vec::new(),
        };

        let mut panel = StiffenedPanel {
            id,
            plate,
            profile,
            layout,
            null,
            stiffeners,
            roots,
            pressure: BTreeMap::new(),
            net: SectionProps::default(),
            n50: SectionProps::default(),
        };
        panel.recompute();
        Ok(panel)
    }

    pub fn tag(&self) -> PlateTag {
        self.plate.tag
    }

    /// Stiffener spacing s (m)
    pub fn spacing(&self) -> f64 {
        self.layout.spacing_mm / 1000.0
    }

    /// Stiffener span, the PSM spacing S (m)
    pub fn span(&self) -> f64 {
        self.layout.psm_spacing_m
    }

    /// Stiffener root positions as fractions of the plate length
    pub fn root_fractions(&self) -> &[f64] {
        &self.roots
    }

    /// Stiffener root points in the section plane
    pub fn root_points(&self) -> Vec<Point> {
        self.roots.iter().map(|&f| self.plate.point_at(f)).collect()
    }

    /// Effective breadth of attached plating (m).
    ///
    /// b_eff = min(s, 0.2·S), limited to 0.6 m for plating thinner than 8 mm.
    pub fn effective_breadth(&self) -> f64 {
        let b = self.spacing().min(0.2 * self.span());
        if self.plate.thickness.net < 0.008 {
            b.min(0.6)
        } else {
            b
        }
    }

    pub fn props(&self, basis: ThicknessBasis) -> SectionProps {
        match basis {
            ThicknessBasis::Net => self.net,
            ThicknessBasis::N50 => self.n50,
            ThicknessBasis::AsBuilt => self.props_for(ThicknessBasis::AsBuilt),
        }
    }

    pub fn area(&self, basis: ThicknessBasis) -> f64 {
        self.props(basis).area
    }

    pub fn i_about(&self, axis: AxisSpec, basis: ThicknessBasis) -> f64 {
        self.props(basis).i_about(axis)
    }

    fn props_for(&self, basis: ThicknessBasis) -> SectionProps {
        let mut parts = vec![self.plate.props(basis)];
        parts.extend(self.stiffeners.iter().map(|s| s.props(basis)));
        SectionProps::combine(&parts)
    }

    fn recompute(&mut self) {
        self.net = self.props_for(ThicknessBasis::Net);
        self.n50 = self.props_for(ThicknessBasis::N50);
    }

    /// Assign corrosion reductions (mm magnitudes) to the plate and the stiffeners
    pub fn set_corrosion(&mut self, plate: Millimeters, stiffeners: Millimeters) {
        self.plate.set_corrosion(plate);
        for s in &mut self.stiffeners {
            s.set_corrosion(stiffeners);
        }
        self.recompute();
    }

    /// Refresh thicknesses from the rule requirements and every derived property
    pub fn update(&mut self) {
        self.plate.update();
        for s in &mut self.stiffeners {
            s.update();
        }
        self.recompute();
    }

    /// Store the projected pressure of a case
    pub fn set_pressure(&mut self, case: PressureCase, pressure: PanelPressure) {
        self.pressure.insert(case, pressure);
    }

    /// Projected pressure of a case; a missing entry is logged and reads as zero.
    pub fn pressure_or_zero(&self, case: PressureCase) -> PanelPressure {
        match self.pressure.get(&case) {
            Some(p) => p.clone(),
            None => {
                log::warn!("panel {}: no pressure for case {}, using zero", self.id, case);
                PanelPressure::default()
            }
        }
    }

    /// Polylines for plotting: the plate, then one segment per stiffener leg
    pub fn render_lines(&self, arc_samples: usize) -> Vec<Vec<Point>> {
        let mut lines = vec![self.plate.render_points(arc_samples)];
        for s in &self.stiffeners {
            lines.extend(s.render_points().into_iter().map(|seg| seg.to_vec()));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::plate::PlateShape;
    use approx::assert_abs_diff_eq;

    fn layout(spacing: f64, skip: u32) -> StiffenerLayout {
        StiffenerLayout {
            spacing_mm: spacing,
            s_pad_mm: 400.0,
            e_pad_mm: 400.0,
            skip,
            psm_spacing_m: 3.6,
        }
    }

    fn bottom_panel(profile: Option<StiffenerProfile>, skip: u32) -> StiffenedPanel {
        let plate = Plate::new(
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Millimeters(15.0),
            MaterialGrade::AH32,
            PlateTag::Shell,
        )
        .unwrap();
        StiffenedPanel::new(1, plate, profile, layout(800.0, skip), false).unwrap()
    }

    fn tbar() -> StiffenerProfile {
        StiffenerProfile {
            form: StiffenerForm::TBar,
            dimensions: StiffenerDimensions::flanged(300.0, 12.0, 100.0, 15.0),
            material: MaterialGrade::AH32,
        }
    }

    #[test]
    fn test_layout_positions() {
        // 0.4, 1.2, 2.0, 2.8, 3.6 fit in 4.0 − 0.4
        let positions = layout(800.0, 0).positions(4.0);
        assert_eq!(positions.len(), 5);
        assert_abs_diff_eq!(positions[4], 3.6, epsilon = 1e-12);
    }

    #[test]
    fn test_skip_every_third() {
        let positions = layout(800.0, 3).positions(4.0);
        assert_eq!(positions.len(), 4);
        assert!(positions.iter().all(|p| (p - 2.0).abs() > 1e-9));
    }

    #[test]
    fn test_stiffeners_stand_inboard() {
        let panel = bottom_panel(Some(tbar()), 0);
        assert_eq!(panel.stiffeners.len(), 5);
        for s in &panel.stiffeners {
            assert!(s.web().end.y > 0.29);
        }
    }

    #[test]
    fn test_panel_area_sums_parts() {
        let panel = bottom_panel(Some(tbar()), 0);
        let expected = panel.plate.area(ThicknessBasis::Net)
            + panel.stiffeners.iter().map(|s| s.area(ThicknessBasis::Net)).sum::<f64>();
        assert_abs_diff_eq!(panel.area(ThicknessBasis::Net), expected, epsilon = 1e-12);
        assert!(panel.props(ThicknessBasis::Net).centroid.y > 0.0);
    }

    #[test]
    fn test_effective_breadth() {
        let panel = bottom_panel(None, 0);
        assert_abs_diff_eq!(panel.effective_breadth(), 0.72, epsilon = 1e-12);
        let mut thin = panel.clone();
        thin.layout.spacing_mm = 900.0;
        thin.layout.psm_spacing_m = 5.0;
        thin.plate.thickness.net = 0.007;
        assert_abs_diff_eq!(thin.effective_breadth(), 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_bilge_stiffeners_follow_the_arc() {
        let plate = Plate::new(
            Point::new(14.0, 0.0),
            Point::new(16.0, 2.0),
            Millimeters(16.0),
            MaterialGrade::A,
            PlateTag::Bilge,
        )
        .unwrap();
        let panel = StiffenedPanel::new(2, plate, Some(tbar()), layout(800.0, 0), false).unwrap();
        let centre = Point::new(14.0, 2.0);
        for s in &panel.stiffeners {
            assert_abs_diff_eq!(s.root.distance_to(centre), 2.0, epsilon = 1e-9);
            // webs point towards the bilge centre
            assert!(s.web().end.distance_to(centre) < 2.0);
            assert!(s.legs().iter().all(|leg| leg.shape == PlateShape::Linear && leg.tag == PlateTag::Bilge));
        }
    }

    #[test]
    fn test_missing_pressure_reads_zero() {
        let panel = bottom_panel(None, 0);
        let p = panel.pressure_or_zero(PressureCase::Static);
        assert!(p.total(&BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_total_skips_space_types() {
        let mut p = PanelPressure::new(vec![0.0, 1.0]);
        p.contributions.push(BlockPressure {
            block: "SEA".into(),
            space: SpaceType::Sea,
            values: vec![-100.0, -80.0],
        });
        p.contributions.push(BlockPressure {
            block: "WB1".into(),
            space: SpaceType::WaterBallast,
            values: vec![150.0, 120.0],
        });
        assert_eq!(p.total(&BTreeSet::new()), vec![50.0, 40.0]);
        let skip: BTreeSet<SpaceType> = [SpaceType::WaterBallast].into_iter().collect();
        assert_eq!(p.total(&skip), vec![-100.0, -80.0]);
        assert_eq!(PanelPressure::peak(&[-100.0, 80.0]), -100.0);
        assert_abs_diff_eq!(sample_at(&p.fractions, &[0.0, 10.0], 0.25), 2.5, epsilon = 1e-12);
    }
}
