//! # Stiffeners
//!
//! Longitudinal stiffeners built from one or two linear plate legs standing
//! on the inner side of their base plate:
//!
//! ```text
//!   flat bar      angle         T-bar        bulb bar
//!
//!     │           ┌────         ───┬───        │
//!     │           │                │           │   (idealised as a
//!     │           │                │           │    flat bar)
//!  ───┴───     ───┴───          ───┴───     ───┴───
//! ```
//!
//! Each leg is a [`Plate`] so it carries its own thickness record and
//! corrosion reduction. Dimensions are given in millimetres:
//!
//! - `lw` web height, `bw` web thickness
//! - `lf` flange width, `bf` flange thickness
//!
//! Section moduli are returned in cm³.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

use super::plate::{Plate, PlateShape, PlateTag, SectionProps, ThicknessBasis};
use super::{AxisSpec, Point};
use crate::errors::{CsrError, CsrResult};
use crate::materials::MaterialGrade;
use crate::units::{CubicCentimeters, Meters, Millimeters};

/// Profile form, keyed by the short codes of the section file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StiffenerForm {
    #[serde(rename = "fb")]
    FlatBar,
    #[serde(rename = "g")]
    Angle,
    #[serde(rename = "tb")]
    TBar,
    #[serde(rename = "bb")]
    BulbBar,
}

impl StiffenerForm {
    pub fn code(&self) -> &'static str {
        match self {
            StiffenerForm::FlatBar => "fb",
            StiffenerForm::Angle => "g",
            StiffenerForm::TBar => "tb",
            StiffenerForm::BulbBar => "bb",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StiffenerForm::FlatBar => "Flat bar",
            StiffenerForm::Angle => "Angle",
            StiffenerForm::TBar => "T-bar",
            StiffenerForm::BulbBar => "Bulb bar",
        }
    }

    /// Whether the profile has a flange leg
    pub fn has_flange(&self) -> bool {
        matches!(self, StiffenerForm::Angle | StiffenerForm::TBar)
    }
}

impl std::fmt::Display for StiffenerForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Profile dimensions in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StiffenerDimensions {
    pub lw: f64,
    pub bw: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lf: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bf: Option<f64>,
}

impl StiffenerDimensions {
    pub fn flat(lw: f64, bw: f64) -> Self {
        StiffenerDimensions { lw, bw, lf: None, bf: None }
    }

    pub fn flanged(lw: f64, bw: f64, lf: f64, bf: f64) -> Self {
        StiffenerDimensions { lw, bw, lf: Some(lf), bf: Some(bf) }
    }

    /// Flange width and thickness, zero when absent
    pub fn flange(&self) -> (f64, f64) {
        (self.lf.unwrap_or(0.0), self.bf.unwrap_or(0.0))
    }

    fn validate(&self, form: StiffenerForm) -> CsrResult<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.lw) || !positive(self.bw) {
            return Err(CsrError::input_schema(
                "stiffener dimensions",
                format!("web lw = {}, bw = {} must be positive", self.lw, self.bw),
            ));
        }
        if form.has_flange() {
            match (self.lf, self.bf) {
                (Some(lf), Some(bf)) if positive(lf) && positive(bf) => {}
                _ => {
                    return Err(CsrError::input_schema(
                        "stiffener dimensions",
                        format!("{} requires positive lf and bf", form.display_name()),
                    ))
                }
            }
        }
        Ok(())
    }
}

/// Section modulus (cm³) of a profile given in millimetres.
///
/// The profile is measured in its own frame: web from 0 to `lw`, flange on
/// top from `lw` to `lw + tf`. With `attached = Some((b_eff, t_p))` a plate
/// flange of breadth `b_eff` and thickness `t_p` is added below the web and Z
/// is taken at the fibre furthest from the neutral axis.
///
/// Without attached plate:
/// - flat bar: Z = tw·lw²/6
/// - angle and T-bar: Z = I / (lw + tf − h_c)
pub fn profile_modulus(
    lw: f64,
    tw: f64,
    flange: Option<(f64, f64)>,
    attached: Option<(f64, f64)>,
) -> CubicCentimeters {
    // (area, centroid height, own inertia)
    let mut parts = vec![(lw * tw, lw / 2.0, tw * lw.powi(3) / 12.0)];
    let mut top = lw;
    if let Some((lf, tf)) = flange.filter(|&(lf, tf)| lf > 0.0 && tf > 0.0) {
        parts.push((lf * tf, lw + tf / 2.0, lf * tf.powi(3) / 12.0));
        top = lw + tf;
    }
    let mut bottom = 0.0;
    let mut with_plate = false;
    if let Some((b, tp)) = attached.filter(|&(b, tp)| b > 0.0 && tp > 0.0) {
        parts.push((b * tp, -tp / 2.0, b * tp.powi(3) / 12.0));
        bottom = -tp;
        with_plate = true;
    }
    if parts.len() == 1 {
        return CubicCentimeters(tw * lw * lw / 6.0 / 1000.0);
    }
    let (_, h_c, inertia) = crate::equations::section::combine_parts(parts);
    let lever = if with_plate { (top - h_c).max(h_c - bottom) } else { top - h_c };
    if lever <= 0.0 {
        return CubicCentimeters(0.0);
    }
    CubicCentimeters(inertia / lever / 1000.0)
}

/// A longitudinal stiffener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stiffener {
    pub form: StiffenerForm,
    pub material: MaterialGrade,
    pub root: Point,
    /// Web direction (rad), base plate angle + 90°
    pub angle: f64,
    /// Rule-required section modulus with attached plate (cm³)
    pub z_rule: f64,
    legs: Vec<Plate>,
}

impl Stiffener {
    /// Build a stiffener on a base plate of angle `base_angle` at `root`.
    ///
    /// The legs inherit the base plate's tag so rule minima and corrosion
    /// follow the plating they stiffen. Legs are always straight, bilge
    /// panels included.
    pub fn new(
        form: StiffenerForm,
        dimensions: StiffenerDimensions,
        material: MaterialGrade,
        root: Point,
        base_angle: f64,
        tag: PlateTag,
    ) -> CsrResult<Self> {
        dimensions.validate(form)?;
        let angle = base_angle + FRAC_PI_2;
        let web_dir = Point::from_angle(angle);
        let base_dir = Point::from_angle(base_angle);
        let lw: Meters = Millimeters(dimensions.lw).into();
        let web_end = root + web_dir * lw.0;

        let mut legs = vec![Plate::with_shape(
            root,
            web_end,
            Millimeters(dimensions.bw),
            material,
            tag,
            PlateShape::Linear,
        )?];
        if form.has_flange() {
            let (lf, bf) = dimensions.flange();
            let lf: Meters = Millimeters(lf).into();
            let (start, end) = match form {
                StiffenerForm::Angle => (web_end, web_end + base_dir * lf.0),
                _ => (web_end - base_dir * (lf.0 / 2.0), web_end + base_dir * (lf.0 / 2.0)),
            };
            legs.push(Plate::with_shape(start, end, Millimeters(bf), material, tag, PlateShape::Linear)?);
        }

        Ok(Stiffener {
            form,
            material,
            root,
            angle,
            z_rule: 0.0,
            legs,
        })
    }

    pub fn legs(&self) -> &[Plate] {
        &self.legs
    }

    pub fn legs_mut(&mut self) -> &mut [Plate] {
        &mut self.legs
    }

    pub fn web(&self) -> &Plate {
        &self.legs[0]
    }

    pub fn web_mut(&mut self) -> &mut Plate {
        &mut self.legs[0]
    }

    pub fn flange(&self) -> Option<&Plate> {
        self.legs.get(1)
    }

    pub fn flange_mut(&mut self) -> Option<&mut Plate> {
        self.legs.get_mut(1)
    }

    /// Current as-built dimensions in millimetres
    pub fn dimensions(&self) -> StiffenerDimensions {
        self.dimensions_for(ThicknessBasis::AsBuilt)
    }

    /// Dimensions with leg thicknesses taken from `basis`
    pub fn dimensions_for(&self, basis: ThicknessBasis) -> StiffenerDimensions {
        let web = self.web();
        let lw = web.length() * 1000.0;
        let bw = web.thickness.for_basis(basis) * 1000.0;
        match self.flange() {
            Some(f) => StiffenerDimensions::flanged(lw, bw, f.length() * 1000.0, f.thickness.for_basis(basis) * 1000.0),
            None => StiffenerDimensions::flat(lw, bw),
        }
    }

    pub fn props(&self, basis: ThicknessBasis) -> SectionProps {
        let parts: Vec<SectionProps> = self.legs.iter().map(|l| l.props(basis)).collect();
        SectionProps::combine(&parts)
    }

    pub fn area(&self, basis: ThicknessBasis) -> f64 {
        self.legs.iter().map(|l| l.area(basis)).sum()
    }

    pub fn i_about(&self, axis: AxisSpec, basis: ThicknessBasis) -> f64 {
        self.legs.iter().map(|l| l.i_about(axis, basis)).sum()
    }

    /// Section modulus about the web base without attached plate (cm³)
    pub fn z(&self, basis: ThicknessBasis) -> CubicCentimeters {
        let d = self.dimensions_for(basis);
        let flange = self.form.has_flange().then(|| d.flange());
        profile_modulus(d.lw, d.bw, flange, None)
    }

    /// Section modulus with an attached plate strip (cm³).
    ///
    /// `t_p` and `b_eff` in millimetres.
    pub fn z_with_attached_plate(&self, t_p: f64, b_eff: f64, basis: ThicknessBasis) -> CubicCentimeters {
        let d = self.dimensions_for(basis);
        let flange = self.form.has_flange().then(|| d.flange());
        profile_modulus(d.lw, d.bw, flange, Some((b_eff, t_p)))
    }

    /// Web and flange as drawing segments
    pub fn render_points(&self) -> Vec<[Point; 2]> {
        self.legs.iter().map(|l| [l.start, l.end]).collect()
    }

    /// Corrosion reduction (mm, magnitude) applied to every leg
    pub fn set_corrosion(&mut self, reduction: Millimeters) {
        for leg in &mut self.legs {
            leg.set_corrosion(reduction);
        }
    }

    pub fn update(&mut self) {
        for leg in &mut self.legs {
            leg.update();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn horizontal_base(form: StiffenerForm, dims: StiffenerDimensions) -> Stiffener {
        Stiffener::new(form, dims, MaterialGrade::AH32, Point::new(1.0, 0.0), 0.0, PlateTag::Shell).unwrap()
    }

    #[test]
    fn test_area_is_sum_of_legs() {
        for (form, dims) in [
            (StiffenerForm::FlatBar, StiffenerDimensions::flat(250.0, 12.0)),
            (StiffenerForm::Angle, StiffenerDimensions::flanged(300.0, 11.0, 90.0, 16.0)),
            (StiffenerForm::TBar, StiffenerDimensions::flanged(400.0, 12.0, 150.0, 18.0)),
        ] {
            let s = horizontal_base(form, dims);
            let legs: f64 = s.legs().iter().map(|l| l.area(ThicknessBasis::Net)).sum();
            assert_abs_diff_eq!(s.props(ThicknessBasis::Net).area, legs, epsilon = 1e-12);
            assert_abs_diff_eq!(s.area(ThicknessBasis::Net), legs, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_web_stands_perpendicular_on_left() {
        let s = horizontal_base(StiffenerForm::TBar, StiffenerDimensions::flanged(400.0, 12.0, 150.0, 18.0));
        let web = s.web();
        assert_abs_diff_eq!(web.end.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(web.end.y, 0.4, epsilon = 1e-12);
        let flange = s.flange().unwrap();
        assert_abs_diff_eq!(flange.start.x, 0.925, epsilon = 1e-12);
        assert_abs_diff_eq!(flange.end.x, 1.075, epsilon = 1e-12);
    }

    #[test]
    fn test_angle_flange_runs_in_base_direction() {
        let s = horizontal_base(StiffenerForm::Angle, StiffenerDimensions::flanged(300.0, 11.0, 90.0, 16.0));
        let flange = s.flange().unwrap();
        assert_abs_diff_eq!(flange.start.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(flange.end.x, 1.09, epsilon = 1e-12);
    }

    #[test]
    fn test_flat_bar_modulus() {
        let s = horizontal_base(StiffenerForm::FlatBar, StiffenerDimensions::flat(200.0, 10.0));
        // 10·200²/6 mm³ = 66.67 cm³
        assert_relative_eq!(s.z(ThicknessBasis::Net).0, 10.0 * 200.0 * 200.0 / 6.0 / 1000.0, max_relative = 1e-9);
    }

    #[test]
    fn test_tbar_modulus_matches_hand_calculation() {
        let z = profile_modulus(400.0, 12.0, Some((150.0, 18.0)), None).0;
        let aw: f64 = 400.0 * 12.0;
        let af = 150.0 * 18.0;
        let hc = (aw * 200.0 + af * 409.0) / (aw + af);
        let i = 12.0 * 400.0_f64.powi(3) / 12.0
            + aw * (200.0 - hc).powi(2)
            + 150.0 * 18.0_f64.powi(3) / 12.0
            + af * (409.0 - hc).powi(2);
        assert_relative_eq!(z, i / (418.0 - hc) / 1000.0, max_relative = 1e-9);
    }

    #[test]
    fn test_angle_modulus_taken_at_flange() {
        let s = horizontal_base(StiffenerForm::Angle, StiffenerDimensions::flanged(300.0, 11.0, 90.0, 16.0));
        let aw: f64 = 300.0 * 11.0;
        let af = 90.0 * 16.0;
        let hc = (aw * 150.0 + af * 308.0) / (aw + af);
        assert!(hc > 158.0);
        let i = 11.0 * 300.0_f64.powi(3) / 12.0
            + aw * (150.0 - hc).powi(2)
            + 90.0 * 16.0_f64.powi(3) / 12.0
            + af * (308.0 - hc).powi(2);
        assert_relative_eq!(s.z(ThicknessBasis::AsBuilt).0, i / (316.0 - hc) / 1000.0, max_relative = 1e-9);
    }

    #[test]
    fn test_bilge_tagged_legs_are_straight() {
        let base_angle = -std::f64::consts::FRAC_PI_4;
        let s = Stiffener::new(
            StiffenerForm::TBar,
            StiffenerDimensions::flanged(250.0, 12.0, 100.0, 14.0),
            MaterialGrade::A,
            Point::new(14.6, 0.1),
            base_angle,
            PlateTag::Bilge,
        )
        .unwrap();
        assert_eq!(s.legs().len(), 2);
        for leg in s.legs() {
            assert_eq!(leg.shape, PlateShape::Linear);
            assert_eq!(leg.tag, PlateTag::Bilge);
        }
        assert_relative_eq!(s.web().length(), 0.25, max_relative = 1e-12);
    }

    #[test]
    fn test_attached_plate_increases_modulus() {
        let s = horizontal_base(StiffenerForm::TBar, StiffenerDimensions::flanged(400.0, 12.0, 150.0, 18.0));
        let bare = s.z(ThicknessBasis::Net).0;
        let with_plate = s.z_with_attached_plate(15.0, 800.0, ThicknessBasis::Net).0;
        assert!(with_plate > bare);
    }

    #[test]
    fn test_bulb_bar_is_a_flat_bar() {
        let s = horizontal_base(StiffenerForm::BulbBar, StiffenerDimensions::flat(220.0, 11.0));
        assert_eq!(s.legs().len(), 1);
    }

    #[test]
    fn test_missing_flange_dimensions_rejected() {
        let err = Stiffener::new(
            StiffenerForm::TBar,
            StiffenerDimensions::flat(300.0, 12.0),
            MaterialGrade::A,
            Point::new(0.0, 0.0),
            0.0,
            PlateTag::Shell,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "INPUT_SCHEMA");
    }

    #[test]
    fn test_dimensions_report_as_built() {
        let mut s = horizontal_base(StiffenerForm::FlatBar, StiffenerDimensions::flat(250.0, 12.0));
        s.set_corrosion(Millimeters(1.0));
        assert_abs_diff_eq!(s.dimensions().bw, 12.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s.dimensions_for(ThicknessBasis::Net).bw, 11.0, epsilon = 1e-9);
    }
}
