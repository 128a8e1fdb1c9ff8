//! Plating under lateral pressure (CSR Pt 1 Ch 6 Sec 4 [1])
//!
//! ```text
//! t = 0.0158 · a_p · s · √(|P| / (χ · C_a · R_eH))      [mm]
//! ```
//!
//! - `s`: stiffener spacing (mm)
//! - `a_p = min(1.2 − s²/(2.1·S), 1.0)`, aspect ratio correction (s, S in m)
//! - `χ`: 0.7 for inner bottom and hopper plating, 1.0 elsewhere
//! - `C_a = max(0.9 − 0.5·|σ_hg|/R_eH, C_a,min)`, with C_a,min = 0.8 for
//!   AC-S and 1.0 for AC-SD

use serde::{Deserialize, Serialize};

use crate::geometry::{PlateTag, Point, StiffenedPanel};
use crate::pressure::DesignPressure;
use crate::settings::Acceptance;
use crate::units::Millimeters;

/// Aspect ratio correction a_p (s and S in metres)
pub fn aspect_correction(s: f64, span: f64) -> f64 {
    if span <= 0.0 {
        return 1.0;
    }
    (1.2 - s * s / (2.1 * span)).min(1.0)
}

/// Plate role factor χ
pub fn chi(tag: PlateTag) -> f64 {
    match tag {
        PlateTag::InnerBottom | PlateTag::Hopper => 0.7,
        _ => 1.0,
    }
}

/// Permissible bending stress coefficient C_a
pub fn c_a(sigma_hg: f64, r_eh: f64, acceptance: Acceptance) -> f64 {
    let c_a_min = match acceptance {
        Acceptance::Static => 0.8,
        Acceptance::StaticDynamic => 1.0,
    };
    (0.9 - 0.5 * sigma_hg.abs() / r_eh).max(c_a_min)
}

/// Net thickness required by a lateral pressure `p` (kPa)
pub fn required_thickness(p: f64, spacing_mm: f64, a_p: f64, chi: f64, c_a: f64, r_eh: f64) -> Millimeters {
    let denominator = chi * c_a * r_eh;
    if denominator <= 0.0 {
        return Millimeters(0.0);
    }
    Millimeters(0.0158 * a_p * spacing_mm * (p.abs() / denominator).sqrt())
}

/// Outcome of sizing the plating of one panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatingResult {
    /// Required net thickness from pressure (mm)
    pub t_required: Millimeters,
    /// Fraction of the plate length where the requirement governs
    pub fraction: f64,
    /// Pressure at that point (kPa)
    pub pressure: f64,
    /// Hull girder stress at that point (N/mm²)
    pub sigma_hg: f64,
    pub c_a: f64,
    pub a_p: f64,
}

/// Size the plating of a panel.
///
/// The requirement is evaluated at every stiffener root, or at every
/// pressure sample of an unstiffened panel, and the largest value governs.
/// `sigma_hg` gives the hull girder stress at a section point.
pub fn size_plating<F>(panel: &StiffenedPanel, design: &DesignPressure, sigma_hg: F) -> PlatingResult
where
    F: Fn(Point) -> f64,
{
    let r_eh = panel.plate.material.r_eh();
    let acceptance = design.dynamics.acceptance();
    let a_p = aspect_correction(panel.spacing(), panel.span());
    let chi = chi(panel.tag());

    let positions: Vec<f64> = if panel.root_fractions().is_empty() {
        design.fractions.clone()
    } else {
        panel.root_fractions().to_vec()
    };

    let mut governing = PlatingResult {
        t_required: Millimeters(0.0),
        fraction: 0.0,
        pressure: 0.0,
        sigma_hg: 0.0,
        c_a: c_a(0.0, r_eh, acceptance),
        a_p,
    };
    for f in positions {
        let p = design.at(f);
        let sigma = sigma_hg(panel.plate.point_at(f));
        let c_a = c_a(sigma, r_eh, acceptance);
        let t = required_thickness(p, panel.layout.spacing_mm, a_p, chi, c_a, r_eh);
        if t.0 > governing.t_required.0 {
            governing = PlatingResult {
                t_required: t,
                fraction: f,
                pressure: p,
                sigma_hg: sigma,
                c_a,
                a_p,
            };
        }
    }
    governing
}
