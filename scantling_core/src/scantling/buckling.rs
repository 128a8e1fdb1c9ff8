//! Plate slenderness and buckling (CSR Pt 1 Ch 8)
//!
//! Two thicknesses are derived for the plating of a panel and the larger is
//! written to its buckling requirement:
//!
//! - slenderness: `t = s / (C·√(235/R_eH))`, C = 100 for the hull envelope
//!   and 125 for internal plating
//! - elastic buckling against the largest compressive hull girder stress
//!   σ_c, with σ_E = 3.6·E·(t/b)² and the Johnson-Ostenfeld correction
//!
//! ```text
//! σ_E,req = σ_c                   σ_c ≤ R_eH/2
//! σ_E,req = R_eH² / (4(R_eH − σ_c))    σ_c > R_eH/2
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::CsrError;
use crate::geometry::{PlateTag, Point, StiffenedPanel};
use crate::units::{Meters, Millimeters, E_STEEL};

/// Slenderness coefficient C of the plating
pub fn slenderness_coefficient(tag: PlateTag) -> f64 {
    if tag.is_hull_envelope() {
        100.0
    } else {
        125.0
    }
}

/// Net thickness for the slenderness limit (spacing in mm)
pub fn slenderness_thickness(spacing_mm: f64, r_eh: f64, tag: PlateTag) -> Millimeters {
    Millimeters(spacing_mm / (slenderness_coefficient(tag) * (235.0 / r_eh).sqrt()))
}

/// Elastic buckling stress the plate must reach, or `None` when the
/// compression already exceeds the yield stress.
pub fn required_elastic_stress(sigma_c: f64, r_eh: f64) -> Option<f64> {
    if sigma_c >= r_eh {
        None
    } else if sigma_c <= r_eh / 2.0 {
        Some(sigma_c)
    } else {
        Some(r_eh * r_eh / (4.0 * (r_eh - sigma_c)))
    }
}

/// Net thickness giving σ_E = 3.6·E·(t/b)² (b in mm)
pub fn buckling_thickness(b_mm: f64, sigma_e: f64) -> Millimeters {
    Millimeters(b_mm * (sigma_e.max(0.0) / (3.6 * E_STEEL)).sqrt())
}

/// Largest compression (positive, N/mm²) at the start, middle and end of
/// the plate; tensile stress counts as zero
pub fn max_compression<F>(panel: &StiffenedPanel, sigma_hg: F) -> f64
where
    F: Fn(Point) -> f64,
{
    [0.0, 0.5, 1.0]
        .iter()
        .map(|&f| -sigma_hg(panel.plate.point_at(f)))
        .fold(0.0, f64::max)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucklingResult {
    /// Compressive hull girder stress (N/mm²)
    pub sigma_c: f64,
    pub t_slenderness: Millimeters,
    pub t_buckling: Millimeters,
    pub violations: Vec<CsrError>,
}

/// Write the buckling requirement of a panel's plating.
///
/// The panel is not refreshed here; the caller runs `update()` once every
/// requirement of the plate is in.
pub fn size_buckling(panel: &mut StiffenedPanel, sigma_c: f64) -> BucklingResult {
    let r_eh = panel.plate.material.r_eh();
    let t_slenderness = slenderness_thickness(panel.layout.spacing_mm, r_eh, panel.tag());
    let b_mm = panel.effective_breadth() * 1000.0;

    let mut violations = Vec::new();
    let t_buckling = match required_elastic_stress(sigma_c, r_eh) {
        Some(sigma_e) => buckling_thickness(b_mm, sigma_e),
        None => {
            violations.push(CsrError::panel_violation(
                panel.id,
                "Pt 1 Ch 8 Sec 5",
                format!("compression {:.1} N/mm² reaches the yield stress {:.0} N/mm²", sigma_c, r_eh),
            ));
            Millimeters(0.0)
        }
    };

    let required: Meters = Millimeters(t_slenderness.0.max(t_buckling.0)).into();
    let thickness = &mut panel.plate.thickness;
    thickness.buckling = thickness.buckling.max(required.0);

    BucklingResult {
        sigma_c,
        t_slenderness,
        t_buckling,
        violations,
    }
}
