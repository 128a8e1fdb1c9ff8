//! Hull girder strength check (CSR Pt 1 Ch 5 Sec 1)
//!
//! The net-50 section modulus at deck and keel must carry the largest total
//! vertical bending moment at the permissible stress, and section modulus
//! and moment of inertia must reach the rule minima:
//!
//! ```text
//! Z_req = max(|M_sw,h + M_wv,h|, |M_sw,s + M_wv,s|) / σ_perm · 10⁻³   [m³]
//! σ_perm = 175 / κ                                                  [N/mm²]
//! Z ≥ Z_R-min,   I_xx ≥ I_y-min
//! ```
//!
//! Shortfalls are reported; the section is not thickened to meet them.

use serde::{Deserialize, Serialize};

use crate::errors::CsrError;
use crate::loads::hull_girder;
use crate::section::{HullGirderProperties, ShipSection};

/// Section modulus (m³) of a hull girder at a fibre `lever` metres from the
/// neutral axis
///
/// ```
/// use scantling_core::scantling::global::section_modulus;
/// use scantling_core::section::HullGirderProperties;
/// let girder = HullGirderProperties { y_n: 9.0, i_xx: 5.0, i_yy: 0.0 };
/// assert!((section_modulus(&girder, 9.0) - 0.5556).abs() < 1e-4);
/// ```
pub fn section_modulus(girder: &HullGirderProperties, lever: f64) -> f64 {
    if lever <= 0.0 {
        return 0.0;
    }
    girder.i_xx / lever
}

/// Required section modulus (m³) for a total bending moment (kNm)
pub fn required_modulus(total_moment: f64, kappa: f64) -> f64 {
    total_moment.abs() / hull_girder::permissible_stress(kappa) / 1000.0
}

/// Result of the hull girder check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalCheck {
    pub kappa: f64,
    /// Permissible stress σ_perm (N/mm²)
    pub sigma_perm: f64,
    /// Governing total vertical moment (kNm)
    pub m_total: f64,
    pub z_required: f64,
    pub z_min: f64,
    pub z_deck: f64,
    pub z_keel: f64,
    pub i_xx: f64,
    pub i_min: f64,
    pub violations: Vec<CsrError>,
}

impl GlobalCheck {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Compare actual moduli and inertia against their requirements
pub fn evaluate(
    z_deck: f64,
    z_keel: f64,
    i_xx: f64,
    m_total: f64,
    kappa: f64,
    z_min: f64,
    i_min: f64,
) -> GlobalCheck {
    let z_required = required_modulus(m_total, kappa);
    let mut violations = Vec::new();
    for (fibre, z) in [("deck", z_deck), ("keel", z_keel)] {
        if z < z_required {
            violations.push(CsrError::section_violation(
                "Pt 1 Ch 5 Sec 1 [2.1]",
                format!("Z at {} = {:.4} m³ below {:.4} m³ for the bending moment", fibre, z, z_required),
            ));
        }
        if z < z_min {
            violations.push(CsrError::section_violation(
                "Pt 1 Ch 5 Sec 1 [2.2]",
                format!("Z at {} = {:.4} m³ below the rule minimum {:.4} m³", fibre, z, z_min),
            ));
        }
    }
    if i_xx < i_min {
        violations.push(CsrError::section_violation(
            "Pt 1 Ch 5 Sec 1 [2.3]",
            format!("I_xx = {:.4} m⁴ below the rule minimum {:.4} m⁴", i_xx, i_min),
        ));
    }
    GlobalCheck {
        kappa,
        sigma_perm: hull_girder::permissible_stress(kappa),
        m_total: m_total.abs(),
        z_required,
        z_min,
        z_deck,
        z_keel,
        i_xx,
        i_min,
        violations,
    }
}

/// Check a section whose global properties are up to date
pub fn check_section(section: &ShipSection) -> GlobalCheck {
    let g = &section.global;
    let p = &section.particulars;
    let m_total = (g.m_sw_hog + g.m_wv_hog).abs().max((g.m_sw_sag + g.m_wv_sag).abs());
    // the rule minimum scales with the material factor of the deck and keel
    let z_min = hull_girder::minimum_section_modulus(p.l_sc, p.b, p.c_b, g.kappa);
    let i_min = hull_girder::minimum_inertia(p.l_sc, p.b, p.c_b);
    evaluate(g.z_deck, g.z_keel, g.n50.i_xx, m_total, g.kappa, z_min, i_min)
}
