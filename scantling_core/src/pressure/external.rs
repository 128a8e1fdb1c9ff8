//! External sea pressures (CSR Pt 1 Ch 4 Sec 5)
//!
//! Coordinates follow the section plane: `y` is the transverse offset from
//! the centreline (the section `x`), `z` the height above base. Pressures in
//! kPa, positive pushing from the sea onto the hull.
//!
//! ## Zones of the wave pressure
//!
//! ```text
//!   z > T + h_w          P = 0
//!   T ≤ z ≤ T + h_w      P = ρg·(h_w + T − z)
//!   z < T                P = max(P_w, −ρg·(T − z))
//! ```
//!
//! with `h_w = |P_w(B/2, T)| / ρg`, the wave run-up height at the waterline.

use once_cell::sync::Lazy;

use crate::equations::{RuleTable, TableValue};
use crate::loads::hull_girder::F_PS;
use crate::loads::{EdwRoot, LoadCase};
use crate::units::G;

/// Longitudinal position ratio f_xL of the midship section
pub const F_XL_MIDSHIP: f64 = 0.5;

/// Longitudinal distribution k_p of the HSM wave pressure, keyed by f_xL.
/// The midship entry depends on the draught ratio f_T.
static K_P: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::new(vec![
        (0.0, TableValue::Scalar(1.5)),
        (0.3, TableValue::Scalar(1.0)),
        (0.5, TableValue::Callable(|f_t| 1.25 - 0.25 * f_t)),
        (0.7, TableValue::Scalar(1.0)),
        (1.0, TableValue::Scalar(1.5)),
    ])
});

/// Hydrostatic sea pressure ρ·g·max(T − z, 0)
///
/// ```
/// use scantling_core::pressure::external::hydrostatic;
/// assert!((hydrostatic(1.025, 15.3, 0.0) - 153.78).abs() < 0.01);
/// ```
pub fn hydrostatic(rho: f64, t_lc: f64, z: f64) -> f64 {
    rho * G * (t_lc - z).max(0.0)
}

/// Minimum green sea pressure on exposed decks (kPa)
pub fn weather_deck_minimum(lbp: f64) -> f64 {
    if lbp >= 100.0 {
        34.3
    } else {
        14.9 + 0.195 * lbp
    }
}

/// Head and following sea wave pressure P_HS at the waterline formula level.
///
/// Negative for the first phase (trough amidships), positive for the second.
pub fn head_sea(case: &LoadCase, y: f64, z: f64) -> f64 {
    let p = &case.particulars;
    let f_t = case.f_t;
    let f_nl = 0.9;
    let f_h = 3.0 * (1.21 - 0.66 * f_t);
    let k_a = 1.0;
    let k_p = K_P.lookup(F_XL_MIDSHIP, f_t);
    let f_yb = 2.0 * y.abs() / p.b;
    let f_yz = z / case.t_lc + f_yb + 1.0;
    let wave_length = 0.6 * (1.0 + f_t) * p.lbp;
    let length_term = ((wave_length + p.l_sc.max(110.0) - 125.0) / p.l_sc).max(0.0).sqrt();
    let magnitude = case.f_beta() * F_PS * f_nl * f_h * f_yz * k_a * k_p * case.c_w * length_term;
    -case.edw.sign() * magnitude
}

/// Beam and oblique sea wave pressure P_BSP.
///
/// Positive for the first phase (weather side crest), negative for the second.
pub fn beam_sea(case: &LoadCase, y: f64, z: f64) -> f64 {
    let p = &case.particulars;
    let f_t = case.f_t;
    let f_nl = 0.8;
    let f_yb = 2.0 * y.abs() / p.b;
    let f_yz = 2.0 * z / case.t_lc + 2.5 * f_yb + 0.5;
    let wave_length = 0.2 * (1.0 + 2.0 * f_t) * p.lbp;
    let length_term = ((wave_length + p.l_sc - 125.0) / p.lbp).max(0.0).sqrt();
    let magnitude = 4.5 * case.f_beta() * F_PS * f_nl * f_yz * case.c_w * length_term;
    case.edw.sign() * magnitude
}

/// Raw wave pressure of the EDW family
pub fn wave_formula(case: &LoadCase, y: f64, z: f64) -> f64 {
    match case.edw.root() {
        EdwRoot::Hsm | EdwRoot::Hsa | EdwRoot::Fsm => head_sea(case, y, z),
        EdwRoot::Bsr | EdwRoot::Bsp | EdwRoot::Ost | EdwRoot::Osa => beam_sea(case, y, z),
    }
}

/// Run-up height h_w above the waterline (m)
pub fn run_up_height(case: &LoadCase) -> f64 {
    wave_formula(case, case.particulars.b / 2.0, case.t_lc).abs() / (case.rho * G)
}

/// Dynamic wave pressure on the sea side at (y, z), zones applied
pub fn sea_wave(case: &LoadCase, y: f64, z: f64) -> f64 {
    let rho_g = case.rho * G;
    let t = case.t_lc;
    if z < t {
        wave_formula(case, y, z).max(-rho_g * (t - z))
    } else {
        let h_w = run_up_height(case);
        if z <= t + h_w {
            rho_g * (h_w + t - z)
        } else {
            0.0
        }
    }
}

/// Dynamic pressure on exposed decks, never below the green sea minimum
pub fn weather_deck(case: &LoadCase, y: f64, z: f64) -> f64 {
    sea_wave(case, y, z).max(weather_deck_minimum(case.particulars.lbp))
}
