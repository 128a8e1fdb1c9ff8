//! Hull girder loads and ship motions (CSR Pt 1 Ch 4 Sec 3 and Sec 4)
//!
//! Closed-form rule values at the midship section. Lengths in metres,
//! moments in kNm, shear in kN, angles in degrees, periods in seconds.
//!
//! ## Notation
//!
//! - `L` = rule length L_sc
//! - `B` = moulded breadth
//! - `C_b` = block coefficient
//! - `C_w` = wave coefficient
//!
//! All moment distribution factors (f_m, f_sw) are 1.0 amidships.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::units::G;

/// Probability factor for strength assessment, f_ps
pub const F_PS: f64 = 1.0;

/// Roll coefficient for ships without bilge keel
const K_ROLL: f64 = 1.2;

// =============================================================================
// WAVE PARAMETERS
// =============================================================================

/// Wave coefficient C_w (Pt 1 Ch 4 Sec 4 [1.2])
///
/// # Example
/// ```
/// use scantling_core::loads::hull_girder::wave_coefficient;
/// assert!((wave_coefficient(300.0) - 10.75).abs() < 1e-12);
/// ```
pub fn wave_coefficient(l: f64) -> f64 {
    if l < 90.0 {
        0.0856 * l
    } else if l <= 300.0 {
        10.75 - ((300.0 - l) / 100.0).powf(1.5)
    } else if l <= 350.0 {
        10.75
    } else {
        10.75 - ((l - 350.0) / 150.0).powf(1.5)
    }
}

/// Acceleration parameter a_0 (Pt 1 Ch 4 Sec 3 [2.1])
pub fn acceleration_parameter(l: f64, c_b: f64) -> f64 {
    (1.58 - 0.47 * c_b) * (2.4 / l.sqrt() + 34.0 / l - 600.0 / (l * l))
}

// =============================================================================
// SHIP MOTIONS
// =============================================================================

/// Roll and pitch motions with the rigid body accelerations they generate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShipMotions {
    /// Roll period T_θ (s)
    pub roll_period: f64,
    /// Roll angle θ (deg)
    pub roll_angle: f64,
    /// Pitch period T_φ (s)
    pub pitch_period: f64,
    /// Pitch angle φ (deg)
    pub pitch_angle: f64,
    /// Surge acceleration (m/s²)
    pub a_surge: f64,
    /// Sway acceleration (m/s²)
    pub a_sway: f64,
    /// Heave acceleration (m/s²)
    pub a_heave: f64,
    /// Roll acceleration (rad/s²)
    pub a_roll: f64,
    /// Pitch acceleration (rad/s²)
    pub a_pitch: f64,
}

impl ShipMotions {
    /// Motions for rule length `l`, breadth `b`, block coefficient `c_b`
    /// and draught ratio `f_t`.
    ///
    /// Metacentric height and roll radius of gyration take the rule
    /// defaults GM = 0.12·B and k_r = 0.39·B.
    pub fn new(l: f64, b: f64, c_b: f64, f_t: f64) -> Self {
        let a_0 = acceleration_parameter(l, c_b);
        let sqrt_gl = (G * l).sqrt();

        let k_r = 0.39 * b;
        let gm = 0.12 * b;
        let roll_period = 2.3 * PI * k_r / (G * gm).sqrt();
        let roll_angle = 9000.0 * (1.25 - 0.025 * roll_period) * F_PS * K_ROLL / ((b + 75.0) * PI);

        let wave_length = 0.6 * (1.0 + f_t) * l;
        let pitch_period = (2.0 * PI * wave_length / G).sqrt();
        let pitch_angle = 1350.0 * F_PS * l.powf(-0.94) * (1.0 + (2.57 / sqrt_gl).powf(1.2));

        ShipMotions {
            roll_period,
            roll_angle,
            pitch_period,
            pitch_angle,
            a_surge: 0.2 * (1.6 + 1.5 / sqrt_gl) * a_0 * G,
            a_sway: 0.3 * (2.25 - 20.0 / sqrt_gl) * a_0 * G,
            a_heave: a_0 * G,
            a_roll: F_PS * roll_angle.to_radians() * (2.0 * PI / roll_period).powi(2),
            a_pitch: F_PS * (3.1 / sqrt_gl + 1.0) * pitch_angle.to_radians() * (2.0 * PI / pitch_period).powi(2),
        }
    }
}

// =============================================================================
// HULL GIRDER MOMENTS
// =============================================================================

/// Vertical wave bending moment in hogging, M_wv-h (Pt 1 Ch 4 Sec 4 [3.1])
pub fn wave_moment_hog(l: f64, b: f64, c_b: f64) -> f64 {
    0.19 * wave_coefficient(l) * l * l * b * c_b
}

/// Vertical wave bending moment in sagging, M_wv-s (negative)
pub fn wave_moment_sag(l: f64, b: f64, c_b: f64) -> f64 {
    let f_nl_s = 0.58 * (c_b + 0.7) / c_b;
    -0.19 * f_nl_s * wave_coefficient(l) * l * l * b * c_b
}

/// Permissible still water moment in hogging, M_sw-h-mid (Pt 1 Ch 4 Sec 4 [2.2])
pub fn still_water_moment_hog(l: f64, b: f64, c_b: f64) -> f64 {
    171.0 * wave_coefficient(l) * l * l * b * (c_b + 0.7) * 1.0e-3 - wave_moment_hog(l, b, c_b)
}

/// Permissible still water moment in sagging, M_sw-s-mid (negative)
pub fn still_water_moment_sag(l: f64, b: f64, c_b: f64) -> f64 {
    -0.05185 * wave_coefficient(l) * l * l * b * (c_b + 0.7)
}

/// Horizontal wave bending moment M_wh (Pt 1 Ch 4 Sec 4 [3.5])
pub fn horizontal_wave_moment(l: f64, t_lc: f64, c_b: f64) -> f64 {
    (0.31 + l / 2800.0) * wave_coefficient(l) * l * l * t_lc * c_b
}

/// Vertical wave shear force Q_wv at midship (Pt 1 Ch 4 Sec 4 [3.3])
pub fn wave_shear(l: f64, b: f64, c_b: f64) -> f64 {
    0.52 * 0.7 * wave_coefficient(l) * l * b * c_b
}

/// Minimum hull girder section modulus Z_R-min (m³), Pt 1 Ch 5 Sec 1 [2.2]
pub fn minimum_section_modulus(l: f64, b: f64, c_b: f64, k: f64) -> f64 {
    0.9 * wave_coefficient(l) * l * l * b * (c_b + 0.7) * k * 1.0e-6
}

/// Minimum vertical moment of inertia I_y-min (m⁴), Pt 1 Ch 5 Sec 1 [2.3]
pub fn minimum_inertia(l: f64, b: f64, c_b: f64) -> f64 {
    2.7 * wave_coefficient(l) * l.powi(3) * b * (c_b + 0.7) * 1.0e-8
}

/// Permissible hull girder bending stress σ_perm = 175/κ (N/mm²)
pub fn permissible_stress(kappa: f64) -> f64 {
    175.0 / kappa
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wave_coefficient_branches() {
        assert_relative_eq!(wave_coefficient(80.0), 6.848, max_relative = 1e-12);
        assert_relative_eq!(wave_coefficient(180.0), 10.75 - 1.2_f64.powf(1.5), max_relative = 1e-12);
        assert_relative_eq!(wave_coefficient(320.0), 10.75);
        assert_relative_eq!(wave_coefficient(500.0), 9.75, max_relative = 1e-12);
    }

    #[test]
    fn test_wave_coefficient_is_continuous_at_300() {
        assert!((wave_coefficient(299.999) - wave_coefficient(300.0)).abs() < 1e-3);
    }

    #[test]
    fn test_sagging_moments_are_negative() {
        assert!(wave_moment_hog(180.0, 32.0, 0.82) > 0.0);
        assert!(wave_moment_sag(180.0, 32.0, 0.82) < 0.0);
        assert!(still_water_moment_sag(180.0, 32.0, 0.82) < 0.0);
        assert!(still_water_moment_hog(180.0, 32.0, 0.82) > 0.0);
    }

    #[test]
    fn test_total_hogging_moment() {
        let (l, b, cb) = (180.0, 32.0, 0.82);
        let total = still_water_moment_hog(l, b, cb) + wave_moment_hog(l, b, cb);
        assert_relative_eq!(total, 171.0 * wave_coefficient(l) * l * l * b * (cb + 0.7) * 1.0e-3, max_relative = 1e-12);
    }

    #[test]
    fn test_motions_are_physical() {
        let m = ShipMotions::new(180.0, 32.0, 0.82, 1.0);
        assert!(m.roll_period > 5.0 && m.roll_period < 30.0);
        assert!(m.roll_angle > 0.0 && m.roll_angle < 45.0);
        assert!(m.pitch_angle > 0.0 && m.pitch_angle < 15.0);
        assert!(m.a_heave > 0.0 && m.a_heave < G);
        assert!(m.a_roll > 0.0 && m.a_pitch > 0.0);
    }

    #[test]
    fn test_permissible_stress() {
        assert_relative_eq!(permissible_stress(1.0), 175.0);
        assert_relative_eq!(permissible_stress(0.72), 243.0555, max_relative = 1e-5);
    }
}
