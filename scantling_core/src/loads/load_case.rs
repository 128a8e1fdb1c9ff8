//! Dynamic load cases
//!
//! A [`LoadCase`] binds one EDW to a loading draught: it carries the
//! combination factors, the ship motions, and the hull girder moments the
//! wave produces together with the matching still water moment.
//!
//! ## Coordinates
//!
//! Accelerations use the ship system: `x` forward from the aft perpendicular,
//! `y` to port/starboard (the section `x`), `z` up from the base line (the
//! section `y`). Every point of the midship section sits at `x = L_sc/2`.

use serde::{Deserialize, Serialize};

use super::edw::Edw;
use super::factors::EdwFactors;
use super::hull_girder::{self, ShipMotions};
use crate::errors::{CsrError, CsrResult};
use crate::section::{HullGirderProperties, Particulars};
use crate::units::{G, RHO_SEA};

/// One EDW at one loading draught.
///
/// # Example
/// ```
/// use scantling_core::loads::{Edw, LoadCase};
/// use scantling_core::section::Particulars;
///
/// let ship = Particulars::sample_bulk_carrier();
/// let hsm1 = LoadCase::new(Edw::HSM_1, ship.t_sc, &ship).unwrap();
/// assert!(hsm1.m_wv < 0.0); // sagging
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCase {
    pub edw: Edw,
    /// Loading draught T_LC (m)
    pub t_lc: f64,
    /// Sea water density (t/m³)
    pub rho: f64,
    /// Draught ratio f_T = T_LC / T_SC
    pub f_t: f64,
    pub particulars: Particulars,
    pub factors: EdwFactors,
    pub motions: ShipMotions,
    /// Wave coefficient C_w
    pub c_w: f64,
    /// Vertical wave bending moment (kNm)
    pub m_wv: f64,
    /// Vertical wave shear force (kN)
    pub q_wv: f64,
    /// Horizontal wave bending moment (kNm)
    pub m_wh: f64,
    /// Still water bending moment of the same sign as the wave moment (kNm)
    pub m_sw: f64,
}

impl LoadCase {
    pub fn new(edw: Edw, t_lc: f64, particulars: &Particulars) -> CsrResult<Self> {
        particulars.validate()?;
        if !(t_lc.is_finite() && t_lc > 0.0) {
            return Err(CsrError::rule_domain(
                "T_lc",
                t_lc.to_string(),
                "Pt 1 Ch 4 Sec 8",
                "loading draught must be positive",
            ));
        }
        if t_lc > particulars.t_sc + 1.0e-9 {
            return Err(CsrError::rule_domain(
                "T_lc",
                t_lc.to_string(),
                "Pt 1 Ch 4 Sec 8",
                format!("loading draught exceeds the scantling draught {}", particulars.t_sc),
            ));
        }

        let (l, b, c_b) = (particulars.l_sc, particulars.b, particulars.c_b);
        let f_t = t_lc / particulars.t_sc;
        let factors = EdwFactors::for_edw(edw, f_t);

        let (m_wv, m_sw) = if factors.c_wv >= 0.0 {
            (
                factors.c_wv * hull_girder::wave_moment_hog(l, b, c_b),
                hull_girder::still_water_moment_hog(l, b, c_b),
            )
        } else {
            (
                factors.c_wv.abs() * hull_girder::wave_moment_sag(l, b, c_b),
                hull_girder::still_water_moment_sag(l, b, c_b),
            )
        };

        Ok(LoadCase {
            edw,
            t_lc,
            rho: RHO_SEA,
            f_t,
            particulars: particulars.clone(),
            factors,
            motions: ShipMotions::new(l, b, c_b, f_t),
            c_w: hull_girder::wave_coefficient(l),
            m_wv,
            q_wv: factors.c_qw * hull_girder::wave_shear(l, b, c_b),
            m_wh: factors.c_wh * hull_girder::horizontal_wave_moment(l, t_lc, c_b),
            m_sw,
        })
    }

    /// Phase coefficient f_β of the EDW
    pub fn f_beta(&self) -> f64 {
        self.edw.root().f_beta()
    }

    /// Vertical reference R = min(D/4 + T_LC/2, D/2) for roll and pitch
    pub fn motion_reference(&self) -> f64 {
        let d = self.particulars.d;
        (d / 4.0 + self.t_lc / 2.0).min(d / 2.0)
    }

    /// Envelope accelerations (a_x, a_y, a_z) at a ship-coordinate point (m/s²)
    pub fn acceleration_at(&self, x: f64, y: f64, z: f64) -> [f64; 3] {
        let f = &self.factors;
        let m = &self.motions;
        let r = self.motion_reference();
        let theta = m.roll_angle.to_radians();
        let phi = m.pitch_angle.to_radians();
        let a_x = -f.c_xg * G * phi.sin() + f.c_xs * m.a_surge + f.c_xp * m.a_pitch * (z - r);
        let a_y = f.c_yg * G * theta.sin() + f.c_ys * m.a_sway - f.c_yr * m.a_roll * (z - r);
        let a_z = f.c_zh * m.a_heave + f.c_zr * m.a_roll * y
            - f.c_zp * m.a_pitch * (x - 0.45 * self.particulars.l_sc);
        [a_x, a_y, a_z]
    }

    /// Longitudinal hull girder stress at section point (y, z), N/mm².
    ///
    /// σ = ((M_wv + M_sw)/I_xx·(z − y_n) − M_wh/I_yy·y) / 1000
    ///
    /// With `include_wave = false` only the still water moment acts.
    pub fn hull_girder_stress(&self, y: f64, z: f64, girder: &HullGirderProperties, include_wave: bool) -> f64 {
        if girder.i_xx <= 0.0 {
            return 0.0;
        }
        let vertical = if include_wave { self.m_wv + self.m_sw } else { self.m_sw };
        let horizontal = if include_wave && girder.i_yy > 0.0 {
            self.m_wh / girder.i_yy * y
        } else {
            0.0
        };
        (vertical / girder.i_xx * (z - girder.y_n) - horizontal) / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::edw::{EdwRoot, Phase};
    use approx::assert_relative_eq;

    fn ship() -> Particulars {
        Particulars::sample_bulk_carrier()
    }

    #[test]
    fn test_loading_draught_above_scantling_draught_is_fatal() {
        let p = ship();
        let err = LoadCase::new(Edw::HSM_1, p.t_sc + 0.5, &p).unwrap_err();
        assert_eq!(err.error_code(), "RULE_DOMAIN");
    }

    #[test]
    fn test_phases_mirror_accelerations() {
        let p = ship();
        let one = LoadCase::new(Edw::BSP_1P, p.t_sc, &p).unwrap();
        let two = LoadCase::new(Edw::BSP_2P, p.t_sc, &p).unwrap();
        let a1 = one.acceleration_at(p.l_sc / 2.0, 10.0, 12.0);
        let a2 = two.acceleration_at(p.l_sc / 2.0, 10.0, 12.0);
        for i in 0..3 {
            assert_relative_eq!(a1[i], -a2[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_hogging_and_sagging_moments() {
        let p = ship();
        let hsm1 = LoadCase::new(Edw::HSM_1, p.t_sc, &p).unwrap();
        let hsm2 = LoadCase::new(Edw::HSM_2, p.t_sc, &p).unwrap();
        assert!(hsm1.m_wv < 0.0 && hsm1.m_sw < 0.0);
        assert!(hsm2.m_wv > 0.0 && hsm2.m_sw > 0.0);
        assert_relative_eq!(
            hsm2.m_wv,
            hull_girder::wave_moment_hog(p.l_sc, p.b, p.c_b),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_hull_girder_stress_sign() {
        let p = ship();
        let hog = LoadCase::new(Edw::HSM_2, p.t_sc, &p).unwrap();
        let girder = HullGirderProperties { y_n: 9.0, i_xx: 5.0, i_yy: 20.0 };
        assert!(hog.hull_girder_stress(0.0, p.d, &girder, true) > 0.0);
        assert!(hog.hull_girder_stress(0.0, 0.0, &girder, true) < 0.0);
        assert_eq!(hog.hull_girder_stress(0.0, 9.0, &girder, false), 0.0);
    }

    #[test]
    fn test_beam_sea_has_transverse_acceleration() {
        let p = ship();
        let bsr = LoadCase::new(Edw::new(EdwRoot::Bsr, Phase::One), p.t_sc, &p).unwrap();
        let [_, a_y, _] = bsr.acceleration_at(p.l_sc / 2.0, 0.0, bsr.motion_reference());
        assert!(a_y.abs() > 1.0);
        let hsm = LoadCase::new(Edw::HSM_1, p.t_sc, &p).unwrap();
        let [_, a_y, _] = hsm.acceleration_at(p.l_sc / 2.0, 0.0, hsm.motion_reference());
        assert_eq!(a_y, 0.0);
    }
}
