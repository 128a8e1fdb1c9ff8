//! Rule minimum net thicknesses (CSR Pt 1 Ch 6 Sec 3)
//!
//! | Element | Minimum (mm) |
//! |---------|--------------|
//! | Keel plating | 7.5 + 0.03·L₂ |
//! | Bottom, bilge and side shell | 5.5 + 0.03·L₂ |
//! | Weather deck | 4.5 + 0.02·L₂ |
//! | Inner bottom, hopper | 5.5 + 0.03·L₂ |
//! | Topside wing tank | 4.5 + 0.01·L₂ |
//! | Girders | 5.5 + 0.025·L₂ |
//! | Stiffener legs | max(3.5 + 0.015·L₂, 0.4·t_p), at most 2·t_p |
//!
//! with L₂ = min(L_sc, 300).

use serde::{Deserialize, Serialize};

use crate::geometry::PlateTag;
use crate::units::Millimeters;

/// L₂ = min(L_sc, 300)
pub fn l2(l_sc: f64) -> f64 {
    l_sc.min(300.0)
}

/// Minimum net plate thickness for a plate role
///
/// ```
/// use scantling_core::geometry::PlateTag;
/// use scantling_core::scantling::minimum::plate_minimum;
/// assert!((plate_minimum(PlateTag::Shell, true, 180.0).0 - 12.9).abs() < 1e-12);
/// ```
pub fn plate_minimum(tag: PlateTag, keel: bool, l_sc: f64) -> Millimeters {
    let l2 = l2(l_sc);
    let t = match tag {
        PlateTag::Shell if keel => 7.5 + 0.03 * l2,
        PlateTag::Shell | PlateTag::Bilge => 5.5 + 0.03 * l2,
        PlateTag::WeatherDeck => 4.5 + 0.02 * l2,
        PlateTag::InnerBottom | PlateTag::Hopper => 5.5 + 0.03 * l2,
        PlateTag::Wing => 4.5 + 0.01 * l2,
        PlateTag::Girder => 5.5 + 0.025 * l2,
    };
    Millimeters(t)
}

/// Bounds on the net thickness of a stiffener leg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegLimits {
    pub minimum: Millimeters,
    pub maximum: Millimeters,
}

impl LegLimits {
    pub fn new(l_sc: f64, plate_net: Millimeters) -> Self {
        LegLimits {
            minimum: Millimeters((3.5 + 0.015 * l2(l_sc)).max(0.4 * plate_net.0)),
            maximum: Millimeters(2.0 * plate_net.0),
        }
    }

    pub fn clamp(&self, t: Millimeters) -> Millimeters {
        Millimeters(t.0.max(self.minimum.0).min(self.maximum.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_keel_minimum() {
        assert_relative_eq!(plate_minimum(PlateTag::Shell, true, 180.0).0, 12.9, max_relative = 1e-12);
        assert_relative_eq!(plate_minimum(PlateTag::Shell, false, 180.0).0, 10.9, max_relative = 1e-12);
    }

    #[test]
    fn test_length_is_capped() {
        assert_eq!(plate_minimum(PlateTag::Wing, false, 350.0), plate_minimum(PlateTag::Wing, false, 300.0));
        assert_relative_eq!(plate_minimum(PlateTag::WeatherDeck, false, 350.0).0, 10.5, max_relative = 1e-12);
    }

    #[test]
    fn test_leg_limits() {
        let limits = LegLimits::new(180.0, Millimeters(10.0));
        assert_relative_eq!(limits.minimum.0, 6.2, max_relative = 1e-12);
        assert_relative_eq!(limits.maximum.0, 20.0);
        let thick = LegLimits::new(180.0, Millimeters(20.0));
        assert_relative_eq!(thick.minimum.0, 8.0);
        assert_eq!(limits.clamp(Millimeters(30.0)), Millimeters(20.0));
        assert_relative_eq!(limits.clamp(Millimeters(1.0)).0, 6.2, max_relative = 1e-12);
    }
}
