//! # Section Geometry
//!
//! Geometric primitives of the midship section. All coordinates lie in the
//! section plane, in metres:
//!
//! - `x`: transverse distance from the centreline, positive to starboard
//! - `y`: height above the base line
//!
//! When a point is lifted into ship coordinates (for accelerations) the
//! section `x` becomes the ship `y` and the section `y` becomes the ship `z`.
//!
//! ## Modules
//!
//! - [`plate`] - Linear and quarter-circle bilge plates with their thickness record
//! - [`stiffener`] - Flat, angle, T and bulb profiles built from plate legs
//! - [`panel`] - Stiffened panels (plate + stiffener array)

pub mod panel;
pub mod plate;
pub mod stiffener;

pub use panel::{BlockPressure, PanelPressure, StiffenedPanel, StiffenerLayout, StiffenerProfile};
pub use plate::{Plate, PlateShape, PlateTag, SectionProps, Thickness, ThicknessBasis};
pub use stiffener::{Stiffener, StiffenerDimensions, StiffenerForm};

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use crate::errors::{CsrError, CsrResult};

/// A point (or free vector) in the section plane.
///
/// Serialises as a two-element array `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Unit vector at `angle` radians from the x axis
    pub fn from_angle(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Point::new(c, s)
    }

    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other - self).norm()
    }

    /// Unit vector in the same direction; the zero vector stays zero.
    pub fn normalized(self) -> Point {
        let n = self.norm();
        if n > 0.0 {
            self * (1.0 / n)
        } else {
            self
        }
    }

    /// Linear interpolation between `self` (f = 0) and `other` (f = 1)
    pub fn lerp(self, other: Point, f: f64) -> Point {
        self + (other - self) * f
    }

    /// Right-hand perpendicular (dy, −dx)
    pub fn right_normal(self) -> Point {
        Point::new(self.y, -self.x)
    }

    /// Approximate equality used to close polylines
    pub fn approx_eq(self, other: Point, tol: f64) -> bool {
        self.distance_to(other) <= tol
    }
}

impl From<[f64; 2]> for Point {
    fn from(v: [f64; 2]) -> Self {
        Point::new(v[0], v[1])
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

// ============================================================================
// Axis specification
// ============================================================================

/// Coordinate axis of the section plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// Axis about which a moment of inertia is taken.
///
/// `AboutGlobalX` is the base line (y = 0), `AboutGlobalY` the centreline
/// (x = 0). `AboutOffset` is the line parallel to `axis` at `offset`, for
/// instance the neutral axis `AboutOffset { axis: Axis::X, offset: y_n }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AxisSpec {
    AboutGlobalX,
    AboutGlobalY,
    AboutOffset { axis: Axis, offset: f64 },
}

impl AxisSpec {
    /// The axis direction and its offset from the origin
    pub fn resolve(&self) -> (Axis, f64) {
        match *self {
            AxisSpec::AboutGlobalX => (Axis::X, 0.0),
            AxisSpec::AboutGlobalY => (Axis::Y, 0.0),
            AxisSpec::AboutOffset { axis, offset } => (axis, offset),
        }
    }
}

impl FromStr for AxisSpec {
    type Err = CsrError;

    /// Accepts `x`, `y`, `x:<offset>` and `y:<offset>`.
    fn from_str(s: &str) -> CsrResult<Self> {
        let invalid = || CsrError::InvalidAxis { spec: s.to_string() };
        let mut parts = s.trim().splitn(2, ':');
        let axis = match parts.next().map(|a| a.trim().to_ascii_lowercase()) {
            Some(a) if a == "x" => Axis::X,
            Some(a) if a == "y" => Axis::Y,
            _ => return Err(invalid()),
        };
        match parts.next() {
            None => Ok(match axis {
                Axis::X => AxisSpec::AboutGlobalX,
                Axis::Y => AxisSpec::AboutGlobalY,
            }),
            Some(offset) => {
                let offset: f64 = offset.trim().parse().map_err(|_| invalid())?;
                if !offset.is_finite() {
                    return Err(invalid());
                }
                Ok(AxisSpec::AboutOffset { axis, offset })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_serializes_as_pair() {
        let p = Point::new(1.5, -2.0);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[1.5,-2.0]");
        let back: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_right_normal_of_bottom_points_down() {
        let dir = Point::new(1.0, 0.0);
        assert_eq!(dir.right_normal(), Point::new(0.0, -1.0));
    }

    #[test]
    fn test_axis_parsing() {
        assert_eq!("x".parse::<AxisSpec>().unwrap(), AxisSpec::AboutGlobalX);
        assert_eq!("Y".parse::<AxisSpec>().unwrap(), AxisSpec::AboutGlobalY);
        assert_eq!(
            "x:7.25".parse::<AxisSpec>().unwrap(),
            AxisSpec::AboutOffset { axis: Axis::X, offset: 7.25 }
        );
    }

    #[test]
    fn test_malformed_axis_is_rejected() {
        for bad in ["z", "", "x:", "x:abc", "xy", "y:inf"] {
            let err = bad.parse::<AxisSpec>().unwrap_err();
            assert_eq!(err, CsrError::InvalidAxis { spec: bad.to_string() });
        }
    }
}
