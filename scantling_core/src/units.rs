//! # Unit Types
//!
//! Type-safe wrappers for the SI units used by the rules. These provide
//! compile-time safety against unit confusion while remaining lightweight
//! (just f64 wrappers).
//!
//! ## Conventions
//!
//! The engine works internally in the units the CSR formulae are written in:
//! - Geometry: metres (m); thicknesses enter and leave in millimetres (mm)
//! - Pressure: kilopascals (kPa = kN/m²)
//! - Stress: megapascals (MPa = N/mm²)
//! - Bending moment: kilonewton-metres (kNm)
//! - Stiffener section modulus: cubic centimetres (cm³); hull girder: m³
//!
//! ## Example
//!
//! ```rust
//! use scantling_core::units::{Meters, Millimeters};
//!
//! let t = Millimeters(15.5);
//! let t_m: Meters = t.into();
//! assert!((t_m.0 - 0.0155).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Physical Constants
// ============================================================================

/// Gravitational acceleration used throughout the load model (m/s²)
pub const G: f64 = 9.8063;

/// Sea water density (t/m³)
pub const RHO_SEA: f64 = 1.025;

/// Young's modulus of hull steel (N/mm²)
pub const E_STEEL: f64 = 206_000.0;

// ============================================================================
// Length Units
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

// ============================================================================
// Pressure and Stress Units
// ============================================================================

/// Pressure in kilopascals (kN/m²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloPascals(pub f64);

/// Stress in megapascals (N/mm²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MegaPascals(pub f64);

impl From<KiloPascals> for MegaPascals {
    fn from(kpa: KiloPascals) -> Self {
        MegaPascals(kpa.0 / 1000.0)
    }
}

impl From<MegaPascals> for KiloPascals {
    fn from(mpa: MegaPascals) -> Self {
        KiloPascals(mpa.0 * 1000.0)
    }
}

// ============================================================================
// Moment Units
// ============================================================================

/// Bending moment in kilonewton-metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtonMeters(pub f64);

// ============================================================================
// Section Properties
// ============================================================================

/// Section modulus in cubic centimetres (stiffeners)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicCentimeters(pub f64);

/// Section modulus in cubic metres (hull girder)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMeters(pub f64);

impl From<CubicMeters> for CubicCentimeters {
    fn from(m3: CubicMeters) -> Self {
        CubicCentimeters(m3.0 * 1.0e6)
    }
}

impl From<CubicCentimeters> for CubicMeters {
    fn from(cm3: CubicCentimeters) -> Self {
        CubicMeters(cm3.0 / 1.0e6)
    }
}

impl KiloNewtonMeters {
    /// Bending stress produced by this moment on a section modulus.
    ///
    /// kNm / m³ = kN/m², reported in N/mm².
    pub fn stress_on(self, z: CubicMeters) -> MegaPascals {
        KiloPascals(self.0 / z.0).into()
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Millimeters);
impl_arithmetic!(KiloPascals);
impl_arithmetic!(MegaPascals);
impl_arithmetic!(KiloNewtonMeters);
impl_arithmetic!(CubicCentimeters);
impl_arithmetic!(CubicMeters);

/// Round up to the next multiple of 0.5 (corrosion additions, Pt 1 Ch 3 Sec 3).
pub fn round_up_half(value: f64) -> f64 {
    // 1e-9 guards against 1.0000000001 rounding to 1.5
    ((value - 1.0e-9) * 2.0).ceil() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_to_m() {
        let mm = Millimeters(12.0);
        let m: Meters = mm.into();
        assert!((m.0 - 0.012).abs() < 1e-15);
        let back: Millimeters = m.into();
        assert!((back.0 - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_moment_to_stress() {
        // 1.0e6 kNm on 10 m³ = 100 000 kN/m² = 100 N/mm²
        let sigma = KiloNewtonMeters(1.0e6).stress_on(CubicMeters(10.0));
        assert!((sigma.0 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_arithmetic() {
        let a = Millimeters(10.0);
        let b = Millimeters(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_round_up_half() {
        assert_eq!(round_up_half(2.2), 2.5);
        assert_eq!(round_up_half(2.0), 2.0);
        assert_eq!(round_up_half(2.51), 3.0);
        assert_eq!(round_up_half(0.0), 0.0);
    }

    #[test]
    fn test_serialization() {
        let t = Millimeters(12.5);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "12.5");
        let roundtrip: Millimeters = serde_json::from_str(&json).unwrap();
        assert_eq!(t, roundtrip);
    }
}
