//! Hull Structural Steel Grades (IACS UR W11)
//!
//! Normal strength (A, D, E) and higher strength (AH/DH/EH 32/36/40) grades
//! with their minimum yield stress, tensile range, shear yield and the
//! material factor k of CSR Pt 1 Ch 3 Sec 1 [2.2].
//!
//! Toughness letters (A/D/E) do not change strength properties; only the
//! strength index (none/32/36/40) does.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{CsrError, CsrResult};

/// Hull steel grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MaterialGrade {
    A,
    AH32,
    AH36,
    AH40,
    D,
    DH32,
    DH36,
    DH40,
    E,
    EH32,
    EH36,
    EH40,
}

/// Strength index shared by the toughness variants of a grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StrengthClass {
    /// Normal strength steel, R_eH = 235 N/mm²
    Mild,
    /// R_eH = 315 N/mm²
    Hts32,
    /// R_eH = 355 N/mm²
    Hts36,
    /// R_eH = 390 N/mm²
    Hts40,
}

/// Mechanical properties of a grade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteelProperties {
    /// Minimum yield stress R_eH (N/mm²)
    pub r_eh: f64,
    /// Tensile strength range R_m (N/mm²)
    pub r_m_min: f64,
    pub r_m_max: f64,
    /// Shear yield stress τ_eH = R_eH / √3 (N/mm²)
    pub tau_eh: f64,
    /// Material factor k
    pub k: f64,
}

impl MaterialGrade {
    /// All recognised grades
    pub const ALL: [MaterialGrade; 12] = [
        MaterialGrade::A,
        MaterialGrade::AH32,
        MaterialGrade::AH36,
        MaterialGrade::AH40,
        MaterialGrade::D,
        MaterialGrade::DH32,
        MaterialGrade::DH36,
        MaterialGrade::DH40,
        MaterialGrade::E,
        MaterialGrade::EH32,
        MaterialGrade::EH36,
        MaterialGrade::EH40,
    ];

    /// Grade designation as written in the section file
    pub fn code(&self) -> &'static str {
        match self {
            MaterialGrade::A => "A",
            MaterialGrade::AH32 => "AH32",
            MaterialGrade::AH36 => "AH36",
            MaterialGrade::AH40 => "AH40",
            MaterialGrade::D => "D",
            MaterialGrade::DH32 => "DH32",
            MaterialGrade::DH36 => "DH36",
            MaterialGrade::DH40 => "DH40",
            MaterialGrade::E => "E",
            MaterialGrade::EH32 => "EH32",
            MaterialGrade::EH36 => "EH36",
            MaterialGrade::EH40 => "EH40",
        }
    }

    pub fn strength_class(&self) -> StrengthClass {
        match self {
            MaterialGrade::A | MaterialGrade::D | MaterialGrade::E => StrengthClass::Mild,
            MaterialGrade::AH32 | MaterialGrade::DH32 | MaterialGrade::EH32 => StrengthClass::Hts32,
            MaterialGrade::AH36 | MaterialGrade::DH36 | MaterialGrade::EH36 => StrengthClass::Hts36,
            MaterialGrade::AH40 | MaterialGrade::DH40 | MaterialGrade::EH40 => StrengthClass::Hts40,
        }
    }

    /// Mechanical properties for this grade
    pub fn properties(&self) -> SteelProperties {
        let (r_eh, r_m_min, r_m_max, k) = match self.strength_class() {
            StrengthClass::Mild => (235.0, 400.0, 520.0, 1.0),
            StrengthClass::Hts32 => (315.0, 440.0, 570.0, 0.78),
            StrengthClass::Hts36 => (355.0, 490.0, 630.0, 0.72),
            StrengthClass::Hts40 => (390.0, 510.0, 660.0, 0.68),
        };
        SteelProperties {
            r_eh,
            r_m_min,
            r_m_max,
            tau_eh: r_eh / 3.0_f64.sqrt(),
            k,
        }
    }

    /// Minimum yield stress R_eH (N/mm²)
    pub fn r_eh(&self) -> f64 {
        self.properties().r_eh
    }

    /// Material factor k
    pub fn k(&self) -> f64 {
        self.properties().k
    }
}

impl FromStr for MaterialGrade {
    type Err = CsrError;

    fn from_str(s: &str) -> CsrResult<Self> {
        let wanted = s.trim().to_uppercase();
        MaterialGrade::ALL
            .iter()
            .copied()
            .find(|grade| grade.code() == wanted)
            .ok_or_else(|| CsrError::input_schema("material", format!("undocumented material grade '{}'", s)))
    }
}

impl std::fmt::Display for MaterialGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toughness_variants_share_strength() {
        assert_eq!(MaterialGrade::AH36.properties(), MaterialGrade::EH36.properties());
        assert_eq!(MaterialGrade::A.r_eh(), 235.0);
        assert_eq!(MaterialGrade::DH32.k(), 0.78);
    }

    #[test]
    fn test_parse_grades() {
        assert_eq!("ah40".parse::<MaterialGrade>().unwrap(), MaterialGrade::AH40);
        assert_eq!(" D ".parse::<MaterialGrade>().unwrap(), MaterialGrade::D);
        let err = "S355".parse::<MaterialGrade>().unwrap_err();
        assert_eq!(err.error_code(), "INPUT_SCHEMA");
    }

    #[test]
    fn test_shear_yield() {
        let props = MaterialGrade::AH32.properties();
        assert!((props.tau_eh - 181.87).abs() < 0.01);
    }
}
