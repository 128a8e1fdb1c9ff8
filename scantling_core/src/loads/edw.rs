//! Equivalent Design Waves (CSR Pt 1 Ch 4 Sec 2)
//!
//! An EDW is a regular design wave that reproduces one dominant load
//! response. Each EDW family comes in two phases (`-1`/`-2`, or `-1P`/`-2P`
//! for beam and oblique seas); the second phase mirrors the first, so its
//! thirteen combination factors are the negation of the first phase's.
//!
//! # Example
//! ```
//! use scantling_core::loads::{Edw, EdwRoot};
//!
//! let edw: Edw = "BSP-2P".parse().unwrap();
//! assert_eq!(edw.root(), EdwRoot::Bsp);
//! assert_eq!(edw.sign(), -1.0);
//! assert_eq!(edw.code(), "BSP-2P");
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{CsrError, CsrResult};

/// EDW family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdwRoot {
    /// Head sea, maximum vertical wave bending moment
    Hsm,
    /// Head sea, maximum vertical acceleration
    Hsa,
    /// Following sea, maximum vertical wave bending moment
    Fsm,
    /// Beam sea, maximum roll
    Bsr,
    /// Beam sea, maximum external pressure at the waterline
    Bsp,
    /// Oblique sea, maximum torsion
    Ost,
    /// Oblique sea, maximum pitch acceleration
    Osa,
}

impl EdwRoot {
    pub const ALL: [EdwRoot; 7] = [
        EdwRoot::Hsm,
        EdwRoot::Hsa,
        EdwRoot::Fsm,
        EdwRoot::Bsr,
        EdwRoot::Bsp,
        EdwRoot::Ost,
        EdwRoot::Osa,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            EdwRoot::Hsm => "HSM",
            EdwRoot::Hsa => "HSA",
            EdwRoot::Fsm => "FSM",
            EdwRoot::Bsr => "BSR",
            EdwRoot::Bsp => "BSP",
            EdwRoot::Ost => "OST",
            EdwRoot::Osa => "OSA",
        }
    }

    /// Beam and oblique families carry a `P` (port) suffix
    pub fn is_beam_or_oblique(&self) -> bool {
        matches!(self, EdwRoot::Bsr | EdwRoot::Bsp | EdwRoot::Ost | EdwRoot::Osa)
    }

    /// Phase coefficient f_β for strength assessment
    pub fn f_beta(&self) -> f64 {
        match self {
            EdwRoot::Hsm | EdwRoot::Fsm => 1.05,
            EdwRoot::Ost | EdwRoot::Osa => 0.8,
            _ => 1.0,
        }
    }
}

/// Phase of an EDW
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    One,
    Two,
}

/// A single Equivalent Design Wave, e.g. `HSM-1` or `BSP-2P`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edw {
    root: EdwRoot,
    phase: Phase,
}

impl Edw {
    pub const HSM_1: Edw = Edw::new(EdwRoot::Hsm, Phase::One);
    pub const HSM_2: Edw = Edw::new(EdwRoot::Hsm, Phase::Two);
    pub const BSP_1P: Edw = Edw::new(EdwRoot::Bsp, Phase::One);
    pub const BSP_2P: Edw = Edw::new(EdwRoot::Bsp, Phase::Two);

    /// The four waves searched for the design pressure of a panel
    pub const DESIGN: [Edw; 4] = [Edw::HSM_1, Edw::HSM_2, Edw::BSP_1P, Edw::BSP_2P];

    pub const fn new(root: EdwRoot, phase: Phase) -> Self {
        Edw { root, phase }
    }

    /// All fourteen waves
    pub fn all() -> impl Iterator<Item = Edw> {
        EdwRoot::ALL
            .into_iter()
            .flat_map(|root| [Edw::new(root, Phase::One), Edw::new(root, Phase::Two)])
    }

    pub fn root(&self) -> EdwRoot {
        self.root
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// +1 for the first phase, −1 for the second
    pub fn sign(&self) -> f64 {
        match self.phase {
            Phase::One => 1.0,
            Phase::Two => -1.0,
        }
    }

    pub fn code(&self) -> &'static str {
        match (self.root, self.phase) {
            (EdwRoot::Hsm, Phase::One) => "HSM-1",
            (EdwRoot::Hsm, Phase::Two) => "HSM-2",
            (EdwRoot::Hsa, Phase::One) => "HSA-1",
            (EdwRoot::Hsa, Phase::Two) => "HSA-2",
            (EdwRoot::Fsm, Phase::One) => "FSM-1",
            (EdwRoot::Fsm, Phase::Two) => "FSM-2",
            (EdwRoot::Bsr, Phase::One) => "BSR-1P",
            (EdwRoot::Bsr, Phase::Two) => "BSR-2P",
            (EdwRoot::Bsp, Phase::One) => "BSP-1P",
            (EdwRoot::Bsp, Phase::Two) => "BSP-2P",
            (EdwRoot::Ost, Phase::One) => "OST-1P",
            (EdwRoot::Ost, Phase::Two) => "OST-2P",
            (EdwRoot::Osa, Phase::One) => "OSA-1P",
            (EdwRoot::Osa, Phase::Two) => "OSA-2P",
        }
    }
}

impl std::fmt::Display for Edw {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Edw {
    type Err = CsrError;

    fn from_str(s: &str) -> CsrResult<Self> {
        let code = s.trim().to_ascii_uppercase();
        Edw::all().find(|e| e.code() == code).ok_or_else(|| {
            CsrError::rule_domain("edw", s, "Pt 1 Ch 4 Sec 2 Table 1", "undocumented EDW tag")
        })
    }
}

impl Serialize for Edw {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Edw {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|e: CsrError| serde::de::Error::custom(e.to_string()))
    }
}

/// Key of a pressure distribution: the static case or the dynamic part of one EDW.
///
/// Serialised as `"STATIC"` or the EDW code so it can key a JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PressureCase {
    Static,
    Dynamic(Edw),
}

impl PressureCase {
    pub fn edw(&self) -> Option<Edw> {
        match self {
            PressureCase::Static => None,
            PressureCase::Dynamic(edw) => Some(*edw),
        }
    }
}

impl std::fmt::Display for PressureCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PressureCase::Static => write!(f, "STATIC"),
            PressureCase::Dynamic(edw) => write!(f, "{}", edw),
        }
    }
}

impl FromStr for PressureCase {
    type Err = CsrError;

    fn from_str(s: &str) -> CsrResult<Self> {
        if s.trim().eq_ignore_ascii_case("STATIC") {
            Ok(PressureCase::Static)
        } else {
            s.parse().map(PressureCase::Dynamic)
        }
    }
}

impl Serialize for PressureCase {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PressureCase {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|e: CsrError| serde::de::Error::custom(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourteen_distinct_waves() {
        let all: Vec<Edw> = Edw::all().collect();
        assert_eq!(all.len(), 14);
        let mut codes: Vec<&str> = all.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 14);
    }

    #[test]
    fn test_parse_round_trip() {
        for edw in Edw::all() {
            assert_eq!(edw.code().parse::<Edw>().unwrap(), edw);
        }
        assert_eq!("hsm-1".parse::<Edw>().unwrap(), Edw::HSM_1);
    }

    #[test]
    fn test_unknown_tag_is_rule_domain() {
        let err = "HSM-3".parse::<Edw>().unwrap_err();
        assert_eq!(err.error_code(), "RULE_DOMAIN");
        assert!(err.is_fatal());
    }

    #[test]
    fn test_pressure_case_serialization() {
        let case = PressureCase::Dynamic(Edw::BSP_1P);
        let json = serde_json::to_string(&case).unwrap();
        assert_eq!(json, r#""BSP-1P""#);
        let back: PressureCase = serde_json::from_str(&json).unwrap();
        assert_eq!(back, case);
        assert_eq!(PressureCase::Static.to_string(), "STATIC");

        let mut map = std::collections::BTreeMap::new();
        map.insert(PressureCase::Static, 1.0);
        map.insert(case, 2.0);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"STATIC":1.0,"BSP-1P":2.0}"#);
    }

    #[test]
    fn test_static_orders_first() {
        assert!(PressureCase::Static < PressureCase::Dynamic(Edw::HSM_1));
    }
}
