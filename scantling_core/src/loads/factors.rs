//! EDW load combination factors (CSR Pt 1 Ch 4 Sec 2, Table 1, strength)
//!
//! Each factor is linear in the draught ratio f_T = T_LC / T_SC and is
//! tabulated once per EDW family for the first phase. The second phase
//! (`-2`, `-2P`) is the same wave shifted by half a period, so every factor
//! changes sign.
//!
//! The tabulated values are the midship (0.4 ≤ x/L ≤ 0.65) strength values
//! used by the section engine.
//!
//! # Example
//! ```
//! use scantling_core::loads::{Edw, EdwFactors};
//!
//! let hsm1 = EdwFactors::for_edw(Edw::HSM_1, 1.0);
//! let hsm2 = EdwFactors::for_edw(Edw::HSM_2, 1.0);
//! assert_eq!(hsm1.c_wv, -hsm2.c_wv);
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::edw::{Edw, EdwRoot};

/// A factor of the form `a + b·f_T`
#[derive(Debug, Clone, Copy, PartialEq)]
struct Linear {
    a: f64,
    b: f64,
}

impl Linear {
    const fn new(a: f64, b: f64) -> Self {
        Linear { a, b }
    }

    const fn constant(a: f64) -> Self {
        Linear { a, b: 0.0 }
    }

    fn at(&self, f_t: f64) -> f64 {
        self.a + self.b * f_t
    }
}

const ZERO: Linear = Linear::constant(0.0);

/// First-phase factors in the order
/// C_WV, C_QW, C_WH, C_WT, C_XS, C_XP, C_XG, C_YS, C_YR, C_YG, C_ZH, C_ZR, C_ZP
static FACTOR_TABLE: Lazy<BTreeMap<EdwRoot, [Linear; 13]>> = Lazy::new(|| {
    let mut table = BTreeMap::new();
    table.insert(
        EdwRoot::Hsm,
        [
            Linear::constant(-1.0),
            Linear::constant(-1.0),
            ZERO,
            ZERO,
            Linear::new(0.3, -0.2),
            Linear::constant(-0.7),
            Linear::constant(0.6),
            ZERO,
            ZERO,
            ZERO,
            Linear::new(-0.15, 0.5),
            ZERO,
            Linear::constant(-0.7),
        ],
    );
    table.insert(
        EdwRoot::Hsa,
        [
            Linear::constant(-0.7),
            Linear::constant(-0.6),
            ZERO,
            ZERO,
            Linear::constant(0.2),
            Linear::constant(-0.4),
            Linear::constant(0.4),
            ZERO,
            ZERO,
            ZERO,
            Linear::new(-0.1, 0.6),
            ZERO,
            Linear::constant(-0.4),
        ],
    );
    table.insert(
        EdwRoot::Fsm,
        [
            Linear::constant(-1.0),
            Linear::constant(-1.0),
            ZERO,
            ZERO,
            Linear::new(-0.2, 0.1),
            ZERO,
            ZERO,
            ZERO,
            ZERO,
            ZERO,
            Linear::new(0.05, -0.3),
            ZERO,
            ZERO,
        ],
    );
    table.insert(
        EdwRoot::Bsr,
        [
            Linear::new(0.1, -0.2),
            Linear::new(0.1, -0.2),
            Linear::new(1.2, -1.1),
            ZERO,
            ZERO,
            ZERO,
            ZERO,
            Linear::new(0.2, -0.2),
            Linear::constant(1.0),
            Linear::constant(1.0),
            Linear::new(0.7, -0.4),
            Linear::constant(1.0),
            ZERO,
        ],
    );
    table.insert(
        EdwRoot::Bsp,
        [
            Linear::new(0.3, -0.2),
            Linear::new(0.3, -0.2),
            Linear::constant(-0.9),
            ZERO,
            ZERO,
            ZERO,
            ZERO,
            Linear::new(-0.05, 0.2),
            Linear::new(0.3, -0.2),
            Linear::new(0.3, -0.2),
            Linear::constant(1.0),
            Linear::new(0.3, -0.2),
            ZERO,
        ],
    );
    table.insert(
        EdwRoot::Ost,
        [
            Linear::new(-0.3, 0.2),
            Linear::new(-0.35, 0.2),
            Linear::new(-0.9, 1.4),
            Linear::constant(-1.0),
            Linear::new(-0.1, 0.1),
            Linear::new(0.2, -0.3),
            Linear::new(-0.2, 0.3),
            Linear::constant(-0.9),
            Linear::constant(1.0),
            Linear::constant(1.0),
            Linear::new(-0.2, 0.1),
            Linear::constant(1.0),
            Linear::new(0.2, -0.3),
        ],
    );
    table.insert(
        EdwRoot::Osa,
        [
            Linear::constant(0.75),
            Linear::new(0.5, 0.1),
            Linear::new(0.55, 0.2),
            Linear::constant(-0.6),
            Linear::new(0.1, -0.2),
            Linear::constant(1.0),
            Linear::constant(-1.0),
            Linear::new(-0.2, -0.1),
            Linear::new(0.3, -0.2),
            Linear::new(0.3, -0.2),
            Linear::new(0.7, -0.3),
            Linear::new(0.3, -0.2),
            Linear::constant(1.0),
        ],
    );
    table
});

/// The thirteen combination factors of one EDW at a given draught ratio
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdwFactors {
    pub c_wv: f64,
    pub c_qw: f64,
    pub c_wh: f64,
    pub c_wt: f64,
    pub c_xs: f64,
    pub c_xp: f64,
    pub c_xg: f64,
    pub c_ys: f64,
    pub c_yr: f64,
    pub c_yg: f64,
    pub c_zh: f64,
    pub c_zr: f64,
    pub c_zp: f64,
}

impl EdwFactors {
    /// Factors for `edw` at draught ratio `f_t`
    pub fn for_edw(edw: Edw, f_t: f64) -> Self {
        let sign = edw.sign();
        let v = FACTOR_TABLE
            .get(&edw.root())
            .map(|row| row.map(|c| sign * c.at(f_t)))
            .unwrap_or([0.0; 13]);
        EdwFactors {
            c_wv: v[0],
            c_qw: v[1],
            c_wh: v[2],
            c_wt: v[3],
            c_xs: v[4],
            c_xp: v[5],
            c_xg: v[6],
            c_ys: v[7],
            c_yr: v[8],
            c_yg: v[9],
            c_zh: v[10],
            c_zr: v[11],
            c_zp: v[12],
        }
    }

    pub fn as_array(&self) -> [f64; 13] {
        [
            self.c_wv, self.c_qw, self.c_wh, self.c_wt, self.c_xs, self.c_xp, self.c_xg, self.c_ys,
            self.c_yr, self.c_yg, self.c_zh, self.c_zr, self.c_zp,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::edw::Phase;

    #[test]
    fn test_every_family_is_tabulated() {
        for root in EdwRoot::ALL {
            assert!(FACTOR_TABLE.contains_key(&root), "{}", root.code());
        }
    }

    #[test]
    fn test_second_phase_is_negation() {
        for root in EdwRoot::ALL {
            for f_t in [0.4, 0.75, 1.0] {
                let one = EdwFactors::for_edw(Edw::new(root, Phase::One), f_t).as_array();
                let two = EdwFactors::for_edw(Edw::new(root, Phase::Two), f_t).as_array();
                for (a, b) in one.iter().zip(two.iter()) {
                    assert_eq!(*a, -*b);
                }
            }
        }
    }

    #[test]
    fn test_hsm1_is_sagging() {
        let f = EdwFactors::for_edw(Edw::HSM_1, 1.0);
        assert_eq!(f.c_wv, -1.0);
        assert!((f.c_zh - 0.35).abs() < 1e-12);
        assert_eq!(f.c_wh, 0.0);
    }

    #[test]
    fn test_draught_dependency() {
        let bsr = Edw::new(EdwRoot::Bsr, Phase::One);
        let full = EdwFactors::for_edw(bsr, 1.0);
        let ballast = EdwFactors::for_edw(bsr, 0.5);
        assert!((full.c_wh - 0.1).abs() < 1e-12);
        assert!((ballast.c_wh - 0.65).abs() < 1e-12);
    }
}
