//! # Materials Database
//!
//! Hull structural steel grades and the section material factor κ.
//!
//! ## Example
//!
//! ```rust
//! use scantling_core::materials::{MaterialGrade, material_factor};
//!
//! // Half the area in mild steel, half in AH32
//! let kappa = material_factor([(MaterialGrade::A, 1.0), (MaterialGrade::AH32, 1.0)]);
//! assert!((kappa - 0.89).abs() < 1e-12);
//! ```

pub mod hull_steel;

pub use hull_steel::{MaterialGrade, SteelProperties, StrengthClass};

/// Material factor of the section, κ = Σ wᵢ·kᵢ.
///
/// `weighted` yields (grade, weight) pairs; weights are normalised to
/// fractions. An empty or zero-weight input falls back to mild steel (κ = 1).
pub fn material_factor<I>(weighted: I) -> f64
where
    I: IntoIterator<Item = (MaterialGrade, f64)>,
{
    let (sum_wk, sum_w) = weighted
        .into_iter()
        .fold((0.0, 0.0), |(wk, w), (grade, weight)| (wk + weight * grade.k(), w + weight));
    if sum_w > 0.0 {
        sum_wk / sum_w
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kappa_is_weighted_mean() {
        let kappa = material_factor([
            (MaterialGrade::A, 2.0),
            (MaterialGrade::AH36, 1.0),
            (MaterialGrade::AH40, 1.0),
        ]);
        let expected = 0.5 * 1.0 + 0.25 * 0.72 + 0.25 * 0.68;
        assert!((kappa - expected).abs() < 1e-12);
    }

    #[test]
    fn test_kappa_empty_is_mild() {
        assert_eq!(material_factor(std::iter::empty()), 1.0);
    }
}
