//! # Cross-Section Property Formulas
//!
//! Closed-form geometric properties of the thin-walled elements that make up
//! a midship section: straight plate strips at any angle, quarter-circle
//! bilge strakes, and the parallel-axis transfer used to assemble them.
//!
//! ## Notation
//!
//! - `A` = Cross-sectional area (m²)
//! - `I` = Moment of inertia (second moment of area, m⁴)
//! - `l` = Strip length along its centreline (m)
//! - `t` = Strip thickness (m)
//! - `θ` = Strip angle to the horizontal (rad)
//!
//! Ixx is measured about a horizontal axis (vertical lever arms), Iyy about a
//! vertical axis (horizontal lever arms).
//!
//! ## References
//!
//! - Roark's Formulas for Stress and Strain, 8th Edition, Table A.1
//! - IACS CSR Pt 1 Ch 5 Sec 1 [1.2]: hull girder section properties

use std::f64::consts::PI;

// =============================================================================
// STRAIGHT STRIP
// Rectangle l × t rotated by θ about its own centroid
// =============================================================================

/// Moments of inertia of a straight strip about its centroidal x and y axes.
///
/// ```text
///          ╱╲
///        ╱  ╱  l
///      ╱  ╱
///     ╲ ╱  θ
///   ───────────
/// ```
///
/// # Formula
/// Ixx = (l·t/12)·(t²·cos²θ + l²·sin²θ)
/// Iyy = (l·t/12)·(t²·sin²θ + l²·cos²θ)
///
/// # Example
/// ```rust
/// use scantling_core::equations::section::rotated_strip_inertia;
///
/// // Horizontal 2 m × 10 mm strip
/// let (ixx, iyy) = rotated_strip_inertia(2.0, 0.01, 0.0);
/// assert!((ixx - 2.0 * 0.01_f64.powi(3) / 12.0).abs() < 1e-15);
/// assert!((iyy - 0.01 * 8.0 / 12.0).abs() < 1e-12);
/// ```
pub fn rotated_strip_inertia(l: f64, t: f64, theta: f64) -> (f64, f64) {
    let (s, c) = theta.sin_cos();
    let base = l * t / 12.0;
    let ixx = base * (t * t * c * c + l * l * s * s);
    let iyy = base * (t * t * s * s + l * l * c * c);
    (ixx, iyy)
}

// =============================================================================
// QUARTER-CIRCLE STRAKE
// =============================================================================

/// Moment of inertia of a quarter annulus of outer radius `r` and wall `t`.
///
/// # Formula
/// Ixx = Iyy = π/16·(r⁴ − (r − t)⁴)
pub fn quarter_annulus_inertia(r: f64, t: f64) -> f64 {
    PI / 16.0 * (r.powi(4) - (r - t).powi(4))
}

/// Distance from the circle centre to the centroid of a thin quarter arc.
///
/// # Formula
/// d = r·sin(π/4)/(π/4) = 2√2·r/π
pub fn quarter_arc_centroid_distance(r: f64) -> f64 {
    2.0 * 2.0_f64.sqrt() * r / PI
}

// =============================================================================
// PARALLEL AXIS TRANSFER
// =============================================================================

/// Transfer a centroidal moment of inertia to a parallel axis at `lever`.
///
/// # Formula
/// I = I_c + A·d²
#[inline]
pub fn parallel_axis(i_centroidal: f64, area: f64, lever: f64) -> f64 {
    i_centroidal + area * lever * lever
}

/// Combined properties of several parts, each given as (A, c, I_c) along one axis.
///
/// Returns (A_total, c_total, I about c_total). An empty or zero-area input
/// returns zeros.
pub fn combine_parts<I>(parts: I) -> (f64, f64, f64)
where
    I: IntoIterator<Item = (f64, f64, f64)> + Clone,
{
    let (area, moment) = parts
        .clone()
        .into_iter()
        .fold((0.0, 0.0), |(a, m), (ai, ci, _)| (a + ai, m + ai * ci));
    if area <= 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let centroid = moment / area;
    let inertia = parts
        .into_iter()
        .map(|(ai, ci, ii)| parallel_axis(ii, ai, ci - centroid))
        .sum();
    (area, centroid, inertia)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_strip_swaps_axes() {
        let (ixx_h, iyy_h) = rotated_strip_inertia(3.0, 0.02, 0.0);
        let (ixx_v, iyy_v) = rotated_strip_inertia(3.0, 0.02, PI / 2.0);
        assert!((ixx_h - iyy_v).abs() < 1e-12);
        assert!((iyy_h - ixx_v).abs() < 1e-12);
    }

    #[test]
    fn test_quarter_annulus() {
        // Full annulus about a diameter is π/4·(r⁴ − rᵢ⁴); a quarter is a quarter of that
        let r: f64 = 2.0;
        let t = 0.015;
        let full = PI / 4.0 * (r.powi(4) - (r - t).powi(4));
        assert!((quarter_annulus_inertia(r, t) - full / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_combine_two_rectangles() {
        // Two 1 m² blocks at 0 and 2 → centroid 1, I = 2·(I_c + 1)
        let (a, c, i) = combine_parts(vec![(1.0, 0.0, 0.1), (1.0, 2.0, 0.1)]);
        assert_eq!(a, 2.0);
        assert_eq!(c, 1.0);
        assert!((i - 2.2).abs() < 1e-12);
    }
}
