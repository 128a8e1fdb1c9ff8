//! Keyed rule tables with piecewise-linear interpolation.
//!
//! Many CSR coefficients are tabulated against the longitudinal position
//! ratio f_xL. Some table entries are plain numbers, others depend on a second
//! variable (for instance the draught ratio f_T). A [`RuleTable`] stores both
//! kinds; at lookup time callable entries are evaluated with the extra
//! argument first, then the two bracketing values are interpolated linearly.
//!
//! ```rust
//! use scantling_core::equations::{RuleTable, TableValue};
//!
//! let table = RuleTable::new(vec![
//!     (0.0, TableValue::Scalar(0.0)),
//!     (0.5, TableValue::Callable(|f_t| 2.0 * f_t)),
//!     (1.0, TableValue::Scalar(1.0)),
//! ]);
//! assert_eq!(table.lookup(0.25, 1.0), 1.0);
//! assert_eq!(table.lookup(0.75, 1.0), 1.5);
//! ```

/// A table entry: a constant or a function of one extra variable
#[derive(Debug, Clone, Copy)]
pub enum TableValue {
    Scalar(f64),
    Callable(fn(f64) -> f64),
}

impl TableValue {
    /// Evaluate the entry for the given extra argument
    pub fn evaluate(&self, arg: f64) -> f64 {
        match self {
            TableValue::Scalar(v) => *v,
            TableValue::Callable(f) => f(arg),
        }
    }
}

/// Ordered key/value pairs interpolated linearly between keys.
///
/// Lookups below the first key or above the last return the end values.
#[derive(Debug, Clone)]
pub struct RuleTable {
    entries: Vec<(f64, TableValue)>,
}

impl RuleTable {
    /// Build a table; entries are sorted by key.
    pub fn new(mut entries: Vec<(f64, TableValue)>) -> Self {
        entries.sort_by(|a, b| a.0.total_cmp(&b.0));
        RuleTable { entries }
    }

    /// Build a table of plain numbers
    pub fn scalars(entries: &[(f64, f64)]) -> Self {
        RuleTable::new(
            entries
                .iter()
                .map(|&(k, v)| (k, TableValue::Scalar(v)))
                .collect(),
        )
    }

    /// Interpolated value at `key`, evaluating callable entries with `arg`.
    pub fn lookup(&self, key: f64, arg: f64) -> f64 {
        let (first, last) = match (self.entries.first(), self.entries.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        if key <= first.0 {
            return first.1.evaluate(arg);
        }
        if key >= last.0 {
            return last.1.evaluate(arg);
        }
        for pair in self.entries.windows(2) {
            let (k0, v0) = pair[0];
            let (k1, v1) = pair[1];
            if key >= k0 && key <= k1 {
                let y0 = v0.evaluate(arg);
                let y1 = v1.evaluate(arg);
                if (k1 - k0).abs() < f64::EPSILON {
                    return y1;
                }
                return y0 + (y1 - y0) * (key - k0) / (k1 - k0);
            }
        }
        last.1.evaluate(arg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clamps_outside_range() {
        let table = RuleTable::scalars(&[(0.2, 1.0), (0.8, 3.0)]);
        assert_eq!(table.lookup(0.0, 0.0), 1.0);
        assert_eq!(table.lookup(1.0, 0.0), 3.0);
        assert_relative_eq!(table.lookup(0.5, 0.0), 2.0, max_relative = 1e-12);
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let table = RuleTable::scalars(&[(1.0, 0.0), (0.0, 1.0)]);
        assert_relative_eq!(table.lookup(0.25, 0.0), 0.75, max_relative = 1e-12);
    }

    #[test]
    fn test_empty_table() {
        let table = RuleTable::new(Vec::new());
        assert_eq!(table.lookup(0.5, 1.0), 0.0);
    }
}
