//! # Engineering Equations
//!
//! Pure formula functions shared by the geometry and rule modules. Each
//! function documents its formula and source so the numbers in a report can
//! be traced by hand.
//!
//! ## Modules
//!
//! - [`section`] - Thin-walled section properties (strips, arcs, parallel axis)
//! - [`interpolation`] - Keyed rule tables with scalar or callable entries

pub mod interpolation;
pub mod section;

pub use interpolation::{RuleTable, TableValue};
