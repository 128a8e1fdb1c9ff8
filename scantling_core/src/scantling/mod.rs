//! # Scantling Engine
//!
//! Inverts the CSR requirements into net thicknesses for every panel and
//! checks the hull girder as a whole.
//!
//! ## Modules
//!
//! - [`minimum`] - Rule minimum thicknesses of plating and stiffener legs
//! - [`plating`] - Plating under lateral pressure
//! - [`stiffeners`] - Web shear, slenderness and section modulus of stiffeners
//! - [`buckling`] - Plate slenderness and elastic buckling
//! - [`corrosion`] - Corrosion additions from the bounding spaces
//! - [`global`] - Hull girder section modulus and inertia
//! - [`pipeline`] - The staged run over every loading condition
//!
//! ## Example
//!
//! ```no_run
//! use scantling_core::scantling::run;
//! use scantling_core::settings::AnalysisSettings;
//! # fn demo(section: &mut scantling_core::section::ShipSection) -> scantling_core::CsrResult<()> {
//! let outcome = run(section, &AnalysisSettings::default())?;
//! for v in &outcome.violations {
//!     eprintln!("{}", v);
//! }
//! # Ok(())
//! # }
//! ```

pub mod buckling;
pub mod corrosion;
pub mod global;
pub mod minimum;
pub mod pipeline;
pub mod plating;
pub mod stiffeners;

pub use corrosion::CorrosionAddition;
pub use global::GlobalCheck;
pub use pipeline::{run, AnalysisOutcome, ConditionOutcome, PanelScantling, Stage};
