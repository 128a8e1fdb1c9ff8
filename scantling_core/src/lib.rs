//! # scantling_core - Midship Scantling Engine
//!
//! `scantling_core` sizes the midship section of a bulk carrier to the IACS
//! Common Structural Rules (CSR 2022). A section is described as stiffened
//! panels and the closed blocks (tanks, holds) they bound; the engine builds
//! the rule loads for every Equivalent Design Wave, inverts the rule formulae
//! into net thicknesses, checks the hull girder and adds the corrosion
//! margins.
//!
//! ## Design Philosophy
//!
//! - **JSON in, JSON out**: sections, settings and reports are serde types
//! - **Rich Errors**: every error names the panel, block or field and the rule clause
//! - **Staged**: one owner (`ShipSection`) refreshed by `update()` between stages
//! - **Deterministic**: the same input always yields the same scantlings
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scantling_core::input::SectionFile;
//! use scantling_core::report::Report;
//! use scantling_core::scantling::run;
//! use scantling_core::settings::AnalysisSettings;
//!
//! let json = std::fs::read_to_string("midship.json").unwrap();
//! let settings = AnalysisSettings::default();
//! let mut section = SectionFile::from_json(&json)?.to_section(&settings)?;
//!
//! let outcome = run(&mut section, &settings)?;
//! let report = Report::build(&section, &outcome);
//! println!("{}", serde_json::to_string_pretty(&report).unwrap());
//! # Ok::<(), scantling_core::CsrError>(())
//! ```
//!
//! ## Modules
//!
//! - [`geometry`] - Plates, stiffeners and stiffened panels
//! - [`blocks`] - Closed volumes and their pressure grids
//! - [`section`] - The midship section and its hull girder properties
//! - [`loads`] - EDWs, ship motions and hull girder loads
//! - [`pressure`] - Block pressures projected onto the panels
//! - [`scantling`] - Rule requirements and the analysis pipeline
//! - [`report`] - Result tables and plot data
//! - [`input`] - Section file schema
//! - [`file_io`] - File operations with atomic saves and locking
//! - [`settings`] - Analysis settings and loading conditions
//! - [`materials`] - Hull steel grades
//! - [`equations`] - Section property formulae and rule tables
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod blocks;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod geometry;
pub mod input;
pub mod loads;
pub mod materials;
pub mod pressure;
pub mod report;
pub mod scantling;
pub mod section;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{CsrError, CsrResult};
pub use file_io::{load_section, load_settings, save_json, save_section, FileLock};
pub use input::SectionFile;
pub use report::Report;
pub use scantling::{run, AnalysisOutcome};
pub use section::ShipSection;
pub use settings::AnalysisSettings;
