//! Rule loads of the midship section (CSR Pt 1 Ch 4)
//!
//! # Overview
//!
//! - [`Edw`] - The fourteen Equivalent Design Waves (HSM-1 ... OSA-2P)
//! - [`EdwFactors`] - The thirteen load combination factors of an EDW
//! - [`ShipMotions`] - Roll, pitch and rigid body accelerations
//! - [`LoadCase`] - One EDW at one loading draught with its hull girder moments
//! - [`PressureCase`] - Key of a pressure distribution (static or one EDW)
//!
//! # Example
//!
//! ```
//! use scantling_core::loads::{Edw, LoadCase};
//! use scantling_core::section::Particulars;
//!
//! let ship = Particulars::sample_bulk_carrier();
//! let cases: Vec<LoadCase> = Edw::DESIGN
//!     .iter()
//!     .map(|&edw| LoadCase::new(edw, ship.t_sc, &ship))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! // Phase two mirrors phase one
//! assert_eq!(cases[0].factors.c_zh, -cases[1].factors.c_zh);
//! ```

pub mod edw;
pub mod factors;
pub mod hull_girder;
pub mod load_case;

pub use edw::{Edw, EdwRoot, Phase, PressureCase};
pub use factors::EdwFactors;
pub use hull_girder::ShipMotions;
pub use load_case::LoadCase;
