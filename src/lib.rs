#![deny(missing_docs)]

//! glogread - structured data from Gaussian log files
//!
//! glogread scans the text output of a Gaussian calculation in a single pass and
//! pulls out the quantities people usually copy by hand:
//!
//! - Alpha orbital energies (converted to eV), with the HOMO and LUMO
//! - Mulliken atomic charges and their declared sum
//! - Excited-state energies, wavelengths and oscillator strengths
//!
//! # Quick Start
//!
//! ```no_run
//! use glogread::scan_file;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let record = scan_file(Path::new("benzene.log"))?;
//!     for key in record.keys() {
//!         println!("{} = {}", key, record.get(key).unwrap());
//!     }
//!     if let Some(homo) = record.homo {
//!         println!("HOMO #{} at {:.3} eV", homo.index, homo.energy);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # How a scan works
//!
//! The document is split into lines and read once, front to back. The
//! [`scanner`] recognizes section headers and hands the same line stream to
//! the matching extractor ([`mulliken`], [`orbitals`], [`excited_states`]),
//! which reads up to the end of its section. If a section type occurs more
//! than once, the last occurrence wins.
//!
//! A document that ends in the middle of a section is an error
//! ([`ScanError::MalformedSection`]), as is an orbital listing from which no
//! HOMO/LUMO can be derived ([`ScanError::InconsistentIndexing`]). Sections
//! that never appear are simply missing from the [`LogRecord`].
//!
//! Scans share no state, so independent documents can be scanned concurrently.
//!
//! # Modules
//!
//! - [`line_source`] - forward-only line cursor
//! - [`scanner`] - marker dispatch and error types
//! - [`mulliken`], [`orbitals`], [`excited_states`] - section extractors
//! - [`record`] - result record and quantity lookup
//! - [`levels`] - degeneracy binning for energy-level diagrams
//! - [`settings`] - INI configuration
//! - [`io`] - file helpers

pub mod excited_states;
/// File I/O helpers
pub mod io;
/// Energy-level diagram layout
pub mod levels;
pub mod line_source;
pub mod mulliken;
pub mod numeric;
pub mod orbitals;
pub mod record;
pub mod scanner;
/// Configuration management system
pub mod settings;

pub use line_source::{EndOfStream, LineSource};
pub use record::{ExcitedStates, LogRecord, OrbitalLevel, Quantity, Value};
pub use scanner::{scan_file, scan_log, LogScanner, ScanError};
