//! Single-pass scanner over a Gaussian log document.
//!
//! The scanner pulls lines from a [`LineSource`], classifies each one against an
//! ordered table of section markers and hands the shared source to the matching
//! extractor. Extractors consume their section up to its terminal marker and
//! return a [`Fragment`], which is merged into the accumulating [`LogRecord`].
//!
//! # Recognized markers
//!
//! | Marker                                        | Action                              |
//! |-----------------------------------------------|-------------------------------------|
//! | `Population analysis using the SCF density` (any case of `density`) | count population analyses           |
//! | ` Excitation energies and oscillator strengths:` | excited-state extractor          |
//! | ` Mulliken charges:` / ` Mulliken charges and spin densities:` | Mulliken extractor |
//! | ` Orbital symmetries:`                        | orbital extractor, only after a population analysis |
//!
//! Header lines are compared exactly, ignoring trailing whitespace.
//!
//! # Errors
//!
//! Running out of lines in the scanner's own loop ends the scan normally. Running
//! out inside an extractor means the document was truncated mid-section and the
//! whole scan fails with [`ScanError::MalformedSection`]; no partial record is
//! returned.

use crate::excited_states;
use crate::io;
use crate::line_source::LineSource;
use crate::mulliken;
use crate::orbitals;
use crate::record::{Fragment, LogRecord};
use log::{debug, info};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Error type for scan operations.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Input ended before a section's terminal marker
    #[error("{section} section starting at line {start} is truncated: end of input reached before its terminator")]
    MalformedSection {
        /// Section being extracted
        section: Section,
        /// One-based line number of the section header
        start: usize,
    },
    /// HOMO/LUMO positions fall outside the collected orbital energies
    #[error("Inconsistent orbital indexing: {0}")]
    InconsistentIndexing(String),
    /// Log file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for scan results
pub type Result<T> = std::result::Result<T, ScanError>;

/// Section kinds handled by an extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Mulliken atomic charges
    MullikenCharges,
    /// Alpha orbital eigenvalues
    OrbitalEnergies,
    /// Excitation energies and oscillator strengths
    ExcitedStates,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::MullikenCharges => "Mulliken charges",
            Section::OrbitalEnergies => "Orbital energies",
            Section::ExcitedStates => "Excited states",
        };
        f.write_str(name)
    }
}

/// Section-entry conditions recognized by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// An SCF-density population analysis begins
    PopulationAnalysis,
    /// Excitation energies header
    ExcitationEnergies,
    /// Either Mulliken charges header
    MullikenCharges,
    /// Orbital symmetries header
    OrbitalSymmetries,
}

const POPULATION_ANALYSIS: &str = "Population analysis using the SCF ";
const EXCITATION_HEADER: &str = " Excitation energies and oscillator strengths:";
const MULLIKEN_HEADERS: [&str; 2] = [" Mulliken charges:", " Mulliken charges and spin densities:"];
const ORBITAL_SYMMETRIES_HEADER: &str = " Orbital symmetries:";

// Gaussian versions differ in the case of "Density"
fn is_population_analysis(line: &str) -> bool {
    line.find(POPULATION_ANALYSIS)
        .and_then(|i| line.get(i + POPULATION_ANALYSIS.len()..))
        .and_then(|rest| rest.get(..7))
        .is_some_and(|word| word.eq_ignore_ascii_case("density"))
}

fn is_excitation_header(line: &str) -> bool {
    line == EXCITATION_HEADER
}

fn is_mulliken_header(line: &str) -> bool {
    MULLIKEN_HEADERS.iter().any(|header| *header == line)
}

fn is_orbital_symmetries_header(line: &str) -> bool {
    line == ORBITAL_SYMMETRIES_HEADER
}

/// Marker predicates, evaluated in order; the first hit wins.
const MARKERS: [(Marker, fn(&str) -> bool); 4] = [
    (Marker::PopulationAnalysis, is_population_analysis),
    (Marker::ExcitationEnergies, is_excitation_header),
    (Marker::MullikenCharges, is_mulliken_header),
    (Marker::OrbitalSymmetries, is_orbital_symmetries_header),
];

impl Marker {
    /// Classifies a line, or returns `None` for ordinary content.
    pub fn classify(line: &str) -> Option<Marker> {
        let line = line.trim_end();
        MARKERS
            .iter()
            .find(|(_, matches)| matches(line))
            .map(|(marker, _)| *marker)
    }
}

/// Per-scan state. Each scan owns its scanner; nothing is shared between scans.
#[derive(Debug, Default)]
pub struct LogScanner {
    population_analysis_count: usize,
    record: LogRecord,
}

impl LogScanner {
    /// Creates a scanner with an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of population-analysis markers seen so far.
    pub fn population_analysis_count(&self) -> usize {
        self.population_analysis_count
    }

    /// Runs the scan to the end of `source` and returns the finished record.
    pub fn scan(mut self, source: &mut LineSource<'_>) -> Result<LogRecord> {
        while let Ok(line) = source.next_line() {
            let Some(marker) = Marker::classify(line) else {
                continue;
            };
            if let Some(fragment) = self.dispatch(marker, source)? {
                self.record.merge(fragment);
            }
        }

        info!(
            "Scan finished after {} lines; found: {}",
            source.line_number(),
            describe_keys(&self.record)
        );
        Ok(self.record)
    }

    fn dispatch(&mut self, marker: Marker, source: &mut LineSource<'_>) -> Result<Option<Fragment>> {
        let start = source.line_number();
        let fragment = match marker {
            Marker::PopulationAnalysis => {
                self.population_analysis_count += 1;
                debug!(
                    "Population analysis #{} at line {}",
                    self.population_analysis_count, start
                );
                return Ok(None);
            }
            Marker::ExcitationEnergies => {
                debug!("Excited states section at line {}", start);
                Fragment::ExcitedStates(excited_states::extract(source)?)
            }
            Marker::MullikenCharges => {
                debug!("Mulliken charges section at line {}", start);
                Fragment::Mulliken(mulliken::extract(source)?)
            }
            Marker::OrbitalSymmetries => {
                if self.population_analysis_count == 0 {
                    debug!(
                        "Ignoring orbital symmetries at line {}: no population analysis seen yet",
                        start
                    );
                    return Ok(None);
                }
                debug!("Orbital energies section at line {}", start);
                Fragment::Orbitals(orbitals::extract(source)?)
            }
        };
        Ok(Some(fragment))
    }
}

fn describe_keys(record: &LogRecord) -> String {
    let keys = record.keys();
    if keys.is_empty() {
        return "nothing".to_string();
    }
    keys.iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Maps end-of-input inside an extractor to a malformed-section error.
pub(crate) fn truncated(section: Section, start: usize) -> impl Fn(crate::line_source::EndOfStream) -> ScanError {
    move |_| ScanError::MalformedSection { section, start }
}

/// Scans a whole log document held in memory.
pub fn scan_log(text: &str) -> Result<LogRecord> {
    let mut source = LineSource::new(text);
    LogScanner::new().scan(&mut source)
}

/// Reads and scans a log file.
pub fn scan_file(path: &Path) -> Result<LogRecord> {
    let text = io::read_log(path)?;
    debug!("Read {} bytes from {}", text.len(), path.display());
    scan_log(&text)
}
