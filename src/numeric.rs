//! Numeric token helpers shared by the section extractors.

use lazy_static::lazy_static;
use regex::Regex;

/// Hartree to electron-volt factor used for orbital energies.
pub const HARTREE_TO_EV: f64 = 27.2;

/// Signed fixed-point decimal as printed in Gaussian tables: `-0.123`, `0.5`, `+.25`.
pub const DECIMAL: &str = r"[-+]?\d*\.\d+";

lazy_static! {
    static ref DECIMAL_RE: Regex = Regex::new(DECIMAL).unwrap();
}

/// Extracts every decimal token on a line, in order.
///
/// Columns that Gaussian prints without a separating blank
/// (`-10.18977-10.18944`) come out as separate values.
pub fn decimals(line: &str) -> Vec<f64> {
    DECIMAL_RE
        .find_iter(line)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

/// Converts a Hartree value to eV.
pub fn hartree_to_ev(hartree: f64) -> f64 {
    HARTREE_TO_EV * hartree
}
