//! Mulliken atomic charge extraction.
//!
//! Reads the body of a ` Mulliken charges:` (or `... and spin densities:`)
//! block:
//!
//! ```text
//!  Mulliken charges:
//!                1
//!      1  C   -0.123456
//!      2  H    0.123456
//!  Sum of Mulliken charges =   0.00000
//! ```
//!
//! Rows are `index label charge [spin]`; anything else inside the block (column
//! headers, blank lines) is skipped. The block ends at the `Sum of Mulliken
//! charges` line or, failing that, at a line of asterisks.

use crate::line_source::LineSource;
use crate::numeric::DECIMAL;
use crate::record::MullikenCharges;
use crate::scanner::{truncated, Result, Section};
use lazy_static::lazy_static;
use log::{trace, warn};
use regex::Regex;

const SUM_MARKER: &str = "Sum of Mulliken charges";
const ASTERISK_RUN: &str = "******";

lazy_static! {
    // Atom row: "     1  C   -0.123456" (spin column, if any, is ignored)
    static ref ATOM_RE: Regex = Regex::new(&format!(
        r"^\s*\d+\s+([A-Za-z]+)\s+({0})",
        DECIMAL
    )).unwrap();

    // Sum line: " Sum of Mulliken charges =   0.00000"
    static ref SUM_RE: Regex = Regex::new(&format!(
        r"Sum of Mulliken charges\s*=\s*({0})",
        DECIMAL
    )).unwrap();
}

/// Parses one atom row, or `None` if the line is not a row.
fn parse_atom_row(line: &str) -> Option<(String, f64)> {
    let caps = ATOM_RE.captures(line)?;
    let charge = caps[2].parse().ok()?;
    Some((caps[1].to_string(), charge))
}

/// Consumes the Mulliken block that follows the header just read from `source`.
pub fn extract(source: &mut LineSource<'_>) -> Result<MullikenCharges> {
    let start = source.line_number();
    let mut charges = MullikenCharges::default();

    loop {
        let line = source
            .next_line()
            .map_err(truncated(Section::MullikenCharges, start))?;

        if line.contains(SUM_MARKER) {
            charges.charge_sum = SUM_RE
                .captures(line)
                .and_then(|caps| caps[1].parse().ok());
            if charges.charge_sum.is_none() {
                warn!(
                    "No value on Mulliken sum line {}: {:?}",
                    source.line_number(),
                    line
                );
            }
            break;
        }
        if line.contains(ASTERISK_RUN) {
            break;
        }

        match parse_atom_row(line) {
            Some((element, charge)) => {
                charges.elements.push(element);
                charges.charges.push(charge);
            }
            None => trace!("Skipping non-atom line {}: {:?}", source.line_number(), line),
        }
    }

    Ok(charges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ScanError;

    #[test]
    fn test_minimal_block() {
        let mut source = LineSource::new(
            "  1  C   -0.123\n  2  H    0.123\n Sum of Mulliken charges =   0.000\n after",
        );
        let result = extract(&mut source).unwrap();
        assert_eq!(result.elements, vec!["C", "H"]);
        assert_eq!(result.charges, vec![-0.123, 0.123]);
        assert_eq!(result.charge_sum, Some(0.0));
        // Cursor stops right after the sum line
        assert_eq!(source.next_line(), Ok(" after"));
    }

    #[test]
    fn test_headers_and_blank_lines_skipped() {
        let text = "               1\n\
                    \n     1  O   -0.651209\n\
                    garbage line here\n     2  H    0.325604\n\
                    \x20    3  H    0.325604\n\
                    \x20Sum of Mulliken charges =  -0.00000\n";
        let result = extract(&mut LineSource::new(text)).unwrap();
        assert_eq!(result.elements, vec!["O", "H", "H"]);
        assert_eq!(result.charges.len(), result.elements.len());
        assert_eq!(result.charge_sum, Some(-0.0));
    }

    #[test]
    fn test_spin_density_rows_keep_charge_column() {
        let text = "               1          2\n\
                    \x20    1  N    0.123000   0.950000\n\
                    \x20Sum of Mulliken charges =   1.00000   1.00000\n";
        let result = extract(&mut LineSource::new(text)).unwrap();
        assert_eq!(result.elements, vec!["N"]);
        assert_eq!(result.charges, vec![0.123]);
        assert_eq!(result.charge_sum, Some(1.0));
    }

    #[test]
    fn test_asterisk_terminator_without_sum() {
        let text = "  1  C   -0.5\n **********\n  2  H  0.5\n";
        let mut source = LineSource::new(text);
        let result = extract(&mut source).unwrap();
        assert_eq!(result.elements, vec!["C"]);
        assert_eq!(result.charge_sum, None);
        assert_eq!(source.next_line(), Ok("  2  H  0.5"));
    }

    #[test]
    fn test_truncated_block_is_malformed() {
        let mut source = LineSource::new(" Mulliken charges:\n  1  C  -0.1\n");
        source.next_line().unwrap();
        let err = extract(&mut source).unwrap_err();
        assert!(matches!(
            err,
            ScanError::MalformedSection {
                section: Section::MullikenCharges,
                start: 1
            }
        ));
    }
}
