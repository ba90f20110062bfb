//! Excited-state (TD-DFT / CIS) transition extraction.

use crate::line_source::LineSource;
use crate::numeric::DECIMAL;
use crate::record::ExcitedStates;
use crate::scanner::{truncated, Result, Section};
use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;

const STATE_MARKER: &str = "Excited State";
const ASTERISK_RUN: &str = "******";

lazy_static! {
    // " Excited State   1:      Singlet-A      3.9741 eV  311.98 nm  f=0.0012  <S**2>=0.000"
    static ref STATE_RE: Regex = Regex::new(&format!(
        r"Excited State\s+\d+\s*:\s*(\S+)\s+({0})\s+eV\s+({0})\s+nm\s+f=({0})",
        DECIMAL
    )).unwrap();
}

fn parse_state(line: &str) -> Option<(String, f64, f64, f64)> {
    let caps = STATE_RE.captures(line)?;
    Some((
        caps[1].to_string(),
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
        caps[4].parse().ok()?,
    ))
}

/// Consumes the excitation listing up to its asterisk terminator.
///
/// Transition amplitude lines (`  14 -> 16   0.70317`) and the total-energy
/// lines in between are skipped.
pub fn extract(source: &mut LineSource<'_>) -> Result<ExcitedStates> {
    let start = source.line_number();
    let mut states = ExcitedStates::default();

    loop {
        let line = source
            .next_line()
            .map_err(truncated(Section::ExcitedStates, start))?;

        if line.contains(STATE_MARKER) {
            match parse_state(line) {
                Some((label, energy, wavelength, strength)) => {
                    states.push(label, energy, wavelength, strength)
                }
                None => trace!("Unparsable excited state line {}: {:?}", source.line_number(), line),
            }
        } else if line.contains(ASTERISK_RUN) {
            break;
        }
    }

    debug!("Parsed {} excited states", states.len());
    Ok(states)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ScanError;

    const LISTING: &str = r#" 
 Excited State   1:      Singlet-A      3.9741 eV  311.98 nm  f=0.0012  <S**2>=0.000
      14 -> 16         0.70317
 This state for optimization and/or second-order correction.
 Total Energy, E(TD-HF/TD-DFT) =  -230.123456789
 
 Excited State   2:      Singlet-B      4.5123 eV  274.77 nm  f=0.1534  <S**2>=0.000
      15 -> 16         0.69871
 
 Excited State   3:      Triplet-A      5.0010 eV  247.92 nm  f=0.0000  <S**2>=2.000
 SavETr:  write IOETrn=   770 NScale= 10 NData=  16 NLR=1 NState=    3 LETran=      64.
 **********************************************************************
 after
"#;

    #[test]
    fn test_listing_parsed_in_order() {
        let mut source = LineSource::new(LISTING);
        let states = extract(&mut source).unwrap();
        assert_eq!(states.len(), 3);
        assert_eq!(states.energies, vec![3.9741, 4.5123, 5.0010]);
        assert_eq!(states.wavelengths, vec![311.98, 274.77, 247.92]);
        assert_eq!(states.oscillator_strengths, vec![0.0012, 0.1534, 0.0]);
        assert_eq!(states.labels, vec!["Singlet-A", "Singlet-B", "Triplet-A"]);
        assert_eq!(source.next_line(), Ok(" after"));
    }

    #[test]
    fn test_spin_contamination_does_not_terminate() {
        // "<S**2>" holds asterisks but no terminator run
        let text = " Excited State   1:   3.010-A      2.0000 eV  619.92 nm  f=0.0100  <S**2>=2.010\n\
                    \x20******\n";
        let states = extract(&mut LineSource::new(text)).unwrap();
        assert_eq!(states.len(), 1);
        assert_eq!(states.labels, vec!["3.010-A"]);
    }

    #[test]
    fn test_unparsable_state_line_skipped() {
        let text = " Excited State   1: broken line\n\
                    \x20Excited State   2:      Singlet-A      4.0000 eV  309.96 nm  f=0.2000\n\
                    \x20******\n";
        let states = extract(&mut LineSource::new(text)).unwrap();
        assert_eq!(states.len(), 1);
        assert_eq!(states.energies, vec![4.0]);
        assert_eq!(states.energies.len(), states.wavelengths.len());
        assert_eq!(states.wavelengths.len(), states.oscillator_strengths.len());
    }

    #[test]
    fn test_truncated_listing_is_malformed() {
        let text = " Excited State   1:      Singlet-A      3.9741 eV  311.98 nm  f=0.0012\n";
        let err = extract(&mut LineSource::new(text)).unwrap_err();
        assert!(matches!(
            err,
            ScanError::MalformedSection {
                section: Section::ExcitedStates,
                ..
            }
        ));
    }
}
