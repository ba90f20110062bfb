//! Orbital eigenvalue extraction and HOMO/LUMO derivation.
//!
//! Entered after ` Orbital symmetries:` once a population analysis has started.
//! The eigenvalue listing that follows looks like
//!
//! ```text
//!  Alpha  occ. eigenvalues --  -19.13672  -0.99803  -0.52094  -0.35915  -0.29230
//!  Alpha virt. eigenvalues --    0.06569   0.14612   0.64820   0.69264   0.86932
//!           Condensed to atoms (all electrons):
//! ```
//!
//! Values are in Hartree and are converted to eV. Occupied lines must all come
//! before virtual lines: the HOMO is the last occupied entry and the LUMO the
//! one right after it.

use crate::line_source::LineSource;
use crate::numeric::{decimals, hartree_to_ev};
use crate::record::{OrbitalEnergies, OrbitalLevel};
use crate::scanner::{truncated, Result, ScanError, Section};
use log::{debug, trace};

const TERMINATOR: &str = "Condensed to atoms (all electrons):";
const ALPHA: &str = "Alpha";
const OCCUPIED: &str = "occ.";
const VIRTUAL: &str = "virt.";

/// Running tallies while the eigenvalue listing is read.
#[derive(Debug, Default)]
struct Tally {
    hartree: Vec<f64>,
    occupied: usize,
    virtual_: usize,
}

impl Tally {
    fn add_line(&mut self, line: &str, line_number: usize) -> Result<()> {
        if !line.contains(ALPHA) {
            return Ok(());
        }
        let values = decimals(line);
        if values.is_empty() {
            trace!("Skipping line {} without eigenvalues", line_number);
            return Ok(());
        }

        let count = values.len();
        self.hartree.extend(values);
        if line.contains(OCCUPIED) {
            if self.virtual_ > 0 {
                return Err(ScanError::InconsistentIndexing(format!(
                    "occupied orbitals listed after virtual ones at line {}",
                    line_number
                )));
            }
            self.occupied += count;
        } else if line.contains(VIRTUAL) {
            self.virtual_ += count;
        }
        Ok(())
    }

    fn finish(self) -> Result<OrbitalEnergies> {
        let energies: Vec<f64> = self.hartree.into_iter().map(hartree_to_ev).collect();
        let occupied = self.occupied;

        if occupied == 0 {
            return Err(ScanError::InconsistentIndexing(
                "no occupied orbitals found".to_string(),
            ));
        }
        if occupied >= energies.len() {
            return Err(ScanError::InconsistentIndexing(format!(
                "{} occupied orbitals leave no virtual orbital among {} energies",
                occupied,
                energies.len()
            )));
        }

        let homo = OrbitalLevel {
            energy: energies[occupied - 1],
            index: occupied,
        };
        let lumo = OrbitalLevel {
            energy: energies[occupied],
            index: occupied + 1,
        };
        debug!(
            "{} orbitals ({} occupied, {} virtual); HOMO {:.4} eV, LUMO {:.4} eV",
            energies.len(),
            occupied,
            self.virtual_,
            homo.energy,
            lumo.energy
        );

        Ok(OrbitalEnergies {
            energies,
            homo,
            lumo,
        })
    }
}

/// Consumes the orbital listing up to the condensed-to-atoms terminator.
pub fn extract(source: &mut LineSource<'_>) -> Result<OrbitalEnergies> {
    let start = source.line_number();
    let mut tally = Tally::default();

    loop {
        let line = source
            .next_line()
            .map_err(truncated(Section::OrbitalEnergies, start))?;
        if line.contains(TERMINATOR) {
            break;
        }
        tally.add_line(line, source.line_number())?;
    }

    tally.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_one_occupied_one_virtual() {
        let text = " Alpha  occ. eigenvalues --   -0.500\n\
                    \x20Alpha virt. eigenvalues --    0.200\n\
                    \x20         Condensed to atoms (all electrons):\n";
        let result = extract(&mut LineSource::new(text)).unwrap();
        assert_eq!(result.energies.len(), 2);
        assert!(approx(result.energies[0], -13.6));
        assert!(approx(result.energies[1], 5.44));
        assert_eq!(result.homo.index, 1);
        assert!(approx(result.homo.energy, -13.6));
        assert_eq!(result.lumo.index, 2);
        assert!(approx(result.lumo.energy, 5.44));
    }

    #[test]
    fn test_multiple_lines_and_noise() {
        let text = "       Occupied  (A1) (A1) (B2) (A1) (B1)\n\
                    \x20      Virtual   (A1) (B2) (B2) (A1) (A1)\n\
                    \x20The electronic state is 1-A1.\n\
                    \x20Alpha  occ. eigenvalues --  -19.13672  -0.99803  -0.52094  -0.35915  -0.29230\n\
                    \x20Alpha virt. eigenvalues --    0.06569   0.14612   0.64820   0.69264   0.86932\n\
                    \x20Alpha virt. eigenvalues --    0.90115   1.01123\n\
                    \x20         Condensed to atoms (all electrons):\n";
        let raw = [
            -19.13672, -0.99803, -0.52094, -0.35915, -0.29230, 0.06569, 0.14612, 0.64820,
            0.69264, 0.86932, 0.90115, 1.01123,
        ];
        let result = extract(&mut LineSource::new(text)).unwrap();
        assert_eq!(result.energies.len(), raw.len());
        for (ev, h) in result.energies.iter().zip(raw) {
            assert!(approx(*ev, 27.2 * h));
        }
        assert_eq!(result.homo.index, 5);
        assert_eq!(result.lumo.index, 6);
        assert_eq!(result.homo.index + 1, result.lumo.index);
        assert!(approx(result.homo.energy, 27.2 * -0.29230));
        assert!(approx(result.lumo.energy, 27.2 * 0.06569));
    }

    #[test]
    fn test_beta_lines_ignored() {
        let text = " Alpha  occ. eigenvalues --   -0.40\n\
                    \x20Alpha virt. eigenvalues --    0.10\n\
                    \x20 Beta  occ. eigenvalues --   -0.30\n\
                    \x20 Beta virt. eigenvalues --    0.20\n\
                    \x20Condensed to atoms (all electrons):\n";
        let result = extract(&mut LineSource::new(text)).unwrap();
        assert_eq!(result.energies.len(), 2);
    }

    #[test]
    fn test_no_occupied_is_inconsistent() {
        let text = " Alpha virt. eigenvalues --    0.200\n Condensed to atoms (all electrons):\n";
        let err = extract(&mut LineSource::new(text)).unwrap_err();
        assert!(matches!(err, ScanError::InconsistentIndexing(_)));
    }

    #[test]
    fn test_no_virtual_is_inconsistent() {
        let text = " Alpha  occ. eigenvalues --   -0.500 -0.400\n Condensed to atoms (all electrons):\n";
        let err = extract(&mut LineSource::new(text)).unwrap_err();
        assert!(matches!(err, ScanError::InconsistentIndexing(_)));
    }

    #[test]
    fn test_occupied_after_virtual_is_inconsistent() {
        let text = " Alpha  occ. eigenvalues --   -0.500\n\
                    \x20Alpha virt. eigenvalues --    0.200\n\
                    \x20Alpha  occ. eigenvalues --   -0.100\n\
                    \x20Condensed to atoms (all electrons):\n";
        let err = extract(&mut LineSource::new(text)).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_truncated_listing_is_malformed() {
        let text = " Alpha  occ. eigenvalues --   -0.500\n Alpha virt. eigenvalues --    0.200\n";
        let err = extract(&mut LineSource::new(text)).unwrap_err();
        assert!(matches!(
            err,
            ScanError::MalformedSection {
                section: Section::OrbitalEnergies,
                ..
            }
        ));
    }
}
