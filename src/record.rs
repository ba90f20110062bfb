//! Aggregated scan output.
//!
//! A [`LogRecord`] starts empty and is filled one [`Fragment`] at a time as the
//! scanner meets section markers. Every field is optional: a quantity is present
//! only if its section was found in the document.
//!
//! # Keys
//!
//! | Key              | Type                          | Source section                    |
//! |------------------|-------------------------------|-----------------------------------|
//! | `elements`       | atom labels                   | Mulliken charges                  |
//! | `charges`        | Mulliken charges              | Mulliken charges                  |
//! | `charge_sum`     | declared total charge         | Mulliken charges                  |
//! | `energies`       | orbital energies (eV)         | Orbital symmetries / eigenvalues  |
//! | `LUMO`, `HOMO`   | (energy eV, one-based index)  | Orbital symmetries / eigenvalues  |
//! | `excited_states` | energies, wavelengths, `f`    | Excitation energies               |

use log::warn;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A frontier orbital: energy in eV and its one-based position in `energies`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitalLevel {
    /// Orbital energy (eV)
    pub energy: f64,
    /// One-based orbital index
    pub index: usize,
}

/// Index-aligned excited-state table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExcitedStates {
    /// Excitation energies (eV)
    pub energies: Vec<f64>,
    /// Wavelengths (nm)
    #[serde(rename = "lenghts")]
    pub wavelengths: Vec<f64>,
    /// Oscillator strengths
    #[serde(rename = "F")]
    pub oscillator_strengths: Vec<f64>,
    /// State labels such as `Singlet-A`
    pub labels: Vec<String>,
}

impl ExcitedStates {
    /// Appends one state to every column.
    pub fn push(&mut self, label: String, energy: f64, wavelength: f64, strength: f64) {
        self.labels.push(label);
        self.energies.push(energy);
        self.wavelengths.push(wavelength);
        self.oscillator_strengths.push(strength);
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.energies.len()
    }

    /// True if no state was parsed.
    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }
}

/// Output of the Mulliken charge extractor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MullikenCharges {
    /// Atom labels, in atom order
    pub elements: Vec<String>,
    /// Charges aligned with `elements`
    pub charges: Vec<f64>,
    /// Declared sum, absent if the section ended on an asterisk line
    pub charge_sum: Option<f64>,
}

/// Output of the orbital energy extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalEnergies {
    /// All alpha orbital energies (eV), occupied first
    pub energies: Vec<f64>,
    /// Highest occupied orbital
    pub homo: OrbitalLevel,
    /// Lowest unoccupied orbital
    pub lumo: OrbitalLevel,
}

/// Partial result returned by one extractor run.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// `elements`, `charges` and possibly `charge_sum`
    Mulliken(MullikenCharges),
    /// `energies`, `HOMO` and `LUMO`
    Orbitals(OrbitalEnergies),
    /// `excited_states`
    ExcitedStates(ExcitedStates),
}

/// Named quantity stored in a [`LogRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quantity {
    /// Atom labels
    Elements,
    /// Mulliken charges
    Charges,
    /// Declared total charge
    ChargeSum,
    /// Orbital energies
    Energies,
    /// Lowest unoccupied orbital
    Lumo,
    /// Highest occupied orbital
    Homo,
    /// Excited-state table
    ExcitedStates,
}

impl Quantity {
    /// Every quantity, in listing order.
    pub const ALL: [Quantity; 7] = [
        Quantity::Elements,
        Quantity::Charges,
        Quantity::ChargeSum,
        Quantity::Energies,
        Quantity::Lumo,
        Quantity::Homo,
        Quantity::ExcitedStates,
    ];

    /// Key name as used in JSON output and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Quantity::Elements => "elements",
            Quantity::Charges => "charges",
            Quantity::ChargeSum => "charge_sum",
            Quantity::Energies => "energies",
            Quantity::Lumo => "LUMO",
            Quantity::Homo => "HOMO",
            Quantity::ExcitedStates => "excited_states",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quantity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quantity::ALL
            .into_iter()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| format!("Unknown quantity: {}", s))
    }
}

/// Borrowed view of one quantity's value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// Sequence of labels
    Labels(&'a [String]),
    /// Sequence of floats
    Floats(&'a [f64]),
    /// Single float
    Scalar(f64),
    /// Orbital energy and index
    Level(OrbitalLevel),
    /// Excited-state table
    ExcitedStates(&'a ExcitedStates),
}

fn write_floats(f: &mut fmt::Formatter<'_>, values: &[f64]) -> fmt::Result {
    let precision = f.precision().unwrap_or(4);
    write!(f, "[")?;
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{:.*}", precision, v)?;
    }
    write!(f, "]")
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(4);
        match self {
            Value::Labels(labels) => write!(f, "[{}]", labels.join(", ")),
            Value::Floats(values) => write_floats(f, values),
            Value::Scalar(v) => write!(f, "{:.*}", precision, v),
            Value::Level(level) => write!(f, "({:.*}, {})", precision, level.energy, level.index),
            Value::ExcitedStates(states) => {
                writeln!(f, "{:>6} {:>12} {:>12} {:>12} {:>10}", "State", "Label", "E (eV)", "lambda (nm)", "f")?;
                for i in 0..states.len() {
                    writeln!(
                        f,
                        "{:>6} {:>12} {:>12.*} {:>12.2} {:>10.4}",
                        i + 1,
                        states.labels.get(i).map(String::as_str).unwrap_or("-"),
                        precision,
                        states.energies[i],
                        states.wavelengths[i],
                        states.oscillator_strengths[i]
                    )?;
                }
                Ok(())
            }
        }
    }
}

/// Structured data extracted from one Gaussian log document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogRecord {
    /// Atom labels from the last Mulliken section
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<String>>,
    /// Mulliken charges aligned with `elements`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charges: Option<Vec<f64>>,
    /// Declared total charge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge_sum: Option<f64>,
    /// Orbital energies in eV
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energies: Option<Vec<f64>>,
    /// Lowest unoccupied orbital
    #[serde(rename = "LUMO", skip_serializing_if = "Option::is_none")]
    pub lumo: Option<OrbitalLevel>,
    /// Highest occupied orbital
    #[serde(rename = "HOMO", skip_serializing_if = "Option::is_none")]
    pub homo: Option<OrbitalLevel>,
    /// Excited-state table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excited_states: Option<ExcitedStates>,
}

impl LogRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a fragment by key. Keys carried by the fragment replace existing
    /// values; keys it does not carry are left untouched.
    pub fn merge(&mut self, fragment: Fragment) {
        match fragment {
            Fragment::Mulliken(m) => {
                match (m.charge_sum, self.charge_sum) {
                    (Some(sum), _) => self.charge_sum = Some(sum),
                    (None, Some(stale)) => warn!(
                        "Mulliken block without a sum line; keeping earlier charge_sum {} next to the new charges",
                        stale
                    ),
                    (None, None) => {}
                }
                self.elements = Some(m.elements);
                self.charges = Some(m.charges);
            }
            Fragment::Orbitals(o) => {
                self.energies = Some(o.energies);
                self.homo = Some(o.homo);
                self.lumo = Some(o.lumo);
            }
            Fragment::ExcitedStates(states) => {
                self.excited_states = Some(states);
            }
        }
    }

    /// Quantities present in this record.
    pub fn keys(&self) -> Vec<Quantity> {
        Quantity::ALL
            .into_iter()
            .filter(|q| self.get(*q).is_some())
            .collect()
    }

    /// True if no section was found.
    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    /// Looks up one quantity.
    pub fn get(&self, quantity: Quantity) -> Option<Value<'_>> {
        match quantity {
            Quantity::Elements => self.elements.as_deref().map(Value::Labels),
            Quantity::Charges => self.charges.as_deref().map(Value::Floats),
            Quantity::ChargeSum => self.charge_sum.map(Value::Scalar),
            Quantity::Energies => self.energies.as_deref().map(Value::Floats),
            Quantity::Lumo => self.lumo.map(Value::Level),
            Quantity::Homo => self.homo.map(Value::Level),
            Quantity::ExcitedStates => self.excited_states.as_ref().map(Value::ExcitedStates),
        }
    }

    /// HOMO-LUMO gap in eV.
    pub fn homo_lumo_gap(&self) -> Option<f64> {
        Some(self.lumo?.energy - self.homo?.energy)
    }

    /// Charges labelled `"<element>_<atom number>"`, in atom order, atoms numbered from 1.
    pub fn charges_table(&self) -> Option<Vec<(String, f64)>> {
        let elements = self.elements.as_ref()?;
        let charges = self.charges.as_ref()?;
        Some(
            elements
                .iter()
                .zip(charges)
                .enumerate()
                .map(|(i, (elem, charge))| (format!("{}_{}", elem, i + 1), *charge))
                .collect(),
        )
    }

    /// Charges grouped by element, each series in atom order.
    pub fn charges_by_element(&self) -> Option<BTreeMap<String, Vec<f64>>> {
        let elements = self.elements.as_ref()?;
        let charges = self.charges.as_ref()?;
        let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for (elem, charge) in elements.iter().zip(charges) {
            grouped.entry(elem.clone()).or_default().push(*charge);
        }
        Some(grouped)
    }

    /// Serializes the present quantities as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
