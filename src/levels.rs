//! Energy-level diagram layout.
//!
//! Orbital energies are binned by degeneracy (energies equal after rounding)
//! and each bin is laid out as side-by-side horizontal segments over a fixed
//! x extent. Only coordinates are produced; drawing is left to the caller.

/// One degeneracy bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegenerateLevel {
    /// Rounded energy (eV)
    pub energy: f64,
    /// Number of orbitals at this energy
    pub multiplicity: usize,
}

/// Horizontal line segment at a given energy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Energy (eV), the y coordinate
    pub energy: f64,
    /// Left end
    pub x_start: f64,
    /// Right end
    pub x_end: f64,
}

/// Groups energies that coincide after rounding to `decimals` places.
///
/// Rounding is half-to-even. Bins come back in ascending energy order.
pub fn degenerate_levels(energies: &[f64], decimals: u32) -> Vec<DegenerateLevel> {
    let scale = 10f64.powi(decimals as i32);
    let mut keys: Vec<i64> = energies
        .iter()
        .filter(|e| e.is_finite())
        .map(|e| (e * scale).round_ties_even() as i64)
        .collect();
    keys.sort_unstable();

    let mut levels: Vec<DegenerateLevel> = Vec::new();
    let mut last_key = None;
    for key in keys {
        if last_key == Some(key) {
            if let Some(level) = levels.last_mut() {
                level.multiplicity += 1;
            }
        } else {
            levels.push(DegenerateLevel {
                energy: key as f64 / scale,
                multiplicity: 1,
            });
        }
        last_key = Some(key);
    }
    levels
}

/// Splits `[x_min, x_max]` into `n` equal segments separated by `gap`.
///
/// Returns `(start, end)` pairs from left to right. `n == 0` gives no segments.
pub fn split_extent(x_min: f64, x_max: f64, n: usize, gap: f64) -> Vec<(f64, f64)> {
    if n == 0 {
        return Vec::new();
    }
    let width = (x_max - x_min).abs();
    let length = (width - (n - 1) as f64 * gap) / n as f64;
    (0..n)
        .map(|i| {
            let i = i as f64;
            (
                x_min + (length + gap) * i,
                x_min + length * (i + 1.0) + i * gap,
            )
        })
        .collect()
}

/// Lays out one segment per orbital, degenerate orbitals side by side.
pub fn level_segments(
    energies: &[f64],
    extent: (f64, f64),
    decimals: u32,
    gap: f64,
) -> Vec<Segment> {
    degenerate_levels(energies, decimals)
        .into_iter()
        .flat_map(|level| {
            split_extent(extent.0, extent.1, level.multiplicity, gap)
                .into_iter()
                .map(move |(x_start, x_end)| Segment {
                    energy: level.energy,
                    x_start,
                    x_end,
                })
        })
        .collect()
}
