//! Per-column samples and bilinear blending over the bracketing cell.

use glam::DVec2;

use crate::biome::SubBiomeId;

/// Immutable per-column snapshot produced by the map.
///
/// Holds the normalized base height, the four sub-biomes bracketing the
/// column (corner order `[c00, c10, c01, c11]` for (x, z)), the fractional
/// blend position inside that cell, and the nearest ("actual") sub-biome.
/// Cheap to copy; owned by the requesting sample store.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Base height normalized to `[0, 1]` against the maximum world height.
    pub height: f64,
    /// The four bracketing sub-biomes.
    pub brackets: [SubBiomeId; 4],
    /// Oceanic variants of the brackets, present when every bracket
    /// defines one.
    pub oceanic: Option<[SubBiomeId; 4]>,
    /// Fractional position within the bracketing cell, each in `[0, 1]`.
    pub weights: DVec2,
    /// The nearest bracketing sub-biome.
    pub actual: SubBiomeId,
}

impl Sample {
    /// Index of the actual sub-biome's corner within the bracket array.
    pub fn actual_corner(&self) -> usize {
        nearest_corner(self.weights)
    }
}

/// Index of the corner nearest to the given blend weights, in bracket
/// order `[c00, c10, c01, c11]`.
pub fn nearest_corner(weights: DVec2) -> usize {
    let ix = usize::from(weights.x >= 0.5);
    let iz = usize::from(weights.y >= 0.5);
    ix + 2 * iz
}

/// Bilinear interpolation of four corner values in bracket order.
///
/// At a cell corner (weights 0 or 1 on both axes) this reduces exactly to
/// that corner's value.
pub fn bilinear(values: [f64; 4], weights: DVec2) -> f64 {
    let low = values[0] * (1.0 - weights.x) + values[1] * weights.x;
    let high = values[2] * (1.0 - weights.x) + values[3] * weights.x;
    low * (1.0 - weights.y) + high * weights.y
}
