//! The map: biome territory partition, height field, and stone field.
//!
//! Territory is a grid of square cells whose corners each select one
//! sub-biome from the weighted distribution. A column's fractional position
//! inside its cell, perturbed by two decorrelated warp noise fields so
//! boundaries do not run on straight lines, yields the blend weights over
//! the four corner sub-biomes.

use std::sync::Arc;

use glam::{DVec3, IVec2, IVec3};
use serde::{Deserialize, Serialize};

use crate::biome::{SubBiomeCatalog, SubBiomeId};
use crate::noise_field::{NoiseField, NoiseFieldParams};
use crate::palette::StoneType;
use crate::resources::DefinitionError;
use crate::sample::{Sample, nearest_corner};
use crate::seed::{SeedPair, derive_name_seed, derive_seed};
use crate::settings::GenerationSettings;

/// One biome's share of the territory distribution.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DistributionEntry {
    /// Biome name, resolved against the catalog.
    pub biome: String,
    /// Relative weight of this biome.
    pub weight: u32,
}

/// The biome distribution definition supplied by the resource system.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DistributionDef {
    /// Participating biomes and their weights.
    pub entries: Vec<DistributionEntry>,
}

/// Flattened weighted sub-biome table used to pick cell corners.
///
/// Each sub-biome's effective weight is its biome's distribution weight
/// times its weight inside the biome.
pub struct WeightedSubBiomes {
    entries: Vec<(SubBiomeId, u64)>,
    total: u64,
}

impl WeightedSubBiomes {
    /// Flattens a distribution definition against the catalog.
    ///
    /// # Errors
    ///
    /// Fails on unknown biome names or an all-zero total weight.
    pub fn build(
        distribution: &DistributionDef,
        catalog: &SubBiomeCatalog,
    ) -> Result<Self, DefinitionError> {
        let mut entries = Vec::new();
        let mut total = 0u64;
        for entry in &distribution.entries {
            let biome_id = catalog
                .lookup_biome(&entry.biome)
                .ok_or_else(|| DefinitionError::UnknownBiome(entry.biome.clone()))?;
            for &(sub, weight) in &catalog.biome(biome_id).sub_biomes {
                let effective = u64::from(entry.weight) * u64::from(weight);
                if effective > 0 {
                    entries.push((sub, effective));
                    total += effective;
                }
            }
        }
        if total == 0 {
            return Err(DefinitionError::EmptyDistribution);
        }
        Ok(Self { entries, total })
    }

    /// Picks a sub-biome from a uniformly distributed roll.
    pub fn pick(&self, roll: u64) -> SubBiomeId {
        let mut remaining = roll % self.total;
        for &(sub, weight) in &self.entries {
            if remaining < weight {
                return sub;
            }
            remaining -= weight;
        }
        // Unreachable: weights sum to `total` and the roll is reduced mod
        // `total`.
        self.entries[self.entries.len() - 1].0
    }

    /// Total weight of the table.
    pub fn total_weight(&self) -> u64 {
        self.total
    }
}

/// Fraction of a cell by which warp noise may shift blend weights.
const WARP_STRENGTH: f64 = 0.2;

/// Deterministically maps 2D columns to samples and 3D positions to stone
/// types.
///
/// All noise generators are constructed once from the map seed; every
/// query is pure, so identical input yields an identical result for the
/// lifetime of a world.
pub struct Map {
    height_field: NoiseField,
    stone_field: NoiseField,
    warp_x: NoiseField,
    warp_z: NoiseField,
    corner_seed: u64,
    table: WeightedSubBiomes,
    catalog: Arc<SubBiomeCatalog>,
    cell_size: i32,
}

impl Map {
    /// Creates a map for one world.
    pub fn new(
        seeds: &SeedPair,
        settings: &GenerationSettings,
        table: WeightedSubBiomes,
        catalog: Arc<SubBiomeCatalog>,
    ) -> Self {
        Self {
            height_field: NoiseField::new(NoiseFieldParams {
                seed: derive_name_seed(seeds.map, "height"),
                octaves: 6,
                lacunarity: 2.0,
                persistence: 0.5,
                base_frequency: 0.0008,
                amplitude: 1.0,
            }),
            stone_field: NoiseField::new(NoiseFieldParams {
                seed: derive_name_seed(seeds.map, "stone"),
                octaves: 2,
                lacunarity: 2.0,
                persistence: 0.5,
                base_frequency: 0.004,
                amplitude: 1.0,
            }),
            warp_x: NoiseField::new(NoiseFieldParams::simple(
                derive_name_seed(seeds.map, "warp_x"),
                0.013,
                1.0,
            )),
            warp_z: NoiseField::new(NoiseFieldParams::simple(
                derive_name_seed(seeds.map, "warp_z"),
                0.013,
                1.0,
            )),
            corner_seed: derive_name_seed(seeds.map, "corners"),
            table,
            catalog,
            cell_size: settings.cell_size as i32,
        }
    }

    /// Produces the sample for a column.
    pub fn sample(&self, column: IVec2) -> Sample {
        let cell = IVec2::new(
            column.x.div_euclid(self.cell_size),
            column.y.div_euclid(self.cell_size),
        );
        let frac = glam::DVec2::new(
            f64::from(column.x.rem_euclid(self.cell_size)) / f64::from(self.cell_size),
            f64::from(column.y.rem_euclid(self.cell_size)) / f64::from(self.cell_size),
        );

        let x = f64::from(column.x);
        let z = f64::from(column.y);
        let weights = glam::DVec2::new(
            (frac.x + self.warp_x.sample2(x, z) * WARP_STRENGTH).clamp(0.0, 1.0),
            (frac.y + self.warp_z.sample2(x, z) * WARP_STRENGTH).clamp(0.0, 1.0),
        );

        let brackets = [
            self.corner_sub_biome(cell),
            self.corner_sub_biome(cell + IVec2::new(1, 0)),
            self.corner_sub_biome(cell + IVec2::new(0, 1)),
            self.corner_sub_biome(cell + IVec2::new(1, 1)),
        ];
        let actual = brackets[nearest_corner(weights)];

        let oceanic_corners = brackets.map(|id| self.catalog.get(id).oceanic());
        let oceanic = if oceanic_corners.iter().all(Option::is_some) {
            Some(oceanic_corners.map(|o| o.unwrap_or(actual)))
        } else {
            None
        };

        Sample {
            height: self.height_field.normalized2(x, z),
            brackets,
            oceanic,
            weights,
            actual,
        }
    }

    /// Derives the stone type at a 3D position from low-frequency noise,
    /// independent of sub-biome.
    pub fn stone_type(&self, position: IVec3) -> StoneType {
        let n = self.stone_field.normalized3(DVec3::new(
            f64::from(position.x),
            f64::from(position.y),
            f64::from(position.z),
        ));
        if n < 0.25 {
            StoneType::Sandstone
        } else if n < 0.5 {
            StoneType::Limestone
        } else if n < 0.75 {
            StoneType::Granite
        } else {
            StoneType::Marble
        }
    }

    /// The catalog this map resolves sub-biomes against.
    pub fn catalog(&self) -> &Arc<SubBiomeCatalog> {
        &self.catalog
    }

    /// Side length of one territory cell, in columns.
    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    fn corner_sub_biome(&self, cell: IVec2) -> SubBiomeId {
        let roll = derive_seed(self.corner_seed, &[i64::from(cell.x), i64::from(cell.y)]);
        self.table.pick(roll)
    }
}
