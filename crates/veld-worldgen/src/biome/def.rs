//! Plain definition data for sub-biomes and biomes, as supplied by the
//! resource system.

use serde::{Deserialize, Serialize};
use veld_voxel::BlockId;

/// One layer of a sub-biome's vertical layering, shallow to deep.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LayerDef {
    /// Layer thickness in blocks.
    pub width: u32,
    /// What the layer is made of.
    pub kind: LayerKindDef,
    /// Whether dampening may compress or expand this layer. Exactly one
    /// layer per sub-biome is dampenable.
    #[serde(default)]
    pub dampenable: bool,
}

/// The material of one layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum LayerKindDef {
    /// The topmost ground block (grass-covered soil, beach sand, ...),
    /// with a variant for submerged columns.
    Top {
        /// Block used on dry land.
        dry: BlockId,
        /// Block used under water.
        wet: BlockId,
    },
    /// Loose material taken from the stone palette; saturated below the
    /// water table.
    Loose,
    /// A fixed block with a groundwater-saturated variant (clay, mud).
    Permeable {
        /// Block above the water table.
        dry: BlockId,
        /// Block at or below the water table.
        wet: BlockId,
    },
    /// Plain stone from the palette. The first stone layer is the
    /// "solid" boundary dampening aligns across neighbors.
    Stone,
}

/// Above-ground cover dressing placed one layer above the surface.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CoverDef {
    /// Cover on dry land (tall grass, shrubs). Air for barren biomes.
    pub dry: BlockId,
    /// Cover under water (kelp, sea grass). Air for barren floors.
    pub wet: BlockId,
    /// Replacement cover above the frost line (highest fifth of the
    /// world), typically snow.
    #[serde(default)]
    pub frosted: Option<BlockId>,
}

/// Noise parameters for a sub-biome's local height offset.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OffsetDef {
    /// Maximum offset magnitude in blocks.
    pub amplitude: f64,
    /// Base noise frequency.
    pub base_frequency: f64,
    /// Octave count.
    pub octaves: u32,
}

/// Association of a decoration (by name) with its rarity in one sub-biome.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DecorationRef {
    /// Decoration name, resolved against the decoration list at catalog
    /// construction.
    pub name: String,
    /// Placement probability per candidate voxel, in `[0, 1]`.
    pub rarity: f32,
}

/// Full definition of one sub-biome.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubBiomeDef {
    /// Stable identifier, unique across all sub-biomes.
    pub name: String,
    /// Above-ground cover dressing.
    pub cover: CoverDef,
    /// Vertical layering, shallow to deep.
    pub layers: Vec<LayerDef>,
    /// Local height offset noise.
    pub offset: OffsetDef,
    /// Whether this sub-biome participates in boundary blending. Terrain
    /// that must keep sharp silhouettes (cliffs, dunes) opts out.
    #[serde(default = "default_true")]
    pub blends: bool,
    /// Filler block resting in near-surface concave pockets, if any.
    #[serde(default)]
    pub stuffer: Option<BlockId>,
    /// Name of the oceanic variant used when the surface lies below sea
    /// level, if any.
    #[serde(default)]
    pub oceanic: Option<String>,
    /// Name of the structure that may generate here, if any.
    #[serde(default)]
    pub structure: Option<String>,
    /// Decorations that may appear in this sub-biome.
    #[serde(default)]
    pub decorations: Vec<DecorationRef>,
}

fn default_true() -> bool {
    true
}

/// A sub-biome reference with a distribution weight inside its biome.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeightedRef {
    /// Sub-biome name.
    pub name: String,
    /// Relative weight within the biome.
    pub weight: u32,
}

/// A named grouping of sub-biomes.
///
/// Biomes hold no generation logic of their own; their weighting is
/// consumed only by the map's territory partition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BiomeDef {
    /// Stable identifier, unique across all biomes.
    pub name: String,
    /// Member sub-biomes with their relative weights.
    pub sub_biomes: Vec<WeightedRef>,
}
