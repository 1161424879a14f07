//! Resource bundle handed to the generator and the errors definition
//! resolution can produce.

use std::sync::Arc;

use crate::biome::{BiomeDef, SubBiomeDef};
use crate::decoration::Decoration;
use crate::map::DistributionDef;
use crate::palette::Palette;
use crate::structure::Structure;
use veld_voxel::BlockCatalog;

/// Errors raised while resolving definition data into runtime values.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    /// A palette entry named a stone type that does not exist.
    #[error("unknown stone type '{0}'")]
    UnknownStoneType(String),

    /// A definition referenced a sub-biome that was never registered.
    #[error("unknown sub-biome '{0}'")]
    UnknownSubBiome(String),

    /// The distribution referenced a biome that was never registered.
    #[error("unknown biome '{0}'")]
    UnknownBiome(String),

    /// A sub-biome referenced a structure that was never registered.
    #[error("unknown structure '{0}'")]
    UnknownStructure(String),

    /// A sub-biome referenced a decoration that was never registered.
    #[error("unknown decoration '{0}'")]
    UnknownDecoration(String),

    /// Two definitions of the same kind share a name.
    #[error("duplicate definition name '{0}'")]
    DuplicateName(String),

    /// A sub-biome's vertical layering violates the layering rules.
    #[error("invalid layering for sub-biome '{sub_biome}': {reason}")]
    InvalidLayering { sub_biome: String, reason: String },

    /// The biome distribution carries no positive weight.
    #[error("biome distribution has no positive weight")]
    EmptyDistribution,
}

/// Everything the generator needs from the resource system.
///
/// The palette and distribution are optional so that a world can be
/// opened before its resource pack finished loading; generator creation
/// reports their absence instead of failing hard.
pub struct GeneratorResources {
    /// Block registry shared with the rest of the engine.
    pub blocks: Arc<BlockCatalog>,
    /// Stone/loose/saturated content per stone type plus core and water.
    pub palette: Option<Palette>,
    /// Weighted biome distribution over the territory.
    pub distribution: Option<DistributionDef>,
    /// Biome definitions.
    pub biomes: Vec<BiomeDef>,
    /// Sub-biome definitions.
    pub sub_biomes: Vec<SubBiomeDef>,
    /// Structure prototypes; sorted by name before id assignment.
    pub structures: Vec<Arc<Structure>>,
    /// Decoration implementations; sorted by name before id assignment.
    pub decorations: Vec<Arc<dyn Decoration>>,
}
