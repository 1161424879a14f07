//! Sub-biome and biome definitions, vertical layering, and the catalog
//! that turns definition data into id-indexed runtime values.

mod catalog;
mod def;
mod runtime;

pub use catalog::{Biome, BiomeId, SubBiomeCatalog};
pub use def::{
    BiomeDef, CoverDef, DecorationRef, LayerDef, LayerKindDef, OffsetDef, SubBiomeDef, WeightedRef,
};
pub use runtime::{Dampening, SubBiome, SubBiomeId};
