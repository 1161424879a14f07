//! Deterministic voxel terrain synthesis.
//!
//! For any column or 3D region, derives stone type, surface cover, fluid
//! fill, decorative features, and multi-block structures purely from a seed
//! pair and a fixed set of biome/structure definitions. The pipeline:
//! a [`Map`] partitions territory into sub-biomes and produces per-column
//! [`Sample`]s, a bounded [`SampleStoreCache`] memoizes them per chunk, and
//! the [`Generator`] resolves per-voxel [`Content`](veld_voxel::Content),
//! drives decoration and structure placement, and answers spatial searches.

mod decoration;
mod generator;
mod map;
mod noise_field;
mod palette;
mod resources;
mod sample;
mod search;
mod seed;
mod settings;
mod store;
mod structure;
mod view;

pub mod biome;

pub use biome::{
    Biome, BiomeDef, BiomeId, CoverDef, Dampening, DecorationRef, LayerDef, LayerKindDef,
    OffsetDef, SubBiome, SubBiomeCatalog, SubBiomeDef, SubBiomeId, WeightedRef,
};
pub use decoration::{
    Boulder, Decoration, DecorationId, PlacementInput, SectionNoiseGrid, Tuft,
};
pub use generator::{DecorationContext, GenerationContext, Generator, GroundInfo};
pub use map::{DistributionDef, DistributionEntry, Map, WeightedSubBiomes};
pub use noise_field::{NoiseField, NoiseFieldParams};
pub use palette::{Palette, PaletteEntry, StoneType};
pub use resources::{DefinitionError, GeneratorResources};
pub use sample::{Sample, bilinear, nearest_corner};
pub use search::{NamedElement, Searcher};
pub use seed::{SeedPair, derive_name_seed, derive_seed, section_rng};
pub use settings::{GenerationSettings, SettingsError};
pub use store::{ColumnSampleStore, SampleStoreCache};
pub use structure::{Structure, StructureId};
pub use view::{MapImage, ViewError};
