//! Name-based lookup of searchable world elements.

use rustc_hash::FxHashMap;

use crate::biome::{BiomeId, SubBiomeCatalog, SubBiomeId};
use crate::structure::{Structure, StructureId};

/// A world element that can be searched for by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamedElement {
    /// A structure prototype.
    Structure(StructureId),
    /// A sub-biome.
    SubBiome(SubBiomeId),
    /// A biome.
    Biome(BiomeId),
}

/// Maps stable names to searchable elements.
///
/// Built once at generator construction; structures shadow sub-biomes and
/// sub-biomes shadow biomes when names collide, so the most specific
/// element wins.
pub struct Searcher {
    index: FxHashMap<String, NamedElement>,
}

impl Searcher {
    /// Indexes every biome, sub-biome, and structure by name.
    pub fn build(catalog: &SubBiomeCatalog, structures: &[std::sync::Arc<Structure>]) -> Self {
        let mut index = FxHashMap::default();
        for biome in catalog.iter_biomes() {
            index.insert(biome.name.clone(), NamedElement::Biome(biome.id));
        }
        for sub in catalog.iter() {
            index.insert(sub.name().to_string(), NamedElement::SubBiome(sub.id()));
        }
        for (i, structure) in structures.iter().enumerate() {
            index.insert(
                structure.name.clone(),
                NamedElement::Structure(StructureId(i as u16)),
            );
        }
        Self { index }
    }

    /// Resolves a name to its element, if registered.
    pub fn resolve(&self, name: &str) -> Option<NamedElement> {
        self.index.get(name).copied()
    }

    /// Number of indexed names.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
