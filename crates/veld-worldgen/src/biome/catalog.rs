//! Catalog construction: turns definition data into id-indexed runtime
//! sub-biomes and biomes.
//!
//! Definitions are sorted by stable name before ids are assigned, so
//! construction order (and any collision) is deterministic regardless of
//! the order the resource system delivers them in.

use hashbrown::HashMap;

use crate::decoration::{Decoration, DecorationId};
use crate::noise_field::{NoiseField, NoiseFieldParams};
use crate::resources::DefinitionError;
use crate::seed::{SeedPair, derive_name_seed};
use crate::structure::{Structure, StructureId};
use veld_voxel::Content;

use super::def::{BiomeDef, LayerKindDef, SubBiomeDef};
use super::runtime::{Layer, SubBiome, SubBiomeId};

/// Index of a biome in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BiomeId(pub u16);

/// A named grouping of sub-biomes, resolved to ids.
pub struct Biome {
    /// The biome's catalog id.
    pub id: BiomeId,
    /// Stable name.
    pub name: String,
    /// Member sub-biomes with their relative weights.
    pub sub_biomes: Vec<(SubBiomeId, u32)>,
}

/// All registered sub-biomes and biomes with O(1) lookup by id.
pub struct SubBiomeCatalog {
    subs: Vec<SubBiome>,
    sub_names: HashMap<String, SubBiomeId>,
    biomes: Vec<Biome>,
    biome_names: HashMap<String, BiomeId>,
}

impl SubBiomeCatalog {
    /// Builds the catalog.
    ///
    /// `structures` and `decorations` must already be name-sorted (the
    /// resource contract); sub-biome references to them resolve to indices
    /// into those slices.
    ///
    /// # Errors
    ///
    /// Fails on duplicate names, unresolved references, or invalid
    /// layering (no layers, not exactly one dampenable layer, no stone
    /// layer, or a dampenable layer below the first stone layer).
    pub fn build(
        mut sub_defs: Vec<SubBiomeDef>,
        mut biome_defs: Vec<BiomeDef>,
        structures: &[std::sync::Arc<Structure>],
        decorations: &[std::sync::Arc<dyn Decoration>],
        seeds: &SeedPair,
    ) -> Result<Self, DefinitionError> {
        sub_defs.sort_by(|a, b| a.name.cmp(&b.name));
        biome_defs.sort_by(|a, b| a.name.cmp(&b.name));

        let mut sub_names = HashMap::new();
        for (i, def) in sub_defs.iter().enumerate() {
            if sub_names
                .insert(def.name.clone(), SubBiomeId(i as u16))
                .is_some()
            {
                return Err(DefinitionError::DuplicateName(def.name.clone()));
            }
        }

        let structure_names: HashMap<&str, StructureId> = structures
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.as_str(), StructureId(i as u16)))
            .collect();
        let decoration_names: HashMap<&str, DecorationId> = decorations
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name(), DecorationId(i as u16)))
            .collect();

        let mut subs = Vec::with_capacity(sub_defs.len());
        for (i, def) in sub_defs.iter().enumerate() {
            subs.push(Self::resolve_sub_biome(
                SubBiomeId(i as u16),
                def,
                &sub_names,
                &structure_names,
                &decoration_names,
                seeds,
            )?);
        }

        let mut biomes = Vec::with_capacity(biome_defs.len());
        let mut biome_names = HashMap::new();
        for (i, def) in biome_defs.iter().enumerate() {
            let id = BiomeId(i as u16);
            if biome_names.insert(def.name.clone(), id).is_some() {
                return Err(DefinitionError::DuplicateName(def.name.clone()));
            }
            let mut members = Vec::with_capacity(def.sub_biomes.len());
            for member in &def.sub_biomes {
                let sub = sub_names
                    .get(&member.name)
                    .copied()
                    .ok_or_else(|| DefinitionError::UnknownSubBiome(member.name.clone()))?;
                members.push((sub, member.weight));
            }
            biomes.push(Biome {
                id,
                name: def.name.clone(),
                sub_biomes: members,
            });
        }

        Ok(Self {
            subs,
            sub_names,
            biomes,
            biome_names,
        })
    }

    fn resolve_sub_biome(
        id: SubBiomeId,
        def: &SubBiomeDef,
        sub_names: &HashMap<String, SubBiomeId>,
        structure_names: &HashMap<&str, StructureId>,
        decoration_names: &HashMap<&str, DecorationId>,
        seeds: &SeedPair,
    ) -> Result<SubBiome, DefinitionError> {
        let invalid = |reason: &str| DefinitionError::InvalidLayering {
            sub_biome: def.name.clone(),
            reason: reason.to_string(),
        };

        if def.layers.is_empty() {
            return Err(invalid("no layers"));
        }
        let dampenable: Vec<usize> = def
            .layers
            .iter()
            .enumerate()
            .filter(|(_, l)| l.dampenable)
            .map(|(i, _)| i)
            .collect();
        let [dampen_index] = dampenable[..] else {
            return Err(invalid("exactly one layer must be dampenable"));
        };
        let first_solid = def
            .layers
            .iter()
            .position(|l| matches!(l.kind, LayerKindDef::Stone))
            .ok_or_else(|| invalid("no stone layer"))?;
        if dampen_index >= first_solid {
            return Err(invalid("dampenable layer must lie above the first stone layer"));
        }

        let oceanic = def
            .oceanic
            .as_deref()
            .map(|name| {
                sub_names
                    .get(name)
                    .copied()
                    .ok_or_else(|| DefinitionError::UnknownSubBiome(name.to_string()))
            })
            .transpose()?;
        let structure = def
            .structure
            .as_deref()
            .map(|name| {
                structure_names
                    .get(name)
                    .copied()
                    .ok_or_else(|| DefinitionError::UnknownStructure(name.to_string()))
            })
            .transpose()?;
        let mut decorations = Vec::with_capacity(def.decorations.len());
        for dec in &def.decorations {
            let dec_id = decoration_names
                .get(dec.name.as_str())
                .copied()
                .ok_or_else(|| DefinitionError::UnknownDecoration(dec.name.clone()))?;
            decorations.push((dec_id, dec.rarity));
        }

        Ok(SubBiome {
            id,
            name: def.name.clone(),
            blends: def.blends,
            offset_field: NoiseField::new(NoiseFieldParams {
                seed: derive_name_seed(seeds.detail, &def.name),
                octaves: def.offset.octaves,
                lacunarity: 2.0,
                persistence: 0.5,
                base_frequency: def.offset.base_frequency,
                amplitude: def.offset.amplitude,
            }),
            layers: def
                .layers
                .iter()
                .map(|l| Layer {
                    width: l.width,
                    kind: l.kind.clone(),
                })
                .collect(),
            dampen_index,
            cover_dry: def.cover.dry,
            cover_wet: def.cover.wet,
            cover_frosted: def.cover.frosted,
            stuffer: def.stuffer.map(Content::block),
            oceanic,
            structure,
            decorations,
        })
    }

    /// Returns the sub-biome for an id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range; ids are only produced by this
    /// catalog, so that is a programming error.
    pub fn get(&self, id: SubBiomeId) -> &SubBiome {
        &self.subs[id.0 as usize]
    }

    /// Looks up a sub-biome id by name.
    pub fn lookup(&self, name: &str) -> Option<SubBiomeId> {
        self.sub_names.get(name).copied()
    }

    /// Returns the biome for an id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn biome(&self, id: BiomeId) -> &Biome {
        &self.biomes[id.0 as usize]
    }

    /// Looks up a biome id by name.
    pub fn lookup_biome(&self, name: &str) -> Option<BiomeId> {
        self.biome_names.get(name).copied()
    }

    /// Iterates over all sub-biomes in id order.
    pub fn iter(&self) -> impl Iterator<Item = &SubBiome> {
        self.subs.iter()
    }

    /// Iterates over all biomes in id order.
    pub fn iter_biomes(&self) -> impl Iterator<Item = &Biome> {
        self.biomes.iter()
    }

    /// Number of registered sub-biomes.
    pub fn len(&self) -> usize {
        self.subs.len()
    }

    /// Returns `true` if no sub-biomes are registered.
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }
}
