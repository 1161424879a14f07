//! Block and fluid catalogs: map compact ids to definitions.
//!
//! Catalogs are built once at startup by the resource system. Air is always
//! block ID 0 and the empty fluid is always fluid ID 0.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::{BlockId, FluidId};

/// Errors that can occur during catalog construction.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An entry with the same name has already been registered.
    #[error("duplicate catalog name: {0}")]
    DuplicateName(String),
    /// All 65 536 id slots have been consumed.
    #[error("catalog is full (max 65536 entries)")]
    Full,
}

/// Full descriptor for a block kind.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockDef {
    /// Human-readable name (e.g. "stone", "grass", "sand").
    pub name: String,
    /// Whether entities collide with this block.
    pub solid: bool,
    /// Whether a fluid may occupy the same voxel (air, plants, ...).
    pub fillable: bool,
}

/// Full descriptor for a fluid kind.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FluidDef {
    /// Human-readable name (e.g. "water", "lava").
    pub name: String,
}

/// Maps [`BlockId`] to [`BlockDef`] with O(1) lookup by index and by name.
pub struct BlockCatalog {
    /// Dense array where `index == BlockId.0`.
    blocks: Vec<BlockDef>,
    name_to_id: HashMap<String, BlockId>,
}

impl BlockCatalog {
    /// Creates a catalog with air pre-registered as ID 0.
    pub fn new() -> Self {
        let air = BlockDef {
            name: "air".to_string(),
            solid: false,
            fillable: true,
        };
        let mut name_to_id = HashMap::new();
        name_to_id.insert("air".to_string(), BlockId::AIR);
        Self {
            blocks: vec![air],
            name_to_id,
        }
    }

    /// Registers a block definition and returns its assigned ID.
    ///
    /// IDs are assigned sequentially starting from 1 (0 is air).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateName`] for a repeated name and
    /// [`CatalogError::Full`] once all id slots are consumed.
    pub fn register(&mut self, def: BlockDef) -> Result<BlockId, CatalogError> {
        if self.name_to_id.contains_key(&def.name) {
            return Err(CatalogError::DuplicateName(def.name));
        }
        if self.blocks.len() > u16::MAX as usize {
            return Err(CatalogError::Full);
        }
        let id = BlockId(self.blocks.len() as u16);
        self.name_to_id.insert(def.name.clone(), id);
        self.blocks.push(def);
        Ok(id)
    }

    /// Returns the definition for a given ID.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range. Ids are only produced by the
    /// catalog itself, so an unknown id is a programming error.
    pub fn get(&self, id: BlockId) -> &BlockDef {
        &self.blocks[id.0 as usize]
    }

    /// Looks up a block ID by name.
    pub fn lookup(&self, name: &str) -> Option<BlockId> {
        self.name_to_id.get(name).copied()
    }

    /// Number of registered blocks, including air.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if only air is registered.
    pub fn is_empty(&self) -> bool {
        self.blocks.len() <= 1
    }
}

impl Default for BlockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps [`FluidId`] to [`FluidDef`]; the empty fluid occupies ID 0.
pub struct FluidCatalog {
    fluids: Vec<FluidDef>,
    name_to_id: HashMap<String, FluidId>,
}

impl FluidCatalog {
    /// Creates a catalog with the empty fluid pre-registered as ID 0.
    pub fn new() -> Self {
        let none = FluidDef {
            name: "none".to_string(),
        };
        let mut name_to_id = HashMap::new();
        name_to_id.insert("none".to_string(), FluidId::NONE);
        Self {
            fluids: vec![none],
            name_to_id,
        }
    }

    /// Registers a fluid definition and returns its assigned ID.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`BlockCatalog::register`].
    pub fn register(&mut self, def: FluidDef) -> Result<FluidId, CatalogError> {
        if self.name_to_id.contains_key(&def.name) {
            return Err(CatalogError::DuplicateName(def.name));
        }
        if self.fluids.len() > u16::MAX as usize {
            return Err(CatalogError::Full);
        }
        let id = FluidId(self.fluids.len() as u16);
        self.name_to_id.insert(def.name.clone(), id);
        self.fluids.push(def);
        Ok(id)
    }

    /// Returns the definition for a given ID.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn get(&self, id: FluidId) -> &FluidDef {
        &self.fluids[id.0 as usize]
    }

    /// Looks up a fluid ID by name.
    pub fn lookup(&self, name: &str) -> Option<FluidId> {
        self.name_to_id.get(name).copied()
    }
}

impl Default for FluidCatalog {
    fn default() -> Self {
        Self::new()
    }
}
