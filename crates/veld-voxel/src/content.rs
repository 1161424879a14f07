//! Per-voxel content: a block reference plus an optional fluid fill.

use serde::{Deserialize, Serialize};

/// Compact identifier for a block kind (2 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId(pub u16);

impl BlockId {
    /// Air is always ID 0 so that zeroed storage represents empty space.
    pub const AIR: Self = Self(0);
}

/// Compact identifier for a fluid kind (2 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FluidId(pub u16);

impl FluidId {
    /// The empty fluid, ID 0.
    pub const NONE: Self = Self(0);
}

/// Fill level of a fluid inside one voxel, from `1` (lowest) to `8` (full).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FluidLevel(u8);

impl FluidLevel {
    /// A completely filled voxel.
    pub const FULL: Self = Self(8);

    /// Creates a fluid level, clamping to the valid `1..=8` range.
    pub fn new(level: u8) -> Self {
        Self(level.clamp(1, 8))
    }

    /// Raw level value in `1..=8`.
    pub fn get(self) -> u8 {
        self.0
    }
}

/// A fluid occupying (part of) a voxel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FluidFill {
    /// Which fluid.
    pub fluid: FluidId,
    /// How much of the voxel it fills.
    pub level: FluidLevel,
}

impl FluidFill {
    /// A voxel completely filled with the given fluid.
    pub fn full(fluid: FluidId) -> Self {
        Self {
            fluid,
            level: FluidLevel::FULL,
        }
    }
}

/// The value generated for one voxel: a block and an optional fluid fill.
///
/// `Content` has no identity beyond value equality; generators produce it
/// fresh on every query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Content {
    /// The block occupying the voxel.
    pub block: BlockId,
    /// Fluid sharing the voxel, if any.
    pub fluid: Option<FluidFill>,
}

impl Content {
    /// Air with no fluid.
    pub const EMPTY: Self = Self {
        block: BlockId::AIR,
        fluid: None,
    };

    /// A plain block with no fluid.
    pub fn block(block: BlockId) -> Self {
        Self { block, fluid: None }
    }

    /// A block submerged in a full fluid voxel.
    pub fn submerged(block: BlockId, fluid: FluidId) -> Self {
        Self {
            block,
            fluid: Some(FluidFill::full(fluid)),
        }
    }

    /// Returns `true` if the block is air (a fluid may still be present).
    pub fn is_empty(&self) -> bool {
        self.block == BlockId::AIR
    }

    /// Returns this content with the given fluid filled in.
    pub fn with_fluid(self, fill: FluidFill) -> Self {
        Self {
            fluid: Some(fill),
            ..self
        }
    }
}

impl Default for Content {
    fn default() -> Self {
        Self::EMPTY
    }
}
