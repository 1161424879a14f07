//! World positions: chunk footprint keys and section coordinates.

use glam::{IVec2, IVec3};
use serde::{Deserialize, Serialize};

/// Side length of a section in voxels.
pub const SECTION_SIZE: usize = 16;

/// Number of columns in one chunk footprint (16 × 16).
pub const CHUNK_FOOTPRINT: usize = SECTION_SIZE * SECTION_SIZE;

/// Identifies one chunk's 16×16 column footprint in the world.
///
/// A chunk is the full vertical stack of sections above one footprint, so a
/// 2D key suffices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkPos {
    /// Chunk-grid X coordinate.
    pub x: i32,
    /// Chunk-grid Z coordinate.
    pub z: i32,
}

impl ChunkPos {
    /// Creates a new chunk position.
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Returns the chunk containing the given world column.
    pub fn of_column(column: IVec2) -> Self {
        Self {
            x: column.x.div_euclid(SECTION_SIZE as i32),
            z: column.y.div_euclid(SECTION_SIZE as i32),
        }
    }

    /// World column at this chunk's minimum corner.
    pub fn origin_column(self) -> IVec2 {
        IVec2::new(
            self.x * SECTION_SIZE as i32,
            self.z * SECTION_SIZE as i32,
        )
    }

    /// Returns the chunk offset by `(dx, dz)` on the chunk grid.
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }
}

/// Identifies one 16³ section on the section grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionPos {
    /// Section-grid X coordinate.
    pub x: i32,
    /// Section-grid Y coordinate.
    pub y: i32,
    /// Section-grid Z coordinate.
    pub z: i32,
}

impl SectionPos {
    /// Creates a new section position.
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// World position of this section's minimum corner.
    pub fn origin(self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z) * SECTION_SIZE as i32
    }

    /// The chunk footprint this section belongs to.
    pub fn chunk(self) -> ChunkPos {
        ChunkPos::new(self.x, self.z)
    }

    /// The four world columns at the corners of this section's footprint.
    pub fn corner_columns(self) -> [IVec2; 4] {
        let origin = self.origin();
        let max = SECTION_SIZE as i32 - 1;
        [
            IVec2::new(origin.x, origin.z),
            IVec2::new(origin.x + max, origin.z),
            IVec2::new(origin.x, origin.z + max),
            IVec2::new(origin.x + max, origin.z + max),
        ]
    }
}
