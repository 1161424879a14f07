//! Multi-block structure prototypes and their per-section placement.

use glam::IVec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use veld_voxel::{CHUNK_FOOTPRINT, Content, SECTION_SIZE, Section};

/// Index of a structure in the generator's name-sorted structure list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructureId(pub u16);

/// A structure prototype: a named set of content placements relative to an
/// anchor at the structure's ground-level corner.
pub struct Structure {
    /// Stable name, referenced by sub-biome definitions and searches.
    pub name: String,
    extent: IVec3,
    blocks: Vec<(IVec3, Content)>,
}

impl Structure {
    /// Creates a prototype from relative placements.
    ///
    /// Offsets must be non-negative on every axis; the extent is derived
    /// from the placements.
    pub fn new(name: impl Into<String>, blocks: Vec<(IVec3, Content)>) -> Self {
        let extent = blocks
            .iter()
            .fold(IVec3::ZERO, |acc, (offset, _)| acc.max(*offset + IVec3::ONE));
        Self {
            name: name.into(),
            extent,
            blocks,
        }
    }

    /// Bounding extent in blocks.
    pub fn extent(&self) -> IVec3 {
        self.extent
    }

    /// Attempts to place this structure into a section.
    ///
    /// The anchor is jittered inside the section footprint so the structure
    /// stays within it horizontally, then dropped onto the surface at the
    /// anchor column. Placements only overwrite empty voxels and are
    /// clipped to the section, so neighboring sections each render their
    /// own slice of a structure that straddles a border. Returns `false`
    /// when the anchor column's surface lies outside the section's
    /// vertical span.
    pub fn attempt_placement(
        &self,
        section: &mut Section,
        surface: &[i32; CHUNK_FOOTPRINT],
        rng: &mut ChaCha8Rng,
    ) -> bool {
        let size = SECTION_SIZE as i32;
        let slack_x = (size - self.extent.x).max(1);
        let slack_z = (size - self.extent.z).max(1);
        let local_x = rng.random_range(0..slack_x);
        let local_z = rng.random_range(0..slack_z);

        let ground = surface[(local_z * size + local_x) as usize];
        let section_floor = section.pos().origin().y;
        if ground < section_floor || ground >= section_floor + size {
            return false;
        }

        let origin = section.pos().origin() + IVec3::new(local_x, 0, local_z);
        let anchor = IVec3::new(origin.x, ground + 1, origin.z);
        for (offset, content) in &self.blocks {
            let target = anchor + *offset;
            if section
                .get_world(target)
                .is_some_and(|existing| existing.is_empty())
            {
                section.set_world(target, *content);
            }
        }
        true
    }
}
