//! Dense voxel storage for one 16³ section.
//!
//! Sections are the granularity at which decoration and structure placement
//! operate. Storage is a flat row-major [`Content`] array; generation-time
//! sections are short-lived, so no palette compression is applied here.

use glam::IVec3;

use crate::content::Content;
use crate::position::{SECTION_SIZE, SectionPos};

/// A 16×16×16 block of voxels addressed by local or world coordinates.
#[derive(Clone, Debug)]
pub struct Section {
    pos: SectionPos,
    voxels: Vec<Content>,
}

impl Section {
    /// Creates an empty (all-air) section at the given position.
    pub fn new(pos: SectionPos) -> Self {
        Self {
            pos,
            voxels: vec![Content::EMPTY; SECTION_SIZE * SECTION_SIZE * SECTION_SIZE],
        }
    }

    /// The section's position on the section grid.
    pub fn pos(&self) -> SectionPos {
        self.pos
    }

    /// Returns the content at local coordinates, each in `0..16`.
    ///
    /// # Panics
    ///
    /// Panics if a coordinate is out of range.
    pub fn get(&self, x: usize, y: usize, z: usize) -> Content {
        self.voxels[Self::linear_index(x, y, z)]
    }

    /// Sets the content at local coordinates, each in `0..16`.
    ///
    /// # Panics
    ///
    /// Panics if a coordinate is out of range.
    pub fn set(&mut self, x: usize, y: usize, z: usize, content: Content) {
        self.voxels[Self::linear_index(x, y, z)] = content;
    }

    /// Returns the content at a world position inside this section, or
    /// `None` if the position lies outside.
    pub fn get_world(&self, position: IVec3) -> Option<Content> {
        let local = position - self.pos.origin();
        self.contains_local(local)
            .then(|| self.get(local.x as usize, local.y as usize, local.z as usize))
    }

    /// Sets the content at a world position if it lies inside this section.
    ///
    /// Returns `true` if the write happened. Out-of-section writes are
    /// silently skipped so placement routines can clip against the border.
    pub fn set_world(&mut self, position: IVec3, content: Content) -> bool {
        let local = position - self.pos.origin();
        if self.contains_local(local) {
            self.set(
                local.x as usize,
                local.y as usize,
                local.z as usize,
                content,
            );
            true
        } else {
            false
        }
    }

    fn contains_local(&self, local: IVec3) -> bool {
        let max = SECTION_SIZE as i32;
        (0..max).contains(&local.x) && (0..max).contains(&local.y) && (0..max).contains(&local.z)
    }

    fn linear_index(x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < SECTION_SIZE && y < SECTION_SIZE && z < SECTION_SIZE);
        (y * SECTION_SIZE + z) * SECTION_SIZE + x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::BlockId;

    #[test]
    fn test_new_section_is_all_air() {
        let section = Section::new(SectionPos::new(0, 0, 0));
        for x in 0..SECTION_SIZE {
            for y in 0..SECTION_SIZE {
                for z in 0..SECTION_SIZE {
                    assert_eq!(section.get(x, y, z), Content::EMPTY);
                }
            }
        }
    }

    #[test]
    fn test_set_then_get_round_trips() {
        let mut section = Section::new(SectionPos::new(0, 0, 0));
        let stone = Content::block(BlockId(1));
        section.set(3, 7, 11, stone);
        assert_eq!(section.get(3, 7, 11), stone);
        assert_eq!(section.get(3, 7, 10), Content::EMPTY);
    }

    #[test]
    fn test_world_access_respects_section_origin() {
        let mut section = Section::new(SectionPos::new(1, 2, 3));
        let block = Content::block(BlockId(5));

        assert!(section.set_world(IVec3::new(16, 32, 48), block));
        assert_eq!(section.get(0, 0, 0), block);
        assert_eq!(section.get_world(IVec3::new(16, 32, 48)), Some(block));
    }

    #[test]
    fn test_out_of_section_write_is_clipped() {
        let mut section = Section::new(SectionPos::new(0, 0, 0));
        assert!(!section.set_world(IVec3::new(-1, 0, 0), Content::block(BlockId(1))));
        assert!(section.get_world(IVec3::new(16, 0, 0)).is_none());
    }
}
