//! Stone palette: ready-made content values per stone type.

use serde::{Deserialize, Serialize};
use veld_voxel::{Content, FluidId};

use crate::resources::DefinitionError;

/// The base rock families terrain can be carved from.
///
/// The enum is closed on purpose: an out-of-range stone value cannot exist
/// at runtime, and stone codes from definition data are validated up front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoneType {
    /// Soft sedimentary stone found under arid terrain.
    Sandstone,
    /// Common sedimentary stone.
    Limestone,
    /// Hard igneous stone.
    Granite,
    /// Metamorphic stone found in highlands.
    Marble,
}

impl StoneType {
    /// All stone types, in palette order.
    pub const ALL: [Self; 4] = [
        Self::Sandstone,
        Self::Limestone,
        Self::Granite,
        Self::Marble,
    ];

    /// Parses a stone code from definition data.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::UnknownStoneType`] for unsupported codes;
    /// silently defaulting would corrupt generated terrain irreversibly.
    pub fn from_code(code: &str) -> Result<Self, DefinitionError> {
        match code {
            "sandstone" => Ok(Self::Sandstone),
            "limestone" => Ok(Self::Limestone),
            "granite" => Ok(Self::Granite),
            "marble" => Ok(Self::Marble),
            other => Err(DefinitionError::UnknownStoneType(other.to_string())),
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Sandstone => 0,
            Self::Limestone => 1,
            Self::Granite => 2,
            Self::Marble => 3,
        }
    }
}

/// Ready-made content values for one stone type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteEntry {
    /// The plain solid stone.
    pub stone: Content,
    /// Weathered loose material (gravel, scree).
    pub loose: Content,
    /// Loose material saturated by groundwater.
    pub saturated: Content,
}

/// Fixed mapping from stone type to content, plus the world-wide fixed
/// content values generation needs everywhere.
#[derive(Clone, Debug)]
pub struct Palette {
    entries: [PaletteEntry; 4],
    /// The indestructible block at the world's lower bound.
    pub core: Content,
    /// The fluid used to fill everything below sea level.
    pub water: FluidId,
}

impl Palette {
    /// Creates a palette from one entry per stone type, in
    /// [`StoneType::ALL`] order.
    pub fn new(entries: [PaletteEntry; 4], core: Content, water: FluidId) -> Self {
        Self {
            entries,
            core,
            water,
        }
    }

    /// The entry for a stone type.
    pub fn entry(&self, stone: StoneType) -> &PaletteEntry {
        &self.entries[stone.index()]
    }

    /// Plain stone content for a stone type.
    pub fn stone(&self, stone: StoneType) -> Content {
        self.entries[stone.index()].stone
    }

    /// Loose material for a stone type, saturated below the water table.
    pub fn loose(&self, stone: StoneType, saturated: bool) -> Content {
        let entry = &self.entries[stone.index()];
        if saturated { entry.saturated } else { entry.loose }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veld_voxel::BlockId;

    fn entry(base: u16) -> PaletteEntry {
        PaletteEntry {
            stone: Content::block(BlockId(base)),
            loose: Content::block(BlockId(base + 1)),
            saturated: Content::block(BlockId(base + 2)),
        }
    }

    fn palette() -> Palette {
        Palette::new(
            [entry(10), entry(20), entry(30), entry(40)],
            Content::block(BlockId(99)),
            FluidId(1),
        )
    }

    #[test]
    fn test_entry_lookup_follows_stone_order() {
        let palette = palette();
        assert_eq!(palette.stone(StoneType::Sandstone), Content::block(BlockId(10)));
        assert_eq!(palette.stone(StoneType::Marble), Content::block(BlockId(40)));
    }

    #[test]
    fn test_loose_switches_on_saturation() {
        let palette = palette();
        assert_eq!(
            palette.loose(StoneType::Granite, false),
            Content::block(BlockId(31))
        );
        assert_eq!(
            palette.loose(StoneType::Granite, true),
            Content::block(BlockId(32))
        );
    }

    #[test]
    fn test_unknown_stone_code_fails_fast() {
        assert!(StoneType::from_code("granite").is_ok());
        assert!(
            StoneType::from_code("basalt").is_err(),
            "unsupported stone codes must be rejected, not defaulted"
        );
    }
}
