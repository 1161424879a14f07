//! Runtime sub-biome values: offset noise, vertical layering and
//! dampening arithmetic.

use glam::IVec2;
use veld_voxel::{BlockId, Content};

use crate::decoration::DecorationId;
use crate::noise_field::NoiseField;
use crate::palette::{Palette, StoneType};
use crate::structure::StructureId;

use super::def::LayerKindDef;

/// Index of a sub-biome in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubBiomeId(pub u16);

/// Vertical compression/expansion applied to one sub-biome's layering at
/// one column so that its depth to the first solid block matches a target
/// shared with its neighbors.
///
/// Computed per query and never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dampening {
    /// The part of the blended height offset the dampenable layer absorbed.
    pub offset: i32,
    /// Effective width of the dampenable layer. Never negative by
    /// construction.
    pub width: u32,
}

impl Dampening {
    /// Returns this dampening with its width increased by `fill` blocks.
    pub fn widened(self, fill: u32) -> Self {
        Self {
            offset: self.offset,
            width: self.width + fill,
        }
    }
}

/// One resolved layer of a sub-biome's vertical layering.
#[derive(Clone, Debug)]
pub(crate) struct Layer {
    pub width: u32,
    pub kind: LayerKindDef,
}

impl Layer {
    fn is_solid(&self) -> bool {
        matches!(self.kind, LayerKindDef::Stone)
    }
}

/// A fine-grained terrain-layering definition, resolved and ready to query.
///
/// Created by [`SubBiomeCatalog`](super::SubBiomeCatalog); all cross
/// references (oceanic variant, structure, decorations) are resolved ids.
pub struct SubBiome {
    pub(crate) id: SubBiomeId,
    pub(crate) name: String,
    pub(crate) blends: bool,
    pub(crate) offset_field: NoiseField,
    pub(crate) layers: Vec<Layer>,
    pub(crate) dampen_index: usize,
    pub(crate) cover_dry: BlockId,
    pub(crate) cover_wet: BlockId,
    pub(crate) cover_frosted: Option<BlockId>,
    pub(crate) stuffer: Option<Content>,
    pub(crate) oceanic: Option<SubBiomeId>,
    pub(crate) structure: Option<StructureId>,
    pub(crate) decorations: Vec<(DecorationId, f32)>,
}

impl SubBiome {
    /// The sub-biome's catalog id.
    pub fn id(&self) -> SubBiomeId {
        self.id
    }

    /// The sub-biome's stable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this sub-biome participates in boundary blending.
    pub fn blends(&self) -> bool {
        self.blends
    }

    /// The oceanic variant, if one is defined.
    pub fn oceanic(&self) -> Option<SubBiomeId> {
        self.oceanic
    }

    /// The structure that may generate here, if any.
    pub fn structure(&self) -> Option<StructureId> {
        self.structure
    }

    /// Decoration associations as `(decoration, rarity)` pairs.
    pub fn decorations(&self) -> &[(DecorationId, f32)] {
        &self.decorations
    }

    /// Filler content for near-surface concave pockets, if any.
    pub fn stuffer(&self) -> Option<Content> {
        self.stuffer
    }

    /// Local height perturbation at a column, in blocks.
    ///
    /// Deterministic per seed; evaluated on demand.
    pub fn offset(&self, column: IVec2) -> f64 {
        self.offset_field
            .sample2(f64::from(column.x), f64::from(column.y))
    }

    /// Computes the dampening this sub-biome applies for a given effective
    /// height offset.
    ///
    /// The dampenable layer absorbs the offset, clamped so its width stays
    /// within `[0, 2 × base]`.
    pub fn calculate_dampening(&self, effective_offset: i32) -> Dampening {
        let base = self.layers[self.dampen_index].width as i32;
        let offset = effective_offset.clamp(-base, base);
        Dampening {
            offset,
            width: (base + offset) as u32,
        }
    }

    /// Depth (in blocks, from the surface) of the first solid stone layer
    /// under the given dampening.
    pub fn depth_to_solid(&self, dampening: &Dampening) -> u32 {
        let mut depth = 0;
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.is_solid() {
                break;
            }
            depth += self.layer_width(i, layer, dampening);
        }
        depth
    }

    /// Total layering width in blocks under the given dampening. Below
    /// this depth the column is plain palette stone.
    pub fn total_width(&self, dampening: &Dampening) -> u32 {
        self.layers
            .iter()
            .enumerate()
            .map(|(i, layer)| self.layer_width(i, layer, dampening))
            .sum()
    }

    /// Resolves the content at `depth` blocks below the surface.
    ///
    /// Walks the layering shallow to deep, substituting the dampened width
    /// for the dampenable layer, so assignment order is stable and
    /// depth-monotonic. `depth` must be below the total width; the caller
    /// handles deeper voxels with plain stone.
    pub fn content(
        &self,
        depth: u32,
        y: i32,
        dampening: &Dampening,
        stone: StoneType,
        submerged: bool,
        water_table: i32,
        palette: &Palette,
    ) -> Content {
        let saturated = y <= water_table;
        let mut floor = 0;
        for (i, layer) in self.layers.iter().enumerate() {
            floor += self.layer_width(i, layer, dampening);
            if depth < floor {
                return match &layer.kind {
                    LayerKindDef::Top { dry, wet } => {
                        Content::block(if submerged { *wet } else { *dry })
                    }
                    LayerKindDef::Loose => palette.loose(stone, saturated),
                    LayerKindDef::Permeable { dry, wet } => {
                        Content::block(if saturated { *wet } else { *dry })
                    }
                    LayerKindDef::Stone => palette.stone(stone),
                };
            }
        }
        palette.stone(stone)
    }

    /// Cover dressing one layer above the surface.
    ///
    /// Submerged columns use the wet cover; columns above the frost line
    /// (highest fifth of the height range) use the frosted cover when one
    /// is defined.
    pub fn cover_content(&self, submerged: bool, height_fraction: f64) -> Content {
        if submerged {
            return Content::block(self.cover_wet);
        }
        if height_fraction > 0.8
            && let Some(frosted) = self.cover_frosted
        {
            return Content::block(frosted);
        }
        Content::block(self.cover_dry)
    }

    fn layer_width(&self, index: usize, layer: &Layer, dampening: &Dampening) -> u32 {
        if index == self.dampen_index {
            dampening.width
        } else {
            layer.width
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_field::NoiseFieldParams;
    use veld_voxel::FluidId;

    fn palette() -> Palette {
        let entry = |base: u16| crate::palette::PaletteEntry {
            stone: Content::block(BlockId(base)),
            loose: Content::block(BlockId(base + 1)),
            saturated: Content::block(BlockId(base + 2)),
        };
        Palette::new(
            [entry(10), entry(20), entry(30), entry(40)],
            Content::block(BlockId(99)),
            FluidId(1),
        )
    }

    /// Grass top (1), loose soil (3, dampenable), stone (4).
    fn sub_biome() -> SubBiome {
        SubBiome {
            id: SubBiomeId(0),
            name: "meadow".into(),
            blends: true,
            offset_field: NoiseField::new(NoiseFieldParams::simple(1, 0.01, 4.0)),
            layers: vec![
                Layer {
                    width: 1,
                    kind: LayerKindDef::Top {
                        dry: BlockId(2),
                        wet: BlockId(3),
                    },
                },
                Layer {
                    width: 3,
                    kind: LayerKindDef::Loose,
                },
                Layer {
                    width: 4,
                    kind: LayerKindDef::Stone,
                },
            ],
            dampen_index: 1,
            cover_dry: BlockId(4),
            cover_wet: BlockId(5),
            cover_frosted: Some(BlockId(6)),
            stuffer: None,
            oceanic: None,
            structure: None,
            decorations: Vec::new(),
        }
    }

    #[test]
    fn test_dampening_width_never_negative() {
        let sb = sub_biome();
        for offset in -20..=20 {
            let damp = sb.calculate_dampening(offset);
            assert!(
                damp.width <= 6,
                "dampened width {} exceeds 2x base at offset {offset}",
                damp.width
            );
        }
        assert_eq!(sb.calculate_dampening(-10).width, 0);
        assert_eq!(sb.calculate_dampening(0).width, 3);
        assert_eq!(sb.calculate_dampening(10).width, 6);
    }

    #[test]
    fn test_depth_to_solid_tracks_dampened_width() {
        let sb = sub_biome();
        assert_eq!(sb.depth_to_solid(&sb.calculate_dampening(0)), 4);
        assert_eq!(sb.depth_to_solid(&sb.calculate_dampening(2)), 6);
        assert_eq!(sb.depth_to_solid(&sb.calculate_dampening(-3)), 1);
    }

    #[test]
    fn test_total_width_includes_stone_layer() {
        let sb = sub_biome();
        assert_eq!(sb.total_width(&sb.calculate_dampening(0)), 8);
        assert_eq!(sb.total_width(&sb.calculate_dampening(0).widened(5)), 13);
    }

    #[test]
    fn test_content_order_is_depth_monotonic() {
        let sb = sub_biome();
        let palette = palette();
        let damp = sb.calculate_dampening(0);

        let expected = [
            Content::block(BlockId(2)),  // top
            Content::block(BlockId(21)), // loose (limestone, dry)
            Content::block(BlockId(21)),
            Content::block(BlockId(21)),
            palette.stone(StoneType::Limestone),
            palette.stone(StoneType::Limestone),
        ];
        for (depth, want) in expected.iter().enumerate() {
            let got = sb.content(
                depth as u32,
                300,
                &damp,
                StoneType::Limestone,
                false,
                256,
                &palette,
            );
            assert_eq!(got, *want, "content mismatch at depth {depth}");
        }
    }

    #[test]
    fn test_loose_layer_saturated_below_water_table() {
        let sb = sub_biome();
        let palette = palette();
        let damp = sb.calculate_dampening(0);
        let below = sb.content(1, 200, &damp, StoneType::Granite, true, 256, &palette);
        assert_eq!(below, Content::block(BlockId(32)), "saturated loose expected");
        let above = sb.content(1, 300, &damp, StoneType::Granite, false, 256, &palette);
        assert_eq!(above, Content::block(BlockId(31)), "dry loose expected");
    }

    #[test]
    fn test_cover_prefers_wet_then_frost() {
        let sb = sub_biome();
        assert_eq!(sb.cover_content(true, 0.9), Content::block(BlockId(5)));
        assert_eq!(sb.cover_content(false, 0.9), Content::block(BlockId(6)));
        assert_eq!(sb.cover_content(false, 0.4), Content::block(BlockId(4)));
    }

    #[test]
    fn test_offset_is_deterministic() {
        let a = sub_biome();
        let b = sub_biome();
        let column = IVec2::new(120, -45);
        assert_eq!(a.offset(column), b.offset(column));
    }
}
