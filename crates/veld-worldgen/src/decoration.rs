//! Decorative feature placement: the placement contract, the shared
//! per-section noise grid, and the built-in decorations.

use glam::{DVec3, IVec3};
use rustc_hash::FxHashSet;

use crate::biome::SubBiomeId;
use crate::noise_field::NoiseField;
use crate::palette::{Palette, StoneType};
use crate::store::ColumnSampleStore;
use veld_voxel::{CHUNK_FOOTPRINT, Content, SECTION_SIZE, Section};

/// Index of a decoration in the generator's name-sorted decoration list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DecorationId(pub u16);

/// Per-voxel placement noise shared by every decoration in one section.
///
/// Each decoration decorrelates its draws from the shared values through
/// its placement index, so adding a decoration never shifts the draws of
/// the ones placed before it.
pub struct SectionNoiseGrid {
    values: Vec<f64>,
}

impl SectionNoiseGrid {
    /// Samples the field at every voxel of the section.
    pub fn new(field: &NoiseField, origin: IVec3) -> Self {
        let mut values = Vec::with_capacity(SECTION_SIZE * SECTION_SIZE * SECTION_SIZE);
        for y in 0..SECTION_SIZE as i32 {
            for z in 0..SECTION_SIZE as i32 {
                for x in 0..SECTION_SIZE as i32 {
                    let p = origin + IVec3::new(x, y, z);
                    values.push(field.normalized3(DVec3::new(
                        f64::from(p.x),
                        f64::from(p.y),
                        f64::from(p.z),
                    )));
                }
            }
        }
        Self { values }
    }

    /// A draw in `[0, 1)` for one voxel and placement index.
    pub fn draw(&self, x: usize, y: usize, z: usize, index: u32) -> f64 {
        let raw = self.values[(y * SECTION_SIZE + z) * SECTION_SIZE + x];
        // Offset by the golden ratio conjugate per index so successive
        // decorations see decorrelated draws from the same grid.
        (raw + f64::from(index) * 0.618033988749895).fract()
    }
}

/// Everything a decoration sees when placing into one section.
pub struct PlacementInput<'a> {
    /// Shared placement noise for the section.
    pub grid: &'a SectionNoiseGrid,
    /// Placement probability per candidate voxel, the maximum over the
    /// contributing sub-biomes' associations.
    pub rarity: f32,
    /// Position of this decoration in the section's placement order.
    pub index: u32,
    /// Content palette of the world.
    pub palette: &'a Palette,
    /// Samples for the section's chunk footprint.
    pub store: &'a ColumnSampleStore,
    /// Sub-biomes in this section that associate with the decoration;
    /// columns whose actual sub-biome is not in the set are skipped.
    pub contributors: &'a FxHashSet<SubBiomeId>,
    /// Ground height per footprint column, row-major (z, then x).
    pub surface: &'a [i32; CHUNK_FOOTPRINT],
}

/// A decorative feature that can stamp itself into a section.
///
/// Implementations must be pure functions of their input; the same section
/// and input must produce the same placements.
pub trait Decoration: Send + Sync {
    /// Stable name, referenced by sub-biome definitions.
    fn name(&self) -> &str;

    /// Approximate footprint in blocks; larger decorations place first.
    fn size(&self) -> u32;

    /// Places the decoration into the section.
    fn place(&self, section: &mut Section, input: &PlacementInput);
}

/// Walks the section's surface columns that pass the contributor and
/// rarity gates, yielding `(local_x, local_z, ground_y)`.
fn surface_candidates<'a>(
    section: &Section,
    input: &'a PlacementInput,
) -> impl Iterator<Item = (usize, usize, i32)> + 'a {
    let origin = section.pos().origin();
    let size = SECTION_SIZE;
    (0..size * size).filter_map(move |i| {
        let (x, z) = (i % size, i / size);
        let sample = input.store.sample_local(x, z);
        if !input.contributors.contains(&sample.actual) {
            return None;
        }
        let ground = input.surface[z * size + x];
        let local_y = ground - origin.y;
        if !(0..size as i32).contains(&local_y) {
            return None;
        }
        let draw = input.grid.draw(x, local_y as usize, z, input.index);
        (draw < f64::from(input.rarity)).then_some((x, z, ground))
    })
}

/// A partially buried cluster of palette stone.
pub struct Boulder {
    name: String,
    radius: i32,
    stone: StoneType,
}

impl Boulder {
    /// Creates a boulder decoration with the given cluster radius and
    /// stone type.
    pub fn new(name: impl Into<String>, radius: u32, stone: StoneType) -> Self {
        Self {
            name: name.into(),
            radius: radius as i32,
            stone,
        }
    }
}

impl Decoration for Boulder {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u32 {
        (self.radius * 2 + 1) as u32
    }

    fn place(&self, section: &mut Section, input: &PlacementInput) {
        let origin = section.pos().origin();
        let candidates: Vec<_> = surface_candidates(section, input).collect();
        for (x, z, ground) in candidates {
            let anchor = IVec3::new(origin.x + x as i32, ground, origin.z + z as i32);
            let stone = input.palette.stone(self.stone);
            let r = self.radius;
            for dy in -r..=r {
                for dz in -r..=r {
                    for dx in -r..=r {
                        if dx * dx + dy * dy + dz * dz > r * r {
                            continue;
                        }
                        let target = anchor + IVec3::new(dx, dy, dz);
                        // The buried half replaces soil; the exposed half
                        // only fills empty voxels.
                        if target.y <= ground
                            || section.get_world(target).is_some_and(|c| c.is_empty())
                        {
                            section.set_world(target, stone);
                        }
                    }
                }
            }
        }
    }
}

/// A single-block plant sitting on the surface.
pub struct Tuft {
    name: String,
    content: Content,
}

impl Tuft {
    /// Creates a tuft decoration placing the given content.
    pub fn new(name: impl Into<String>, content: Content) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }
}

impl Decoration for Tuft {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u32 {
        1
    }

    fn place(&self, section: &mut Section, input: &PlacementInput) {
        let origin = section.pos().origin();
        let candidates: Vec<_> = surface_candidates(section, input).collect();
        for (x, z, ground) in candidates {
            let target = IVec3::new(origin.x + x as i32, ground + 1, origin.z + z as i32);
            if section.get_world(target).is_some_and(|c| c.is_empty()) {
                section.set_world(target, self.content);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{BiomeDef, CoverDef, LayerDef, LayerKindDef, OffsetDef, SubBiomeDef, WeightedRef};
    use crate::map::{DistributionDef, DistributionEntry, Map, WeightedSubBiomes};
    use crate::noise_field::NoiseFieldParams;
    use crate::palette::PaletteEntry;
    use crate::seed::SeedPair;
    use crate::settings::GenerationSettings;
    use std::sync::Arc;
    use veld_voxel::{BlockId, ChunkPos, FluidId, SectionPos};

    fn test_map() -> Map {
        let sub = SubBiomeDef {
            name: "meadow".into(),
            cover: CoverDef {
                dry: BlockId(4),
                wet: BlockId(5),
                frosted: None,
            },
            layers: vec![
                LayerDef {
                    width: 2,
                    kind: LayerKindDef::Loose,
                    dampenable: true,
                },
                LayerDef {
                    width: 4,
                    kind: LayerKindDef::Stone,
                    dampenable: false,
                },
            ],
            offset: OffsetDef {
                amplitude: 4.0,
                base_frequency: 0.01,
                octaves: 2,
            },
            blends: true,
            stuffer: None,
            oceanic: None,
            structure: None,
            decorations: Vec::new(),
        };
        let biome = BiomeDef {
            name: "steppe".into(),
            sub_biomes: vec![WeightedRef {
                name: "meadow".into(),
                weight: 1,
            }],
        };
        let seeds = SeedPair::new(21, 22);
        let catalog = Arc::new(
            crate::biome::SubBiomeCatalog::build(vec![sub], vec![biome], &[], &[], &seeds)
                .unwrap(),
        );
        let table = WeightedSubBiomes::build(
            &DistributionDef {
                entries: vec![DistributionEntry {
                    biome: "steppe".into(),
                    weight: 1,
                }],
            },
            &catalog,
        )
        .unwrap();
        Map::new(&seeds, &GenerationSettings::default(), table, catalog)
    }

    fn test_palette() -> Palette {
        let entry = |base: u16| PaletteEntry {
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

    #[test]
    fn test_grid_draws_stay_in_unit_interval() {
        let field = NoiseField::new(NoiseFieldParams::simple(5, 0.1, 1.0));
        let grid = SectionNoiseGrid::new(&field, IVec3::new(32, 64, -16));
        for index in 0..4 {
            for x in 0..SECTION_SIZE {
                for z in 0..SECTION_SIZE {
                    let v = grid.draw(x, 7, z, index);
                    assert!((0.0..1.0).contains(&v), "draw {v} out of range");
                }
            }
        }
    }

    #[test]
    fn test_grid_index_decorrelates_draws() {
        let field = NoiseField::new(NoiseFieldParams::simple(5, 0.1, 1.0));
        let grid = SectionNoiseGrid::new(&field, IVec3::ZERO);
        let mut differing = 0;
        for x in 0..SECTION_SIZE {
            for z in 0..SECTION_SIZE {
                if (grid.draw(x, 0, z, 0) - grid.draw(x, 0, z, 1)).abs() > 1e-9 {
                    differing += 1;
                }
            }
        }
        assert!(differing > 200, "indices 0 and 1 drew nearly identical grids");
    }

    #[test]
    fn test_tuft_places_on_contributing_columns_only() {
        let map = test_map();
        let palette = test_palette();
        let pos = SectionPos::new(0, 4, 0);
        let store = ColumnSampleStore::build(&map, ChunkPos::new(0, 0));
        let field = NoiseField::new(NoiseFieldParams::simple(5, 0.1, 1.0));
        let grid = SectionNoiseGrid::new(&field, pos.origin());
        let surface = [70i32; CHUNK_FOOTPRINT];

        let tuft = Tuft::new("grass_tuft", Content::block(BlockId(8)));

        // Empty contributor set: nothing may place.
        let mut section = Section::new(pos);
        tuft.place(
            &mut section,
            &PlacementInput {
                grid: &grid,
                rarity: 1.0,
                index: 0,
                palette: &palette,
                store: &store,
                contributors: &FxHashSet::default(),
                surface: &surface,
            },
        );
        for x in 0..SECTION_SIZE {
            for z in 0..SECTION_SIZE {
                assert!(section.get(x, 7, z).is_empty());
            }
        }

        // All columns contribute and rarity is certain: every column gets
        // a tuft one block above the surface.
        let contributors: FxHashSet<SubBiomeId> =
            store.iter().map(|s| s.actual).collect();
        let mut section = Section::new(pos);
        tuft.place(
            &mut section,
            &PlacementInput {
                grid: &grid,
                rarity: 1.0,
                index: 0,
                palette: &palette,
                store: &store,
                contributors: &contributors,
                surface: &surface,
            },
        );
        for x in 0..SECTION_SIZE {
            for z in 0..SECTION_SIZE {
                assert_eq!(section.get(x, 7, z), Content::block(BlockId(8)));
            }
        }
    }

    #[test]
    fn test_boulder_buried_half_replaces_ground() {
        let map = test_map();
        let palette = test_palette();
        let pos = SectionPos::new(0, 4, 0);
        let store = ColumnSampleStore::build(&map, ChunkPos::new(0, 0));
        let field = NoiseField::new(NoiseFieldParams::simple(5, 0.1, 1.0));
        let grid = SectionNoiseGrid::new(&field, pos.origin());
        let surface = [70i32; CHUNK_FOOTPRINT];
        let contributors: FxHashSet<SubBiomeId> =
            store.iter().map(|s| s.actual).collect();

        let soil = Content::block(BlockId(31));
        let mut section = Section::new(pos);
        for x in 0..SECTION_SIZE {
            for z in 0..SECTION_SIZE {
                for y in 0..=6 {
                    section.set(x, y, z, soil);
                }
            }
        }

        let boulder = Boulder::new("boulder", 1, StoneType::Granite);
        boulder.place(
            &mut section,
            &PlacementInput {
                grid: &grid,
                rarity: 1.0,
                index: 0,
                palette: &palette,
                store: &store,
                contributors: &contributors,
                surface: &surface,
            },
        );

        let stone = palette.stone(StoneType::Granite);
        let mut replaced = 0;
        let mut exposed = 0;
        for x in 0..SECTION_SIZE {
            for z in 0..SECTION_SIZE {
                for y in 0..SECTION_SIZE {
                    if section.get(x, y, z) == stone {
                        if y <= 6 {
                            replaced += 1;
                        } else {
                            exposed += 1;
                        }
                    }
                }
            }
        }
        assert!(replaced > 0, "boulder never replaced buried soil");
        assert!(exposed > 0, "boulder never rose above the surface");
    }
}
