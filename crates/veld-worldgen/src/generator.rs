//! The generator: blended ground height, dampening, per-voxel content,
//! and the decoration/structure/search entry points.

use std::ops::Range;
use std::sync::Arc;

use glam::{IVec2, IVec3};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::biome::{Dampening, SubBiomeId};
use crate::decoration::{Decoration, DecorationId, PlacementInput, SectionNoiseGrid};
use crate::map::{Map, WeightedSubBiomes};
use crate::noise_field::{NoiseField, NoiseFieldParams};
use crate::palette::Palette;
use crate::resources::GeneratorResources;
use crate::sample::{Sample, bilinear, nearest_corner};
use crate::search::{NamedElement, Searcher};
use crate::seed::{SeedPair, derive_name_seed, section_rng};
use crate::settings::GenerationSettings;
use crate::store::{ColumnSampleStore, SampleStoreCache};
use crate::structure::Structure;
use veld_voxel::{
    BlockCatalog, CHUNK_FOOTPRINT, ChunkPos, Content, FluidFill, SECTION_SIZE, Section,
    SectionPos,
};

/// Blended integer ground height for one column, plus the residual the
/// blend shifted it by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroundInfo {
    /// Y of the highest solid voxel.
    pub height: i32,
    /// `height - floor(raw height)`: how far the blended offset moved the
    /// integer height from the unblended value. Sole input to dampening.
    pub effective_offset: i32,
}

/// Turns samples into voxel content and drives placement passes.
///
/// All queries are pure with respect to the world seed; the sample cache
/// is the only internal mutable state and is safe to share across worker
/// threads.
pub struct Generator {
    map: Map,
    palette: Palette,
    blocks: Arc<BlockCatalog>,
    structures: Vec<Arc<Structure>>,
    decorations: Vec<Arc<dyn Decoration>>,
    decoration_field: NoiseField,
    searcher: Searcher,
    cache: SampleStoreCache,
    settings: GenerationSettings,
    seeds: SeedPair,
}

impl Generator {
    /// Builds a generator from loaded resources.
    ///
    /// Returns `None` when the resource set is incomplete (no palette or
    /// no biome distribution yet) or when definition data fails to
    /// resolve; the condition is logged so a world can report why it has
    /// no terrain.
    pub fn create(
        resources: GeneratorResources,
        settings: GenerationSettings,
        seeds: SeedPair,
    ) -> Option<Self> {
        let Some(palette) = resources.palette else {
            tracing::warn!("no palette loaded, terrain generation unavailable");
            return None;
        };
        let Some(distribution) = resources.distribution else {
            tracing::warn!("no biome distribution loaded, terrain generation unavailable");
            return None;
        };

        let mut structures = resources.structures;
        structures.sort_by(|a, b| a.name.cmp(&b.name));
        let mut decorations = resources.decorations;
        decorations.sort_by(|a, b| a.name().cmp(b.name()));

        let catalog = match crate::biome::SubBiomeCatalog::build(
            resources.sub_biomes,
            resources.biomes,
            &structures,
            &decorations,
            &seeds,
        ) {
            Ok(catalog) => Arc::new(catalog),
            Err(error) => {
                tracing::error!(%error, "biome definitions failed to resolve");
                return None;
            }
        };
        let table = match WeightedSubBiomes::build(&distribution, &catalog) {
            Ok(table) => table,
            Err(error) => {
                tracing::error!(%error, "biome distribution failed to resolve");
                return None;
            }
        };

        let searcher = Searcher::build(&catalog, &structures);
        let map = Map::new(&seeds, &settings, table, catalog);
        let cache = SampleStoreCache::new(SampleStoreCache::capacity_for_view_distance(
            settings.view_distance,
        ));
        let decoration_field = NoiseField::new(NoiseFieldParams::simple(
            derive_name_seed(seeds.detail, "decoration"),
            0.9,
            1.0,
        ));

        tracing::info!(
            sub_biomes = map.catalog().len(),
            structures = structures.len(),
            decorations = decorations.len(),
            "generator ready"
        );
        Some(Self {
            map,
            palette,
            blocks: resources.blocks,
            structures,
            decorations,
            decoration_field,
            searcher,
            cache,
            settings,
            seeds,
        })
    }

    /// The territory map.
    pub fn map(&self) -> &Map {
        &self.map
    }

    /// The world's stone palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The settings the generator was built with.
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// The world's seed pair.
    pub fn seeds(&self) -> &SeedPair {
        &self.seeds
    }

    /// Returns the sample store for a chunk, building and caching it on a
    /// miss.
    pub fn sample_store(&self, chunk: ChunkPos) -> Arc<ColumnSampleStore> {
        self.cache.get_or_build(&self.map, chunk)
    }

    /// Blended ground height for a column.
    pub fn ground_info(&self, column: IVec2, sample: &Sample) -> GroundInfo {
        self.ground_info_with(column, sample.height, &sample.brackets, sample)
    }

    fn ground_info_with(
        &self,
        column: IVec2,
        height: f64,
        brackets: &[SubBiomeId; 4],
        sample: &Sample,
    ) -> GroundInfo {
        let catalog = self.map.catalog();
        let actual = brackets[nearest_corner(sample.weights)];
        let raw = height * f64::from(self.settings.max_height);
        // Sub-biomes that opt out of blending use their own offset
        // directly; blending toward a neighbor would reintroduce the seam
        // the opt-out exists to express.
        let offset = if catalog.get(actual).blends() {
            let offsets = brackets.map(|id| catalog.get(id).offset(column));
            bilinear(offsets, sample.weights)
        } else {
            catalog.get(actual).offset(column)
        };
        let height = ((raw + offset).floor() as i32)
            .clamp(1, self.settings.max_height as i32 - 2);
        GroundInfo {
            height,
            effective_offset: height - raw.floor() as i32,
        }
    }

    /// Seam-avoidance dampening for the column's actual sub-biome.
    ///
    /// The shallowest bracket depth is doubled before blending so that the
    /// blended target never collapses onto the thinnest neighbor, which
    /// would under-fill it near the boundary. The result widens the actual
    /// sub-biome's dampenable layer by the gap to the blended target.
    pub fn dampening(&self, info: GroundInfo, sample: &Sample) -> Dampening {
        self.dampening_with(info, &sample.brackets, sample)
    }

    fn dampening_with(
        &self,
        info: GroundInfo,
        brackets: &[SubBiomeId; 4],
        sample: &Sample,
    ) -> Dampening {
        let catalog = self.map.catalog();
        let actual = catalog.get(brackets[nearest_corner(sample.weights)]);
        let own = actual.calculate_dampening(info.effective_offset);
        if !actual.blends() {
            return own;
        }

        let mut depths = [0.0f64; 4];
        for (depth, id) in depths.iter_mut().zip(brackets) {
            let sub = catalog.get(*id);
            *depth = f64::from(sub.depth_to_solid(&sub.calculate_dampening(info.effective_offset)));
        }
        let mut min_index = 0;
        for i in 1..4 {
            if depths[i] < depths[min_index] {
                min_index = i;
            }
        }
        depths[min_index] *= 2.0;

        let target = bilinear(depths, sample.weights);
        let fill = (target - f64::from(actual.depth_to_solid(&own))).max(0.0) as u32;
        own.widened(fill)
    }

    /// Resolves the content of one voxel.
    pub fn content_at(&self, column: IVec2, y: i32, sample: &Sample) -> Content {
        // The world's lower bound is indestructible regardless of sampling.
        if y == 0 {
            return self.palette.core;
        }
        let info = self.ground_info(column, sample);
        let depth = info.height - y;
        if depth >= 0 {
            let damp = self.dampening(info, sample);
            self.layered_content(column, y, depth as u32, info, damp, sample.actual)
        } else {
            self.above_surface(column, y, depth, info, sample)
        }
    }

    fn above_surface(
        &self,
        column: IVec2,
        y: i32,
        depth: i32,
        info: GroundInfo,
        sample: &Sample,
    ) -> Content {
        let catalog = self.map.catalog();
        let sea = self.settings.sea_level;

        // Under open water an oceanic variant surface takes precedence,
        // capping the submerged land with its own layering and cover.
        if let Some(oceanic) = &sample.oceanic
            && y <= sea
        {
            let oinfo = self.ground_info_with(column, sample.height, oceanic, sample);
            let odepth = oinfo.height - y;
            if odepth >= 0 {
                let odamp = self.dampening_with(oinfo, oceanic, sample);
                let actual = oceanic[nearest_corner(sample.weights)];
                return self.layered_content(column, y, odepth as u32, oinfo, odamp, actual);
            }
            if odepth == -1 {
                let actual = catalog.get(oceanic[nearest_corner(sample.weights)]);
                let cover = actual.cover_content(true, self.height_fraction(y));
                return self.fill_water(y, cover);
            }
        }

        let actual = catalog.get(sample.actual);
        // A negative effective offset carved the surface below its base
        // height; stuffer content rests in the resulting pocket.
        if let Some(stuffer) = actual.stuffer()
            && info.effective_offset < 0
            && depth >= info.effective_offset
        {
            return self.fill_water(y, stuffer);
        }
        if depth == -1 {
            let cover = actual.cover_content(y <= sea, self.height_fraction(y));
            return self.fill_water(y, cover);
        }
        self.fill_water(y, Content::EMPTY)
    }

    fn layered_content(
        &self,
        column: IVec2,
        y: i32,
        depth: u32,
        info: GroundInfo,
        damp: Dampening,
        actual: SubBiomeId,
    ) -> Content {
        let sub = self.map.catalog().get(actual);
        let stone = self.map.stone_type(IVec3::new(column.x, y, column.y));
        if depth < sub.total_width(&damp) {
            sub.content(
                depth,
                y,
                &damp,
                stone,
                info.height < self.settings.sea_level,
                self.settings.sea_level,
                &self.palette,
            )
        } else {
            self.palette.stone(stone)
        }
    }

    fn fill_water(&self, y: i32, content: Content) -> Content {
        if y <= self.settings.sea_level
            && content.fluid.is_none()
            && self.blocks.get(content.block).fillable
        {
            content.with_fluid(FluidFill::full(self.palette.water))
        } else {
            content
        }
    }

    fn height_fraction(&self, y: i32) -> f64 {
        f64::from(y) / f64::from(self.settings.max_height)
    }

    /// One content value per Y in `range`, bottom to top.
    ///
    /// Lazy and single-pass; recomputation requires a new call.
    pub fn generate_column(
        &self,
        column: IVec2,
        sample: &Sample,
        range: Range<i32>,
    ) -> impl Iterator<Item = Content> + '_ {
        let sample = *sample;
        range.map(move |y| self.content_at(column, y, &sample))
    }

    /// Ground heights for every column of a store's footprint, row-major
    /// (z, then x).
    pub fn surface_heights(&self, store: &ColumnSampleStore) -> [i32; CHUNK_FOOTPRINT] {
        let origin = store.pos().origin_column();
        let mut heights = [0i32; CHUNK_FOOTPRINT];
        for z in 0..SECTION_SIZE {
            for x in 0..SECTION_SIZE {
                let column = origin + IVec2::new(x as i32, z as i32);
                heights[z * SECTION_SIZE + x] =
                    self.ground_info(column, store.sample_local(x, z)).height;
            }
        }
        heights
    }

    /// Fills a section with base terrain content.
    pub fn fill_section(&self, section: &mut Section, store: &ColumnSampleStore) {
        let origin = section.pos().origin();
        for z in 0..SECTION_SIZE {
            for x in 0..SECTION_SIZE {
                let column = IVec2::new(origin.x + x as i32, origin.z + z as i32);
                let sample = *store.sample(column);
                for (dy, content) in self
                    .generate_column(column, &sample, origin.y..origin.y + SECTION_SIZE as i32)
                    .enumerate()
                {
                    section.set(x, dy, z, content);
                }
            }
        }
    }

    /// Places a structure into the section when its gate passes.
    ///
    /// A structure only generates where all four corner samples of the
    /// section footprint resolve to the same structure; a structure
    /// straddling a sub-biome boundary would otherwise generate partially.
    pub fn generate_structures(
        &self,
        section: &mut Section,
        store: &ColumnSampleStore,
        surface: &[i32; CHUNK_FOOTPRINT],
    ) {
        let catalog = self.map.catalog();
        let corners = section.pos().corner_columns();
        let Some(id) = catalog.get(store.sample(corners[0]).actual).structure() else {
            return;
        };
        if corners[1..]
            .iter()
            .any(|c| catalog.get(store.sample(*c).actual).structure() != Some(id))
        {
            return;
        }
        let mut rng = section_rng(self.seeds.detail, section.pos());
        if self.structures[id.0 as usize].attempt_placement(section, surface, &mut rng) {
            tracing::debug!(pos = ?section.pos(), structure = %self.structures[id.0 as usize].name, "placed structure");
        }
    }

    /// Runs the decoration pass for one section.
    ///
    /// Candidates are gathered per distinct sub-biome touching the
    /// section, keeping the highest placement probability over
    /// contributors so a shared decoration stays as frequent as its most
    /// frequent association, then sorted by descending size and name so
    /// placement order never depends on hash iteration order. Each
    /// placement gets an increasing index to decorrelate draws even
    /// between identically sized decorations.
    pub fn generate_decorations(
        &self,
        section: &mut Section,
        store: &ColumnSampleStore,
        surface: &[i32; CHUNK_FOOTPRINT],
    ) {
        let catalog = self.map.catalog();
        let mut candidates: FxHashMap<DecorationId, (f32, FxHashSet<SubBiomeId>)> =
            FxHashMap::default();
        let mut seen: FxHashSet<SubBiomeId> = FxHashSet::default();
        for sample in store.iter() {
            if !seen.insert(sample.actual) {
                continue;
            }
            for &(id, rarity) in catalog.get(sample.actual).decorations() {
                let entry = candidates
                    .entry(id)
                    .or_insert_with(|| (rarity, FxHashSet::default()));
                entry.0 = entry.0.max(rarity);
                entry.1.insert(sample.actual);
            }
        }
        if candidates.is_empty() {
            return;
        }

        let mut ordered: Vec<(DecorationId, f32, FxHashSet<SubBiomeId>)> = candidates
            .into_iter()
            .map(|(id, (rarity, contributors))| (id, rarity, contributors))
            .collect();
        ordered.sort_by(|a, b| {
            let da = &self.decorations[a.0.0 as usize];
            let db = &self.decorations[b.0.0 as usize];
            db.size()
                .cmp(&da.size())
                .then_with(|| da.name().cmp(db.name()))
        });

        let grid = SectionNoiseGrid::new(&self.decoration_field, section.pos().origin());
        for (index, (id, rarity, contributors)) in ordered.into_iter().enumerate() {
            self.decorations[id.0 as usize].place(
                section,
                &PlacementInput {
                    grid: &grid,
                    rarity,
                    index: index as u32,
                    palette: &self.palette,
                    store,
                    contributors: &contributors,
                    surface,
                },
            );
        }
    }

    /// Searches outward from `start` for generated elements with the given
    /// name, yielding surface positions nearest-first (by ring).
    ///
    /// Returns `None` when the name matches no known element.
    pub fn search_named_elements<'a>(
        &'a self,
        start: IVec3,
        name: &str,
        max_distance: u32,
    ) -> Option<Box<dyn Iterator<Item = IVec3> + 'a>> {
        let element = self.searcher.resolve(name)?;
        let stride = match element {
            NamedElement::Structure(_) => SECTION_SIZE as i32,
            NamedElement::SubBiome(_) | NamedElement::Biome(_) => {
                (self.map.cell_size() / 2).max(1)
            }
        };
        let origin = IVec2::new(start.x, start.z);
        let rings = 0..=(max_distance as i32 / stride);
        Some(Box::new(
            rings
                .flat_map(ring_offsets)
                .map(move |offset| origin + offset * stride)
                .filter_map(move |column| self.match_element(element, column)),
        ))
    }

    fn match_element(&self, element: NamedElement, column: IVec2) -> Option<IVec3> {
        let catalog = self.map.catalog();
        let sample = self.map.sample(column);
        let hit = match element {
            NamedElement::SubBiome(id) => sample.actual == id,
            NamedElement::Biome(id) => catalog
                .biome(id)
                .sub_biomes
                .iter()
                .any(|&(sub, _)| sub == sample.actual),
            NamedElement::Structure(id) => {
                let section = SectionPos::new(
                    column.x.div_euclid(SECTION_SIZE as i32),
                    0,
                    column.y.div_euclid(SECTION_SIZE as i32),
                );
                section
                    .corner_columns()
                    .iter()
                    .all(|c| catalog.get(self.map.sample(*c).actual).structure() == Some(id))
            }
        };
        hit.then(|| {
            let info = self.ground_info(column, &sample);
            IVec3::new(column.x, info.height, column.y)
        })
    }
}

fn ring_offsets(ring: i32) -> Vec<IVec2> {
    if ring == 0 {
        return vec![IVec2::ZERO];
    }
    let mut offsets = Vec::with_capacity(ring as usize * 8);
    for d in -ring..=ring {
        offsets.push(IVec2::new(d, -ring));
        offsets.push(IVec2::new(d, ring));
    }
    for d in (-ring + 1)..ring {
        offsets.push(IVec2::new(-ring, d));
        offsets.push(IVec2::new(ring, d));
    }
    offsets
}

/// Scoped handle for one chunk's base-terrain generation pass.
pub struct GenerationContext<'a> {
    generator: &'a Generator,
    store: Arc<ColumnSampleStore>,
}

impl<'a> GenerationContext<'a> {
    /// Creates a context for the given chunk, pinning its sample store.
    pub fn new(generator: &'a Generator, chunk: ChunkPos) -> Self {
        let store = generator.sample_store(chunk);
        Self { generator, store }
    }

    /// The pinned sample store.
    pub fn store(&self) -> &Arc<ColumnSampleStore> {
        &self.store
    }

    /// Resolves one voxel through the pinned store.
    pub fn content_at(&self, position: IVec3) -> Content {
        let column = IVec2::new(position.x, position.z);
        self.generator
            .content_at(column, position.y, self.store.sample(column))
    }

    /// Fills a section of this chunk with base terrain.
    pub fn fill_section(&self, section: &mut Section) {
        self.generator.fill_section(section, &self.store);
    }
}

/// Scoped handle for one chunk's decoration pass, with surface heights
/// computed once up front.
pub struct DecorationContext<'a> {
    generator: &'a Generator,
    store: Arc<ColumnSampleStore>,
    surface: [i32; CHUNK_FOOTPRINT],
}

impl<'a> DecorationContext<'a> {
    /// Creates a context for the given chunk.
    pub fn new(generator: &'a Generator, chunk: ChunkPos) -> Self {
        let store = generator.sample_store(chunk);
        let surface = generator.surface_heights(&store);
        Self {
            generator,
            store,
            surface,
        }
    }

    /// Ground heights for the chunk footprint, row-major (z, then x).
    pub fn surface(&self) -> &[i32; CHUNK_FOOTPRINT] {
        &self.surface
    }

    /// Runs structure then decoration placement for one section.
    pub fn decorate_section(&self, section: &mut Section) {
        self.generator
            .generate_structures(section, &self.store, &self.surface);
        self.generator
            .generate_decorations(section, &self.store, &self.surface);
    }
}
