//! Per-chunk sample stores and the bounded cache that memoizes them.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use glam::IVec2;
use rustc_hash::FxBuildHasher;

use crate::map::Map;
use crate::sample::Sample;
use veld_voxel::{CHUNK_FOOTPRINT, ChunkPos, SECTION_SIZE};

/// All samples for one chunk footprint, computed eagerly in one pass.
///
/// Immutable once built; shared between generation stages through `Arc`.
pub struct ColumnSampleStore {
    pos: ChunkPos,
    samples: Vec<Sample>,
}

impl ColumnSampleStore {
    /// Samples every column of the chunk footprint.
    pub fn build(map: &Map, pos: ChunkPos) -> Self {
        let origin = pos.origin_column();
        let mut samples = Vec::with_capacity(CHUNK_FOOTPRINT);
        for z in 0..SECTION_SIZE as i32 {
            for x in 0..SECTION_SIZE as i32 {
                samples.push(map.sample(origin + IVec2::new(x, z)));
            }
        }
        Self { pos, samples }
    }

    /// The chunk footprint this store covers.
    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    /// Returns the sample for a world column.
    ///
    /// # Panics
    ///
    /// Panics if the column lies outside this store's footprint.
    pub fn sample(&self, column: IVec2) -> &Sample {
        let local = column - self.pos.origin_column();
        assert!(
            (0..SECTION_SIZE as i32).contains(&local.x)
                && (0..SECTION_SIZE as i32).contains(&local.y),
            "column {column} outside chunk {:?}",
            self.pos
        );
        &self.samples[(local.y as usize) * SECTION_SIZE + local.x as usize]
    }

    /// Returns the sample at local footprint coordinates, each in `0..16`.
    pub fn sample_local(&self, x: usize, z: usize) -> &Sample {
        &self.samples[z * SECTION_SIZE + x]
    }

    /// Iterates samples in row-major (z, then x) order.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }
}

struct CacheEntry {
    store: Arc<ColumnSampleStore>,
    last_use: AtomicU64,
}

/// Bounded, concurrency-friendly cache of sample stores keyed by chunk.
///
/// Lookups touch a logical clock per entry; when the map grows past its
/// capacity the least recently used entries are dropped. Entry-level
/// locking comes from the underlying sharded map, so concurrent requests
/// for different chunks never serialize against each other.
pub struct SampleStoreCache {
    entries: DashMap<ChunkPos, CacheEntry, FxBuildHasher>,
    tick: AtomicU64,
    capacity: usize,
}

impl SampleStoreCache {
    /// Creates a cache that holds at most `capacity` chunk stores.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::with_hasher(FxBuildHasher),
            tick: AtomicU64::new(0),
            capacity: capacity.max(1),
        }
    }

    /// Capacity that keeps every chunk within `view_distance` resident,
    /// with one spare ring for neighbor prefetches at the edge.
    pub fn capacity_for_view_distance(view_distance: u32) -> usize {
        let side = 2 * view_distance as usize + 1;
        side * side + 2 * side
    }

    /// Returns the cached store for a chunk, if present, marking it used.
    pub fn get(&self, pos: ChunkPos) -> Option<Arc<ColumnSampleStore>> {
        let entry = self.entries.get(&pos)?;
        entry.last_use.store(self.next_tick(), Ordering::Relaxed);
        Some(Arc::clone(&entry.store))
    }

    /// Returns the store for a chunk, building it on a miss.
    ///
    /// Concurrent callers for the same chunk may race on the build; the
    /// first insert wins and later callers get the winner's store.
    pub fn get_or_build(&self, map: &Map, pos: ChunkPos) -> Arc<ColumnSampleStore> {
        let tick = self.next_tick();
        let store = {
            let entry = self.entries.entry(pos).or_insert_with(|| CacheEntry {
                store: Arc::new(ColumnSampleStore::build(map, pos)),
                last_use: AtomicU64::new(tick),
            });
            entry.last_use.store(tick, Ordering::Relaxed);
            Arc::clone(&entry.store)
        };
        self.evict_excess();
        store
    }

    /// Number of currently cached chunk stores.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn next_tick(&self) -> u64 {
        self.tick.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn evict_excess(&self) {
        let excess = self.entries.len().saturating_sub(self.capacity);
        if excess == 0 {
            return;
        }
        let mut by_age: Vec<(ChunkPos, u64)> = self
            .entries
            .iter()
            .map(|e| (*e.key(), e.last_use.load(Ordering::Relaxed)))
            .collect();
        by_age.sort_by_key(|&(_, tick)| tick);
        for &(pos, tick) in by_age.iter().take(excess) {
            // Skip entries touched after the snapshot was taken.
            let removed = self
                .entries
                .remove_if(&pos, |_, entry| {
                    entry.last_use.load(Ordering::Relaxed) == tick
                })
                .is_some();
            if removed {
                tracing::debug!(?pos, "evicted chunk sample store");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{BiomeDef, CoverDef, LayerDef, LayerKindDef, OffsetDef, SubBiomeDef, WeightedRef};
    use crate::map::{DistributionDef, DistributionEntry, WeightedSubBiomes};
    use crate::seed::SeedPair;
    use crate::settings::GenerationSettings;
    use veld_voxel::BlockId;

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
        let seeds = SeedPair::new(11, 13);
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

    #[test]
    fn test_store_matches_direct_map_samples() {
        let map = test_map();
        let pos = ChunkPos::new(-2, 5);
        let store = ColumnSampleStore::build(&map, pos);

        let origin = pos.origin_column();
        for z in 0..SECTION_SIZE as i32 {
            for x in 0..SECTION_SIZE as i32 {
                let column = origin + IVec2::new(x, z);
                assert_eq!(*store.sample(column), map.sample(column));
            }
        }
    }

    #[test]
    #[should_panic(expected = "outside chunk")]
    fn test_store_rejects_foreign_column() {
        let map = test_map();
        let store = ColumnSampleStore::build(&map, ChunkPos::new(0, 0));
        store.sample(IVec2::new(16, 0));
    }

    #[test]
    fn test_cache_returns_same_store_for_repeat_requests() {
        let map = test_map();
        let cache = SampleStoreCache::new(8);
        let pos = ChunkPos::new(1, 1);

        let first = cache.get_or_build(&map, pos);
        let second = cache.get_or_build(&map, pos);
        assert!(Arc::ptr_eq(&first, &second), "cache must reuse the stored Arc");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_evicts_least_recently_used() {
        let map = test_map();
        let cache = SampleStoreCache::new(2);

        cache.get_or_build(&map, ChunkPos::new(0, 0));
        cache.get_or_build(&map, ChunkPos::new(1, 0));
        // Touch (0, 0) so (1, 0) becomes the oldest.
        assert!(cache.get(ChunkPos::new(0, 0)).is_some());
        cache.get_or_build(&map, ChunkPos::new(2, 0));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(ChunkPos::new(0, 0)).is_some());
        assert!(cache.get(ChunkPos::new(1, 0)).is_none());
        assert!(cache.get(ChunkPos::new(2, 0)).is_some());
    }

    #[test]
    fn test_capacity_for_view_distance_covers_active_square() {
        assert_eq!(SampleStoreCache::capacity_for_view_distance(0), 3);
        let side = 2 * 12 + 1;
        assert_eq!(
            SampleStoreCache::capacity_for_view_distance(12),
            side * side + 2 * side
        );
    }
}
