//! Seeded determinism utilities.
//!
//! A world is generated from a pair of independent seeds: one drives the
//! map-level fields (height, stone, territory partition), the other drives
//! all finer detail (sub-biome offsets, decoration grids, structure
//! placement). Keeping them separate makes macro-terrain and micro-detail
//! independently reproducible.

use std::hash::{DefaultHasher, Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use veld_voxel::SectionPos;

/// The two independent world seeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPair {
    /// Drives the height field, stone field and biome territory partition.
    pub map: u64,
    /// Drives sub-biome offsets, decorations and structures.
    pub detail: u64,
}

impl SeedPair {
    /// Creates a seed pair.
    pub fn new(map: u64, detail: u64) -> Self {
        Self { map, detail }
    }

    /// Derives both seeds from a single value, decorrelated by a fixed salt.
    pub fn split(seed: u64) -> Self {
        Self {
            map: seed,
            detail: derive_seed(seed, &[i64::from_le_bytes(*b"detail\0\0")]),
        }
    }
}

/// Derives a well-distributed u64 seed from a base seed and coordinates.
///
/// Uses SipHash (std's `DefaultHasher`), which is stable for a fixed key
/// across platforms and runs.
pub fn derive_seed(seed: u64, parts: &[i64]) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    for part in parts {
        part.hash(&mut hasher);
    }
    hasher.finish()
}

/// Derives a seed from a base seed and a stable name.
///
/// Used to give each named definition (sub-biome offsets, decorations) its
/// own decorrelated noise seed.
pub fn derive_name_seed(seed: u64, name: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    name.hash(&mut hasher);
    hasher.finish()
}

/// Deterministic RNG for one section.
///
/// The returned RNG produces an identical sequence for the same
/// `(seed, section)` pair, regardless of thread or platform.
pub fn section_rng(seed: u64, section: SectionPos) -> ChaCha8Rng {
    let derived = derive_seed(
        seed,
        &[
            i64::from(section.x),
            i64::from(section.y),
            i64::from(section.z),
        ],
    );
    ChaCha8Rng::seed_from_u64(derived)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn test_derive_seed_deterministic() {
        assert_eq!(
            derive_seed(999, &[42, 13]),
            derive_seed(999, &[42, 13]),
            "same inputs must produce same derived seed"
        );
    }

    #[test]
    fn test_derive_seed_sensitive_to_all_parts() {
        assert_ne!(derive_seed(1, &[0, 0]), derive_seed(2, &[0, 0]));
        assert_ne!(derive_seed(1, &[0, 0]), derive_seed(1, &[0, 1]));
        assert_ne!(derive_seed(1, &[0, 1]), derive_seed(1, &[1, 0]));
    }

    #[test]
    fn test_section_rng_sequences_match() {
        let section = SectionPos::new(10, 2, -30);
        let mut a = section_rng(42, section);
        let mut b = section_rng(42, section);
        for _ in 0..100 {
            assert_eq!(
                a.next_u64(),
                b.next_u64(),
                "sequences must match for the same seed and section"
            );
        }
    }

    #[test]
    fn test_split_decorrelates_map_and_detail() {
        let pair = SeedPair::split(7);
        assert_eq!(pair.map, 7);
        assert_ne!(pair.map, pair.detail);
        assert_eq!(pair, SeedPair::split(7));
    }
}
