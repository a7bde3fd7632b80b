//! Seeded generator producing the synthetic entities for a run.

use bench_core::Alien;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of distinct system labels.
const SYSTEM_BOUND: u32 = 50;
/// Number of distinct planet labels.
const PLANET_BOUND: u32 = 500;
/// Number of distinct species labels.
const SPECIES_BOUND: u32 = 10_000;
/// Upper bound (exclusive) for generated ages.
const AGE_BOUND: u32 = 10_000;
/// Upper bound (exclusive) for generated weights.
const WEIGHT_BOUND: u32 = 200_000;
/// Upper bound (exclusive) for generated heights.
const HEIGHT_BOUND: u32 = 200_000;

/// Generator that produces deterministic synthetic entities.
///
/// The generator draws from a seeded random number generator, so the same
/// seed always produces the same entity sequence and benchmark runs stay
/// reproducible. Restarting a sequence means constructing a new generator
/// with the same seed.
pub struct AlienGenerator {
    /// Seeded random number generator for reproducibility
    rng: StdRng,
    /// Index assigned to the next entity
    index: u64,
}

impl AlienGenerator {
    /// Create a new generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            index: 0,
        }
    }

    /// Get the index the next entity will receive.
    pub fn current_index(&self) -> u64 {
        self.index
    }

    /// Generate the next entity.
    ///
    /// The random source is consumed in a fixed order per entity (system,
    /// planet, species, age, weight, height), so the entity at a given index
    /// is fully determined by the seed.
    fn next_alien(&mut self) -> Alien {
        let id = self.index;
        let system = format!("system{}", self.rng.gen_range(0..SYSTEM_BOUND));
        let planet = format!("planet{}", self.rng.gen_range(0..PLANET_BOUND));
        let species = format!("species{}", self.rng.gen_range(0..SPECIES_BOUND));
        let age = self.rng.gen_range(0..AGE_BOUND);
        let weight = self.rng.gen_range(0..WEIGHT_BOUND);
        let height = self.rng.gen_range(0..HEIGHT_BOUND);
        self.index += 1;

        Alien {
            id,
            system,
            planet,
            species,
            age,
            weight,
            height,
        }
    }

    /// Turn the generator into a lazy iterator over exactly `count` entities.
    pub fn aliens(self, count: u64) -> AlienIterator {
        AlienIterator {
            generator: self,
            remaining: count,
        }
    }
}

/// Iterator that lazily generates entities with sequential indices.
pub struct AlienIterator {
    generator: AlienGenerator,
    remaining: u64,
}

impl Iterator for AlienIterator {
    type Item = Alien;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;
        Some(self.generator.next_alien())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for AlienIterator {}
