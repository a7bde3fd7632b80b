//! Deterministic synthetic-record generation for insert-bench.
//!
//! The generator produces a lazy sequence of [`bench_core::Alien`] entities
//! from a seed. The same seed always yields the same sequence, so any two
//! runs of the same configuration load identical data.

pub mod generator;

pub use generator::{AlienGenerator, AlienIterator};
