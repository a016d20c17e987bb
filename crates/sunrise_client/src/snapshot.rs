//! Generation-tagged reads
//!
//! Every refresh round gets a new generation number. Values read in different rounds
//! cannot be combined, which keeps a plan from mixing a fresh supply figure with stale
//! allocations.

use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::PreconditionError;

#[derive(Debug, Default)]
pub struct Generations(AtomicU64);

impl Generations {
    /// Starts a new refresh round
    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<T> {
    generation: u64,
    value: T,
}

impl<T> Snapshot<T> {
    pub fn new(generation: u64, value: T) -> Self {
        Self { generation, value }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Snapshot<U> {
        Snapshot {
            generation: self.generation,
            value: f(self.value),
        }
    }

    pub fn ensure_generation(&self, expected: u64) -> Result<(), PreconditionError> {
        if self.generation != expected {
            return Err(PreconditionError::StaleSnapshot {
                expected,
                found: self.generation,
            });
        }
        Ok(())
    }

    /// Pairs two reads from the same round
    pub fn zip<U>(self, other: Snapshot<U>) -> Result<Snapshot<(T, U)>, PreconditionError> {
        other.ensure_generation(self.generation)?;
        Ok(Snapshot {
            generation: self.generation,
            value: (self.value, other.value),
        })
    }
}

impl<T> Deref for Snapshot<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generations_increase() {
        let generations = Generations::default();
        assert_eq!(generations.current(), 0);
        assert_eq!(generations.advance(), 1);
        assert_eq!(generations.advance(), 2);
        assert_eq!(generations.current(), 2);
    }

    #[test]
    fn zip_rejects_mixed_rounds() {
        let a = Snapshot::new(3, "core");
        let b = Snapshot::new(4, "beam");

        assert_eq!(
            a.zip(b),
            Err(PreconditionError::StaleSnapshot {
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn zip_and_map_keep_generation() {
        let zipped = Snapshot::new(7, 1u64)
            .zip(Snapshot::new(7, 2u64))
            .unwrap()
            .map(|(a, b)| a + b);

        assert_eq!(zipped.generation(), 7);
        assert_eq!(*zipped, 3);
    }
}
