use rand::Rng;
use std::ops::Index;

/// Stimulus sequence for one run. Generated once, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence(Vec<u8>);

impl Sequence {
    pub fn new(values: Vec<u8>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, step: usize) -> Option<u8> {
        self.0.get(step).copied()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl Index<usize> for Sequence {
    type Output = u8;

    fn index(&self, step: usize) -> &u8 {
        &self.0[step]
    }
}

impl From<Vec<u8>> for Sequence {
    fn from(values: Vec<u8>) -> Self {
        Self::new(values)
    }
}

/// Draws each position independently and uniformly from a bounded alphabet,
/// 1..=8 by default. No uniqueness constraint across positions.
#[derive(Debug, Clone, Copy)]
pub struct SequenceGenerator {
    low: u8,
    high: u8,
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self { low: 1, high: 8 }
    }
}

impl SequenceGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alphabet(low: u8, high: u8) -> Self {
        debug_assert!(low <= high);
        Self { low, high }
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, length: usize) -> Sequence {
        Sequence::new(
            (0..length)
                .map(|_| rng.random_range(self.low..=self.high))
                .collect(),
        )
    }
}
