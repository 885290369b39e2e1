//! Base sequence construction and per-trial shuffling.

use crate::error::SweepError;
use rand::seq::SliceRandom;
use rand::Rng;

/// `n * m` values where each of `1..=n` appears exactly `m` times.
///
/// Position `i` of the canonical layout holds `(i % n) + 1`. The layout is
/// never mutated; trials shuffle a copy.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Multiset {
    n: u32,
    m: u32,
    values: Vec<u32>,
}

impl Multiset {
    pub fn build(n: u32, m: u32) -> Result<Self, SweepError> {
        if n == 0 || m == 0 {
            return Err(SweepError::contract(format!(
                "multiset requires n >= 1 and m >= 1, got n={n}, m={m}"
            )));
        }
        let len = (n as usize)
            .checked_mul(m as usize)
            .ok_or_else(|| SweepError::contract(format!("multiset size n*m overflows (n={n}, m={m})")))?;
        // A Vec allocation may not exceed isize::MAX bytes
        let fits = len
            .checked_mul(std::mem::size_of::<u32>())
            .is_some_and(|bytes| bytes <= isize::MAX as usize);
        if !fits {
            return Err(SweepError::contract(format!(
                "multiset of {len} values exceeds the addressable allocation size (n={n}, m={m})"
            )));
        }

        let width = n as usize;
        let values = (0..len).map(|i| (i % width) as u32 + 1).collect();

        Ok(Self { n, m, values })
    }

    pub fn n(&self) -> u32 {
        self.n
    }

    pub fn m(&self) -> u32 {
        self.m
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.values
    }

    /// Returns a uniformly shuffled copy of the base sequence.
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<u32> {
        let mut copy = self.values.clone();
        copy.shuffle(rng);
        copy
    }

    /// Overwrites `buf` with the base sequence and shuffles it in place.
    pub fn shuffle_into<R: Rng + ?Sized>(&self, buf: &mut Vec<u32>, rng: &mut R) {
        buf.clear();
        buf.extend_from_slice(&self.values);
        buf.shuffle(rng);
    }
}
