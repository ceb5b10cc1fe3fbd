// In: src/null_handling/bitvector.rs

//! An append-only, MSB-first bit sequence.
//!
//! The codec uses it for two things: packing boolean column payloads, and
//! carrying the null-disambiguation bits of nullable tables. Storage is a
//! `BitVec<u8, Msb0>`, so bit `i` lives in byte `i / 8` under the mask
//! `1 << (7 - i % 8)`.

use bitvec::prelude::*;

use crate::error::{DataFrameError, Result};

/// Initial backing storage, in bytes.
const INITIAL_CAPACITY: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitVector {
    bits: BitVec<u8, Msb0>,
}

impl Default for BitVector {
    fn default() -> Self {
        Self::new()
    }
}

//==================================================================================
// 1. Core Logic
//==================================================================================

impl BitVector {
    /// Creates an empty bit vector.
    pub fn new() -> Self {
        Self {
            bits: BitVec::with_capacity(INITIAL_CAPACITY * 8),
        }
    }

    /// Wraps an existing byte sequence. Every bit of every byte is readable,
    /// so `size() == 8 * bytes.len()`.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bits: BitVec::from_vec(bytes),
        }
    }

    /// Appends a set bit.
    pub fn push_one(&mut self) {
        self.bits.push(true);
    }

    /// Appends a cleared bit.
    pub fn push_zero(&mut self) {
        self.bits.push(false);
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Reads the bit at `index`.
    pub fn get(&self, index: usize) -> Result<bool> {
        self.bits
            .get(index)
            .map(|bit| *bit)
            .ok_or(DataFrameError::Bounds {
                index,
                length: self.bits.len(),
            })
    }

    /// The number of logical bits.
    pub fn size(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// The minimal byte prefix holding every logical bit (`ceil(size / 8)` bytes).
    /// Bits past `size()` in the last byte are zero: storage only grows by
    /// whole zeroed elements.
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl FromIterator<bool> for BitVector {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bv = Self::new();
        bv.bits.extend(iter);
        bv
    }
}

//==================================================================================
// 2. Unit Tests
//==================================================================================

#[cfg(test)]
#[path = "bitvector_tests.rs"]
mod tests;
