//! Bit-level helpers for null disambiguation and boolean packing.

pub mod bitvector;

pub use bitvector::BitVector;
