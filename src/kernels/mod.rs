//! Pure, stateless byte-level kernels.

pub mod deflate;
