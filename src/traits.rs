//! This module defines shared traits used across the codec and conversion kernels.

/// A fixed-width numeric element with a big-endian wire representation.
pub trait WireScalar: Copy + PartialEq + Default {
    /// Number of bytes one element occupies on the wire.
    const WIDTH: usize;

    /// Appends the big-endian bytes of `self` to `out`.
    fn write_be(self, out: &mut Vec<u8>);

    /// Reads an element from the first `WIDTH` bytes of `bytes`.
    ///
    /// Callers guarantee `bytes.len() >= WIDTH`.
    fn read_be(bytes: &[u8]) -> Self;

    /// `true` for numeric zero; both signed zeros count for floats.
    fn is_zero(self) -> bool {
        self == Self::default()
    }
}

// Implement the trait for all primitive numeric element types.
macro_rules! impl_wire_scalar {
    ($T:ty, $width:expr) => {
        impl WireScalar for $T {
            const WIDTH: usize = $width;

            #[inline]
            fn write_be(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_be_bytes());
            }

            #[inline]
            fn read_be(bytes: &[u8]) -> Self {
                let mut buf = [0u8; $width];
                buf.copy_from_slice(&bytes[..$width]);
                <$T>::from_be_bytes(buf)
            }
        }
    };
}

impl_wire_scalar!(i8, 1);
impl_wire_scalar!(i16, 2);
impl_wire_scalar!(i32, 4);
impl_wire_scalar!(i64, 8);
impl_wire_scalar!(f32, 4);
impl_wire_scalar!(f64, 8);
