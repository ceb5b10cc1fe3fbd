// In: src/bridge/format.rs

//! Defines all on-wire constants and structures of the v2 format.
//! This is the single source of truth shared by the encoder, the decoder and
//! the compression kernel.
//!
//! Layout (all multi-byte integers big-endian):
//!
//! ```text
//! "{v:2;"  impl(1)  rows(u32)  cols(u32)  names(cols x [utf8 0x00])  codes(cols x u8)
//!   nullable tables only: bit_list_len(u32) bit_list(bit_list_len)
//! "}"  payload (column-major)
//! ```

use crate::types::ColumnKind;
use serde::Serialize;

//==================================================================================
// I. Header Constants
//==================================================================================

/// Full magic of the supported version.
pub const MAGIC: &[u8; 5] = b"{v:2;";
/// The part of the magic shared by every version.
pub const MAGIC_PREFIX: &[u8; 3] = b"{v:";
/// Version byte of the supported format.
pub const FORMAT_VERSION: u8 = b'2';
/// Version byte of the legacy format, which is recognised but not supported.
pub const LEGACY_FORMAT_VERSION: u8 = b'1';
/// Byte closing the magic.
pub const MAGIC_TERMINATOR: u8 = b';';

/// Implementation byte of a default (non-nullable) table: `'d'`.
pub const IMPL_DEFAULT: u8 = 0x64;
/// Implementation byte of a nullable table: `'n'`.
pub const IMPL_NULLABLE: u8 = 0x6e;

/// Terminates every column name and every string value.
pub const DELIMITER: u8 = 0x00;
/// Closes the header.
pub const HEADER_TERMINATOR: u8 = b'}';

/// Fixed header size up to and including the column count.
pub const FIXED_HEADER_SIZE: usize = MAGIC.len() + 1 + 4 + 4;

//==================================================================================
// II. Compression Constants
//==================================================================================

/// First two bytes of a compressed buffer, overwriting the zlib header.
pub const COMPRESSED_MARKER: [u8; 2] = [0x64, 0x66];
/// The canonical zlib header restored before inflating.
pub const ZLIB_HEADER: [u8; 2] = [0x78, 0x9c];

//==================================================================================
// III. Header Metadata
//==================================================================================

/// Metadata extracted from a serialized table's header.
/// This is the return type of `peek_header`, which inspects a buffer without
/// decoding any column payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderInfo {
    /// `true` if the input carried the compression marker.
    pub compressed: bool,
    pub nullable: bool,
    pub rows: usize,
    pub columns: usize,
    /// Wire names, in column order (index text for unlabeled columns).
    pub names: Vec<String>,
    pub kinds: Vec<ColumnKind>,
    /// Length in bytes of the null-bit list (0 for default tables).
    pub null_list_len: usize,
    /// Size of the uncompressed header, including the terminator.
    pub header_size: usize,
    /// Size of the uncompressed payload following the header.
    pub payload_size: usize,
}
