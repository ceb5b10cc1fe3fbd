// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the public-facing serialization API of the library. It turns any
// `Table` into the self-describing v2 byte format and back.
//
// Data Flow (Serialization):
//
//   1. [Stateless API (serialize)]      -> Receives `&impl Table` and a `CodecConfig`
//         |
//         `-> a. `encoder` writes header + payload in two call-scoped buffers
//         |
//         `-> b. `kernels::deflate` optionally wraps the result (marker 0x64 0x66)
//
// Data Flow (Deserialization):
//
//   1. [Stateless API (deserialize)]    -> Receives `&[u8]`
//         |
//         `-> a. Marker present? -> `kernels::deflate` restores and inflates
//         |
//         `-> b. `decoder` validates the header and rebuilds every column
//         |
//         `-> c. `Table::from_columns` assembles the caller's container
//
//   [io] wraps both flows for files and Base64 text.
//
// ====================================================================================
pub(crate) mod decoder;
pub(crate) mod encoder;
pub mod format;
pub mod io;
pub mod stateless_api;

// --- Low-Level Stateless API ---
pub use stateless_api::{
    compress, decompress, deserialize, deserialize_into, peek_header, serialize,
    serialize_with_config,
};

// --- File & Text Wrappers ---
pub use io::{from_base64, read_file, to_base64, write_file};

// --- Format Constants and Structs ---
pub use format::HeaderInfo;

#[cfg(test)]
mod tests;
