// In: src/bridge/stateless_api.rs

//! The stateless serialization facade: whole tables in, whole buffers out.

use crate::bridge::decoder;
use crate::bridge::encoder;
use crate::bridge::format::HeaderInfo;
use crate::config::CodecConfig;
use crate::error::Result;
use crate::frame::{DataFrame, Table};
use crate::kernels::deflate;

/// Serializes a table to v2 bytes, optionally wrapped with the compression layer.
pub fn serialize<T: Table + ?Sized>(table: &T, compress: bool) -> Result<Vec<u8>> {
    serialize_with_config(table, &CodecConfig::with_compression(compress))
}

/// Serializes a table with explicit settings.
pub fn serialize_with_config<T: Table + ?Sized>(table: &T, config: &CodecConfig) -> Result<Vec<u8>> {
    config.validate()?;
    let bytes = encoder::encode(table)?;
    if config.compress {
        deflate::encode_with_level(&bytes, config.compression_level)
    } else {
        Ok(bytes)
    }
}

/// Deserializes v2 bytes (compressed or not) into a `DataFrame`.
pub fn deserialize(bytes: &[u8]) -> Result<DataFrame> {
    deserialize_into(bytes)
}

/// Deserializes v2 bytes (compressed or not) into any `Table` implementation.
pub fn deserialize_into<T: Table>(bytes: &[u8]) -> Result<T> {
    if deflate::is_compressed(bytes) {
        let inflated = deflate::decode(bytes)?;
        decoder::decode(&inflated)
    } else {
        decoder::decode(bytes)
    }
}

/// Compresses an arbitrary buffer with the marked zlib layer.
pub fn compress(bytes: &[u8]) -> Result<Vec<u8>> {
    deflate::encode(bytes)
}

/// Reverses [`compress`].
pub fn decompress(bytes: &[u8]) -> Result<Vec<u8>> {
    deflate::decode(bytes)
}

/// Reads only the header of a serialized table.
/// Compressed input is inflated first; column payloads are never decoded.
pub fn peek_header(bytes: &[u8]) -> Result<HeaderInfo> {
    if deflate::is_compressed(bytes) {
        let inflated = deflate::decode(bytes)?;
        let header = decoder::parse_header(&inflated)?;
        Ok(header.info(true, inflated.len()))
    } else {
        let header = decoder::parse_header(bytes)?;
        Ok(header.info(false, bytes.len()))
    }
}
