//! This module contains the pure, stateless kernels for the optional outer
//! compression layer of the v2 format.
//!
//! A compressed buffer is a plain zlib stream whose two header bytes have been
//! overwritten with the marker `0x64 0x66`. Decompression checks the marker,
//! restores the canonical zlib header `0x78 0x9c` and inflates. Since `0x789c`
//! is a valid header for any compression level, the level used on the way in
//! does not need to be recorded.
//! This module is a safe, panic-free wrapper around the `flate2` crate.

use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use std::io::Write;

use crate::bridge::format::{COMPRESSED_MARKER, ZLIB_HEADER};
use crate::error::{DataFrameError, Result};

/// The zlib default level; its stream header is exactly `ZLIB_HEADER`.
pub const DEFAULT_LEVEL: u32 = 6;

//==================================================================================
// 1. Public API
//==================================================================================

/// Compresses `input_bytes` at the default level and stamps the marker.
pub fn encode(input_bytes: &[u8]) -> Result<Vec<u8>> {
    encode_with_level(input_bytes, DEFAULT_LEVEL)
}

/// Compresses `input_bytes` at `level` (0..=9) and stamps the marker.
pub fn encode_with_level(input_bytes: &[u8], level: u32) -> Result<Vec<u8>> {
    if level > 9 {
        return Err(DataFrameError::Config(format!(
            "Compression level must be in 0..=9, got {}",
            level
        )));
    }
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(input_bytes.len() / 2 + 16),
        Compression::new(level),
    );
    encoder.write_all(input_bytes)?;
    let mut output_buf = encoder.finish()?;

    if output_buf.len() < COMPRESSED_MARKER.len() {
        return Err(DataFrameError::InternalError(
            "zlib produced a stream shorter than its header".into(),
        ));
    }
    output_buf[..COMPRESSED_MARKER.len()].copy_from_slice(&COMPRESSED_MARKER);

    log::debug!(
        "compressed {} bytes to {} bytes (level {})",
        input_bytes.len(),
        output_buf.len(),
        level
    );
    Ok(output_buf)
}

/// Reverses [`encode`]. Fails with a format error on a missing marker or a
/// corrupt stream.
pub fn decode(input_bytes: &[u8]) -> Result<Vec<u8>> {
    if input_bytes.len() < 3 {
        return Err(DataFrameError::Format(format!(
            "Compressed data too short: {} bytes",
            input_bytes.len()
        )));
    }
    if !is_compressed(input_bytes) {
        return Err(DataFrameError::Format(
            "Invalid compression marker".into(),
        ));
    }

    let mut stream = input_bytes.to_vec();
    stream[..ZLIB_HEADER.len()].copy_from_slice(&ZLIB_HEADER);

    let output_buf = inflate(&stream)?;

    log::debug!(
        "decompressed {} bytes to {} bytes",
        input_bytes.len(),
        output_buf.len()
    );
    Ok(output_buf)
}

/// Inflates a complete zlib stream. A stream that ends before its final
/// block is reported as truncated rather than returning partial output.
fn inflate(stream: &[u8]) -> Result<Vec<u8>> {
    let mut inflater = Decompress::new(true);
    let mut output_buf = Vec::with_capacity(stream.len().saturating_mul(4).max(64));
    loop {
        let in_before = inflater.total_in();
        let out_before = inflater.total_out();
        let status = inflater
            .decompress_vec(
                &stream[in_before as usize..],
                &mut output_buf,
                FlushDecompress::Finish,
            )
            .map_err(|e| DataFrameError::Format(format!("Corrupt compressed data: {}", e)))?;
        if status == Status::StreamEnd {
            return Ok(output_buf);
        }
        let progressed = inflater.total_in() != in_before || inflater.total_out() != out_before;
        if output_buf.len() == output_buf.capacity() {
            output_buf.reserve(output_buf.capacity());
        } else if !progressed {
            return Err(DataFrameError::Format(
                "Truncated compressed data".into(),
            ));
        }
    }
}

/// Returns `true` if `bytes` start with the compression marker.
pub fn is_compressed(bytes: &[u8]) -> bool {
    bytes.starts_with(&COMPRESSED_MARKER)
}

//==================================================================================
// 2. Unit Tests
//==================================================================================
