// In: src/bridge/io.rs

//! File and Base64 wrappers around the stateless API. Both always write the
//! compressed representation.

use std::fs;
use std::path::Path;

use base64::prelude::*;

use crate::bridge::stateless_api::{deserialize, serialize};
use crate::error::Result;
use crate::frame::{DataFrame, Table};

/// Serializes and compresses `table` into the file at `path`, replacing it.
pub fn write_file<T: Table + ?Sized, P: AsRef<Path>>(path: P, table: &T) -> Result<()> {
    let bytes = serialize(table, true)?;
    fs::write(path.as_ref(), &bytes)?;
    log::debug!("wrote {} bytes to {}", bytes.len(), path.as_ref().display());
    Ok(())
}

/// Reads a table from a file written by [`write_file`] (or an uncompressed one).
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let bytes = fs::read(path.as_ref())?;
    log::debug!("read {} bytes from {}", bytes.len(), path.as_ref().display());
    deserialize(&bytes)
}

/// Serializes and compresses `table`, then encodes it as standard Base64.
pub fn to_base64<T: Table + ?Sized>(table: &T) -> Result<String> {
    Ok(BASE64_STANDARD.encode(serialize(table, true)?))
}

/// Reverses [`to_base64`].
pub fn from_base64(text: &str) -> Result<DataFrame> {
    let bytes = BASE64_STANDARD.decode(text.trim())?;
    deserialize(&bytes)
}
