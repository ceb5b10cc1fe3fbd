// In: src/config.rs

//! The single source of truth for serialization settings.
//!
//! `CodecConfig` is meant to be created once at the application boundary
//! (e.g., from a JSON settings file) and passed by reference to
//! `serialize_with_config`. Every field has a default, so a partial or empty
//! document is valid.

use serde::{Deserialize, Serialize};

use crate::error::{DataFrameError, Result};
use crate::kernels::deflate::DEFAULT_LEVEL;

/// Provides the zlib default level for serde.
fn default_compression_level() -> u32 {
    DEFAULT_LEVEL
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct CodecConfig {
    /// Wrap the serialized table with the marked zlib layer.
    #[serde(default)]
    pub compress: bool,

    /// zlib level in `0..=9`. Decoding never needs to know it.
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            compress: false,
            compression_level: default_compression_level(),
        }
    }
}

impl CodecConfig {
    /// A default config with compression switched on or off.
    pub fn with_compression(compress: bool) -> Self {
        Self {
            compress,
            ..Self::default()
        }
    }

    /// Parses and validates a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.compression_level > 9 {
            return Err(DataFrameError::Config(format!(
                "compression_level must be in 0..=9, got {}",
                self.compression_level
            )));
        }
        Ok(())
    }
}
