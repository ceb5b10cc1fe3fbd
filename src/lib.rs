//! This file is the root of the `dataframe` Rust crate.
//!
//! The crate provides a typed, columnar table (`DataFrame`) with twenty column
//! kinds, element-wise validation and kind conversion, and the self-describing
//! v2 binary format with its optional zlib wrapper.
//!
//! Its responsibilities are strictly limited to declaring the modules and
//! re-exporting the public surface:
//!
//! ```no_run
//! use dataframe::{deserialize, serialize, Column, ColumnData, DataFrame};
//!
//! # fn main() -> dataframe::Result<()> {
//! let frame = DataFrame::new_default(vec![
//!     Column::named("A", ColumnData::Int(vec![1, 2, 3]))?,
//! ])?;
//! let bytes = serialize(&frame, true)?;
//! assert_eq!(deserialize(&bytes)?, frame);
//! # Ok(())
//! # }
//! ```

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod bridge;
pub mod column;
pub mod config;
pub mod error;
pub mod frame;
pub mod kernels;
pub mod null_handling;
pub mod observability;
pub mod types;

mod traits;

//==================================================================================
// 2. Public Re-exports
//==================================================================================
pub use bridge::{
    compress, decompress, deserialize, deserialize_into, from_base64, peek_header, read_file,
    serialize, serialize_with_config, to_base64, write_file, HeaderInfo,
};
pub use column::{Column, ColumnData};
pub use config::CodecConfig;
pub use error::{DataFrameError, ErrorCategory, Result};
pub use frame::{DataFrame, Table};
pub use null_handling::BitVector;
pub use observability::enable_verbose_logging;
pub use types::{ColumnKind, ElementKind, Value};
