//! This module defines the core, strongly-typed data representations used
//! throughout the dataframe library.
//!
//! It includes the `ColumnKind` registry, whose type codes are persisted in the
//! v2 wire header, and the dynamically-typed `Value` cell used by the
//! element-wise column API.

pub mod column_kind;
pub mod value;

// Re-export the main type(s) for easier access.
pub use column_kind::{ColumnKind, ElementKind, ALL_COLUMN_KINDS};
pub use value::{is_printable_char, Value, DEFAULT_BINARY, DEFAULT_CHAR, DEFAULT_STRING};
