//! This module defines the canonical, type-safe registry of the twenty column
//! kinds and their persisted type codes.

use crate::error::{DataFrameError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The ten element types a column can hold, independent of nullability.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Byte,
    Short,
    Int,
    Long,
    String,
    Float,
    Double,
    Char,
    Boolean,
    Binary,
}

impl ElementKind {
    /// The name shared by the nullable and the non-nullable kind of this element.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::String => "string",
            Self::Float => "float",
            Self::Double => "double",
            Self::Char => "char",
            Self::Boolean => "boolean",
            Self::Binary => "binary",
        }
    }

    /// Returns `true` for the integer and floating-point element types.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Byte | Self::Short | Self::Int | Self::Long | Self::Float | Self::Double
        )
    }
}

/// The canonical representation of a column kind.
///
/// The discriminants are the type codes persisted in the v2 wire header and
/// must never change.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ColumnKind {
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    String = 5,
    Float = 6,
    Double = 7,
    Char = 8,
    Boolean = 9,
    NullableByte = 10,
    NullableShort = 11,
    NullableInt = 12,
    NullableLong = 13,
    NullableString = 14,
    NullableFloat = 15,
    NullableDouble = 16,
    NullableChar = 17,
    NullableBoolean = 18,
    Binary = 19,
    NullableBinary = 20,
}

/// Every column kind, ordered by type code.
pub const ALL_COLUMN_KINDS: [ColumnKind; 20] = [
    ColumnKind::Byte,
    ColumnKind::Short,
    ColumnKind::Int,
    ColumnKind::Long,
    ColumnKind::String,
    ColumnKind::Float,
    ColumnKind::Double,
    ColumnKind::Char,
    ColumnKind::Boolean,
    ColumnKind::NullableByte,
    ColumnKind::NullableShort,
    ColumnKind::NullableInt,
    ColumnKind::NullableLong,
    ColumnKind::NullableString,
    ColumnKind::NullableFloat,
    ColumnKind::NullableDouble,
    ColumnKind::NullableChar,
    ColumnKind::NullableBoolean,
    ColumnKind::Binary,
    ColumnKind::NullableBinary,
];

impl ColumnKind {
    /// Looks up a kind by its persisted type code.
    pub fn from_type_code(code: u8) -> Result<Self> {
        ALL_COLUMN_KINDS
            .get((code as usize).wrapping_sub(1))
            .copied()
            .ok_or(DataFrameError::UnknownColumnKind(code))
    }

    /// Builds a kind from its element type and nullability.
    pub fn from_parts(element: ElementKind, nullable: bool) -> Self {
        let base = match element {
            ElementKind::Byte => Self::Byte,
            ElementKind::Short => Self::Short,
            ElementKind::Int => Self::Int,
            ElementKind::Long => Self::Long,
            ElementKind::String => Self::String,
            ElementKind::Float => Self::Float,
            ElementKind::Double => Self::Double,
            ElementKind::Char => Self::Char,
            ElementKind::Boolean => Self::Boolean,
            ElementKind::Binary => Self::Binary,
        };
        if nullable {
            base.as_nullable()
        } else {
            base
        }
    }

    /// Resolves a type name (and its common aliases) to the non-nullable kind.
    pub fn from_type_name(name: &str) -> Result<Self> {
        let kind = match name.trim().to_ascii_lowercase().as_str() {
            "byte" => Self::Byte,
            "short" => Self::Short,
            "int" | "integer" => Self::Int,
            "long" => Self::Long,
            "string" | "str" => Self::String,
            "float" => Self::Float,
            "double" => Self::Double,
            "char" | "character" => Self::Char,
            "boolean" | "bool" => Self::Boolean,
            "binary" => Self::Binary,
            other => {
                return Err(DataFrameError::Validation(format!(
                    "Unknown column type name: '{}'",
                    other
                )))
            }
        };
        Ok(kind)
    }

    pub fn type_code(&self) -> u8 {
        *self as u8
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self.type_code(), 10..=18 | 20)
    }

    pub fn element(&self) -> ElementKind {
        match self {
            Self::Byte | Self::NullableByte => ElementKind::Byte,
            Self::Short | Self::NullableShort => ElementKind::Short,
            Self::Int | Self::NullableInt => ElementKind::Int,
            Self::Long | Self::NullableLong => ElementKind::Long,
            Self::String | Self::NullableString => ElementKind::String,
            Self::Float | Self::NullableFloat => ElementKind::Float,
            Self::Double | Self::NullableDouble => ElementKind::Double,
            Self::Char | Self::NullableChar => ElementKind::Char,
            Self::Boolean | Self::NullableBoolean => ElementKind::Boolean,
            Self::Binary | Self::NullableBinary => ElementKind::Binary,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.element().type_name()
    }

    pub fn is_numeric(&self) -> bool {
        self.element().is_numeric()
    }

    /// The nullable counterpart of this kind (identity for nullable kinds).
    pub fn as_nullable(&self) -> Self {
        if self.is_nullable() {
            return *self;
        }
        let code = self.type_code();
        let shifted = if code <= 18 { code + 9 } else { code + 1 };
        // Every non-nullable code maps onto a registered nullable code.
        ALL_COLUMN_KINDS[shifted as usize - 1]
    }

    /// The non-nullable counterpart of this kind (identity for non-nullable kinds).
    pub fn as_default(&self) -> Self {
        if !self.is_nullable() {
            return *self;
        }
        let code = self.type_code();
        let shifted = if code <= 18 { code - 9 } else { code - 1 };
        ALL_COLUMN_KINDS[shifted as usize - 1]
    }
}

/// Renders the variant name, e.g. `NullableInt`.
impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
