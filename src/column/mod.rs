// In: src/column/mod.rs

//! The typed column model.
//!
//! A `Column` is an optional label plus one `ColumnData` variant. Every
//! mutation goes through a validating constructor or setter, so a column can
//! never hold an out-of-domain value (an unprintable char, an empty string in
//! a non-nullable string column, a null in a non-nullable kind).

pub mod convert;
pub mod data;

pub use data::ColumnData;

use crate::error::{DataFrameError, Result};
use crate::types::{ColumnKind, Value};

#[derive(Debug, Clone)]
pub struct Column {
    name: Option<String>,
    data: ColumnData,
}

//==================================================================================
// 1. Construction
//==================================================================================

impl Column {
    /// Wraps typed storage into an unlabeled column, validating every element.
    pub fn new(data: ColumnData) -> Result<Self> {
        Ok(Self {
            name: None,
            data: data.validated()?,
        })
    }

    /// Like [`Column::new`], with a label.
    pub fn named(name: &str, data: ColumnData) -> Result<Self> {
        Ok(Self::new(data)?.with_name(Some(name)))
    }

    /// A column of `len` defaults (or nulls, for nullable kinds).
    pub fn of_kind(kind: ColumnKind, len: usize) -> Self {
        Self {
            name: None,
            data: ColumnData::filled(kind, len),
        }
    }

    /// Like [`Column::of_kind`], resolving the kind from its persisted type code.
    pub fn of_type_code(code: u8, len: usize) -> Result<Self> {
        Ok(Self::of_kind(ColumnKind::from_type_code(code)?, len))
    }

    /// Builds a column element by element; `None` entries are nulls.
    pub fn from_values<I>(kind: ColumnKind, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = Option<Value>>,
    {
        let values: Vec<Option<Value>> = values.into_iter().collect();
        let mut column = Self::of_kind(kind, values.len());
        for (i, value) in values.into_iter().enumerate() {
            column.data.set(i, value)?;
        }
        Ok(column)
    }

    /// Replaces the label; an empty name leaves the column unlabeled.
    pub fn with_name(mut self, name: Option<&str>) -> Self {
        self.set_name(name);
        self
    }

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.filter(|n| !n.is_empty()).map(str::to_string);
    }
}

//==================================================================================
// 2. Accessors
//==================================================================================

impl Column {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    pub fn type_code(&self) -> u8 {
        self.kind().type_code()
    }

    pub fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    pub fn is_nullable(&self) -> bool {
        self.kind().is_nullable()
    }

    pub fn is_numeric(&self) -> bool {
        self.kind().is_numeric()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bulk read access to the typed storage.
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    /// Replaces the whole storage, validating it like [`Column::new`].
    pub fn set_data(&mut self, data: ColumnData) -> Result<()> {
        self.data = data.validated()?;
        Ok(())
    }

    pub fn get(&self, index: usize) -> Result<Option<Value>> {
        self.data.get(index)
    }

    pub fn set(&mut self, index: usize, value: Option<Value>) -> Result<()> {
        self.data.set(index, value)
    }

    pub fn is_null(&self, index: usize) -> Result<bool> {
        self.data.is_null(index)
    }

    /// The value newly created elements take: `None` for nullable kinds.
    pub fn default_value(&self) -> Option<Value> {
        if self.is_nullable() {
            None
        } else {
            Some(Value::default_for(self.kind().element()))
        }
    }

    /// The elements in order, `None` for nulls.
    pub fn values(&self) -> impl Iterator<Item = Option<Value>> + '_ {
        (0..self.len()).map(move |i| self.data.get(i).ok().flatten())
    }
}

/// Two columns are equal when label, kind and every element match; NaN floats
/// at the same position count as equal.
impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.kind() == other.kind()
            && self.len() == other.len()
            && self.values().eq(other.values())
    }
}

/// Rejects a requested column length that differs from an expected one.
pub(crate) fn check_length(column: &Column, expected: usize) -> Result<()> {
    if column.len() != expected {
        return Err(DataFrameError::Validation(format!(
            "Column length mismatch: expected {} but column {:?} has {}",
            expected,
            column.name().unwrap_or(""),
            column.len()
        )));
    }
    Ok(())
}
