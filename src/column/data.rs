// In: src/column/data.rs

//! Typed backing storage for the twenty column kinds.
//!
//! Each variant owns a plain `Vec` of its element type. Nullable variants hold
//! `Option<T>`, so "absent" is a state of its own and never a sentinel value.
//! Chars are stored as their ASCII code.

use crate::error::{DataFrameError, Result};
use crate::types::{is_printable_char, ColumnKind, Value, DEFAULT_BINARY, DEFAULT_CHAR, DEFAULT_STRING};

#[derive(Debug, Clone)]
pub enum ColumnData {
    Byte(Vec<i8>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    String(Vec<String>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    Char(Vec<u8>),
    Boolean(Vec<bool>),
    Binary(Vec<Vec<u8>>),
    NullableByte(Vec<Option<i8>>),
    NullableShort(Vec<Option<i16>>),
    NullableInt(Vec<Option<i32>>),
    NullableLong(Vec<Option<i64>>),
    NullableString(Vec<Option<String>>),
    NullableFloat(Vec<Option<f32>>),
    NullableDouble(Vec<Option<f64>>),
    NullableChar(Vec<Option<u8>>),
    NullableBoolean(Vec<Option<bool>>),
    NullableBinary(Vec<Option<Vec<u8>>>),
}

//==================================================================================
// 1. Shape & Construction
//==================================================================================

impl ColumnData {
    /// A column of `len` default values, or `len` absent values for nullable kinds.
    pub fn filled(kind: ColumnKind, len: usize) -> Self {
        match kind {
            ColumnKind::Byte => Self::Byte(vec![0; len]),
            ColumnKind::Short => Self::Short(vec![0; len]),
            ColumnKind::Int => Self::Int(vec![0; len]),
            ColumnKind::Long => Self::Long(vec![0; len]),
            ColumnKind::String => Self::String(vec![DEFAULT_STRING.to_string(); len]),
            ColumnKind::Float => Self::Float(vec![0.0; len]),
            ColumnKind::Double => Self::Double(vec![0.0; len]),
            ColumnKind::Char => Self::Char(vec![DEFAULT_CHAR as u8; len]),
            ColumnKind::Boolean => Self::Boolean(vec![false; len]),
            ColumnKind::Binary => Self::Binary(vec![DEFAULT_BINARY.to_vec(); len]),
            ColumnKind::NullableByte => Self::NullableByte(vec![None; len]),
            ColumnKind::NullableShort => Self::NullableShort(vec![None; len]),
            ColumnKind::NullableInt => Self::NullableInt(vec![None; len]),
            ColumnKind::NullableLong => Self::NullableLong(vec![None; len]),
            ColumnKind::NullableString => Self::NullableString(vec![None; len]),
            ColumnKind::NullableFloat => Self::NullableFloat(vec![None; len]),
            ColumnKind::NullableDouble => Self::NullableDouble(vec![None; len]),
            ColumnKind::NullableChar => Self::NullableChar(vec![None; len]),
            ColumnKind::NullableBoolean => Self::NullableBoolean(vec![None; len]),
            ColumnKind::NullableBinary => Self::NullableBinary(vec![None; len]),
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Byte(_) => ColumnKind::Byte,
            Self::Short(_) => ColumnKind::Short,
            Self::Int(_) => ColumnKind::Int,
            Self::Long(_) => ColumnKind::Long,
            Self::String(_) => ColumnKind::String,
            Self::Float(_) => ColumnKind::Float,
            Self::Double(_) => ColumnKind::Double,
            Self::Char(_) => ColumnKind::Char,
            Self::Boolean(_) => ColumnKind::Boolean,
            Self::Binary(_) => ColumnKind::Binary,
            Self::NullableByte(_) => ColumnKind::NullableByte,
            Self::NullableShort(_) => ColumnKind::NullableShort,
            Self::NullableInt(_) => ColumnKind::NullableInt,
            Self::NullableLong(_) => ColumnKind::NullableLong,
            Self::NullableString(_) => ColumnKind::NullableString,
            Self::NullableFloat(_) => ColumnKind::NullableFloat,
            Self::NullableDouble(_) => ColumnKind::NullableDouble,
            Self::NullableChar(_) => ColumnKind::NullableChar,
            Self::NullableBoolean(_) => ColumnKind::NullableBoolean,
            Self::NullableBinary(_) => ColumnKind::NullableBinary,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Byte(v) => v.len(),
            Self::Short(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Long(v) => v.len(),
            Self::String(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Double(v) => v.len(),
            Self::Char(v) => v.len(),
            Self::Boolean(v) => v.len(),
            Self::Binary(v) => v.len(),
            Self::NullableByte(v) => v.len(),
            Self::NullableShort(v) => v.len(),
            Self::NullableInt(v) => v.len(),
            Self::NullableLong(v) => v.len(),
            Self::NullableString(v) => v.len(),
            Self::NullableFloat(v) => v.len(),
            Self::NullableDouble(v) => v.len(),
            Self::NullableChar(v) => v.len(),
            Self::NullableBoolean(v) => v.len(),
            Self::NullableBinary(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enforces the per-kind element rules on freshly supplied storage:
    /// chars must be printable and non-nullable strings are never empty.
    pub(crate) fn validated(mut self) -> Result<Self> {
        match &mut self {
            Self::Char(v) => {
                for &c in v.iter() {
                    check_char(c as char)?;
                }
            }
            Self::NullableChar(v) => {
                for c in v.iter().flatten() {
                    check_char(*c as char)?;
                }
            }
            Self::String(v) => {
                for s in v.iter_mut().filter(|s| s.is_empty()) {
                    *s = DEFAULT_STRING.to_string();
                }
            }
            _ => {}
        }
        Ok(self)
    }
}

//==================================================================================
// 2. Element Access
//==================================================================================

impl ColumnData {
    /// Reads one element; `None` marks an absent value of a nullable kind.
    pub fn get(&self, index: usize) -> Result<Option<Value>> {
        let length = self.len();
        if index >= length {
            return Err(DataFrameError::Bounds { index, length });
        }
        let value = match self {
            Self::Byte(v) => Some(Value::Byte(v[index])),
            Self::Short(v) => Some(Value::Short(v[index])),
            Self::Int(v) => Some(Value::Int(v[index])),
            Self::Long(v) => Some(Value::Long(v[index])),
            Self::String(v) => Some(Value::String(v[index].clone())),
            Self::Float(v) => Some(Value::Float(v[index])),
            Self::Double(v) => Some(Value::Double(v[index])),
            Self::Char(v) => Some(Value::Char(v[index] as char)),
            Self::Boolean(v) => Some(Value::Boolean(v[index])),
            Self::Binary(v) => Some(Value::Binary(v[index].clone())),
            Self::NullableByte(v) => v[index].map(Value::Byte),
            Self::NullableShort(v) => v[index].map(Value::Short),
            Self::NullableInt(v) => v[index].map(Value::Int),
            Self::NullableLong(v) => v[index].map(Value::Long),
            Self::NullableString(v) => v[index].clone().map(Value::String),
            Self::NullableFloat(v) => v[index].map(Value::Float),
            Self::NullableDouble(v) => v[index].map(Value::Double),
            Self::NullableChar(v) => v[index].map(|c| Value::Char(c as char)),
            Self::NullableBoolean(v) => v[index].map(Value::Boolean),
            Self::NullableBinary(v) => v[index].clone().map(Value::Binary),
        };
        Ok(value)
    }

    /// Returns `true` if the element at `index` is absent.
    pub fn is_null(&self, index: usize) -> Result<bool> {
        let length = self.len();
        if index >= length {
            return Err(DataFrameError::Bounds { index, length });
        }
        let null = match self {
            Self::NullableByte(v) => v[index].is_none(),
            Self::NullableShort(v) => v[index].is_none(),
            Self::NullableInt(v) => v[index].is_none(),
            Self::NullableLong(v) => v[index].is_none(),
            Self::NullableString(v) => v[index].is_none(),
            Self::NullableFloat(v) => v[index].is_none(),
            Self::NullableDouble(v) => v[index].is_none(),
            Self::NullableChar(v) => v[index].is_none(),
            Self::NullableBoolean(v) => v[index].is_none(),
            Self::NullableBinary(v) => v[index].is_none(),
            _ => false,
        };
        Ok(null)
    }

    /// Writes one element after validating it against the column kind.
    ///
    /// Integer values of any width are accepted when they fit the target width.
    pub fn set(&mut self, index: usize, value: Option<Value>) -> Result<()> {
        let length = self.len();
        if index >= length {
            return Err(DataFrameError::Bounds { index, length });
        }
        let kind = self.kind();
        match self {
            Self::Byte(v) => v[index] = integer(required(value, kind)?, kind)?,
            Self::Short(v) => v[index] = integer(required(value, kind)?, kind)?,
            Self::Int(v) => v[index] = integer(required(value, kind)?, kind)?,
            Self::Long(v) => v[index] = integer(required(value, kind)?, kind)?,
            Self::String(v) => {
                let s = string(required(value, kind)?, kind)?;
                v[index] = if s.is_empty() {
                    DEFAULT_STRING.to_string()
                } else {
                    s
                };
            }
            Self::Float(v) => v[index] = float(required(value, kind)?, kind)?,
            Self::Double(v) => v[index] = double(required(value, kind)?, kind)?,
            Self::Char(v) => v[index] = character(required(value, kind)?, kind)?,
            Self::Boolean(v) => v[index] = boolean(required(value, kind)?, kind)?,
            Self::Binary(v) => v[index] = binary(required(value, kind)?, kind)?,
            Self::NullableByte(v) => v[index] = value.map(|x| integer(x, kind)).transpose()?,
            Self::NullableShort(v) => v[index] = value.map(|x| integer(x, kind)).transpose()?,
            Self::NullableInt(v) => v[index] = value.map(|x| integer(x, kind)).transpose()?,
            Self::NullableLong(v) => v[index] = value.map(|x| integer(x, kind)).transpose()?,
            Self::NullableString(v) => v[index] = value.map(|x| string(x, kind)).transpose()?,
            Self::NullableFloat(v) => v[index] = value.map(|x| float(x, kind)).transpose()?,
            Self::NullableDouble(v) => v[index] = value.map(|x| double(x, kind)).transpose()?,
            Self::NullableChar(v) => v[index] = value.map(|x| character(x, kind)).transpose()?,
            Self::NullableBoolean(v) => v[index] = value.map(|x| boolean(x, kind)).transpose()?,
            Self::NullableBinary(v) => v[index] = value.map(|x| binary(x, kind)).transpose()?,
        }
        Ok(())
    }
}

//==================================================================================
// 3. Element Coercion Helpers
//==================================================================================

fn mismatch(value: &Value, kind: ColumnKind) -> DataFrameError {
    DataFrameError::Validation(format!(
        "Cannot store a {} value in a {} column",
        value.element_kind().type_name(),
        kind
    ))
}

fn required(value: Option<Value>, kind: ColumnKind) -> Result<Value> {
    value.ok_or_else(|| {
        DataFrameError::Validation(format!("{} column cannot hold null values", kind))
    })
}

fn check_char(c: char) -> Result<u8> {
    if is_printable_char(c) {
        Ok(c as u8)
    } else {
        Err(DataFrameError::Validation(format!(
            "Invalid character {:?}: only printable ASCII (32..=126) is allowed",
            c
        )))
    }
}

fn integer<T: TryFrom<i64>>(value: Value, kind: ColumnKind) -> Result<T> {
    let wide = value.as_i64().ok_or_else(|| mismatch(&value, kind))?;
    T::try_from(wide).map_err(|_| {
        DataFrameError::Validation(format!(
            "Value {} is out of range for a {} column",
            wide, kind
        ))
    })
}

fn float(value: Value, kind: ColumnKind) -> Result<f32> {
    match value {
        Value::Float(f) => Ok(f),
        other => Err(mismatch(&other, kind)),
    }
}

fn double(value: Value, kind: ColumnKind) -> Result<f64> {
    match value {
        Value::Double(d) => Ok(d),
        Value::Float(f) => Ok(f as f64),
        other => Err(mismatch(&other, kind)),
    }
}

fn character(value: Value, kind: ColumnKind) -> Result<u8> {
    match value {
        Value::Char(c) => check_char(c),
        Value::String(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => check_char(c),
                _ => Err(DataFrameError::Validation(format!(
                    "Expected a single character but found {:?}",
                    s
                ))),
            }
        }
        other => Err(mismatch(&other, kind)),
    }
}

fn string(value: Value, kind: ColumnKind) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(mismatch(&other, kind)),
    }
}

fn boolean(value: Value, kind: ColumnKind) -> Result<bool> {
    match value {
        Value::Boolean(b) => Ok(b),
        other => Err(mismatch(&other, kind)),
    }
}

fn binary(value: Value, kind: ColumnKind) -> Result<Vec<u8>> {
    match value {
        Value::Binary(b) => Ok(b),
        other => Err(mismatch(&other, kind)),
    }
}
