// In: src/column/convert.rs

//! Element-wise conversion of a column into any other column kind.
//!
//! Conversion is driven by the element type of source and target. A cell that
//! converts to "no value" (for example a binary sequence too short to hold the
//! target number) becomes null in a nullable target and the default otherwise.

use super::{Column, ColumnData};
use crate::error::{DataFrameError, Result};
use crate::traits::WireScalar;
use crate::types::{is_printable_char, ColumnKind, ElementKind, Value};

//==================================================================================
// 1. Column-Level API
//==================================================================================

impl Column {
    /// Converts to the kind registered under `type_code`.
    pub fn convert_to(&self, type_code: u8) -> Result<Column> {
        let target = ColumnKind::from_type_code(type_code)?;
        self.convert_to_kind(target)
    }

    /// Converts every element to `target`, preserving the label.
    pub fn convert_to_kind(&self, target: ColumnKind) -> Result<Column> {
        if target == self.kind() {
            return Ok(self.clone());
        }
        let mut data = ColumnData::filled(target, self.len());
        for i in 0..self.len() {
            let converted = match self.data.get(i)? {
                Some(value) => convert_cell(value, target)?,
                None => None,
            };
            if converted.is_some() {
                data.set(i, converted)?;
            }
        }
        log::trace!(
            "converted column {:?} from {} to {} ({} rows)",
            self.name(),
            self.kind(),
            target,
            self.len()
        );
        Ok(Column {
            name: self.name.clone(),
            data,
        })
    }

    /// The nullable flavour of this column; values are copied verbatim.
    pub fn as_nullable(&self) -> Result<Column> {
        self.convert_to_kind(self.kind().as_nullable())
    }

    /// The non-nullable flavour of this column; nulls become the element default.
    pub fn as_default(&self) -> Result<Column> {
        self.convert_to_kind(self.kind().as_default())
    }
}

//==================================================================================
// 2. Cell Conversion Kernels
//==================================================================================

/// A numeric cell, widened without losing its integral/floating nature.
#[derive(Clone, Copy)]
enum Numeric {
    Integral(i64),
    Floating(f64),
}

impl Numeric {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(Self::Floating(*f as f64)),
            Value::Double(d) => Some(Self::Floating(*d)),
            other => other.as_i64().map(Self::Integral),
        }
    }

    /// Truncates toward zero for floats; NaN becomes 0.
    fn integral(self) -> i64 {
        match self {
            Self::Integral(i) => i,
            Self::Floating(f) => f as i64,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Self::Integral(i) => i == 0,
            Self::Floating(f) => f == 0.0,
        }
    }

    /// Narrowing keeps the low-order two's-complement bits.
    fn into_value(self, target: ElementKind) -> Option<Value> {
        let value = match target {
            ElementKind::Byte => Value::Byte(self.integral() as i8),
            ElementKind::Short => Value::Short(self.integral() as i16),
            ElementKind::Int => Value::Int(self.integral() as i32),
            ElementKind::Long => Value::Long(self.integral()),
            ElementKind::Float => match self {
                Self::Integral(i) => Value::Float(i as f32),
                Self::Floating(f) => Value::Float(f as f32),
            },
            ElementKind::Double => match self {
                Self::Integral(i) => Value::Double(i as f64),
                Self::Floating(f) => Value::Double(f),
            },
            _ => return None,
        };
        Some(value)
    }
}

fn conversion_error(value: &Value, target: ElementKind, reason: &str) -> DataFrameError {
    DataFrameError::Conversion(format!(
        "Cannot convert {} value '{}' to {}: {}",
        value.element_kind().type_name(),
        value,
        target.type_name(),
        reason
    ))
}

/// Converts one present cell. `Ok(None)` means "no value".
pub(crate) fn convert_cell(value: Value, target: ColumnKind) -> Result<Option<Value>> {
    let element = target.element();
    if value.element_kind() == element {
        return Ok(Some(value));
    }
    match value {
        Value::Byte(_)
        | Value::Short(_)
        | Value::Int(_)
        | Value::Long(_)
        | Value::Float(_)
        | Value::Double(_) => from_numeric(value, element),
        Value::Boolean(b) => Ok(Some(from_boolean(b, element))),
        Value::Char(c) => from_text(&c.to_string(), element)
            .map_err(|reason| conversion_error(&Value::Char(c), element, &reason)),
        Value::String(s) => from_text(&s, element)
            .map_err(|reason| conversion_error(&Value::String(s.clone()), element, &reason)),
        Value::Binary(b) => from_binary(&b, element),
    }
}

fn from_numeric(value: Value, target: ElementKind) -> Result<Option<Value>> {
    let numeric = Numeric::of(&value)
        .ok_or_else(|| DataFrameError::InternalError("non-numeric source".into()))?;
    let converted = match target {
        ElementKind::String => Value::String(value.to_string()),
        // The canonical text always starts with a printable ASCII character.
        ElementKind::Char => match value.to_string().chars().next() {
            Some(c) => Value::Char(c),
            None => return Ok(None),
        },
        ElementKind::Boolean => Value::Boolean(!numeric.is_zero()),
        ElementKind::Binary => Value::Binary(numeric_bytes(&value)),
        numeric_target => return Ok(numeric.into_value(numeric_target)),
    };
    Ok(Some(converted))
}

fn numeric_bytes(value: &Value) -> Vec<u8> {
    let mut out = Vec::with_capacity(8);
    match value {
        Value::Byte(v) => v.write_be(&mut out),
        Value::Short(v) => v.write_be(&mut out),
        Value::Int(v) => v.write_be(&mut out),
        Value::Long(v) => v.write_be(&mut out),
        Value::Float(v) => v.write_be(&mut out),
        Value::Double(v) => v.write_be(&mut out),
        _ => {}
    }
    out
}

fn from_boolean(b: bool, target: ElementKind) -> Value {
    match target {
        ElementKind::String => Value::String(b.to_string()),
        ElementKind::Char => Value::Char(if b { '1' } else { '0' }),
        ElementKind::Binary => Value::Binary(vec![b as u8]),
        ElementKind::Byte => Value::Byte(b as i8),
        ElementKind::Short => Value::Short(b as i16),
        ElementKind::Int => Value::Int(b as i32),
        ElementKind::Long => Value::Long(b as i64),
        ElementKind::Float => Value::Float(b as u8 as f32),
        ElementKind::Double => Value::Double(b as u8 as f64),
        ElementKind::Boolean => Value::Boolean(b),
    }
}

/// Shared by char and string sources. Errors carry only the reason; the
/// caller attaches the offending value.
fn from_text(text: &str, target: ElementKind) -> std::result::Result<Option<Value>, String> {
    let trimmed = text.trim();
    let value = match target {
        ElementKind::Byte => Value::Byte(trimmed.parse::<i8>().map_err(|e| e.to_string())?),
        ElementKind::Short => Value::Short(trimmed.parse::<i16>().map_err(|e| e.to_string())?),
        ElementKind::Int => Value::Int(trimmed.parse::<i32>().map_err(|e| e.to_string())?),
        ElementKind::Long => Value::Long(trimmed.parse::<i64>().map_err(|e| e.to_string())?),
        ElementKind::Float => Value::Float(trimmed.parse::<f32>().map_err(|e| e.to_string())?),
        ElementKind::Double => Value::Double(trimmed.parse::<f64>().map_err(|e| e.to_string())?),
        ElementKind::Boolean => Value::Boolean(parse_boolean(text)?),
        ElementKind::Char => match text.chars().next() {
            Some(c) if is_printable_char(c) => Value::Char(c),
            Some(_) => return Err("first character is not printable ASCII".into()),
            None => return Err("empty text has no first character".into()),
        },
        ElementKind::String => Value::String(text.to_string()),
        ElementKind::Binary => Value::Binary(text.as_bytes().to_vec()),
    };
    Ok(Some(value))
}

/// Case-insensitive boolean words: single letters/digits as stored in char
/// columns, plus the common long forms.
fn parse_boolean(text: &str) -> std::result::Result<bool, String> {
    match text.trim().to_ascii_lowercase().as_str() {
        "t" | "1" | "y" | "true" | "yes" | "on" => Ok(true),
        "f" | "0" | "n" | "false" | "no" | "off" => Ok(false),
        _ => Err("not a recognised boolean".into()),
    }
}

fn from_binary(bytes: &[u8], target: ElementKind) -> Result<Option<Value>> {
    let value = match target {
        ElementKind::Byte => read_leading::<i8>(bytes).map(Value::Byte),
        ElementKind::Short => read_leading::<i16>(bytes).map(Value::Short),
        ElementKind::Int => read_leading::<i32>(bytes).map(Value::Int),
        ElementKind::Long => read_leading::<i64>(bytes).map(Value::Long),
        ElementKind::Float => read_leading::<f32>(bytes).map(Value::Float),
        ElementKind::Double => read_leading::<f64>(bytes).map(Value::Double),
        ElementKind::String => Some(Value::String(Value::Binary(bytes.to_vec()).to_string())),
        ElementKind::Boolean => Some(Value::Boolean(bytes.iter().any(|b| *b != 0))),
        ElementKind::Char => match bytes.first() {
            Some(&b) if is_printable_char(b as char) => Some(Value::Char(b as char)),
            Some(_) => {
                return Err(conversion_error(
                    &Value::Binary(bytes.to_vec()),
                    target,
                    "first byte is not printable ASCII",
                ))
            }
            None => None,
        },
        ElementKind::Binary => Some(Value::Binary(bytes.to_vec())),
    };
    Ok(value)
}

/// Reads the leading big-endian element, if the sequence is long enough.
fn read_leading<T: WireScalar>(bytes: &[u8]) -> Option<T> {
    (bytes.len() >= T::WIDTH).then(|| T::read_be(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(value: Value, target: ColumnKind) -> Option<Value> {
        convert_cell(value, target).unwrap()
    }

    #[test]
    fn test_numeric_narrowing_wraps() {
        assert_eq!(cell(Value::Int(300), ColumnKind::Byte), Some(Value::Byte(44)));
        assert_eq!(cell(Value::Long(-1), ColumnKind::Short), Some(Value::Short(-1)));
        assert_eq!(
            cell(Value::Double(-2.9), ColumnKind::Int),
            Some(Value::Int(-2))
        );
        assert_eq!(cell(Value::Float(f32::NAN), ColumnKind::Long), Some(Value::Long(0)));
    }

    #[test]
    fn test_numeric_to_text_and_char() {
        assert_eq!(
            cell(Value::Double(1.0), ColumnKind::String),
            Some(Value::String("1.0".into()))
        );
        assert_eq!(cell(Value::Int(-42), ColumnKind::Char), Some(Value::Char('-')));
        assert_eq!(cell(Value::Short(7), ColumnKind::Char), Some(Value::Char('7')));
    }

    #[test]
    fn test_numeric_to_binary_is_big_endian() {
        assert_eq!(
            cell(Value::Short(0x0102), ColumnKind::Binary),
            Some(Value::Binary(vec![0x01, 0x02]))
        );
        assert_eq!(
            cell(Value::Byte(-1), ColumnKind::Binary),
            Some(Value::Binary(vec![0xFF]))
        );
    }

    #[test]
    fn test_boolean_words() {
        for word in ["T", "1", "y", "TRUE", "yes", "On"] {
            assert_eq!(
                cell(Value::String(word.into()), ColumnKind::Boolean),
                Some(Value::Boolean(true))
            );
        }
        for word in ["f", "0", "N", "false", "NO", "off"] {
            assert_eq!(
                cell(Value::String(word.into()), ColumnKind::Boolean),
                Some(Value::Boolean(false))
            );
        }
        assert!(matches!(
            convert_cell(Value::Char('x'), ColumnKind::Boolean),
            Err(DataFrameError::Conversion(_))
        ));
    }

    #[test]
    fn test_unparseable_text_is_a_conversion_error() {
        assert!(matches!(
            convert_cell(Value::String("abc".into()), ColumnKind::Int),
            Err(DataFrameError::Conversion(_))
        ));
        assert!(matches!(
            convert_cell(Value::String("300".into()), ColumnKind::Byte),
            Err(DataFrameError::Conversion(_))
        ));
        assert!(matches!(
            convert_cell(Value::String(String::new()), ColumnKind::NullableChar),
            Err(DataFrameError::Conversion(_))
        ));
    }

    #[test]
    fn test_binary_sources() {
        assert_eq!(
            cell(Value::Binary(vec![0x00, 0x00, 0x01, 0x00, 0xFF]), ColumnKind::Int),
            Some(Value::Int(256))
        );
        assert_eq!(cell(Value::Binary(vec![0x01]), ColumnKind::NullableInt), None);
        assert_eq!(
            cell(Value::Binary(vec![0xCA, 0xFE]), ColumnKind::String),
            Some(Value::String("cafe".into()))
        );
        assert_eq!(
            cell(Value::Binary(vec![0, 0, 3]), ColumnKind::Boolean),
            Some(Value::Boolean(true))
        );
        assert_eq!(cell(Value::Binary(vec![b'A']), ColumnKind::Char), Some(Value::Char('A')));
        assert!(matches!(
            convert_cell(Value::Binary(vec![0x01]), ColumnKind::Char),
            Err(DataFrameError::Conversion(_))
        ));
        assert_eq!(
            cell(Value::Binary(Vec::new()), ColumnKind::NullableBinary),
            Some(Value::Binary(Vec::new()))
        );
    }

    #[test]
    fn test_empty_sources_stay_present_in_nullable_binary() {
        let strings = Column::new(ColumnData::NullableString(vec![Some(String::new()), None]))
            .unwrap()
            .convert_to_kind(ColumnKind::NullableBinary)
            .unwrap();
        let binaries = Column::new(ColumnData::Binary(vec![Vec::new()]))
            .unwrap()
            .convert_to_kind(ColumnKind::NullableBinary)
            .unwrap();
        let copied = binaries.convert_to_kind(ColumnKind::NullableBinary).unwrap();

        assert_eq!(strings.get(0).unwrap(), Some(Value::Binary(Vec::new())));
        assert!(strings.is_null(1).unwrap());
        assert_eq!(binaries.get(0).unwrap(), Some(Value::Binary(Vec::new())));
        assert_eq!(copied, binaries);
    }

    #[test]
    fn test_boolean_sources() {
        assert_eq!(cell(Value::Boolean(true), ColumnKind::Double), Some(Value::Double(1.0)));
        assert_eq!(cell(Value::Boolean(false), ColumnKind::Char), Some(Value::Char('0')));
        assert_eq!(
            cell(Value::Boolean(true), ColumnKind::String),
            Some(Value::String("true".into()))
        );
    }
}
