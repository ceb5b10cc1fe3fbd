//! A dynamically-typed single cell, used by the element-wise column API and
//! by kind conversion.

use crate::types::ElementKind;
use std::fmt;

/// One non-absent element of any column kind.
///
/// Absent values are expressed as `Option<Value>::None` at the column API.
#[derive(Debug, Clone)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    Boolean(bool),
    String(String),
    Binary(Vec<u8>),
}

impl Value {
    pub fn element_kind(&self) -> ElementKind {
        match self {
            Self::Byte(_) => ElementKind::Byte,
            Self::Short(_) => ElementKind::Short,
            Self::Int(_) => ElementKind::Int,
            Self::Long(_) => ElementKind::Long,
            Self::Float(_) => ElementKind::Float,
            Self::Double(_) => ElementKind::Double,
            Self::Char(_) => ElementKind::Char,
            Self::Boolean(_) => ElementKind::Boolean,
            Self::String(_) => ElementKind::String,
            Self::Binary(_) => ElementKind::Binary,
        }
    }

    /// The default value of a non-nullable column of the given element type.
    pub fn default_for(element: ElementKind) -> Self {
        match element {
            ElementKind::Byte => Self::Byte(0),
            ElementKind::Short => Self::Short(0),
            ElementKind::Int => Self::Int(0),
            ElementKind::Long => Self::Long(0),
            ElementKind::Float => Self::Float(0.0),
            ElementKind::Double => Self::Double(0.0),
            ElementKind::Char => Self::Char(DEFAULT_CHAR),
            ElementKind::Boolean => Self::Boolean(false),
            ElementKind::String => Self::String(DEFAULT_STRING.to_string()),
            ElementKind::Binary => Self::Binary(DEFAULT_BINARY.to_vec()),
        }
    }

    /// The integral value of an integer cell, widened to 64 bits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Byte(v) => Some(*v as i64),
            Self::Short(v) => Some(*v as i64),
            Self::Int(v) => Some(*v as i64),
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }
}

/// Default of non-nullable string columns; an empty string is never stored.
pub const DEFAULT_STRING: &str = "n/a";
/// Default of non-nullable char columns.
pub const DEFAULT_CHAR: char = '?';
/// Default of non-nullable binary columns.
pub const DEFAULT_BINARY: &[u8] = &[0x00];

/// Returns `true` for the characters a char column can hold (ASCII 32..=126).
pub fn is_printable_char(c: char) -> bool {
    (' '..='~').contains(&c)
}

/// Canonical decimal text of a float. Decimal exponents below -4 or from 16
/// up use exponent notation with a signed two-digit exponent ("1e+20",
/// "2.5e-07"); everything else carries a fractional part ("1.0", "-0.0").
/// NaN and infinities use Rust's spelling.
pub(crate) fn float_text(plain: String, scientific: String, finite: bool) -> String {
    if !finite {
        return plain;
    }
    if let Some((mantissa, exponent)) = scientific.split_once('e') {
        if let Ok(exponent) = exponent.parse::<i32>() {
            if !(-4..16).contains(&exponent) {
                let sign = if exponent < 0 { '-' } else { '+' };
                return format!("{}e{}{:02}", mantissa, sign, exponent.unsigned_abs());
            }
        }
    }
    if plain.contains('.') {
        plain
    } else {
        format!("{}.0", plain)
    }
}

/// Floats compare equal when both are NaN, so that columns holding NaN still
/// equal their own copies.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Byte(a), Self::Byte(b)) => a == b,
            (Self::Short(a), Self::Short(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Double(a), Self::Double(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Binary(a), Self::Binary(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Byte(v) => write!(f, "{}", v),
            Self::Short(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Long(v) => write!(f, "{}", v),
            Self::Float(v) => {
                f.write_str(&float_text(v.to_string(), format!("{:e}", v), v.is_finite()))
            }
            Self::Double(v) => {
                f.write_str(&float_text(v.to_string(), format!("{:e}", v), v.is_finite()))
            }
            Self::Char(v) => write!(f, "{}", v),
            Self::Boolean(v) => write!(f, "{}", v),
            Self::String(v) => f.write_str(v),
            Self::Binary(v) => {
                for byte in v {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
        }
    }
}

macro_rules! impl_value_from {
    ($T:ty, $variant:ident) => {
        impl From<$T> for Value {
            fn from(v: $T) -> Self {
                Value::$variant(v)
            }
        }
    };
}

impl_value_from!(i8, Byte);
impl_value_from!(i16, Short);
impl_value_from!(i32, Int);
impl_value_from!(i64, Long);
impl_value_from!(f32, Float);
impl_value_from!(f64, Double);
impl_value_from!(char, Char);
impl_value_from!(bool, Boolean);
impl_value_from!(String, String);
impl_value_from!(Vec<u8>, Binary);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}
