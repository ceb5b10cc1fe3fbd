// In: src/bridge/decoder.rs

//! The authoritative reader of the v2 format.
//!
//! Input is expected to be uncompressed; the stateless API strips the outer
//! compression layer before calling in here.

use std::io::{BufRead, Cursor, Read};

use crate::bridge::format::{
    HeaderInfo, DELIMITER, FIXED_HEADER_SIZE, FORMAT_VERSION, HEADER_TERMINATOR, IMPL_DEFAULT,
    IMPL_NULLABLE, LEGACY_FORMAT_VERSION, MAGIC, MAGIC_PREFIX, MAGIC_TERMINATOR,
};
use crate::column::{Column, ColumnData};
use crate::error::{DataFrameError, Result};
use crate::frame::Table;
use crate::null_handling::BitVector;
use crate::traits::WireScalar;
use crate::types::{is_printable_char, ColumnKind, DEFAULT_STRING};

/// Upper bound for speculative pre-allocation driven by untrusted counts.
const MAX_PREALLOC: usize = 64 * 1024;

//==================================================================================
// 1. Header Parsing
//==================================================================================

/// The fully parsed header of an uncompressed buffer.
pub(crate) struct ParsedHeader {
    pub nullable: bool,
    pub rows: usize,
    pub names: Vec<String>,
    pub kinds: Vec<ColumnKind>,
    pub null_bits: BitVector,
    /// Offset of the first payload byte.
    pub header_size: usize,
}

impl ParsedHeader {
    pub fn info(&self, compressed: bool, total_size: usize) -> HeaderInfo {
        HeaderInfo {
            compressed,
            nullable: self.nullable,
            rows: self.rows,
            columns: self.kinds.len(),
            names: self.names.clone(),
            kinds: self.kinds.clone(),
            null_list_len: self.null_bits.size() / 8,
            header_size: self.header_size,
            payload_size: total_size - self.header_size,
        }
    }
}

fn format_error(e: std::io::Error) -> DataFrameError {
    DataFrameError::Format(format!("Unexpected end of data: {}", e))
}

/// Validates the magic and version bytes.
pub fn check_magic(bytes: &[u8]) -> Result<()> {
    if bytes.len() < MAGIC.len() || !bytes.starts_with(MAGIC_PREFIX) {
        return Err(DataFrameError::Format(
            "Missing v2 magic: not a serialized table".into(),
        ));
    }
    match bytes[MAGIC_PREFIX.len()] {
        FORMAT_VERSION => {}
        LEGACY_FORMAT_VERSION => {
            return Err(DataFrameError::Format(
                "Unsupported encoding version: v1".into(),
            ))
        }
        other => {
            return Err(DataFrameError::Format(format!(
                "Unsupported encoding: version byte 0x{:02x}",
                other
            )))
        }
    }
    if bytes[MAGIC.len() - 1] != MAGIC_TERMINATOR {
        return Err(DataFrameError::Format("Malformed v2 magic".into()));
    }
    Ok(())
}

pub(crate) fn parse_header(bytes: &[u8]) -> Result<ParsedHeader> {
    check_magic(bytes)?;
    if bytes.len() < FIXED_HEADER_SIZE {
        return Err(DataFrameError::Format(format!(
            "Header truncated: {} bytes, at least {} required",
            bytes.len(),
            FIXED_HEADER_SIZE
        )));
    }
    let mut cursor = Cursor::new(bytes);
    cursor.set_position(MAGIC.len() as u64);

    let nullable = match read_u8(&mut cursor)? {
        IMPL_DEFAULT => false,
        IMPL_NULLABLE => true,
        other => {
            return Err(DataFrameError::Format(format!(
                "Unknown table implementation byte 0x{:02x}",
                other
            )))
        }
    };
    let rows = read_u32(&mut cursor)? as usize;
    let columns = read_u32(&mut cursor)? as usize;

    let mut names = Vec::with_capacity(columns.min(MAX_PREALLOC));
    for _ in 0..columns {
        let raw = read_delimited(&mut cursor)?;
        let name = String::from_utf8(raw)
            .map_err(|_| DataFrameError::Format("Column name is not valid UTF-8".into()))?;
        names.push(name);
    }

    let mut kinds = Vec::with_capacity(columns.min(MAX_PREALLOC));
    for _ in 0..columns {
        let code = read_u8(&mut cursor)?;
        let kind = ColumnKind::from_type_code(code).map_err(|_| {
            DataFrameError::Format(format!("Unknown column type code {}", code))
        })?;
        if kind.is_nullable() != nullable {
            return Err(DataFrameError::Format(format!(
                "Column type {} is not allowed in a {} table",
                kind,
                if nullable { "nullable" } else { "default" }
            )));
        }
        kinds.push(kind);
    }

    let null_bits = if nullable {
        let len = read_u32(&mut cursor)? as usize;
        BitVector::from_bytes(take(&mut cursor, len)?.to_vec())
    } else {
        BitVector::from_bytes(Vec::new())
    };

    if read_u8(&mut cursor)? != HEADER_TERMINATOR {
        return Err(DataFrameError::Format(
            "Missing header terminator '}'".into(),
        ));
    }

    Ok(ParsedHeader {
        nullable,
        rows,
        names,
        kinds,
        null_bits,
        header_size: cursor.position() as usize,
    })
}

//==================================================================================
// 2. Frame Decoding
//==================================================================================

/// Deserializes an uncompressed v2 buffer into any `Table`.
pub fn decode<T: Table>(bytes: &[u8]) -> Result<T> {
    let header = parse_header(bytes)?;
    let mut cursor = Cursor::new(bytes);
    cursor.set_position(header.header_size as u64);

    let mut reader = PayloadReader {
        cursor,
        rows: header.rows,
        null_bits: &header.null_bits,
        next_bit: 0,
    };

    // Index names mark a table written without labels; one real label keeps them all.
    let unlabeled = header
        .names
        .iter()
        .enumerate()
        .all(|(index, name)| *name == index.to_string());

    let mut columns = Vec::with_capacity(header.kinds.len());
    for (kind, name) in header.kinds.iter().zip(&header.names) {
        log::trace!("decoding column {:?} ({}, {} rows)", name, kind, header.rows);
        let data = reader.read_column(*kind)?;
        let column = Column::new(data)
            .map_err(|e| DataFrameError::Format(format!("Invalid column payload: {}", e)))?;
        let label = (!unlabeled).then_some(name.as_str());
        columns.push(column.with_name(label));
    }

    let consumed = reader.cursor.position() as usize;
    if consumed != bytes.len() {
        return Err(DataFrameError::Format(format!(
            "{} trailing bytes after the last column",
            bytes.len() - consumed
        )));
    }

    log::debug!(
        "decoded {} rows x {} columns from {} bytes (nullable: {})",
        header.rows,
        columns.len(),
        bytes.len(),
        header.nullable
    );
    T::from_columns(header.nullable, columns).map_err(|e| match e {
        DataFrameError::Validation(msg) => {
            DataFrameError::Format(format!("Decoded columns do not form a table: {}", msg))
        }
        other => other,
    })
}

struct PayloadReader<'a> {
    cursor: Cursor<&'a [u8]>,
    rows: usize,
    null_bits: &'a BitVector,
    next_bit: usize,
}

impl<'a> PayloadReader<'a> {
    /// Consumes the next null-disambiguation bit; `true` means null.
    fn next_null_bit(&mut self) -> Result<bool> {
        let bit = self.null_bits.get(self.next_bit).map_err(|_| {
            DataFrameError::Format("Null-bit list exhausted before the payload".into())
        })?;
        self.next_bit += 1;
        Ok(bit)
    }

    fn read_column(&mut self, kind: ColumnKind) -> Result<ColumnData> {
        let data = match kind {
            ColumnKind::Byte => ColumnData::Byte(self.read_fixed()?),
            ColumnKind::Short => ColumnData::Short(self.read_fixed()?),
            ColumnKind::Int => ColumnData::Int(self.read_fixed()?),
            ColumnKind::Long => ColumnData::Long(self.read_fixed()?),
            ColumnKind::Float => ColumnData::Float(self.read_fixed()?),
            ColumnKind::Double => ColumnData::Double(self.read_fixed()?),
            ColumnKind::NullableByte => ColumnData::NullableByte(self.read_nullable_fixed()?),
            ColumnKind::NullableShort => ColumnData::NullableShort(self.read_nullable_fixed()?),
            ColumnKind::NullableInt => ColumnData::NullableInt(self.read_nullable_fixed()?),
            ColumnKind::NullableLong => ColumnData::NullableLong(self.read_nullable_fixed()?),
            ColumnKind::NullableFloat => ColumnData::NullableFloat(self.read_nullable_fixed()?),
            ColumnKind::NullableDouble => {
                ColumnData::NullableDouble(self.read_nullable_fixed()?)
            }
            ColumnKind::String => {
                let mut values = Vec::with_capacity(self.rows.min(MAX_PREALLOC));
                for _ in 0..self.rows {
                    let s = self.read_string()?;
                    values.push(if s.is_empty() {
                        DEFAULT_STRING.to_string()
                    } else {
                        s
                    });
                }
                ColumnData::String(values)
            }
            ColumnKind::NullableString => {
                let mut values = Vec::with_capacity(self.rows.min(MAX_PREALLOC));
                for _ in 0..self.rows {
                    let s = self.read_string()?;
                    if !s.is_empty() {
                        values.push(Some(s));
                    } else if self.next_null_bit()? {
                        values.push(None);
                    } else {
                        values.push(Some(s));
                    }
                }
                ColumnData::NullableString(values)
            }
            ColumnKind::Char => {
                let raw = take(&mut self.cursor, self.rows)?;
                if let Some(bad) = raw.iter().find(|c| !is_printable_char(**c as char)) {
                    return Err(DataFrameError::Format(format!(
                        "Invalid char byte 0x{:02x} in char column",
                        bad
                    )));
                }
                ColumnData::Char(raw.to_vec())
            }
            ColumnKind::NullableChar => {
                let raw = take(&mut self.cursor, self.rows)?;
                let mut values = Vec::with_capacity(raw.len());
                for &c in raw {
                    if c == DELIMITER {
                        values.push(None);
                    } else if is_printable_char(c as char) {
                        values.push(Some(c));
                    } else {
                        return Err(DataFrameError::Format(format!(
                            "Invalid char byte 0x{:02x} in char column",
                            c
                        )));
                    }
                }
                ColumnData::NullableChar(values)
            }
            ColumnKind::Boolean => {
                let packed = self.read_packed_booleans()?;
                let values = (0..self.rows)
                    .map(|i| packed.get(i))
                    .collect::<Result<Vec<_>>>()?;
                ColumnData::Boolean(values)
            }
            ColumnKind::NullableBoolean => {
                let packed = self.read_packed_booleans()?;
                let mut values = Vec::with_capacity(self.rows.min(MAX_PREALLOC));
                for i in 0..self.rows {
                    if packed.get(i)? {
                        values.push(Some(true));
                    } else if self.next_null_bit()? {
                        values.push(None);
                    } else {
                        values.push(Some(false));
                    }
                }
                ColumnData::NullableBoolean(values)
            }
            ColumnKind::Binary => {
                let mut values = Vec::with_capacity(self.rows.min(MAX_PREALLOC));
                for _ in 0..self.rows {
                    values.push(self.read_binary()?);
                }
                ColumnData::Binary(values)
            }
            ColumnKind::NullableBinary => {
                let mut values = Vec::with_capacity(self.rows.min(MAX_PREALLOC));
                for _ in 0..self.rows {
                    let bytes = self.read_binary()?;
                    values.push((!bytes.is_empty()).then_some(bytes));
                }
                ColumnData::NullableBinary(values)
            }
        };
        Ok(data)
    }

    fn read_fixed<S: WireScalar>(&mut self) -> Result<Vec<S>> {
        let total = self
            .rows
            .checked_mul(S::WIDTH)
            .ok_or_else(|| DataFrameError::Format("Row count overflows the payload".into()))?;
        let raw = take(&mut self.cursor, total)?;
        Ok(raw.chunks_exact(S::WIDTH).map(S::read_be).collect())
    }

    fn read_nullable_fixed<S: WireScalar>(&mut self) -> Result<Vec<Option<S>>> {
        let raw: Vec<S> = self.read_fixed()?;
        let mut values = Vec::with_capacity(raw.len());
        for v in raw {
            if !v.is_zero() {
                values.push(Some(v));
            } else if self.next_null_bit()? {
                values.push(None);
            } else {
                // Normalizes a negative zero to positive zero.
                values.push(Some(S::default()));
            }
        }
        Ok(values)
    }

    fn read_string(&mut self) -> Result<String> {
        let raw = read_delimited(&mut self.cursor)?;
        String::from_utf8(raw)
            .map_err(|_| DataFrameError::Format("String value is not valid UTF-8".into()))
    }

    fn read_packed_booleans(&mut self) -> Result<BitVector> {
        let raw = take(&mut self.cursor, self.rows.div_ceil(8))?;
        Ok(BitVector::from_bytes(raw.to_vec()))
    }

    fn read_binary(&mut self) -> Result<Vec<u8>> {
        let len = read_u32(&mut self.cursor)? as usize;
        Ok(take(&mut self.cursor, len)?.to_vec())
    }
}

//==================================================================================
// 3. Cursor Helpers
//==================================================================================

fn read_u8(cursor: &mut Cursor<&[u8]>) -> Result<u8> {
    let mut buf = [0u8; 1];
    cursor.read_exact(&mut buf).map_err(format_error)?;
    Ok(buf[0])
}

fn read_u32(cursor: &mut Cursor<&[u8]>) -> Result<u32> {
    let mut buf = [0u8; 4];
    cursor.read_exact(&mut buf).map_err(format_error)?;
    Ok(u32::from_be_bytes(buf))
}

/// Borrows the next `len` bytes, failing instead of reading past the end.
fn take<'a>(cursor: &mut Cursor<&'a [u8]>, len: usize) -> Result<&'a [u8]> {
    let buf: &'a [u8] = *cursor.get_ref();
    let start = cursor.position() as usize;
    let end = start
        .checked_add(len)
        .filter(|end| *end <= buf.len())
        .ok_or_else(|| {
            DataFrameError::Format(format!(
                "Unexpected end of data: need {} bytes at offset {}, have {}",
                len,
                start,
                buf.len().saturating_sub(start)
            ))
        })?;
    cursor.set_position(end as u64);
    Ok(&buf[start..end])
}

/// Reads up to and consuming the next `DELIMITER`, which is not returned.
fn read_delimited(cursor: &mut Cursor<&[u8]>) -> Result<Vec<u8>> {
    let mut raw = Vec::new();
    cursor
        .read_until(DELIMITER, &mut raw)
        .map_err(format_error)?;
    if raw.pop() != Some(DELIMITER) {
        return Err(DataFrameError::Format(
            "Unterminated string: missing 0x00 delimiter".into(),
        ));
    }
    Ok(raw)
}
