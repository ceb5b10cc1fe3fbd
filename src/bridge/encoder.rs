// In: src/bridge/encoder.rs

//! The authoritative writer of the v2 format.
//!
//! Header and payload are built in two call-scoped buffers: the header can
//! only be finished once every column has contributed its null-disambiguation
//! bits, and those bits are produced while the payload is written.

use crate::bridge::format::{
    DELIMITER, HEADER_TERMINATOR, IMPL_DEFAULT, IMPL_NULLABLE, MAGIC,
};
use crate::column::{Column, ColumnData};
use crate::error::{DataFrameError, Result};
use crate::frame::Table;
use crate::null_handling::BitVector;
use crate::traits::WireScalar;

//==================================================================================
// 1. Frame Assembly
//==================================================================================

/// Serializes `table` to the uncompressed v2 representation.
pub fn encode<T: Table + ?Sized>(table: &T) -> Result<Vec<u8>> {
    let rows = table.rows();
    let columns = table.columns();
    let nullable = table.is_nullable();
    let wire_rows = to_u32(rows, "row count")?;
    let wire_columns = to_u32(columns, "column count")?;

    let mut encoder = FrameEncoder::new();
    encoder.header.extend_from_slice(MAGIC);
    encoder
        .header
        .push(if nullable { IMPL_NULLABLE } else { IMPL_DEFAULT });
    encoder.header.extend_from_slice(&wire_rows.to_be_bytes());
    encoder.header.extend_from_slice(&wire_columns.to_be_bytes());

    let mut ordered = Vec::with_capacity(columns);
    for index in 0..columns {
        let column = table.column_at(index)?;
        check_column(column, index, rows, nullable)?;
        ordered.push(column);
    }

    for (index, column) in ordered.iter().enumerate() {
        match column.name() {
            Some(name) => {
                if name.as_bytes().contains(&DELIMITER) {
                    return Err(DataFrameError::Validation(format!(
                        "Column name {:?} contains a NUL byte",
                        name
                    )));
                }
                encoder.header.extend_from_slice(name.as_bytes());
            }
            None => encoder.header.extend_from_slice(index.to_string().as_bytes()),
        }
        encoder.header.push(DELIMITER);
    }
    for column in &ordered {
        encoder.header.push(column.type_code());
    }

    for column in &ordered {
        log::trace!(
            "encoding column {:?} ({}, {} rows)",
            column.name(),
            column.kind(),
            column.len()
        );
        encoder.write_column(column.data())?;
    }

    let bytes = encoder.finish(nullable)?;
    log::debug!(
        "encoded {} rows x {} columns into {} bytes (nullable: {})",
        rows,
        columns,
        bytes.len(),
        nullable
    );
    Ok(bytes)
}

fn to_u32(value: usize, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        DataFrameError::Capacity(format!(
            "{} {} exceeds the 32-bit limit of the wire format",
            what, value
        ))
    })
}

fn check_column(column: &Column, index: usize, rows: usize, nullable: bool) -> Result<()> {
    if column.len() != rows {
        return Err(DataFrameError::Validation(format!(
            "Column {} has {} rows but the table has {}",
            index,
            column.len(),
            rows
        )));
    }
    if column.is_nullable() != nullable {
        return Err(DataFrameError::Validation(format!(
            "Column {} of kind {} does not match a {} table",
            index,
            column.kind(),
            if nullable { "nullable" } else { "default" }
        )));
    }
    Ok(())
}

//==================================================================================
// 2. Payload Writers
//==================================================================================

struct FrameEncoder {
    header: Vec<u8>,
    payload: Vec<u8>,
    /// Disambiguates zero/empty/false from null in nullable tables.
    null_bits: BitVector,
}

impl FrameEncoder {
    fn new() -> Self {
        Self {
            header: Vec::with_capacity(64),
            payload: Vec::new(),
            null_bits: BitVector::new(),
        }
    }

    fn write_column(&mut self, data: &ColumnData) -> Result<()> {
        match data {
            ColumnData::Byte(v) => self.write_fixed(v),
            ColumnData::Short(v) => self.write_fixed(v),
            ColumnData::Int(v) => self.write_fixed(v),
            ColumnData::Long(v) => self.write_fixed(v),
            ColumnData::Float(v) => self.write_fixed(v),
            ColumnData::Double(v) => self.write_fixed(v),
            ColumnData::NullableByte(v) => self.write_nullable_fixed(v),
            ColumnData::NullableShort(v) => self.write_nullable_fixed(v),
            ColumnData::NullableInt(v) => self.write_nullable_fixed(v),
            ColumnData::NullableLong(v) => self.write_nullable_fixed(v),
            ColumnData::NullableFloat(v) => self.write_nullable_fixed(v),
            ColumnData::NullableDouble(v) => self.write_nullable_fixed(v),
            ColumnData::String(v) => {
                for s in v {
                    self.write_str(s)?;
                }
            }
            ColumnData::NullableString(v) => {
                for s in v {
                    match s {
                        Some(s) if !s.is_empty() => self.write_str(s)?,
                        Some(_) => {
                            self.payload.push(DELIMITER);
                            self.null_bits.push_zero();
                        }
                        None => {
                            self.payload.push(DELIMITER);
                            self.null_bits.push_one();
                        }
                    }
                }
            }
            ColumnData::Char(v) => self.payload.extend_from_slice(v),
            ColumnData::NullableChar(v) => self
                .payload
                .extend(v.iter().map(|c| c.unwrap_or(DELIMITER))),
            ColumnData::Boolean(v) => {
                let packed: BitVector = v.iter().copied().collect();
                self.payload.extend_from_slice(packed.as_bytes());
            }
            ColumnData::NullableBoolean(v) => {
                let packed: BitVector = v
                    .iter()
                    .map(|b| {
                        match b {
                            Some(true) => return true,
                            Some(false) => self.null_bits.push_zero(),
                            None => self.null_bits.push_one(),
                        }
                        false
                    })
                    .collect();
                self.payload.extend_from_slice(packed.as_bytes());
            }
            ColumnData::Binary(v) => {
                for bytes in v {
                    self.write_binary(bytes)?;
                }
            }
            ColumnData::NullableBinary(v) => {
                // Null and empty are both written as length 0; no bit is spent.
                for bytes in v {
                    self.write_binary(bytes.as_deref().unwrap_or(&[]))?;
                }
            }
        }
        Ok(())
    }

    fn write_fixed<S: WireScalar>(&mut self, values: &[S]) {
        self.payload.reserve(values.len() * S::WIDTH);
        for v in values {
            v.write_be(&mut self.payload);
        }
    }

    fn write_nullable_fixed<S: WireScalar>(&mut self, values: &[Option<S>]) {
        self.payload.reserve(values.len() * S::WIDTH);
        for v in values {
            match v {
                Some(x) if !x.is_zero() => x.write_be(&mut self.payload),
                // Negative zero collapses into the zero pattern here.
                Some(_) => {
                    S::default().write_be(&mut self.payload);
                    self.null_bits.push_zero();
                }
                None => {
                    S::default().write_be(&mut self.payload);
                    self.null_bits.push_one();
                }
            }
        }
    }

    fn write_str(&mut self, s: &str) -> Result<()> {
        if s.as_bytes().contains(&DELIMITER) {
            return Err(DataFrameError::Validation(format!(
                "String value {:?} contains a NUL byte",
                s
            )));
        }
        self.payload.extend_from_slice(s.as_bytes());
        self.payload.push(DELIMITER);
        Ok(())
    }

    fn write_binary(&mut self, bytes: &[u8]) -> Result<()> {
        let len = to_u32(bytes.len(), "binary value length")?;
        self.payload.extend_from_slice(&len.to_be_bytes());
        self.payload.extend_from_slice(bytes);
        Ok(())
    }

    /// Appends the null-bit list (nullable tables only) and the terminator,
    /// then the payload.
    fn finish(mut self, nullable: bool) -> Result<Vec<u8>> {
        if nullable {
            let bits = self.null_bits.as_bytes();
            // An empty list is still written as one zero byte.
            let list_len = bits.len().max(1);
            self.header
                .extend_from_slice(&to_u32(list_len, "null-bit list length")?.to_be_bytes());
            self.header.extend_from_slice(bits);
            self.header.resize(self.header.len() + (list_len - bits.len()), 0);
        }
        self.header.push(HEADER_TERMINATOR);

        let mut out = self.header;
        out.reserve_exact(self.payload.len());
        out.extend_from_slice(&self.payload);
        Ok(out)
    }
}
