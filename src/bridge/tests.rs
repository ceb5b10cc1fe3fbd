use super::*;
use crate::bridge::format::{HEADER_TERMINATOR, IMPL_DEFAULT, IMPL_NULLABLE, MAGIC};
use crate::column::{Column, ColumnData};
use crate::error::{DataFrameError, Result};
use crate::frame::{DataFrame, Table};
use crate::types::{ColumnKind, Value};
use quickcheck_macros::quickcheck;

//==================================================================================
// Helpers
//==================================================================================

fn assert_round_trip(frame: &DataFrame) {
    for compress in [false, true] {
        let bytes = serialize(frame, compress).unwrap();
        let restored = deserialize(&bytes).unwrap();
        assert_eq!(&restored, frame, "round trip failed (compress: {})", compress);
    }
}

/// Header bytes up to and including the column count.
fn fixed_header(impl_byte: u8, rows: u32, cols: u32) -> Vec<u8> {
    let mut bytes = MAGIC.to_vec();
    bytes.push(impl_byte);
    bytes.extend_from_slice(&rows.to_be_bytes());
    bytes.extend_from_slice(&cols.to_be_bytes());
    bytes
}

fn default_frame_of_every_kind() -> DataFrame {
    DataFrame::new_default(vec![
        Column::named("byte", ColumnData::Byte(vec![i8::MIN, 0, i8::MAX])).unwrap(),
        Column::named("short", ColumnData::Short(vec![i16::MIN, -1, i16::MAX])).unwrap(),
        Column::named("int", ColumnData::Int(vec![i32::MIN, 0, i32::MAX])).unwrap(),
        Column::named("long", ColumnData::Long(vec![i64::MIN, 42, i64::MAX])).unwrap(),
        Column::named(
            "string",
            ColumnData::String(vec!["héllo".into(), "n/a".into(), "z".into()]),
        )
        .unwrap(),
        Column::named("float", ColumnData::Float(vec![1.5, -0.0, f32::NAN])).unwrap(),
        Column::named("double", ColumnData::Double(vec![f64::MIN, 0.0, f64::INFINITY])).unwrap(),
        Column::named("char", ColumnData::Char(vec![b' ', b'A', b'~'])).unwrap(),
        Column::named("boolean", ColumnData::Boolean(vec![true, false, true])).unwrap(),
        Column::named(
            "binary",
            ColumnData::Binary(vec![vec![], vec![0x00], vec![0xDE, 0xAD, 0xBE, 0xEF]]),
        )
        .unwrap(),
    ])
    .unwrap()
}

fn nullable_frame_of_every_kind() -> DataFrame {
    DataFrame::new_nullable(vec![
        Column::named("byte", ColumnData::NullableByte(vec![Some(0), None, Some(-7)])).unwrap(),
        Column::named("short", ColumnData::NullableShort(vec![None, Some(0), Some(300)])).unwrap(),
        Column::named("int", ColumnData::NullableInt(vec![Some(5), Some(0), None])).unwrap(),
        Column::named("long", ColumnData::NullableLong(vec![None, None, Some(0)])).unwrap(),
        Column::named(
            "string",
            ColumnData::NullableString(vec![Some(String::new()), None, Some("x".into())]),
        )
        .unwrap(),
        Column::named("float", ColumnData::NullableFloat(vec![Some(0.0), None, Some(2.25)])).unwrap(),
        Column::named("double", ColumnData::NullableDouble(vec![None, Some(-3.5), Some(0.0)])).unwrap(),
        Column::named("char", ColumnData::NullableChar(vec![Some(b'q'), None, Some(b'0')])).unwrap(),
        Column::named(
            "boolean",
            ColumnData::NullableBoolean(vec![Some(false), Some(true), None]),
        )
        .unwrap(),
        Column::named(
            "binary",
            ColumnData::NullableBinary(vec![None, Some(vec![1, 2, 3]), Some(vec![0])]),
        )
        .unwrap(),
    ])
    .unwrap()
}

//==================================================================================
// Exact Wire Layout
//==================================================================================

#[test]
fn test_default_int_column_layout() {
    let frame =
        DataFrame::new_default(vec![Column::named("A", ColumnData::Int(vec![1, 2, 3])).unwrap()])
            .unwrap();

    let bytes = serialize(&frame, false).unwrap();

    let mut expected = fixed_header(IMPL_DEFAULT, 3, 1);
    expected.extend_from_slice(b"A\0");
    expected.push(ColumnKind::Int.type_code());
    expected.push(HEADER_TERMINATOR);
    expected.extend_from_slice(&[0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3]);
    assert_eq!(bytes, expected);
    assert_eq!(deserialize(&bytes).unwrap(), frame);
}

#[test]
fn test_nullable_byte_column_spends_bits_only_on_zero_and_null() {
    let frame = DataFrame::new_nullable(vec![Column::new(ColumnData::NullableByte(vec![
        Some(10),
        None,
        Some(0),
    ]))
    .unwrap()])
    .unwrap();

    let bytes = serialize(&frame, false).unwrap();

    let mut expected = fixed_header(IMPL_NULLABLE, 3, 1);
    expected.extend_from_slice(b"0\0");
    expected.push(ColumnKind::NullableByte.type_code());
    // One bit-list byte: null -> 1, zero -> 0, MSB first.
    expected.extend_from_slice(&1u32.to_be_bytes());
    expected.push(0b1000_0000);
    expected.push(HEADER_TERMINATOR);
    expected.extend_from_slice(&[10, 0, 0]);
    assert_eq!(bytes, expected);

    let restored = deserialize(&bytes).unwrap();
    let column = restored.column(0).unwrap();
    assert_eq!(column.name(), None);
    assert_eq!(column.get(0).unwrap(), Some(Value::Byte(10)));
    assert_eq!(column.get(1).unwrap(), None);
    assert_eq!(column.get(2).unwrap(), Some(Value::Byte(0)));
}

#[test]
fn test_nullable_string_column_disambiguates_empty_and_null() {
    let frame = DataFrame::new_nullable(vec![Column::named(
        "s",
        ColumnData::NullableString(vec![Some("x".into()), None, Some(String::new())]),
    )
    .unwrap()])
    .unwrap();

    let bytes = serialize(&frame, false).unwrap();

    let mut expected = fixed_header(IMPL_NULLABLE, 3, 1);
    expected.extend_from_slice(b"s\0");
    expected.push(ColumnKind::NullableString.type_code());
    expected.extend_from_slice(&1u32.to_be_bytes());
    expected.push(0b1000_0000);
    expected.push(HEADER_TERMINATOR);
    expected.extend_from_slice(b"x\0\0\0");
    assert_eq!(bytes, expected);
    assert_eq!(deserialize(&bytes).unwrap(), frame);
}

#[test]
fn test_boolean_payload_is_packed_msb_first() {
    let values = vec![true, false, true, true, false, false, false, true, true];
    let frame =
        DataFrame::new_default(vec![Column::named("b", ColumnData::Boolean(values)).unwrap()])
            .unwrap();

    let bytes = serialize(&frame, false).unwrap();
    assert_eq!(&bytes[bytes.len() - 2..], &[0b1011_0001, 0b1000_0000]);
    assert_round_trip(&frame);
}

#[test]
fn test_nullable_boolean_spends_bits_only_on_false_and_null() {
    let frame = DataFrame::new_nullable(vec![Column::named(
        "b",
        ColumnData::NullableBoolean(vec![Some(true), None, Some(false)]),
    )
    .unwrap()])
    .unwrap();

    let bytes = serialize(&frame, false).unwrap();
    let info = peek_header(&bytes).unwrap();
    assert_eq!(info.null_list_len, 1);
    // Bit list [1, 0], then '}', then the packed payload [1, 0, 0].
    assert_eq!(&bytes[info.header_size - 2..], &[0b1000_0000, b'}', 0b1000_0000]);
    assert_round_trip(&frame);
}

#[test]
fn test_empty_null_list_is_written_as_one_zero_byte() {
    let frame = DataFrame::new_nullable(vec![Column::named(
        "v",
        ColumnData::NullableInt(vec![Some(1), Some(2)]),
    )
    .unwrap()])
    .unwrap();

    let bytes = serialize(&frame, false).unwrap();
    let info = peek_header(&bytes).unwrap();
    assert_eq!(info.null_list_len, 1);
    assert_eq!(&bytes[info.header_size - 6..info.header_size], &[0, 0, 0, 1, 0, b'}']);
    assert_round_trip(&frame);
}

#[test]
fn test_default_char_and_binary_layout() {
    let frame = DataFrame::new_default(vec![
        Column::named("c", ColumnData::Char(vec![b'h', b'i'])).unwrap(),
        Column::named("b", ColumnData::Binary(vec![vec![7], vec![]])).unwrap(),
    ])
    .unwrap();

    let bytes = serialize(&frame, false).unwrap();
    let info = peek_header(&bytes).unwrap();
    assert_eq!(
        &bytes[info.header_size..],
        &[b'h', b'i', 0, 0, 0, 1, 7, 0, 0, 0, 0]
    );
    assert_round_trip(&frame);
}

//==================================================================================
// Round Trips
//==================================================================================

#[test]
fn test_round_trip_every_default_kind() {
    assert_round_trip(&default_frame_of_every_kind());
}

#[test]
fn test_round_trip_every_nullable_kind() {
    assert_round_trip(&nullable_frame_of_every_kind());
}

#[test]
fn test_round_trip_without_names() {
    let frame = DataFrame::new_default(vec![
        Column::new(ColumnData::Short(vec![1, 2])).unwrap(),
        Column::new(ColumnData::Boolean(vec![false, true])).unwrap(),
    ])
    .unwrap();
    assert_round_trip(&frame);
    assert!(!deserialize(&serialize(&frame, false).unwrap())
        .unwrap()
        .has_column_names());
}

#[test]
fn test_round_trip_empty_tables() {
    assert_round_trip(&DataFrame::empty(false));
    assert_round_trip(&DataFrame::empty(true));
    let zero_rows = DataFrame::new_nullable(vec![
        Column::named("a", ColumnData::NullableBoolean(vec![])).unwrap(),
        Column::named("b", ColumnData::NullableString(vec![])).unwrap(),
    ])
    .unwrap();
    assert_round_trip(&zero_rows);
}

#[test]
fn test_round_trip_keeps_label_that_matches_its_index() {
    let frame = DataFrame::new_default(vec![
        Column::named("0", ColumnData::Int(vec![1])).unwrap(),
        Column::named("x", ColumnData::Int(vec![2])).unwrap(),
    ])
    .unwrap();
    assert_round_trip(&frame);

    let restored = deserialize(&serialize(&frame, false).unwrap()).unwrap();
    assert_eq!(restored.column(0).unwrap().name(), Some("0"));
    assert!(restored.has_column_names());
}

#[test]
fn test_round_trip_every_printable_char() {
    let printable: Vec<u8> = (32u8..=126).collect();
    assert_eq!(printable.len(), 95);

    let default = DataFrame::new_default(vec![
        Column::named("c", ColumnData::Char(printable.clone())).unwrap(),
    ])
    .unwrap();
    assert_round_trip(&default);

    let nullable = DataFrame::new_nullable(vec![Column::named(
        "c",
        ColumnData::NullableChar(printable.iter().copied().map(Some).collect()),
    )
    .unwrap()])
    .unwrap();
    assert_round_trip(&nullable);
}

#[test]
fn test_round_trip_many_rows_crosses_bit_vector_growth() {
    let rows = 10_000;
    let frame = DataFrame::new_nullable(vec![
        Column::named(
            "v",
            ColumnData::NullableLong((0..rows).map(|i| (i % 3 != 0).then_some(i % 2)).collect()),
        )
        .unwrap(),
        Column::named(
            "b",
            ColumnData::NullableBoolean((0..rows).map(|i| (i % 5 != 0).then_some(i % 2 == 0)).collect()),
        )
        .unwrap(),
    ])
    .unwrap();
    assert_round_trip(&frame);
}

#[test]
fn test_negative_zero_in_nullable_table_decodes_as_positive_zero() {
    let frame = DataFrame::new_nullable(vec![Column::named(
        "d",
        ColumnData::NullableDouble(vec![Some(-0.0)]),
    )
    .unwrap()])
    .unwrap();

    let restored = deserialize(&serialize(&frame, false).unwrap()).unwrap();
    match restored.column(0).unwrap().data() {
        ColumnData::NullableDouble(v) => {
            assert_eq!(v[0], Some(0.0));
            assert!(v[0].unwrap().is_sign_positive());
        }
        other => panic!("unexpected column data {:?}", other),
    }
}

#[test]
fn test_negative_zero_in_default_table_keeps_its_sign() {
    let frame =
        DataFrame::new_default(vec![Column::named("d", ColumnData::Double(vec![-0.0])).unwrap()])
            .unwrap();

    let restored = deserialize(&serialize(&frame, false).unwrap()).unwrap();
    match restored.column(0).unwrap().data() {
        ColumnData::Double(v) => assert!(v[0].is_sign_negative()),
        other => panic!("unexpected column data {:?}", other),
    }
}

#[test]
fn test_nullable_binary_empty_decodes_as_null() {
    let frame = DataFrame::new_nullable(vec![Column::named(
        "b",
        ColumnData::NullableBinary(vec![Some(vec![]), None]),
    )
    .unwrap()])
    .unwrap();

    let restored = deserialize(&serialize(&frame, false).unwrap()).unwrap();
    assert!(restored.column(0).unwrap().is_null(0).unwrap());
    assert!(restored.column(0).unwrap().is_null(1).unwrap());
}

#[test]
fn test_empty_wire_string_in_default_table_decodes_as_default() {
    let mut bytes = fixed_header(IMPL_DEFAULT, 1, 1);
    bytes.extend_from_slice(b"s\0");
    bytes.push(ColumnKind::String.type_code());
    bytes.push(HEADER_TERMINATOR);
    bytes.push(0);

    let frame = deserialize(&bytes).unwrap();
    assert_eq!(
        frame.column(0).unwrap().get(0).unwrap(),
        Some(Value::String("n/a".into()))
    );
}

//==================================================================================
// Failure Modes
//==================================================================================

/// A table that only reports its shape; the encoder must fail before touching columns.
struct OversizedTable;

impl Table for OversizedTable {
    fn rows(&self) -> usize {
        u32::MAX as usize + 1
    }

    fn columns(&self) -> usize {
        0
    }

    fn column_at(&self, index: usize) -> Result<&Column> {
        Err(DataFrameError::Bounds { index, length: 0 })
    }

    fn is_nullable(&self) -> bool {
        false
    }

    fn from_columns(_nullable: bool, _columns: Vec<Column>) -> Result<Self> {
        Ok(OversizedTable)
    }
}

#[cfg(target_pointer_width = "64")]
#[test]
fn test_row_count_beyond_u32_is_a_capacity_error() {
    assert!(matches!(
        serialize(&OversizedTable, false),
        Err(DataFrameError::Capacity(_))
    ));
}

#[test]
fn test_decode_rejects_bad_magic() {
    assert!(matches!(deserialize(b"{x:2;d"), Err(DataFrameError::Format(_))));
    assert!(matches!(deserialize(b""), Err(DataFrameError::Format(_))));
}

#[test]
fn test_decode_rejects_legacy_version() {
    let mut bytes = fixed_header(IMPL_DEFAULT, 0, 0);
    bytes[3] = b'1';
    bytes.push(HEADER_TERMINATOR);
    let err = deserialize(&bytes).unwrap_err();
    assert!(matches!(err, DataFrameError::Format(_)));
    assert!(err.to_string().contains("Unsupported encoding version"));
}

#[test]
fn test_decode_rejects_wrong_impl_byte() {
    let mut bytes = fixed_header(b'q', 0, 0);
    bytes.push(HEADER_TERMINATOR);
    assert!(matches!(deserialize(&bytes), Err(DataFrameError::Format(_))));
}

#[test]
fn test_decode_rejects_missing_terminator() {
    let mut bytes = fixed_header(IMPL_DEFAULT, 0, 1);
    bytes.extend_from_slice(b"a\0");
    bytes.push(ColumnKind::Int.type_code());
    bytes.push(b'{');
    assert!(matches!(deserialize(&bytes), Err(DataFrameError::Format(_))));
}

#[test]
fn test_decode_rejects_unknown_type_code() {
    let mut bytes = fixed_header(IMPL_DEFAULT, 0, 1);
    bytes.extend_from_slice(b"a\0");
    bytes.push(99);
    bytes.push(HEADER_TERMINATOR);
    assert!(matches!(deserialize(&bytes), Err(DataFrameError::Format(_))));
}

#[test]
fn test_decode_rejects_kind_of_the_wrong_flavour() {
    let mut bytes = fixed_header(IMPL_DEFAULT, 0, 1);
    bytes.extend_from_slice(b"a\0");
    bytes.push(ColumnKind::NullableInt.type_code());
    bytes.push(HEADER_TERMINATOR);
    assert!(matches!(deserialize(&bytes), Err(DataFrameError::Format(_))));
}

#[test]
fn test_decode_rejects_truncated_payload() {
    let frame = default_frame_of_every_kind();
    let bytes = serialize(&frame, false).unwrap();
    for cut in [1, 5, bytes.len() / 2] {
        let truncated = &bytes[..bytes.len() - cut];
        assert!(
            matches!(deserialize(truncated), Err(DataFrameError::Format(_))),
            "truncation by {} bytes was accepted",
            cut
        );
    }
}

#[test]
fn test_decode_rejects_trailing_bytes() {
    let frame = default_frame_of_every_kind();
    let mut bytes = serialize(&frame, false).unwrap();
    bytes.push(0);
    assert!(matches!(deserialize(&bytes), Err(DataFrameError::Format(_))));
}

#[test]
fn test_decode_rejects_exhausted_null_list() {
    // One nullable int row with a zero value but an empty (all-zero) bit list
    // of length 0.
    let mut bytes = fixed_header(IMPL_NULLABLE, 1, 1);
    bytes.extend_from_slice(b"v\0");
    bytes.push(ColumnKind::NullableInt.type_code());
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.push(HEADER_TERMINATOR);
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    assert!(matches!(deserialize(&bytes), Err(DataFrameError::Format(_))));
}

#[test]
fn test_decode_rejects_unprintable_char() {
    let mut bytes = fixed_header(IMPL_DEFAULT, 1, 1);
    bytes.extend_from_slice(b"c\0");
    bytes.push(ColumnKind::Char.type_code());
    bytes.push(HEADER_TERMINATOR);
    bytes.push(0x07);
    assert!(matches!(deserialize(&bytes), Err(DataFrameError::Format(_))));
}

#[test]
fn test_encode_rejects_nul_in_strings() {
    let frame = DataFrame::new_default(vec![Column::named(
        "s",
        ColumnData::String(vec!["a\0b".into()]),
    )
    .unwrap()])
    .unwrap();
    assert!(matches!(
        serialize(&frame, false),
        Err(DataFrameError::Validation(_))
    ));
}

#[test]
fn test_compressed_garbage_is_rejected() {
    assert!(matches!(
        deserialize(&[0x64, 0x66, 0x00, 0x01]),
        Err(DataFrameError::Format(_))
    ));
}

//==================================================================================
// Property Tests
//==================================================================================

fn without_nul(s: String) -> String {
    s.replace('\0', "")
}

#[quickcheck]
fn prop_default_table_round_trips(ints: Vec<i32>, seed: Vec<String>) -> bool {
    let rows = ints.len();
    let strings: Vec<String> = (0..rows)
        .map(|i| seed.get(i).cloned().map(without_nul).unwrap_or_default())
        .collect();
    let doubles: Vec<f64> = ints.iter().map(|i| *i as f64 / 7.0).collect();
    let frame = DataFrame::new_default(vec![
        Column::named("i", ColumnData::Int(ints)).unwrap(),
        Column::named("s", ColumnData::String(strings)).unwrap(),
        Column::named("d", ColumnData::Double(doubles)).unwrap(),
    ])
    .unwrap();

    let bytes = serialize(&frame, true).unwrap();
    deserialize(&bytes).unwrap() == frame
}

#[quickcheck]
fn prop_nullable_table_round_trips(longs: Vec<Option<i64>>, flags: Vec<Option<bool>>) -> bool {
    let rows = longs.len().min(flags.len());
    let strings: Vec<Option<String>> = longs[..rows]
        .iter()
        .map(|v| v.map(|x| if x % 2 == 0 { String::new() } else { x.to_string() }))
        .collect();
    let frame = DataFrame::new_nullable(vec![
        Column::named("l", ColumnData::NullableLong(longs[..rows].to_vec())).unwrap(),
        Column::named("f", ColumnData::NullableBoolean(flags[..rows].to_vec())).unwrap(),
        Column::named("s", ColumnData::NullableString(strings)).unwrap(),
    ])
    .unwrap();

    let bytes = serialize(&frame, false).unwrap();
    deserialize(&bytes).unwrap() == frame
}
