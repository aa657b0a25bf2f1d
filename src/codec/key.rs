// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Order-preserving key encoding and decoding.
//!
//! Encodes typed column values into byte strings whose unsigned
//! byte-lexicographic order matches the values' natural order, so that the
//! underlying store's comparator produces correct SQL ordering.
//!
//! Per-component format: `[null_marker:1][wire_tag:1][payload]`
//!
//! - Integers: fixed-width big-endian two's complement with the most
//!   significant bit flipped, so negative values sort before positive.
//! - Temporal values: passed through unchanged; the packed source
//!   representation is contractually already byte-sortable.
//! - Text and opaque values: `[payload][0x00][payload_len:u16 BE]` — the
//!   terminator before the length field makes `"ab"` sort strictly before
//!   `"abc"`, since `0x00` is smaller than any continuation byte.
//! - NULL components carry the marker and tag but no payload.
//!
//! The wire tag stores the type in its high nibble and, for fixed-width
//! types, the byte width in its low nibble, so component boundaries of
//! fixed-size types can be found without schema context.
//!
//! Composite keys concatenate component encodings in column order; a key
//! built from only the leading columns of an index is a valid prefix of
//! every full key sharing those column values.

use super::error::CodecError;
use super::field::{FieldDescriptor, FieldType, FieldValue, FieldWidth};

/// Marker byte for a non-null component.
pub const NOT_NULL_MARKER: u8 = 0x00;

/// Marker byte for a NULL component. Sorts after all non-null values of the
/// same column.
pub const NULL_MARKER: u8 = 0x01;

/// Maximum encoded size of a composite key in bytes.
pub const MAX_KEY_SIZE: usize = 8 * 1024; // 8KB

/// Maximum text/opaque payload representable by the 2-byte length field.
pub const MAX_VARLEN_PAYLOAD: usize = u16::MAX as usize;

const TEXT_TERMINATOR: u8 = 0x00;

const TAG_KIND_INTEGER: u8 = 0x10;
const TAG_KIND_TEMPORAL: u8 = 0x20;
const TAG_KIND_TEXT: u8 = 0x30;
const TAG_KIND_OTHER: u8 = 0x40;

const TAG_KIND_MASK: u8 = 0xF0;
const TAG_WIDTH_MASK: u8 = 0x0F;

/// Computes the wire tag for a column.
///
/// Fixed-width kinds carry their payload width in the low nibble.
fn wire_tag(descriptor: &FieldDescriptor) -> Result<u8, CodecError> {
    match (descriptor.field_type, descriptor.width) {
        (FieldType::Integer, FieldWidth::Fixed(w @ (1 | 2 | 4 | 8))) => {
            Ok(TAG_KIND_INTEGER | w as u8)
        }
        (FieldType::Integer, _) => Err(CodecError::TypeMismatch {
            expected: "integer width of 1, 2, 4 or 8 bytes",
            got: "unsupported integer width",
        }),
        (FieldType::Temporal, FieldWidth::Fixed(w)) if w >= 1 && w <= TAG_WIDTH_MASK as usize => {
            Ok(TAG_KIND_TEMPORAL | w as u8)
        }
        (FieldType::Temporal, _) => Err(CodecError::TypeMismatch {
            expected: "temporal width of 1..=15 bytes",
            got: "unsupported temporal width",
        }),
        (FieldType::Text, FieldWidth::Variable) => Ok(TAG_KIND_TEXT),
        (FieldType::Other, FieldWidth::Variable) => Ok(TAG_KIND_OTHER),
        (FieldType::Text | FieldType::Other, FieldWidth::Fixed(_)) => {
            Err(CodecError::TypeMismatch {
                expected: "variable width for text/other columns",
                got: "fixed width",
            })
        }
    }
}

/// Encodes an integer at the given fixed width with the sign bit flipped.
///
/// Flipping the most significant bit of the big-endian two's-complement
/// representation makes unsigned byte comparison agree with signed integer
/// comparison for any width.
fn encode_integer(width: usize, value: i64, out: &mut Vec<u8>) -> Result<(), CodecError> {
    let overflow = |value: i64, width: usize| CodecError::EncodingOverflow {
        context: format!("integer {value} does not fit in {width} bytes"),
    };
    match width {
        1 => {
            let v = i8::try_from(value).map_err(|_| overflow(value, width))?;
            out.push((v as u8) ^ 0x80);
        }
        2 => {
            let v = i16::try_from(value).map_err(|_| overflow(value, width))?;
            out.extend_from_slice(&((v as u16) ^ 0x8000).to_be_bytes());
        }
        4 => {
            let v = i32::try_from(value).map_err(|_| overflow(value, width))?;
            out.extend_from_slice(&((v as u32) ^ 0x8000_0000).to_be_bytes());
        }
        8 => {
            out.extend_from_slice(&((value as u64) ^ (1u64 << 63)).to_be_bytes());
        }
        _ => {
            return Err(CodecError::TypeMismatch {
                expected: "integer width of 1, 2, 4 or 8 bytes",
                got: "unsupported integer width",
            })
        }
    }
    Ok(())
}

/// Decodes a sign-flipped big-endian integer of the given width.
fn decode_integer(width: usize, payload: &[u8]) -> Result<i64, CodecError> {
    if payload.len() < width {
        return Err(CodecError::Corruption(format!(
            "integer payload truncated: need {width} bytes, have {}",
            payload.len()
        )));
    }
    let value = match width {
        1 => (payload[0] ^ 0x80) as i8 as i64,
        2 => i16::from_be_bytes([payload[0] ^ 0x80, payload[1]]) as i64,
        4 => i32::from_be_bytes([payload[0] ^ 0x80, payload[1], payload[2], payload[3]]) as i64,
        8 => i64::from_be_bytes([
            payload[0] ^ 0x80,
            payload[1],
            payload[2],
            payload[3],
            payload[4],
            payload[5],
            payload[6],
            payload[7],
        ]),
        _ => {
            return Err(CodecError::Corruption(format!(
                "unsupported integer width {width}"
            )))
        }
    };
    Ok(value)
}

/// Appends one encoded component to `out`.
fn encode_component_into(
    descriptor: &FieldDescriptor,
    value: &FieldValue,
    out: &mut Vec<u8>,
) -> Result<(), CodecError> {
    let tag = wire_tag(descriptor)?;

    if value.is_null() {
        if !descriptor.nullable {
            return Err(CodecError::TypeMismatch {
                expected: "non-null value for non-nullable column",
                got: "null",
            });
        }
        out.push(NULL_MARKER);
        out.push(tag);
        return Ok(());
    }

    out.push(NOT_NULL_MARKER);
    out.push(tag);

    match (descriptor.field_type, value) {
        (FieldType::Integer, FieldValue::Integer(v)) => {
            let width = descriptor.fixed_width().unwrap_or(8);
            encode_integer(width, *v, out)?;
        }
        (FieldType::Temporal, FieldValue::Temporal(bytes)) => {
            let width = descriptor.fixed_width().unwrap_or(0);
            if bytes.len() != width {
                return Err(CodecError::TypeMismatch {
                    expected: "temporal payload matching declared width",
                    got: "temporal payload of different length",
                });
            }
            out.extend_from_slice(bytes);
        }
        (FieldType::Text, FieldValue::Text(bytes)) | (FieldType::Other, FieldValue::Other(bytes)) => {
            if bytes.len() > MAX_VARLEN_PAYLOAD {
                return Err(CodecError::EncodingOverflow {
                    context: format!(
                        "payload of {} bytes exceeds 16-bit length field",
                        bytes.len()
                    ),
                });
            }
            out.extend_from_slice(bytes);
            out.push(TEXT_TERMINATOR);
            out.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
        }
        (_, other) => {
            return Err(CodecError::TypeMismatch {
                expected: descriptor.field_type.name(),
                got: other.kind(),
            })
        }
    }

    Ok(())
}

/// Encodes a single column value into an order-preserving byte string.
pub fn encode_component(
    descriptor: &FieldDescriptor,
    value: &FieldValue,
) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    encode_component_into(descriptor, value, &mut out)?;
    Ok(out)
}

/// Encodes a composite key from the given components, in column order.
///
/// Callers binding only a leading prefix of an index's columns pass only
/// those components; the result is then a byte prefix of every full key
/// sharing the bound values.
pub fn encode_composite(
    components: &[(&FieldDescriptor, &FieldValue)],
) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    for (descriptor, value) in components {
        encode_component_into(descriptor, value, &mut out)?;
    }
    if out.len() > MAX_KEY_SIZE {
        return Err(CodecError::EncodingOverflow {
            context: format!("composite key of {} bytes exceeds {}", out.len(), MAX_KEY_SIZE),
        });
    }
    Ok(out)
}

/// Decodes the leading component of an encoded key.
///
/// Returns the value and the number of bytes consumed. Used for diagnostics;
/// fixed-size components need no schema context because the wire tag carries
/// their width. Text payloads containing `0x00` bytes cannot always be
/// re-split unambiguously, so candidate terminators are validated against
/// the trailing length field and the first consistent split wins.
pub fn decode_component(bytes: &[u8]) -> Result<(FieldValue, usize), CodecError> {
    if bytes.len() < 2 {
        return Err(CodecError::Corruption(
            "component shorter than marker and tag".to_string(),
        ));
    }
    let marker = bytes[0];
    let tag = bytes[1];
    if marker != NOT_NULL_MARKER && marker != NULL_MARKER {
        return Err(CodecError::Corruption(format!(
            "invalid null marker {marker:#04x}"
        )));
    }
    if marker == NULL_MARKER {
        return Ok((FieldValue::Null, 2));
    }

    let payload = &bytes[2..];
    match tag & TAG_KIND_MASK {
        TAG_KIND_INTEGER => {
            let width = (tag & TAG_WIDTH_MASK) as usize;
            let value = decode_integer(width, payload)?;
            Ok((FieldValue::Integer(value), 2 + width))
        }
        TAG_KIND_TEMPORAL => {
            let width = (tag & TAG_WIDTH_MASK) as usize;
            if payload.len() < width {
                return Err(CodecError::Corruption(format!(
                    "temporal payload truncated: need {width} bytes, have {}",
                    payload.len()
                )));
            }
            Ok((FieldValue::Temporal(payload[..width].to_vec()), 2 + width))
        }
        kind @ (TAG_KIND_TEXT | TAG_KIND_OTHER) => {
            let (value_bytes, consumed) = split_varlen(payload)?;
            let value = if kind == TAG_KIND_TEXT {
                FieldValue::Text(value_bytes)
            } else {
                FieldValue::Other(value_bytes)
            };
            Ok((value, 2 + consumed))
        }
        _ => Err(CodecError::Corruption(format!(
            "invalid wire tag {tag:#04x}"
        ))),
    }
}

/// Finds the terminator + length split of a variable-length payload.
fn split_varlen(payload: &[u8]) -> Result<(Vec<u8>, usize), CodecError> {
    for (pos, byte) in payload.iter().enumerate() {
        if *byte != TEXT_TERMINATOR {
            continue;
        }
        if pos + 3 > payload.len() {
            break;
        }
        let declared = u16::from_be_bytes([payload[pos + 1], payload[pos + 2]]) as usize;
        if declared == pos {
            return Ok((payload[..pos].to_vec(), pos + 3));
        }
    }
    Err(CodecError::Corruption(
        "variable-length payload has no consistent terminator".to_string(),
    ))
}

/// Decodes every component of an encoded composite key.
pub fn decode_composite(bytes: &[u8]) -> Result<Vec<FieldValue>, CodecError> {
    let mut values = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        let (value, consumed) = decode_component(&bytes[offset..])?;
        values.push(value);
        offset += consumed;
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enc(descriptor: &FieldDescriptor, value: &FieldValue) -> Vec<u8> {
        encode_component(descriptor, value).unwrap()
    }

    #[test]
    fn test_signed_integer_ordering() {
        let desc = FieldDescriptor::integer(4);
        let neg = enc(&desc, &FieldValue::Integer(-1));
        let zero = enc(&desc, &FieldValue::Integer(0));
        let pos = enc(&desc, &FieldValue::Integer(1));

        assert!(neg < zero, "negative must sort before zero");
        assert!(zero < pos, "zero must sort before positive");
    }

    #[test]
    fn test_integer_ordering_all_widths() {
        for width in [1usize, 2, 4, 8] {
            let desc = FieldDescriptor::integer(width);
            let lo = enc(&desc, &FieldValue::Integer(-5));
            let hi = enc(&desc, &FieldValue::Integer(7));
            assert!(lo < hi, "width {width}: -5 must sort before 7");
        }
    }

    #[test]
    fn test_integer_width_overflow() {
        let desc = FieldDescriptor::integer(2);
        let result = encode_component(&desc, &FieldValue::Integer(40_000));
        assert!(matches!(result, Err(CodecError::EncodingOverflow { .. })));
    }

    #[test]
    fn test_integer_roundtrip() {
        for width in [1usize, 2, 4, 8] {
            let desc = FieldDescriptor::integer(width);
            for value in [-128i64, -1, 0, 1, 127] {
                let encoded = enc(&desc, &FieldValue::Integer(value));
                let (decoded, consumed) = decode_component(&encoded).unwrap();
                assert_eq!(decoded, FieldValue::Integer(value));
                assert_eq!(consumed, encoded.len());
            }
        }
    }

    #[test]
    fn test_text_prefix_sorts_first() {
        let desc = FieldDescriptor::text();
        let ab = enc(&desc, &FieldValue::text("ab"));
        let abc = enc(&desc, &FieldValue::text("abc"));
        assert!(ab < abc, "a strict prefix must sort before its extension");
    }

    #[test]
    fn test_text_roundtrip() {
        let desc = FieldDescriptor::text();
        for payload in ["", "a", "hello world", "ünïcödé"] {
            let encoded = enc(&desc, &FieldValue::text(payload));
            let (decoded, consumed) = decode_component(&encoded).unwrap();
            assert_eq!(decoded, FieldValue::text(payload));
            assert_eq!(consumed, encoded.len());
        }
    }

    #[test]
    fn test_text_with_embedded_nul_roundtrip() {
        let desc = FieldDescriptor::text();
        let value = FieldValue::Text(vec![b'a', 0x00, b'b']);
        let encoded = enc(&desc, &value);
        let (decoded, consumed) = decode_component(&encoded).unwrap();
        assert_eq!(decoded, value);
        assert_eq!(consumed, encoded.len());
    }

    #[test]
    fn test_text_overflow() {
        let desc = FieldDescriptor::text();
        let oversized = FieldValue::Text(vec![b'x'; MAX_VARLEN_PAYLOAD + 1]);
        let result = encode_component(&desc, &oversized);
        assert!(matches!(result, Err(CodecError::EncodingOverflow { .. })));
    }

    #[test]
    fn test_temporal_passthrough() {
        let desc = FieldDescriptor::temporal(5);
        let packed = vec![0x01, 0x02, 0x03, 0x04, 0x05];
        let encoded = enc(&desc, &FieldValue::Temporal(packed.clone()));
        assert_eq!(&encoded[2..], packed.as_slice());

        let (decoded, consumed) = decode_component(&encoded).unwrap();
        assert_eq!(decoded, FieldValue::Temporal(packed));
        assert_eq!(consumed, encoded.len());
    }

    #[test]
    fn test_temporal_width_mismatch() {
        let desc = FieldDescriptor::temporal(5);
        let result = encode_component(&desc, &FieldValue::Temporal(vec![0x01; 4]));
        assert!(matches!(result, Err(CodecError::TypeMismatch { .. })));
    }

    #[test]
    fn test_type_mismatch() {
        let desc = FieldDescriptor::integer(4);
        let result = encode_component(&desc, &FieldValue::text("oops"));
        assert!(matches!(result, Err(CodecError::TypeMismatch { .. })));
    }

    #[test]
    fn test_null_requires_nullable() {
        let desc = FieldDescriptor::integer(4);
        let result = encode_component(&desc, &FieldValue::Null);
        assert!(matches!(result, Err(CodecError::TypeMismatch { .. })));

        let nullable = FieldDescriptor::integer(4).nullable();
        let encoded = encode_component(&nullable, &FieldValue::Null).unwrap();
        assert_eq!(encoded.len(), 2);
    }

    #[test]
    fn test_null_sorts_after_non_null() {
        let desc = FieldDescriptor::integer(8).nullable();
        let null = enc(&desc, &FieldValue::Null);
        let max = enc(&desc, &FieldValue::Integer(i64::MAX));
        assert!(max < null, "NULL must sort after every non-null value");
    }

    #[test]
    fn test_composite_tuple_ordering() {
        let dept = FieldDescriptor::text();
        let rank = FieldDescriptor::integer(4);

        let encode = |d: &str, r: i64| {
            encode_composite(&[
                (&dept, &FieldValue::text(d)),
                (&rank, &FieldValue::Integer(r)),
            ])
            .unwrap()
        };

        let eng3 = encode("eng", 3);
        let eng10 = encode("eng", 10);
        let sales1 = encode("sales", 1);

        assert!(eng3 < eng10, "(eng, 3) must sort before (eng, 10)");
        assert!(eng10 < sales1, "(eng, 10) must sort before (sales, 1)");
    }

    #[test]
    fn test_composite_prefix_is_byte_prefix() {
        let dept = FieldDescriptor::text();
        let rank = FieldDescriptor::integer(4);

        let full = encode_composite(&[
            (&dept, &FieldValue::text("eng")),
            (&rank, &FieldValue::Integer(3)),
        ])
        .unwrap();
        let prefix = encode_composite(&[(&dept, &FieldValue::text("eng"))]).unwrap();

        assert!(full.starts_with(&prefix));
    }

    #[test]
    fn test_composite_roundtrip() {
        let dept = FieldDescriptor::text();
        let rank = FieldDescriptor::integer(4).nullable();

        let encoded = encode_composite(&[
            (&dept, &FieldValue::text("eng")),
            (&rank, &FieldValue::Null),
        ])
        .unwrap();

        let values = decode_composite(&encoded).unwrap();
        assert_eq!(values, vec![FieldValue::text("eng"), FieldValue::Null]);
    }

    #[test]
    fn test_composite_too_large() {
        let other = FieldDescriptor::other();
        let big = FieldValue::Other(vec![0xAB; MAX_VARLEN_PAYLOAD]);
        let result = encode_composite(&[(&other, &big)]);
        assert!(matches!(result, Err(CodecError::EncodingOverflow { .. })));
    }

    #[test]
    fn test_decode_truncated() {
        let desc = FieldDescriptor::integer(8);
        let encoded = enc(&desc, &FieldValue::Integer(42));
        let result = decode_component(&encoded[..encoded.len() - 1]);
        assert!(matches!(result, Err(CodecError::Corruption(_))));
    }

    #[test]
    fn test_decode_invalid_marker() {
        let result = decode_component(&[0x7F, 0x18, 0x00]);
        assert!(matches!(result, Err(CodecError::Corruption(_))));
    }
}
