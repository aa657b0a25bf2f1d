// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Row value encoding and decoding.
//!
//! Serializes a full row (one nullable typed value per column) into the
//! opaque blob stored under the primary key. This format is length-prefixed
//! and compact, not order-preserving; it is never used as a comparison key.
//!
//! Per-field format: a first byte that is either the NULL sentinel `0xFF`
//! (nothing follows) or the start of a minimal-width length field:
//!
//! - `0x00..=0xF7`: the payload length itself.
//! - `0xF8..=0xFE`: the next `byte - 0xF7` (1..=7) bytes are the big-endian
//!   payload length.
//!
//! Integer payloads are stored at the descriptor's width in two's-complement
//! big-endian (no sign flip) and sign-extended on decode. A decoded field
//! count that disagrees with the schema, or any length pointing past the
//! buffer, is a corruption error.

use super::error::CodecError;
use super::field::{FieldDescriptor, FieldType, FieldValue, Row};

/// First-byte sentinel meaning "this field is NULL, no length or payload".
const NULL_SENTINEL: u8 = 0xFF;

/// Largest payload length encodable in the one-byte form.
const MAX_INLINE_LEN: usize = 0xF7;

/// Base for the extension form: `EXT_BASE + n` means n length bytes follow.
const EXT_BASE: u8 = 0xF7;

/// Appends the minimal-width length field for `len`.
fn write_len(len: usize, out: &mut Vec<u8>) {
    if len <= MAX_INLINE_LEN {
        out.push(len as u8);
        return;
    }
    let be = (len as u64).to_be_bytes();
    let significant = 8 - (len as u64).leading_zeros() as usize / 8;
    out.push(EXT_BASE + significant as u8);
    out.extend_from_slice(&be[8 - significant..]);
}

/// Reads a length field, returning the length and bytes consumed.
fn read_len(bytes: &[u8]) -> Result<(usize, usize), CodecError> {
    let first = bytes[0];
    if first as usize <= MAX_INLINE_LEN {
        return Ok((first as usize, 1));
    }
    let ext = (first - EXT_BASE) as usize;
    if bytes.len() < 1 + ext {
        return Err(CodecError::Corruption(
            "length field truncated".to_string(),
        ));
    }
    let mut len: u64 = 0;
    for byte in &bytes[1..1 + ext] {
        len = (len << 8) | u64::from(*byte);
    }
    // Reject non-minimal encodings so every length has exactly one form.
    if bytes[1] == 0 || (ext == 1 && len as usize <= MAX_INLINE_LEN) {
        return Err(CodecError::Corruption(
            "non-minimal length encoding".to_string(),
        ));
    }
    Ok((len as usize, 1 + ext))
}

/// Encodes an integer payload at the descriptor's width, two's complement.
fn integer_payload(width: usize, value: i64) -> Result<Vec<u8>, CodecError> {
    let overflow = |value: i64, width: usize| CodecError::EncodingOverflow {
        context: format!("integer {value} does not fit in {width} bytes"),
    };
    let bytes = match width {
        1 => i8::try_from(value)
            .map_err(|_| overflow(value, width))?
            .to_be_bytes()
            .to_vec(),
        2 => i16::try_from(value)
            .map_err(|_| overflow(value, width))?
            .to_be_bytes()
            .to_vec(),
        4 => i32::try_from(value)
            .map_err(|_| overflow(value, width))?
            .to_be_bytes()
            .to_vec(),
        8 => value.to_be_bytes().to_vec(),
        _ => {
            return Err(CodecError::TypeMismatch {
                expected: "integer width of 1, 2, 4 or 8 bytes",
                got: "unsupported integer width",
            })
        }
    };
    Ok(bytes)
}

/// Sign-extends an integer payload of the descriptor's width.
fn decode_integer_payload(payload: &[u8]) -> Result<i64, CodecError> {
    let value = match payload.len() {
        1 => payload[0] as i8 as i64,
        2 => i16::from_be_bytes([payload[0], payload[1]]) as i64,
        4 => i32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]) as i64,
        8 => i64::from_be_bytes([
            payload[0], payload[1], payload[2], payload[3], payload[4], payload[5], payload[6],
            payload[7],
        ]),
        other => {
            return Err(CodecError::Corruption(format!(
                "integer payload of {other} bytes"
            )))
        }
    };
    Ok(value)
}

/// Encodes a row into its stored value blob.
pub fn encode_row(row: &[FieldValue], schema: &[FieldDescriptor]) -> Result<Vec<u8>, CodecError> {
    if row.len() != schema.len() {
        return Err(CodecError::TypeMismatch {
            expected: "one value per schema column",
            got: "row of different arity",
        });
    }

    let mut out = Vec::new();
    for (descriptor, value) in schema.iter().zip(row) {
        if value.is_null() {
            if !descriptor.nullable {
                return Err(CodecError::TypeMismatch {
                    expected: "non-null value for non-nullable column",
                    got: "null",
                });
            }
            out.push(NULL_SENTINEL);
            continue;
        }

        let payload = match (descriptor.field_type, value) {
            (FieldType::Integer, FieldValue::Integer(v)) => {
                integer_payload(descriptor.fixed_width().unwrap_or(8), *v)?
            }
            (FieldType::Temporal, FieldValue::Temporal(bytes)) => {
                if Some(bytes.len()) != descriptor.fixed_width() {
                    return Err(CodecError::TypeMismatch {
                        expected: "temporal payload matching declared width",
                        got: "temporal payload of different length",
                    });
                }
                bytes.clone()
            }
            (FieldType::Text, FieldValue::Text(bytes))
            | (FieldType::Other, FieldValue::Other(bytes)) => bytes.clone(),
            (_, other) => {
                return Err(CodecError::TypeMismatch {
                    expected: descriptor.field_type.name(),
                    got: other.kind(),
                })
            }
        };

        write_len(payload.len(), &mut out);
        out.extend_from_slice(&payload);
    }
    Ok(out)
}

/// Decodes a stored value blob back into a row.
///
/// The blob must contain exactly one field per schema column.
pub fn decode_row(bytes: &[u8], schema: &[FieldDescriptor]) -> Result<Row, CodecError> {
    let mut row = Vec::with_capacity(schema.len());
    let mut offset = 0;

    for descriptor in schema {
        if offset >= bytes.len() {
            return Err(CodecError::Corruption(format!(
                "row blob has {} fields but schema has {} columns",
                row.len(),
                schema.len()
            )));
        }

        if bytes[offset] == NULL_SENTINEL {
            if !descriptor.nullable {
                return Err(CodecError::Corruption(
                    "null field stored for non-nullable column".to_string(),
                ));
            }
            row.push(FieldValue::Null);
            offset += 1;
            continue;
        }

        let (len, consumed) = read_len(&bytes[offset..])?;
        offset += consumed;
        if offset + len > bytes.len() {
            return Err(CodecError::Corruption(format!(
                "field length {len} points past the buffer"
            )));
        }
        let payload = &bytes[offset..offset + len];
        offset += len;

        let value = match descriptor.field_type {
            FieldType::Integer => {
                if Some(len) != descriptor.fixed_width() {
                    return Err(CodecError::Corruption(format!(
                        "integer field of {len} bytes for a {:?}-wide column",
                        descriptor.fixed_width()
                    )));
                }
                FieldValue::Integer(decode_integer_payload(payload)?)
            }
            FieldType::Temporal => {
                if Some(len) != descriptor.fixed_width() {
                    return Err(CodecError::Corruption(format!(
                        "temporal field of {len} bytes for a {:?}-wide column",
                        descriptor.fixed_width()
                    )));
                }
                FieldValue::Temporal(payload.to_vec())
            }
            FieldType::Text => FieldValue::Text(payload.to_vec()),
            FieldType::Other => FieldValue::Other(payload.to_vec()),
        };
        row.push(value);
    }

    if offset != bytes.len() {
        return Err(CodecError::Corruption(format!(
            "{} trailing bytes after the last schema column",
            bytes.len() - offset
        )));
    }

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_schema() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::integer(8),
            FieldDescriptor::text().nullable(),
            FieldDescriptor::temporal(5).nullable(),
            FieldDescriptor::other().nullable(),
        ]
    }

    #[test]
    fn test_roundtrip_basic() {
        let schema = test_schema();
        let row = vec![
            FieldValue::Integer(42),
            FieldValue::text("alice"),
            FieldValue::Temporal(vec![1, 2, 3, 4, 5]),
            FieldValue::Other(vec![0xDE, 0xAD]),
        ];

        let encoded = encode_row(&row, &schema).unwrap();
        let decoded = decode_row(&encoded, &schema).unwrap();
        assert_eq!(decoded, row);
    }

    #[test]
    fn test_roundtrip_all_null() {
        let schema = vec![
            FieldDescriptor::integer(4).nullable(),
            FieldDescriptor::text().nullable(),
            FieldDescriptor::other().nullable(),
        ];
        let row = vec![FieldValue::Null, FieldValue::Null, FieldValue::Null];

        let encoded = encode_row(&row, &schema).unwrap();
        assert_eq!(encoded, vec![NULL_SENTINEL; 3]);

        let decoded = decode_row(&encoded, &schema).unwrap();
        assert_eq!(decoded, row);
    }

    #[test]
    fn test_empty_text_is_not_null() {
        let schema = vec![FieldDescriptor::text().nullable()];
        let row = vec![FieldValue::Text(Vec::new())];

        let encoded = encode_row(&row, &schema).unwrap();
        let decoded = decode_row(&encoded, &schema).unwrap();

        assert_eq!(decoded, row);
        assert!(!decoded[0].is_null());
    }

    #[test]
    fn test_negative_integer_roundtrip() {
        for width in [1usize, 2, 4, 8] {
            let schema = vec![FieldDescriptor::integer(width)];
            let row = vec![FieldValue::Integer(-7)];
            let encoded = encode_row(&row, &schema).unwrap();
            let decoded = decode_row(&encoded, &schema).unwrap();
            assert_eq!(decoded, row, "width {width}");
        }
    }

    #[test]
    fn test_long_payload_roundtrip() {
        let schema = vec![FieldDescriptor::text()];
        let row = vec![FieldValue::Text(vec![b'x'; 5000])];

        let encoded = encode_row(&row, &schema).unwrap();
        // 5000 > 0xF7, so the length field takes the extension form.
        assert_eq!(encoded[0], EXT_BASE + 2);

        let decoded = decode_row(&encoded, &schema).unwrap();
        assert_eq!(decoded, row);
    }

    #[test]
    fn test_arity_mismatch() {
        let schema = test_schema();
        let row = vec![FieldValue::Integer(1)];
        let result = encode_row(&row, &schema);
        assert!(matches!(result, Err(CodecError::TypeMismatch { .. })));
    }

    #[test]
    fn test_decode_too_few_fields() {
        let schema = test_schema();
        let row = vec![
            FieldValue::Integer(1),
            FieldValue::Null,
            FieldValue::Null,
            FieldValue::Null,
        ];
        let encoded = encode_row(&row, &schema).unwrap();
        let result = decode_row(&encoded[..encoded.len() - 1], &schema);
        assert!(matches!(result, Err(CodecError::Corruption(_))));
    }

    #[test]
    fn test_decode_trailing_bytes() {
        let schema = vec![FieldDescriptor::integer(4)];
        let row = vec![FieldValue::Integer(9)];
        let mut encoded = encode_row(&row, &schema).unwrap();
        encoded.push(0x00);
        let result = decode_row(&encoded, &schema);
        assert!(matches!(result, Err(CodecError::Corruption(_))));
    }

    #[test]
    fn test_decode_length_past_buffer() {
        let schema = vec![FieldDescriptor::text()];
        // Length field claims 10 bytes but only 2 follow.
        let bytes = vec![10, b'a', b'b'];
        let result = decode_row(&bytes, &schema);
        assert!(matches!(result, Err(CodecError::Corruption(_))));
    }

    #[test]
    fn test_decode_non_minimal_length() {
        let schema = vec![FieldDescriptor::text()];
        // Extension form for a length that fits inline.
        let bytes = vec![EXT_BASE + 1, 0x05, b'a', b'b', b'c', b'd', b'e'];
        let result = decode_row(&bytes, &schema);
        assert!(matches!(result, Err(CodecError::Corruption(_))));
    }
}
