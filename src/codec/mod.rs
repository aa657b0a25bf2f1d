// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Row and key codecs for storing relational rows in a byte-sorted store.
//!
//! Three codecs with sharply different contracts:
//!
//! - [`encode_component`] / [`encode_composite`]: order-preserving key
//!   encoding — unsigned byte comparison of the output matches the natural
//!   ordering of the typed input, column by column.
//! - [`encode_row`] / [`decode_row`]: compact length-prefixed row blobs for
//!   value storage, round-trippable but never ordered.
//! - [`build_bounds`]: scan bound construction (exact / after / prefix) over
//!   encoded keys.
//!
//! # Example
//!
//! ```
//! use celestite::codec::{
//!     encode_composite, FieldDescriptor, FieldValue,
//! };
//!
//! let dept = FieldDescriptor::text();
//! let rank = FieldDescriptor::integer(4);
//!
//! let a = encode_composite(&[
//!     (&dept, &FieldValue::text("eng")),
//!     (&rank, &FieldValue::Integer(3)),
//! ]).unwrap();
//! let b = encode_composite(&[
//!     (&dept, &FieldValue::text("eng")),
//!     (&rank, &FieldValue::Integer(10)),
//! ]).unwrap();
//!
//! assert!(a < b); // (eng, 3) sorts before (eng, 10)
//! ```

mod error;
mod field;
mod key;
mod range;
mod row;

pub use error::CodecError;
pub use field::{FieldDescriptor, FieldType, FieldValue, FieldWidth, Row};
pub use key::{
    decode_component, decode_composite, encode_component, encode_composite, MAX_KEY_SIZE,
    MAX_VARLEN_PAYLOAD, NOT_NULL_MARKER, NULL_MARKER,
};
pub use range::{build_bounds, with_upper_bound, KeyRange, RangeMode};
pub use row::{decode_row, encode_row};
