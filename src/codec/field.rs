// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Typed column values and their descriptors.

/// Column type tags.
///
/// A closed set of four kinds. Integer and temporal columns carry a fixed
/// byte width in their [`FieldDescriptor`]; text and other columns are
/// variable-width byte strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Signed two's-complement integer, 1/2/4/8 bytes wide.
    Integer,
    /// Variable-length byte string with collation-order bytes.
    Text,
    /// Fixed-width bytes whose source representation already sorts
    /// byte-lexicographically.
    Temporal,
    /// Opaque variable-length bytes.
    Other,
}

impl FieldType {
    /// Human-readable name, used in error context.
    pub fn name(self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::Text => "text",
            FieldType::Temporal => "temporal",
            FieldType::Other => "other",
        }
    }
}

/// Byte width of a column's encoded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    /// Payload is always exactly this many bytes.
    Fixed(usize),
    /// Payload length varies per value.
    Variable,
}

/// Per-column metadata supplied by the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub field_type: FieldType,
    pub nullable: bool,
    pub width: FieldWidth,
}

impl FieldDescriptor {
    /// An integer column of the given byte width (1, 2, 4 or 8).
    pub fn integer(width: usize) -> Self {
        Self {
            field_type: FieldType::Integer,
            nullable: false,
            width: FieldWidth::Fixed(width),
        }
    }

    /// A variable-length text column.
    pub fn text() -> Self {
        Self {
            field_type: FieldType::Text,
            nullable: false,
            width: FieldWidth::Variable,
        }
    }

    /// A temporal column whose packed representation is `width` bytes.
    pub fn temporal(width: usize) -> Self {
        Self {
            field_type: FieldType::Temporal,
            nullable: false,
            width: FieldWidth::Fixed(width),
        }
    }

    /// An opaque variable-length column.
    pub fn other() -> Self {
        Self {
            field_type: FieldType::Other,
            nullable: false,
            width: FieldWidth::Variable,
        }
    }

    /// Returns a copy of this descriptor that accepts NULL.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Returns the fixed payload width, if any.
    #[inline]
    pub fn fixed_width(&self) -> Option<usize> {
        match self.width {
            FieldWidth::Fixed(w) => Some(w),
            FieldWidth::Variable => None,
        }
    }
}

/// A single column value.
///
/// The variant must agree with the column's [`FieldDescriptor`]; the codec
/// rejects mismatches rather than coercing. `Null` is a first-class value so
/// that rows and keys can carry SQL NULL without an out-of-band flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Text(Vec<u8>),
    Temporal(Vec<u8>),
    Other(Vec<u8>),
}

impl FieldValue {
    /// Returns true for the NULL value.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Human-readable variant name, used in error context.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Integer(_) => "integer",
            FieldValue::Text(_) => "text",
            FieldValue::Temporal(_) => "temporal",
            FieldValue::Other(_) => "other",
        }
    }

    /// Convenience constructor for text values.
    pub fn text(s: &str) -> Self {
        FieldValue::Text(s.as_bytes().to_vec())
    }
}

/// A row: one value per column, in schema order.
pub type Row = Vec<FieldValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_constructors() {
        let id = FieldDescriptor::integer(4);
        assert_eq!(id.field_type, FieldType::Integer);
        assert_eq!(id.fixed_width(), Some(4));
        assert!(!id.nullable);

        let name = FieldDescriptor::text().nullable();
        assert_eq!(name.field_type, FieldType::Text);
        assert_eq!(name.fixed_width(), None);
        assert!(name.nullable);
    }

    #[test]
    fn test_null_is_distinct_from_empty_text() {
        assert!(FieldValue::Null.is_null());
        assert!(!FieldValue::Text(Vec::new()).is_null());
        assert_ne!(FieldValue::Null, FieldValue::Text(Vec::new()));
    }
}
