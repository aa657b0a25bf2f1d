// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Index descriptors.

/// Describes one index over a table.
///
/// `columns` are positions into the table schema, in index-key order. The
/// primary index is the distinguished one held by the table schema;
/// secondary indexes map each encoded key to the set of primary keys whose
/// rows currently carry that key's column values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDescriptor {
    /// Identifier giving this index its own key namespace within the table.
    pub index_id: u32,
    pub name: String,
    pub is_unique: bool,
    pub columns: Vec<usize>,
}

impl IndexDescriptor {
    /// Creates a non-unique index descriptor.
    pub fn new(index_id: u32, name: &str, columns: Vec<usize>) -> Self {
        Self {
            index_id,
            name: name.to_string(),
            is_unique: false,
            columns,
        }
    }

    /// Creates a unique index descriptor.
    pub fn unique(index_id: u32, name: &str, columns: Vec<usize>) -> Self {
        Self {
            index_id,
            name: name.to_string(),
            is_unique: true,
            columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_constructors() {
        let by_dept = IndexDescriptor::new(1, "by_dept", vec![1]);
        assert!(!by_dept.is_unique);
        assert_eq!(by_dept.columns, vec![1]);

        let by_id = IndexDescriptor::unique(0, "primary", vec![0]);
        assert!(by_id.is_unique);
    }
}
