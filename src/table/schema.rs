// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Table schemas.

use crate::codec::FieldDescriptor;
use crate::index::IndexDescriptor;

use super::error::TableError;

/// Column layout and indexes of one table.
///
/// `primary: None` means the table has no explicit primary key and rows are
/// keyed by a synthesized hidden primary key instead.
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub table_id: u32,
    pub columns: Vec<FieldDescriptor>,
    pub primary: Option<IndexDescriptor>,
    pub secondary: Vec<IndexDescriptor>,
}

impl TableSchema {
    /// Creates and validates a schema.
    pub fn new(
        table_id: u32,
        columns: Vec<FieldDescriptor>,
        primary: Option<IndexDescriptor>,
        secondary: Vec<IndexDescriptor>,
    ) -> Result<Self, TableError> {
        let schema = Self {
            table_id,
            columns,
            primary,
            secondary,
        };
        schema.validate()?;
        Ok(schema)
    }

    fn validate(&self) -> Result<(), TableError> {
        if self.columns.is_empty() {
            return Err(TableError::InvalidSchema(
                "table has no columns".to_string(),
            ));
        }

        if let Some(primary) = &self.primary {
            if primary.columns.is_empty() {
                return Err(TableError::InvalidSchema(format!(
                    "primary index {:?} has no columns",
                    primary.name
                )));
            }
            for &position in &primary.columns {
                let descriptor = self.columns.get(position).ok_or_else(|| {
                    TableError::InvalidSchema(format!(
                        "primary index {:?} references column {position} of {}",
                        primary.name,
                        self.columns.len()
                    ))
                })?;
                if descriptor.nullable {
                    return Err(TableError::InvalidSchema(format!(
                        "primary index {:?} includes nullable column {position}",
                        primary.name
                    )));
                }
            }
        }

        let mut seen_ids = std::collections::BTreeSet::new();
        for index in &self.secondary {
            if !seen_ids.insert(index.index_id) {
                return Err(TableError::InvalidSchema(format!(
                    "duplicate index id {}",
                    index.index_id
                )));
            }
            if index.columns.is_empty() {
                return Err(TableError::InvalidSchema(format!(
                    "index {:?} has no columns",
                    index.name
                )));
            }
            for &position in &index.columns {
                if position >= self.columns.len() {
                    return Err(TableError::InvalidSchema(format!(
                        "index {:?} references column {position} of {}",
                        index.name,
                        self.columns.len()
                    )));
                }
            }
        }
        Ok(())
    }
}
