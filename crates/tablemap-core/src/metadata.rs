// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Built, immutable metadata of one record type.
//!
//! | Partition | Contents |
//! |-----------|----------|
//! | [`all_fields`](TypeMetadata::all_fields) | every mapped column, declaration order |
//! | [`pk_fields`](TypeMetadata::pk_fields) | `pk` columns |
//! | [`auto_fields`](TypeMetadata::auto_fields) | `auto` columns |
//! | [`non_pk_fields`](TypeMetadata::non_pk_fields) | everything but `pk` |
//! | [`non_auto_fields`](TypeMetadata::non_auto_fields) | everything but `auto` |
//!
//! Every partition is a subsequence of the full list with relative order
//! preserved.

use std::collections::HashMap;

use crate::{
    error::ConfigError,
    field::{FieldDescriptor, FieldList},
    record::RecordType,
    tag::default_column_name
};

/// Column metadata and table name of one record type.
#[derive(Debug, Clone)]
pub struct TypeMetadata {
    record:     RecordType,
    type_name:  &'static str,
    table_name: String,
    all:        FieldList,
    pk:         FieldList,
    auto:       FieldList,
    non_pk:     FieldList,
    non_auto:   FieldList,
    by_name:    HashMap<String, usize>
}

impl TypeMetadata {
    /// Assemble metadata from a fully expanded column list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateField`] when two columns share a name.
    pub(crate) fn new(record: RecordType, fields: Vec<FieldDescriptor>) -> Result<Self, ConfigError> {
        let type_name = record.shape().type_name;
        let mut by_name = HashMap::with_capacity(fields.len());
        for (position, field) in fields.iter().enumerate() {
            if by_name.insert(field.name.clone(), position).is_some() {
                return Err(ConfigError::DuplicateField {
                    record: type_name,
                    field:  field.name.clone()
                });
            }
        }

        let table_name = record
            .table_name()
            .map_or_else(|| default_column_name(type_name), str::to_string);
        let all = FieldList::new(fields);

        Ok(Self {
            record,
            type_name,
            table_name,
            pk: all.filter(|f| f.is_pk),
            auto: all.filter(|f| f.is_autogen),
            non_pk: all.filter(|f| !f.is_pk),
            non_auto: all.filter(|f| !f.is_autogen),
            all,
            by_name
        })
    }

    /// Type handle of the record.
    pub fn record(&self) -> RecordType {
        self.record
    }

    /// Bare type identifier, e.g. `SomeRec`.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Resolved table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Every mapped column in declaration order.
    pub fn all_fields(&self) -> &FieldList {
        &self.all
    }

    /// Primary key columns.
    pub fn pk_fields(&self) -> &FieldList {
        &self.pk
    }

    /// Database-generated columns.
    pub fn auto_fields(&self) -> &FieldList {
        &self.auto
    }

    /// Columns outside the primary key.
    pub fn non_pk_fields(&self) -> &FieldList {
        &self.non_pk
    }

    /// Columns the caller supplies on insert.
    pub fn non_auto_fields(&self) -> &FieldList {
        &self.non_auto
    }

    /// Column by resolved name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name
            .get(name)
            .map(|&position| &self.all.as_slice()[position])
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TypeMetadata {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("TypeMetadata", 3)?;
        state.serialize_field("type_name", self.type_name)?;
        state.serialize_field("table_name", &self.table_name)?;
        state.serialize_field("fields", &self.all)?;
        state.end()
    }
}
