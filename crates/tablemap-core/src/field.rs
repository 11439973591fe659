// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Column descriptors and ordered descriptor lists.

use std::{slice, sync::Arc};

use crate::{
    cache::TypeCache,
    error::ResolveError,
    record::{FieldType, Record, RecordType},
    resolve::FieldRef
};

/// Metadata of one mapped column.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldDescriptor {
    /// Resolved column name, unique within its record.
    pub name: String,

    /// Declared type of the physical field.
    pub ty: FieldType,

    /// Path of declared-field indexes from the root record down to the
    /// physical field, outermost first.
    pub index_path: Vec<usize>,

    /// Part of the primary key.
    pub is_pk: bool,

    /// Value is produced by the database.
    pub is_autogen: bool,

    /// Column may hold `NULL`.
    pub is_nullable: bool,

    /// Foreign key details when the column comes from a reference field.
    pub reference: Option<ReferenceInfo>
}

impl FieldDescriptor {
    /// Move the descriptor under a parent field at `index`.
    pub(crate) fn nested_under(mut self, index: usize) -> Self {
        self.index_path.insert(0, index);
        self
    }

    /// Prefix the column name with `<prefix>_`.
    pub(crate) fn prefixed(mut self, prefix: Option<&str>) -> Self {
        if let Some(prefix) = prefix {
            self.name = format!("{prefix}_{}", self.name);
        }
        self
    }

    /// Check if the column is a foreign key.
    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }
}

/// Foreign key link of a reference column.
///
/// The target is a type handle, not built metadata; resolve it lazily with
/// [`TypeCache::reference_target`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReferenceInfo {
    /// Referenced record.
    pub target: RecordType,

    /// Column name of the referenced primary key on the target.
    pub field: String
}

/// Ordered, cheaply clonable list of column descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldList(Arc<[FieldDescriptor]>);

impl FieldList {
    /// Build a list from descriptors in order.
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self(fields.into())
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the list has no columns.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Descriptors in order.
    pub fn iter(&self) -> slice::Iter<'_, FieldDescriptor> {
        self.0.iter()
    }

    /// Descriptors as a slice.
    pub fn as_slice(&self) -> &[FieldDescriptor] {
        &self.0
    }

    /// Column names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|field| field.name.as_str())
    }

    /// Descriptor by column name.
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.0.iter().find(|field| field.name == name)
    }

    /// Subsequence of the columns matching `predicate`, order preserved.
    pub fn filter(&self, mut predicate: impl FnMut(&FieldDescriptor) -> bool) -> Self {
        Self(self.0.iter().filter(|field| predicate(field)).cloned().collect())
    }

    /// This list followed by `other`.
    pub fn concat(&self, other: &Self) -> Self {
        Self(self.0.iter().chain(other.iter()).cloned().collect())
    }

    /// Bind the columns of this list against `instance`.
    ///
    /// See [`TypeCache::refs`].
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when a column is unknown to `T` or cannot be
    /// addressed on the instance.
    pub fn refs<'a, T: Record>(
        &self,
        cache: &TypeCache,
        instance: &'a mut T
    ) -> Result<Vec<FieldRef<'a>>, ResolveError> {
        cache.refs(self, instance)
    }
}

impl<'a> IntoIterator for &'a FieldList {
    type Item = &'a FieldDescriptor;
    type IntoIter = slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<FieldDescriptor> for FieldList {
    fn from_iter<I: IntoIterator<Item = FieldDescriptor>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FieldList {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}
