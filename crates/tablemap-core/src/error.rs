// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Error types.
//!
//! | Type | Raised | Meaning |
//! |------|--------|---------|
//! | [`ConfigError`] | first metadata build of a type | schema mistake; cached and reported identically to every caller |
//! | [`ResolveError`] | every binding call | field list does not fit the supplied instance |
//! | [`StatementError`] | statement rendering | the record cannot express the statement |

use thiserror::Error;

/// Fatal schema configuration error.
///
/// Detected when a record type's metadata is first built. The failure is
/// cached, so the value is `Clone` and compares equal across callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Two fields resolve to the same column name.
    #[error("duplicate column `{field}` in record `{record}`")]
    DuplicateField {
        /// Record being built.
        record: &'static str,
        /// Colliding column name.
        field:  String
    },

    /// A reference points at a record without exactly one primary key.
    #[error(
        "reference `{field}` in record `{record}` needs exactly one primary key on `{target}`, found {found}"
    )]
    ReferenceCardinality {
        /// Record being built.
        record: &'static str,
        /// Reference field identifier.
        field:  String,
        /// Referenced record.
        target: &'static str,
        /// Number of primary key columns found on the target.
        found:  usize
    },

    /// `inline`, `ref` or embedding used on a field that is not a record.
    #[error("field `{field}` of record `{record}` is marked `{directive}` but `{ty}` is not a record")]
    NotARecord {
        /// Record being built.
        record:    &'static str,
        /// Offending field identifier.
        field:     String,
        /// Directive that requires a record.
        directive: &'static str,
        /// Declared field type.
        ty:        &'static str
    },

    /// Records embed or inline each other in a cycle.
    #[error("embedding cycle: {}", .path.join(" -> "))]
    EmbeddingCycle {
        /// Record names along the cycle, first and last equal.
        path: Vec<&'static str>
    }
}

/// Failure to bind a field list against a live instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The instance's record has no column with this name.
    #[error("field `{field}` not found in record `{record}`")]
    FieldNotFound {
        /// Record of the supplied instance.
        record: &'static str,
        /// Requested column name.
        field:  String
    },

    /// The column exists but its location cannot be reached on the instance.
    #[error("field `{field}` of record `{record}` is not addressable")]
    Unaddressable {
        /// Record of the supplied instance.
        record: &'static str,
        /// Requested column name.
        field:  String
    },

    /// The same location was requested twice in one field list.
    #[error("field `{field}` of record `{record}` is already bound")]
    AlreadyBound {
        /// Record of the supplied instance.
        record: &'static str,
        /// Requested column name.
        field:  String
    },

    /// The instance's record metadata could not be built.
    #[error(transparent)]
    Config(#[from] ConfigError)
}

/// Failure to render a statement for a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatementError {
    /// Select-one, update and delete filter by primary key.
    #[error("record `{record}` has no primary key")]
    MissingPrimaryKey {
        /// Record name.
        record: &'static str
    },

    /// Update needs at least one non-key column.
    #[error("record `{record}` has no columns to update")]
    NothingToUpdate {
        /// Record name.
        record: &'static str
    },

    /// The record metadata could not be built.
    #[error(transparent)]
    Config(#[from] ConfigError)
}

/// Any failure of a bound statement: rendering or binding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Rendering failed.
    #[error(transparent)]
    Statement(#[from] StatementError),

    /// Binding failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError)
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Statement(StatementError::Config(err))
    }
}
