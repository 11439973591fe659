// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust
//! use tablemap_core::prelude::*;
//! ```

pub use crate::{
    ConfigError, Error, FieldDef, FieldDescriptor, FieldList, FieldRef, FieldType, PgAdapter,
    QueryOptions, Record, RecordShape, RecordType, ResolveError, Slot, StatementError,
    TypeCache, TypeMetadata
};
