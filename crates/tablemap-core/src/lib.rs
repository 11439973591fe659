// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Core types for tablemap.
//!
//! Maps record structs onto relational tables: derives column metadata from
//! per-field tags, renders single-row statements and binds the columns of
//! live instances as statement arguments and scan targets.
//!
//! # Overview
//!
//! | Module | Role |
//! |--------|------|
//! | [`tag`] | Field tag mini-language |
//! | [`record`] | [`Record`] trait: static description of a record type |
//! | [`cache`] | [`TypeCache`]: memoised [`TypeMetadata`] per record type |
//! | [`field`] | [`FieldDescriptor`] and ordered [`FieldList`]s |
//! | [`resolve`] | [`FieldRef`]: mutable handles into live instances |
//! | [`statement`] | Dialect-neutral statement rendering and caching |
//! | [`postgres`] | [`PgAdapter`]: `$N` statements paired with their arguments |
//!
//! # Usage
//!
//! Most users should use `tablemap` with `#[derive(Record)]`, which
//! re-exports this crate. The [`record`] module shows a manual
//! implementation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod cache;
pub mod error;
pub mod field;
pub mod metadata;
pub mod postgres;
pub mod prelude;
pub mod record;
pub mod resolve;
pub mod statement;
pub mod tag;

mod builder;
mod once_map;

pub use cache::TypeCache;
pub use error::{ConfigError, Error, ResolveError, StatementError};
pub use field::{FieldDescriptor, FieldList, ReferenceInfo};
pub use metadata::TypeMetadata;
pub use postgres::{Bound, PgAdapter, Postgres};
pub use record::{Column, FieldDef, FieldKind, FieldType, Record, RecordShape, RecordType, Slot, Visibility};
pub use resolve::{ArrayRef, FieldRef};
pub use statement::{Dialect, QueryOptions, StatementCache, StatementKey, StatementKind};
pub use tag::FieldDirective;
