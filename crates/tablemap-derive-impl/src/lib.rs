// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Derive macro implementation for tablemap.
//!
//! Use the `tablemap` crate instead; it re-exports [`Record`](macro@Record)
//! together with the runtime types the generated code refers to.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

mod record;

use proc_macro::TokenStream;

/// Derive the `Record` trait for a struct with named fields.
///
/// # Attributes
///
/// | Attribute | Level | Meaning |
/// |-----------|-------|---------|
/// | `#[record(table = "...")]` | struct | Explicit table name |
/// | `#[dbs("...")]` | field | Tag directives: `name:<column>`, `auto`, `pk`, `inline`, `ref`, `null` |
/// | `#[embedded]` | field | Splice the nested record's columns in without a prefix |
///
/// Only `pub` fields are mapped. Other fields keep their place in the
/// declared field order but are never bound.
///
/// # Field Types
///
/// | Declaration | Column |
/// |-------------|--------|
/// | `#[dbs("ref")] pub owner: Owner` | `owner_<pk>` |
/// | `#[dbs("ref")] pub owner: Option<Box<Owner>>` | `owner_<pk>`, nullable |
/// | `#[dbs("inline")] pub profile: Profile` | `profile_<column>` for each column of `Profile` |
/// | `#[embedded] pub key: Key` | every column of `Key` |
/// | `pub tags: Vec<String>` | `tags`, bound through the array adapter |
/// | anything else | one column |
///
/// # Example
///
/// ```rust,ignore
/// use tablemap::Record;
///
/// #[derive(Record)]
/// pub struct Key {
///     #[dbs("auto;pk")]
///     pub id: i64,
/// }
///
/// #[derive(Record)]
/// #[record(table = "events")]
/// pub struct Event {
///     #[embedded]
///     pub key: Key,
///     pub kind: u32,
///     #[dbs("name:title")]
///     pub name: String,
/// }
/// ```
#[proc_macro_derive(Record, attributes(record, dbs, embedded))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive(input)
}
