// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

//! # tablemap
//!
//! One crate, all features. Re-exports:
//! - [`Record`](macro@Record) derive macro from `tablemap-derive-impl`
//! - All types from `tablemap-core` ([`TypeCache`], [`PgAdapter`],
//!   [`FieldList`], ...)

pub use tablemap_core::*;
pub use tablemap_derive_impl::Record;
