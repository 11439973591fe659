// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Record derive macro implementation.
//!
//! ```text
//! record.rs (orchestrator)
//! │
//! ├── parse/       → #[record(...)] with darling, #[dbs(...)] / #[embedded] per field
//! └── codegen.rs   → impl ::tablemap::Record
//! ```
//!
//! For a record like:
//!
//! ```rust,ignore
//! #[derive(Record)]
//! pub struct Note {
//!     #[dbs("auto;pk")]
//!     pub id: i64,
//!     pub tags: Vec<String>,
//!     draft: bool,
//! }
//! ```
//!
//! the macro generates `shape()` with one `FieldDef` per declared field,
//! `table_name()` when `#[record(table)]` is set, and `slots_mut()` with
//! `Slot::Value` for `id` and `tags` and `Slot::Private` for `draft`.

mod codegen;
pub mod parse;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

use self::parse::RecordDef;

/// Main entry point for the Record derive macro.
pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match RecordDef::from_derive_input(&input) {
        Ok(record) => codegen::generate(&record).into(),
        Err(err) => err.write_errors().into()
    }
}
