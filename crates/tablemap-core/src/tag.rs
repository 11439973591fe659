// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field tag mini-language.
//!
//! Every mapped field may carry a tag string made of `;`-separated
//! directives, each optionally followed by a `:`-separated value:
//!
//! | Directive | Effect |
//! |-----------|--------|
//! | `name:<column>` | Explicit column name |
//! | `auto` | Value is generated by the database, never inserted |
//! | `inline` | Nested record flattened with a `<field>_` prefix |
//! | `pk` | Part of the primary key |
//! | `ref` | Foreign key to another record's primary key |
//! | `null` | Column may hold `NULL` |
//!
//! Unknown directives are ignored. There is no escaping: values cannot
//! contain `;` or `:`.
//!
//! ```rust
//! use tablemap_core::tag::FieldDirective;
//!
//! let directive = FieldDirective::parse("name:uid;auto;pk");
//! assert_eq!(directive.name.as_deref(), Some("uid"));
//! assert!(directive.is_autogen && directive.is_pk);
//! ```

use convert_case::{Case, Casing};

/// Key of the explicit column name directive.
pub const NAME: &str = "name";
/// Key of the database-generated directive.
pub const AUTO: &str = "auto";
/// Key of the inline (flattened with prefix) directive.
pub const INLINE: &str = "inline";
/// Key of the primary key directive.
pub const PRIMARY_KEY: &str = "pk";
/// Key of the reference (foreign key) directive.
pub const REFERENCE: &str = "ref";
/// Key of the nullable directive.
pub const NULLABLE: &str = "null";

/// Parsed field tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDirective {
    /// Explicit column name, if any.
    pub name: Option<String>,

    /// Value is produced by the database.
    pub is_autogen: bool,

    /// Nested record flattened into the parent with a name prefix.
    pub is_inline: bool,

    /// Part of the primary key.
    pub is_pk: bool,

    /// Foreign key to another record.
    pub is_reference: bool,

    /// Column may hold `NULL`.
    pub is_nullable: bool
}

impl FieldDirective {
    /// Parse a tag string.
    ///
    /// Directives apply left to right. Flags only ever get set; `name` is
    /// the one value-bearing key and the last occurrence with a value wins
    /// (an empty value clears it back to the default name).
    pub fn parse(tag: &str) -> Self {
        let mut directive = Self::default();
        for item in tag.split(';') {
            let mut parts = item.split(':');
            match parts.next().unwrap_or_default() {
                NAME => {
                    if let Some(value) = parts.next() {
                        directive.name = (!value.is_empty()).then(|| value.to_string());
                    }
                }
                AUTO => directive.is_autogen = true,
                INLINE => directive.is_inline = true,
                PRIMARY_KEY => directive.is_pk = true,
                REFERENCE => directive.is_reference = true,
                NULLABLE => directive.is_nullable = true,
                _ => {}
            }
        }
        directive
    }

    /// Resolved column name for a field declared as `ident`.
    pub fn column_name(&self, ident: &str) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => default_column_name(ident)
        }
    }
}

/// Default column (and table) name for a declared identifier.
///
/// Snake case conversion: `UserID` → `user_id`, `SomeRec` → `some_rec`.
/// Identifiers that are already snake case are returned unchanged.
pub fn default_column_name(ident: &str) -> String {
    ident.to_case(Case::Snake)
}
