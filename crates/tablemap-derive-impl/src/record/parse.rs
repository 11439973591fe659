// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Parsing of record definitions.
//!
//! | Attribute | Parsed by | Result |
//! |-----------|-----------|--------|
//! | `#[record(table = "...")]` | darling ([`RecordAttrs`]) | [`RecordDef::table`] |
//! | `#[dbs("...")]` | [`FieldDef::from_field`] | [`FieldDef::tag`] |
//! | `#[embedded]` | [`FieldDef::from_field`] | [`FieldDef::embedded`] |

mod field;
mod types;

use darling::FromDeriveInput;
use syn::{DeriveInput, Generics, Ident};

pub use self::field::{FieldDef, FieldShape};

/// Record-level attributes parsed from `#[record(...)]`.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(record), supports(struct_named))]
pub struct RecordAttrs {
    /// Struct identifier.
    pub ident: Ident,

    /// Struct generics.
    pub generics: Generics,

    /// Explicit table name.
    #[darling(default)]
    pub table: Option<String>
}

/// Complete parsed record definition.
#[derive(Debug)]
pub struct RecordDef {
    /// Struct identifier (e.g., `SomeRec`).
    pub ident: Ident,

    /// Struct generics, forwarded to the impl.
    pub generics: Generics,

    /// Explicit table name, if any.
    pub table: Option<String>,

    /// Declared fields in order, private ones included.
    pub fields: Vec<FieldDef>
}

impl RecordDef {
    /// Parse a record definition from syn's `DeriveInput`.
    ///
    /// # Errors
    ///
    /// - Applied to an enum, union, tuple or unit struct
    /// - Unknown keys in `#[record(...)]`
    /// - A `#[dbs(...)]` argument that is not a string literal
    pub fn from_derive_input(input: &DeriveInput) -> darling::Result<Self> {
        let named = match &input.data {
            syn::Data::Struct(data) => match &data.fields {
                syn::Fields::Named(named) => named,
                _ => {
                    return Err(darling::Error::custom("Record requires named fields")
                        .with_span(&input.ident));
                }
            },
            _ => {
                return Err(
                    darling::Error::custom("Record can only be derived for structs")
                        .with_span(&input.ident)
                );
            }
        };

        let attrs = RecordAttrs::from_derive_input(input)?;

        let mut errors = darling::Error::accumulator();
        let fields: Vec<_> = named
            .named
            .iter()
            .filter_map(|field| errors.handle(FieldDef::from_field(field)))
            .collect();
        errors.finish()?;

        Ok(Self {
            ident: attrs.ident,
            generics: attrs.generics,
            table: attrs.table,
            fields
        })
    }
}

#[cfg(test)]
mod tests {
    use syn::DeriveInput;

    use super::*;

    #[test]
    fn table_attribute() {
        let input: DeriveInput = syn::parse_quote! {
            #[record(table = "accounts")]
            pub struct Account {
                #[dbs("auto;pk")]
                pub id: i64,
                pub email: String,
                secret: String,
            }
        };
        let record = RecordDef::from_derive_input(&input).unwrap();
        assert_eq!(record.ident, "Account");
        assert_eq!(record.table.as_deref(), Some("accounts"));
        assert_eq!(record.fields.len(), 3);
        assert_eq!(record.fields[0].tag, "auto;pk");
        assert!(!record.fields[2].is_public);
    }

    #[test]
    fn no_table_attribute() {
        let input: DeriveInput = syn::parse_quote! {
            pub struct Account {
                pub id: i64,
            }
        };
        let record = RecordDef::from_derive_input(&input).unwrap();
        assert_eq!(record.table, None);
    }

    #[test]
    fn tuple_struct_rejected() {
        let input: DeriveInput = syn::parse_quote! {
            pub struct Account(i64);
        };
        let err = RecordDef::from_derive_input(&input).unwrap_err();
        assert_eq!(err.to_string(), "Record requires named fields");
    }

    #[test]
    fn enum_rejected() {
        let input: DeriveInput = syn::parse_quote! {
            pub enum Account { A, B }
        };
        assert!(RecordDef::from_derive_input(&input).is_err());
    }

    #[test]
    fn unknown_record_key_rejected() {
        let input: DeriveInput = syn::parse_quote! {
            #[record(tabel = "accounts")]
            pub struct Account {
                pub id: i64,
            }
        };
        assert!(RecordDef::from_derive_input(&input).is_err());
    }

    #[test]
    fn non_string_tag_rejected() {
        let input: DeriveInput = syn::parse_quote! {
            pub struct Account {
                #[dbs(pk)]
                pub id: i64,
            }
        };
        assert!(RecordDef::from_derive_input(&input).is_err());
    }
}
