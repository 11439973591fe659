// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `impl ::tablemap::Record` generation.
//!
//! | Shape | `FieldType` | `Slot` |
//! |-------|-------------|--------|
//! | private | `scalar` | `Private` |
//! | scalar | `scalar` | `Value(&mut self.f)` |
//! | sequence | `sequence` | `Value(&mut self.f)` |
//! | record | `record::<T>` | `Record(&mut self.f)` / `Record(&mut *self.f)` |
//! | optional record | `optional_record::<T>` | `Value(&mut self.f)` |

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::{FieldDef, FieldShape, RecordDef};

/// Generate the `Record` implementation.
pub fn generate(record: &RecordDef) -> TokenStream {
    let ident = &record.ident;
    let name = ident.to_string();
    let (impl_generics, ty_generics, where_clause) = record.generics.split_for_impl();

    let defs = record.fields.iter().map(field_def);
    let slots = record.fields.iter().map(slot);
    let table_name = record.table.as_ref().map(|table| {
        quote! {
            fn table_name() -> ::core::option::Option<&'static str> {
                ::core::option::Option::Some(#table)
            }
        }
    });

    quote! {
        #[automatically_derived]
        impl #impl_generics ::tablemap::Record for #ident #ty_generics #where_clause {
            fn shape() -> ::tablemap::RecordShape {
                ::tablemap::RecordShape::new(#name, ::std::vec![#(#defs),*])
            }

            #table_name

            fn slots_mut(&mut self) -> ::std::vec::Vec<::tablemap::Slot<'_>> {
                ::std::vec![#(#slots),*]
            }
        }
    }
}

fn field_def(field: &FieldDef) -> TokenStream {
    let ident = field.ident.to_string();
    let tag = &field.tag;
    let ty = &field.ty;
    let type_name = quote!(::core::any::type_name::<#ty>());

    let field_type = match &field.shape {
        FieldShape::Private | FieldShape::Scalar => {
            quote!(::tablemap::FieldType::scalar(#type_name))
        }
        FieldShape::Sequence => quote!(::tablemap::FieldType::sequence(#type_name)),
        FieldShape::Record {
            target, ..
        } => quote!(::tablemap::FieldType::record::<#target>(#type_name)),
        FieldShape::OptionalRecord {
            target
        } => quote!(::tablemap::FieldType::optional_record::<#target>(#type_name))
    };

    let def = if field.is_public {
        quote!(::tablemap::FieldDef::new(#ident, #tag, #field_type))
    } else {
        quote!(::tablemap::FieldDef::private(#ident, #field_type))
    };

    if field.embedded {
        quote!(#def.embedded())
    } else {
        def
    }
}

fn slot(field: &FieldDef) -> TokenStream {
    let ident = &field.ident;
    match &field.shape {
        FieldShape::Private => quote!(::tablemap::Slot::Private),
        FieldShape::Scalar | FieldShape::Sequence | FieldShape::OptionalRecord { .. } => {
            quote!(::tablemap::Slot::Value(&mut self.#ident))
        }
        FieldShape::Record {
            boxed: false, ..
        } => quote!(::tablemap::Slot::Record(&mut self.#ident)),
        FieldShape::Record {
            boxed: true, ..
        } => quote!(::tablemap::Slot::Record(&mut *self.#ident))
    }
}

#[cfg(test)]
mod tests {
    use syn::{DeriveInput, parse_quote};

    use super::*;

    fn expand(input: DeriveInput) -> String {
        let record = RecordDef::from_derive_input(&input).unwrap();
        generate(&record).to_string()
    }

    #[test]
    fn explicit_table_name() {
        let code = expand(parse_quote! {
            #[record(table = "events")]
            pub struct Event {
                #[dbs("auto;pk")]
                pub id: i64,
            }
        });
        assert!(code.contains("fn table_name"));
        assert!(code.contains("\"events\""));
        assert!(code.contains("\"auto;pk\""));
    }

    #[test]
    fn default_table_name_not_overridden() {
        let code = expand(parse_quote! {
            pub struct Event {
                pub id: i64,
            }
        });
        assert!(!code.contains("fn table_name"));
        assert!(code.contains("RecordShape :: new (\"Event\""));
    }

    #[test]
    fn slots() {
        let code = expand(parse_quote! {
            pub struct Order {
                #[embedded]
                pub key: Key,
                #[dbs("ref")]
                pub customer: Option<Box<Customer>>,
                #[dbs("inline")]
                pub address: Box<Address>,
                pub lines: Vec<Line>,
                note: String,
            }
        });
        assert!(code.contains("Slot :: Record (& mut self . key)"));
        assert!(code.contains("Slot :: Value (& mut self . customer)"));
        assert!(code.contains("Slot :: Record (& mut * self . address)"));
        assert!(code.contains("Slot :: Value (& mut self . lines)"));
        assert!(code.contains("Slot :: Private"));
        assert!(code.contains("FieldType :: optional_record :: < Customer >"));
        assert!(code.contains("FieldType :: sequence"));
        assert!(code.contains(". embedded ()"));
        assert!(code.contains("FieldDef :: private (\"note\""));
    }
}
