// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field-level parsing.
//!
//! The tag string is parsed at expansion time with the same parser the
//! runtime uses, so the macro knows which fields hold nested records and
//! how to hand out their slots.

use syn::{Field, Ident, LitStr, Type, Visibility};
use tablemap_core::tag::FieldDirective;

use super::types::{box_inner, is_vec, option_inner};

/// How a declared field is described and addressed.
#[derive(Debug, Clone)]
pub enum FieldShape {
    /// Not `pub`; described but never addressable.
    Private,

    /// One opaque column value.
    Scalar,

    /// `Vec<T>`; bound through the array adapter.
    Sequence,

    /// Nested record held by value or in a `Box`.
    Record {
        /// Record type.
        target: Type,
        /// Held as `Box<target>`.
        boxed:  bool
    },

    /// Nested record held as `Option<T>` or `Option<Box<T>>`; addressed as a
    /// whole value.
    OptionalRecord {
        /// Record type.
        target: Type
    }
}

/// Field definition with all parsed attributes.
#[derive(Debug)]
pub struct FieldDef {
    /// Field identifier.
    pub ident: Ident,

    /// Declared type.
    pub ty: Type,

    /// Field is `pub`.
    pub is_public: bool,

    /// Raw tag string from `#[dbs("...")]`; empty when absent.
    pub tag: String,

    /// Marked `#[embedded]`.
    pub embedded: bool,

    /// Description and addressing strategy.
    pub shape: FieldShape
}

impl FieldDef {
    /// Parse a field definition from syn's `Field`.
    ///
    /// # Errors
    ///
    /// - `#[dbs(...)]` argument is not a single string literal
    /// - `#[embedded]` carries arguments
    pub fn from_field(field: &Field) -> darling::Result<Self> {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| darling::Error::custom("Record fields must be named").with_span(field))?;

        let mut tags = Vec::new();
        let mut embedded = false;
        for attr in &field.attrs {
            if attr.path().is_ident("dbs") {
                tags.push(attr.parse_args::<LitStr>()?.value());
            } else if attr.path().is_ident("embedded") {
                attr.meta.require_path_only()?;
                embedded = true;
            }
        }

        let tag = tags.join(";");
        let is_public = matches!(field.vis, Visibility::Public(_));
        let shape = classify(&field.ty, is_public, &FieldDirective::parse(&tag), embedded);

        Ok(Self {
            ident,
            ty: field.ty.clone(),
            is_public,
            tag,
            embedded,
            shape
        })
    }
}

/// Decide the shape of a field from its type and directives.
///
/// Only fields marked `ref`, `inline` or `#[embedded]` are treated as
/// records; everything else is a column value.
fn classify(ty: &Type, is_public: bool, directive: &FieldDirective, embedded: bool) -> FieldShape {
    if !is_public {
        return FieldShape::Private;
    }
    if directive.is_reference || directive.is_inline || embedded {
        if let Some(inner) = option_inner(ty) {
            return FieldShape::OptionalRecord {
                target: box_inner(inner).unwrap_or(inner).clone()
            };
        }
        return match box_inner(ty) {
            Some(inner) => FieldShape::Record {
                target: inner.clone(),
                boxed:  true
            },
            None => FieldShape::Record {
                target: ty.clone(),
                boxed:  false
            }
        };
    }
    if is_vec(ty) {
        FieldShape::Sequence
    } else {
        FieldShape::Scalar
    }
}
