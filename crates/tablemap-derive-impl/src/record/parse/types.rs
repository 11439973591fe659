// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Syntactic type inspection.

use syn::{GenericArgument, PathArguments, Type};

/// Inner type of a single-argument wrapper named `wrapper`, e.g. `Option<T>`.
fn wrapped<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    if let Type::Path(type_path) = ty
        && type_path.qself.is_none()
        && let Some(segment) = type_path.path.segments.last()
        && segment.ident == wrapper
        && let PathArguments::AngleBracketed(args) = &segment.arguments
        && let Some(GenericArgument::Type(inner)) = args.args.first()
    {
        return Some(inner);
    }
    None
}

/// Extract the inner type from `Option<T>`.
pub fn option_inner(ty: &Type) -> Option<&Type> {
    wrapped(ty, "Option")
}

/// Extract the inner type from `Box<T>`.
pub fn box_inner(ty: &Type) -> Option<&Type> {
    wrapped(ty, "Box")
}

/// Check if a type is `Vec<T>`.
pub fn is_vec(ty: &Type) -> bool {
    wrapped(ty, "Vec").is_some()
}
