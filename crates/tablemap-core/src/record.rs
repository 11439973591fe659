// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Static schema description of record types.
//!
//! Rust has no runtime reflection, so every record type describes its
//! declared fields once through the [`Record`] trait. The description is
//! plain data ([`RecordShape`]) that the metadata builder walks; the slot
//! accessor ([`Record::slots_mut`]) is what the resolver uses to reach the
//! physical fields of a live instance.
//!
//! `#[derive(Record)]` generates all of this. A manual implementation looks
//! like:
//!
//! ```rust
//! use tablemap_core::{FieldDef, FieldType, Record, RecordShape, Slot};
//!
//! pub struct Tag {
//!     pub id:    i64,
//!     pub label: String
//! }
//!
//! impl Record for Tag {
//!     fn shape() -> RecordShape {
//!         RecordShape::new("Tag", vec![
//!             FieldDef::new("id", "auto;pk", FieldType::scalar("i64")),
//!             FieldDef::new("label", "", FieldType::scalar("String")),
//!         ])
//!     }
//!
//!     fn slots_mut(&mut self) -> Vec<Slot<'_>> {
//!         vec![Slot::Value(&mut self.id), Slot::Value(&mut self.label)]
//!     }
//! }
//! ```

use std::{
    any::{Any, TypeId},
    fmt,
    hash::{Hash, Hasher}
};

/// A value that can be handed to a database driver as a parameter or scan
/// target.
///
/// Implemented for every `'static + Send` type; drivers downcast through
/// [`Column::as_any`] / [`Column::as_any_mut`].
pub trait Column: Any + Send {
    /// Borrow the value as [`Any`].
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrow the value as [`Any`].
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Rust type name of the value, for diagnostics.
    fn type_name(&self) -> &'static str;
}

impl<T: Any + Send> Column for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// A struct whose instances map to rows of a table.
pub trait Record: Column {
    /// Declared fields in declaration order, private ones included.
    fn shape() -> RecordShape
    where
        Self: Sized;

    /// Explicit table name. `None` falls back to the snake_cased type name.
    fn table_name() -> Option<&'static str>
    where
        Self: Sized
    {
        None
    }

    /// One slot per declared field, in the same order as [`Record::shape`].
    fn slots_mut(&mut self) -> Vec<Slot<'_>>;
}

/// Addressable location of one declared field inside a live instance.
pub enum Slot<'a> {
    /// A column value.
    Value(&'a mut dyn Column),

    /// A nested record. The resolver either descends into it or binds it
    /// whole.
    Record(&'a mut dyn Record),

    /// A field outside the encapsulation boundary; never addressable.
    Private
}

impl fmt::Debug for Slot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "Value({})", (**value).type_name()),
            Self::Record(record) => write!(f, "Record({})", (**record).type_name()),
            Self::Private => f.write_str("Private")
        }
    }
}

/// Type identity of a record, usable without an instance.
///
/// Equality and hashing go through the [`TypeId`] only.
#[derive(Clone, Copy)]
pub struct RecordType {
    id:         TypeId,
    name:       &'static str,
    shape:      fn() -> RecordShape,
    table_name: fn() -> Option<&'static str>
}

impl RecordType {
    /// Handle for `T`.
    pub fn of<T: Record>() -> Self {
        Self {
            id:         TypeId::of::<T>(),
            name:       std::any::type_name::<T>(),
            shape:      T::shape,
            table_name: T::table_name
        }
    }

    /// The underlying [`TypeId`].
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified Rust type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared fields of the record.
    pub fn shape(&self) -> RecordShape {
        (self.shape)()
    }

    /// Table name override, if the record declares one.
    pub fn table_name(&self) -> Option<&'static str> {
        (self.table_name)()
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RecordType {}

impl Hash for RecordType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RecordType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordType").field(&self.name).finish()
    }
}

/// Declared fields of a record type.
#[derive(Debug, Clone)]
pub struct RecordShape {
    /// Bare type identifier (e.g. `SomeRec`), used for the default table
    /// name.
    pub type_name: &'static str,

    /// Fields in declaration order.
    pub fields: Vec<FieldDef>
}

impl RecordShape {
    /// Create a shape from its type identifier and fields.
    pub fn new(type_name: &'static str, fields: Vec<FieldDef>) -> Self {
        Self {
            type_name,
            fields
        }
    }
}

/// Field visibility as seen from outside the declaring type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// `pub` field; mapped.
    Public,

    /// Anything narrower; never mapped.
    Private
}

/// One declared field.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Declared identifier.
    pub ident: &'static str,

    /// Raw tag string in the `key[:value];...` mini-language.
    pub tag: &'static str,

    /// Whether the field is visible outside its type.
    pub visibility: Visibility,

    /// Promoted embedded record: its columns are spliced in without a name
    /// prefix.
    pub embedded: bool,

    /// Declared type.
    pub ty: FieldType
}

impl FieldDef {
    /// Public, non-embedded field.
    pub fn new(ident: &'static str, tag: &'static str, ty: FieldType) -> Self {
        Self {
            ident,
            tag,
            visibility: Visibility::Public,
            embedded: false,
            ty
        }
    }

    /// Private field; occupies a slot but is never mapped.
    pub fn private(ident: &'static str, ty: FieldType) -> Self {
        Self {
            visibility: Visibility::Private,
            ..Self::new(ident, "", ty)
        }
    }

    /// Mark the field as an embedded record.
    #[must_use]
    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    /// Check if the field is mapped at all.
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldType {
    /// Rust type as written, for diagnostics.
    pub name: &'static str,

    /// Structural classification.
    pub kind: FieldKind
}

impl FieldType {
    /// Opaque column value.
    pub fn scalar(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Scalar
        }
    }

    /// Variable-length sequence, bound through an array adapter.
    pub fn sequence(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Sequence
        }
    }

    /// Record value held directly.
    pub fn record<T: Record>(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Record(RecordType::of::<T>())
        }
    }

    /// Record held behind `Option` / `Box`.
    pub fn optional_record<T: Record>(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::OptionalRecord(RecordType::of::<T>())
        }
    }

    /// Target record type, if the field holds one in any form.
    pub fn record_type(&self) -> Option<RecordType> {
        match self.kind {
            FieldKind::Record(target) | FieldKind::OptionalRecord(target) => Some(target),
            FieldKind::Scalar | FieldKind::Sequence => None
        }
    }

    /// Check if the field is a variable-length sequence.
    pub fn is_sequence(&self) -> bool {
        matches!(self.kind, FieldKind::Sequence)
    }
}

/// Structural classification of a field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldKind {
    /// Any opaque value.
    Scalar,

    /// `Vec<T>` and friends.
    Sequence,

    /// A nested record value.
    Record(RecordType),

    /// A pointer/optional-shaped nested record.
    OptionalRecord(RecordType)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        value: i32
    }

    impl Record for Probe {
        fn shape() -> RecordShape {
            RecordShape::new("Probe", vec![FieldDef::new(
                "value",
                "",
                FieldType::scalar("i32")
            )])
        }

        fn table_name() -> Option<&'static str> {
            Some("probes")
        }

        fn slots_mut(&mut self) -> Vec<Slot<'_>> {
            vec![Slot::Value(&mut self.value)]
        }
    }

    #[test]
    fn record_type_identity() {
        let a = RecordType::of::<Probe>();
        let b = RecordType::of::<Probe>();
        assert_eq!(a, b);
        assert_eq!(a.id(), TypeId::of::<Probe>());
        assert_eq!(a.table_name(), Some("probes"));
        assert_eq!(a.shape().type_name, "Probe");
    }

    #[test]
    fn column_downcast() {
        let mut probe = Probe {
            value: 3
        };
        let mut slots = probe.slots_mut();
        let Some(Slot::Value(value)) = slots.pop() else {
            panic!("expected value slot");
        };
        *(*value).as_any_mut().downcast_mut::<i32>().unwrap() = 9;
        assert_eq!((*value).type_name(), "i32");
        drop(slots);
        assert_eq!(probe.value, 9);
    }

    #[test]
    fn private_field_def() {
        let def = FieldDef::private("secret", FieldType::scalar("String"));
        assert!(!def.is_public());
        assert!(def.tag.is_empty());
        assert!(!FieldDef::new("a", "", FieldType::scalar("i32")).embedded);
    }

    #[test]
    fn field_type_record_target() {
        let ty = FieldType::optional_record::<Probe>("Option<Probe>");
        assert_eq!(ty.record_type(), Some(RecordType::of::<Probe>()));
        assert!(FieldType::sequence("Vec<i32>").is_sequence());
        assert_eq!(FieldType::scalar("i32").record_type(), None);
    }
}
