// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Binding of column lists to live instances.
//!
//! The resolver hands out one mutable handle per requested column. Nested
//! records are opened lazily through [`Record::slots_mut`] the first time a
//! path descends into them, which is what lets columns from different
//! nesting levels be borrowed at the same time.

use std::{any::Any, fmt, mem};

use crate::{
    error::ResolveError,
    field::FieldList,
    metadata::TypeMetadata,
    record::{Column, Record, Slot}
};

/// Mutable handle to one column of a live instance.
pub enum FieldRef<'a> {
    /// Plain value, passed to the driver as is.
    Value(&'a mut dyn Column),

    /// Variable-length sequence, passed through the array adapter.
    Array(ArrayRef<'a>)
}

impl<'a> FieldRef<'a> {
    /// Check if the column is wrapped in the array adapter.
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Borrow the underlying value.
    pub fn column(&self) -> &dyn Column {
        match self {
            Self::Value(value) => &**value,
            Self::Array(array) => &*array.inner
        }
    }

    /// Mutably borrow the underlying value.
    pub fn column_mut(&mut self) -> &mut dyn Column {
        match self {
            Self::Value(value) => &mut **value,
            Self::Array(array) => &mut *array.inner
        }
    }

    /// Downcast the underlying value.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.column().as_any().downcast_ref()
    }

    /// Mutably downcast the underlying value.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.column_mut().as_any_mut().downcast_mut()
    }

    /// Rust type name of the underlying value.
    pub fn type_name(&self) -> &'static str {
        self.column().type_name()
    }

    /// Address of the underlying value, for identity checks.
    pub fn addr(&self) -> *const () {
        (self.column().as_any() as *const dyn Any).cast()
    }

    /// Give up the wrapper and return the raw handle.
    pub fn into_inner(self) -> &'a mut dyn Column {
        match self {
            Self::Value(value) => value,
            Self::Array(array) => array.inner
        }
    }
}

impl fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(_) => write!(f, "Value({})", self.type_name()),
            Self::Array(array) => array.fmt(f)
        }
    }
}

/// Array adapter around a sequence column.
///
/// Drivers serialise the wrapped value as a database array instead of an
/// opaque parameter.
pub struct ArrayRef<'a> {
    inner: &'a mut dyn Column
}

impl ArrayRef<'_> {
    /// Downcast the wrapped sequence, e.g. to `Vec<String>`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.inner).as_any().downcast_ref()
    }

    /// Mutably downcast the wrapped sequence.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        (*self.inner).as_any_mut().downcast_mut()
    }

    /// Rust type name of the wrapped sequence.
    pub fn type_name(&self) -> &'static str {
        (*self.inner).type_name()
    }
}

impl fmt::Debug for ArrayRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Array({})", self.type_name())
    }
}

enum Node<'a> {
    Slot(Slot<'a>),
    Expanded(Vec<Node<'a>>),
    Taken
}

enum Miss {
    Taken,
    Unaddressable
}

fn nodes(record: &mut dyn Record) -> Vec<Node<'_>> {
    record.slots_mut().into_iter().map(Node::Slot).collect()
}

/// Remove the slot at `path`, opening nested records on the way down.
fn take<'a>(tree: &mut [Node<'a>], path: &[usize]) -> Result<Slot<'a>, Miss> {
    let (&index, rest) = path.split_first().ok_or(Miss::Unaddressable)?;
    let node = tree.get_mut(index).ok_or(Miss::Unaddressable)?;

    if rest.is_empty() {
        return match mem::replace(node, Node::Taken) {
            Node::Slot(Slot::Private) => {
                *node = Node::Slot(Slot::Private);
                Err(Miss::Unaddressable)
            }
            Node::Slot(slot) => Ok(slot),
            Node::Taken => Err(Miss::Taken),
            opened @ Node::Expanded(_) => {
                *node = opened;
                Err(Miss::Taken)
            }
        };
    }

    let opened = match mem::replace(node, Node::Taken) {
        Node::Slot(Slot::Record(record)) => Node::Expanded(nodes(record)),
        other => other
    };
    *node = opened;

    match node {
        Node::Expanded(children) => take(children, rest),
        Node::Taken => Err(Miss::Taken),
        Node::Slot(_) => Err(Miss::Unaddressable)
    }
}

/// Bind `fields` by name against `instance`, whose metadata is `meta`.
pub(crate) fn resolve<'a, T: Record>(
    meta: &TypeMetadata,
    fields: &FieldList,
    instance: &'a mut T
) -> Result<Vec<FieldRef<'a>>, ResolveError> {
    let record = meta.type_name();
    let mut tree = nodes(instance);
    let mut refs = Vec::with_capacity(fields.len());

    for requested in fields {
        let field = meta
            .field(&requested.name)
            .ok_or_else(|| ResolveError::FieldNotFound {
                record,
                field: requested.name.clone()
            })?;

        let column: &'a mut dyn Column = match take(&mut tree, &field.index_path) {
            Ok(Slot::Value(value)) => value,
            Ok(Slot::Record(nested)) => nested as &'a mut dyn Column,
            Ok(Slot::Private) | Err(Miss::Unaddressable) => {
                return Err(ResolveError::Unaddressable {
                    record,
                    field: field.name.clone()
                });
            }
            Err(Miss::Taken) => {
                return Err(ResolveError::AlreadyBound {
                    record,
                    field: field.name.clone()
                });
            }
        };

        refs.push(if field.ty.is_sequence() {
            FieldRef::Array(ArrayRef {
                inner: column
            })
        } else {
            FieldRef::Value(column)
        });
    }

    Ok(refs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cache::TypeCache,
        record::{FieldDef, FieldType, RecordShape}
    };

    #[derive(Default)]
    struct Labels {
        pub id:     i64,
        pub values: Vec<String>,
        secret:     u8
    }

    impl Record for Labels {
        fn shape() -> RecordShape {
            RecordShape::new("Labels", vec![
                FieldDef::new("id", "pk", FieldType::scalar("i64")),
                FieldDef::new("values", "", FieldType::sequence("Vec<String>")),
                FieldDef::private("secret", FieldType::scalar("u8")),
            ])
        }

        fn slots_mut(&mut self) -> Vec<Slot<'_>> {
            vec![
                Slot::Value(&mut self.id),
                Slot::Value(&mut self.values),
                Slot::Private,
            ]
        }
    }

    #[derive(Default)]
    struct Wrapper {
        pub labels: Labels,
        pub note:   String
    }

    impl Record for Wrapper {
        fn shape() -> RecordShape {
            RecordShape::new("Wrapper", vec![
                FieldDef::new("labels", "", FieldType::record::<Labels>("Labels")).embedded(),
                FieldDef::new("note", "", FieldType::scalar("String")),
            ])
        }

        fn slots_mut(&mut self) -> Vec<Slot<'_>> {
            vec![Slot::Record(&mut self.labels), Slot::Value(&mut self.note)]
        }
    }

    #[test]
    fn sequence_is_wrapped() {
        let cache = TypeCache::new();
        let meta = cache.get::<Labels>().unwrap();
        let mut labels = Labels {
            values: vec!["a".into()],
            ..Labels::default()
        };
        let mut refs = cache.refs(meta.all_fields(), &mut labels).unwrap();
        assert_eq!(refs.len(), 2);
        assert!(!refs[0].is_array());
        let FieldRef::Array(array) = &mut refs[1] else {
            panic!("expected array adapter");
        };
        array.downcast_mut::<Vec<String>>().unwrap().push("b".into());
        drop(refs);
        assert_eq!(labels.values, ["a", "b"]);
        assert_eq!(labels.secret, 0);
    }

    #[test]
    fn nested_and_top_level_bind_together() {
        let cache = TypeCache::new();
        let meta = cache.get::<Wrapper>().unwrap();
        let mut wrapper = Wrapper::default();
        let mut refs = cache.refs(meta.all_fields(), &mut wrapper).unwrap();
        assert_eq!(refs.len(), 3);
        *refs[0].downcast_mut::<i64>().unwrap() = 7;
        *refs[2].downcast_mut::<String>().unwrap() = "hi".into();
        drop(refs);
        assert_eq!(wrapper.labels.id, 7);
        assert_eq!(wrapper.note, "hi");
    }

    #[test]
    fn embedded_list_binds_on_outer_record() {
        let cache = TypeCache::new();
        let inner = cache.get::<Labels>().unwrap();
        let mut wrapper = Wrapper::default();
        let refs = cache.refs(inner.pk_fields(), &mut wrapper).unwrap();
        let addr = refs[0].addr();
        drop(refs);
        assert_eq!(addr, (&raw const wrapper.labels.id).cast::<()>());
    }

    #[test]
    fn unknown_column() {
        let cache = TypeCache::new();
        let outer = cache.get::<Wrapper>().unwrap();
        let mut labels = Labels::default();
        let err = cache.refs(outer.all_fields(), &mut labels).unwrap_err();
        assert_eq!(err, ResolveError::FieldNotFound {
            record: "Labels",
            field:  "note".to_string()
        });
    }

    #[test]
    fn same_column_twice() {
        let cache = TypeCache::new();
        let meta = cache.get::<Labels>().unwrap();
        let twice = meta.pk_fields().concat(meta.pk_fields());
        let mut labels = Labels::default();
        let err = cache.refs(&twice, &mut labels).unwrap_err();
        assert!(matches!(err, ResolveError::AlreadyBound { .. }));
    }
}
