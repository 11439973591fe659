// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Type metadata cache.
//!
//! Every record type is analysed at most once per cache, including under
//! concurrent first access: the first caller builds, others block on the
//! same cell and receive the same `Arc`. Failed builds are cached as well,
//! so every caller sees the identical [`ConfigError`].
//!
//! Building happens in three layers, each waiting only on the layers below
//! it:
//!
//! | Layer | Contents | Waits on |
//! |-------|----------|----------|
//! | `records` | columns whose reference targets all build | `columns` |
//! | `columns` | every column of one record | `columns` of spliced records, `keys` of referenced ones |
//! | `keys` | primary key columns only | `keys` of spliced records |
//!
//! A record is only handed out once every record reachable through its
//! references has valid columns, so the metadata graph never points at a
//! type that cannot be built.
//!
//! Construct a [`TypeCache`] once and pass it around, or use
//! [`TypeCache::global`] for a process-wide instance.
//!
//! ```rust
//! use tablemap_core::{FieldDef, FieldType, Record, RecordShape, Slot, TypeCache};
//!
//! pub struct Note {
//!     pub id:   i64,
//!     pub body: String
//! }
//!
//! impl Record for Note {
//!     fn shape() -> RecordShape {
//!         RecordShape::new("Note", vec![
//!             FieldDef::new("id", "auto;pk", FieldType::scalar("i64")),
//!             FieldDef::new("body", "", FieldType::scalar("String")),
//!         ])
//!     }
//!
//!     fn slots_mut(&mut self) -> Vec<Slot<'_>> {
//!         vec![Slot::Value(&mut self.id), Slot::Value(&mut self.body)]
//!     }
//! }
//!
//! let cache = TypeCache::new();
//! let meta = cache.get::<Note>().unwrap();
//! assert_eq!(meta.table_name(), "note");
//! assert_eq!(meta.non_auto_fields().names().collect::<Vec<_>>(), ["body"]);
//! ```

use std::{
    collections::HashSet,
    fmt,
    sync::{Arc, OnceLock}
};

use tracing::{debug, warn};

use crate::{
    builder::{Walk, build_fields, check_acyclic},
    error::{ConfigError, ResolveError},
    field::{FieldList, ReferenceInfo},
    metadata::TypeMetadata,
    once_map::OnceMap,
    record::{Record, RecordType},
    resolve::{FieldRef, resolve}
};

/// Memoised record metadata, keyed by type identity.
#[derive(Default)]
pub struct TypeCache {
    records: OnceMap<RecordType, Result<Arc<TypeMetadata>, ConfigError>>,
    columns: OnceMap<RecordType, Result<Arc<TypeMetadata>, ConfigError>>,
    keys:    OnceMap<RecordType, Result<FieldList, ConfigError>>
}

impl TypeCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide cache, created on first use.
    pub fn global() -> &'static TypeCache {
        static GLOBAL: OnceLock<TypeCache> = OnceLock::new();
        GLOBAL.get_or_init(TypeCache::new)
    }

    /// Metadata of `T`, built on first request.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] of the first build attempt.
    pub fn get<T: Record>(&self) -> Result<Arc<TypeMetadata>, ConfigError> {
        self.get_type(RecordType::of::<T>())
    }

    /// Metadata of a record given by handle.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] of the first build attempt.
    pub fn get_type(&self, record: RecordType) -> Result<Arc<TypeMetadata>, ConfigError> {
        self.records.get_or_init(&record, || {
            let built = self.columns(record).and_then(|meta| {
                self.check_references(&meta)?;
                Ok(meta)
            });
            match built {
                Ok(meta) => {
                    debug!(
                        record = meta.type_name(),
                        table = meta.table_name(),
                        columns = meta.all_fields().len(),
                        keys = meta.pk_fields().len(),
                        "record metadata built"
                    );
                    Ok(meta)
                }
                Err(err) => {
                    warn!(record = record.name(), error = %err, "record metadata rejected");
                    Err(err)
                }
            }
        })
    }

    /// Columns of a record, without checking its reference targets.
    pub(crate) fn columns(&self, record: RecordType) -> Result<Arc<TypeMetadata>, ConfigError> {
        self.columns.get_or_init(&record, || {
            check_acyclic(record)
                .and_then(|()| build_fields(self, record, Walk::Full))
                .and_then(|fields| TypeMetadata::new(record, fields))
                .map(Arc::new)
        })
    }

    /// Require valid columns on every record reachable through references.
    fn check_references(&self, root: &TypeMetadata) -> Result<(), ConfigError> {
        let mut seen = HashSet::from([root.record()]);
        let mut pending: Vec<_> = reference_targets(root).collect();
        while let Some(target) = pending.pop() {
            if seen.insert(target) {
                let meta = self.columns(target)?;
                pending.extend(reference_targets(&meta));
            }
        }
        Ok(())
    }

    /// Primary key columns of a record, without building its full metadata.
    ///
    /// References are resolved through this path, which never waits on a
    /// full build, so records may reference each other in a cycle.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the key columns cannot be expanded.
    pub fn primary_key(&self, record: RecordType) -> Result<FieldList, ConfigError> {
        self.keys.get_or_init(&record, || {
            check_acyclic(record)
                .and_then(|()| build_fields(self, record, Walk::PrimaryKey))
                .map(FieldList::new)
        })
    }

    /// Full metadata of the record a reference column points at.
    ///
    /// # Errors
    ///
    /// Returns the target's [`ConfigError`], if any.
    pub fn reference_target(&self, info: &ReferenceInfo) -> Result<Arc<TypeMetadata>, ConfigError> {
        self.get_type(info.target)
    }

    /// Check if metadata for `record` has been built successfully.
    pub fn contains(&self, record: RecordType) -> bool {
        matches!(self.records.get(&record), Some(Ok(_)))
    }

    /// Number of record types analysed so far, failures included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no record type has been analysed yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bind `fields` against a live instance.
    ///
    /// Each column is looked up by name in `T`'s own metadata, so a list
    /// taken from another record (for example an embedded one) binds as
    /// long as the names match. Sequence columns come back wrapped in
    /// [`FieldRef::Array`].
    ///
    /// # Errors
    ///
    /// - [`ResolveError::FieldNotFound`] when `T` has no column of that name
    /// - [`ResolveError::Unaddressable`] when the column's location is not
    ///   reachable on the instance
    /// - [`ResolveError::AlreadyBound`] when a location is requested twice
    /// - [`ResolveError::Config`] when `T`'s metadata cannot be built
    pub fn refs<'a, T: Record>(
        &self,
        fields: &FieldList,
        instance: &'a mut T
    ) -> Result<Vec<FieldRef<'a>>, ResolveError> {
        let meta = self.get::<T>()?;
        resolve(&meta, fields, instance)
    }
}

fn reference_targets(meta: &TypeMetadata) -> impl Iterator<Item = RecordType> + '_ {
    meta.all_fields()
        .iter()
        .filter_map(|field| field.reference.as_ref().map(|info| info.target))
}

impl fmt::Debug for TypeCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeCache")
            .field("records", &self.records.len())
            .field("columns", &self.columns.len())
            .field("keys", &self.keys.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Barrier, thread};

    use super::*;
    use crate::record::{FieldDef, FieldType, RecordShape, Slot};

    #[derive(Default)]
    struct Region {
        pub code: String
    }

    impl Record for Region {
        fn shape() -> RecordShape {
            RecordShape::new("Region", vec![FieldDef::new(
                "Code",
                "pk",
                FieldType::scalar("String")
            )])
        }

        fn table_name() -> Option<&'static str> {
            Some("regions")
        }

        fn slots_mut(&mut self) -> Vec<Slot<'_>> {
            vec![Slot::Value(&mut self.code)]
        }
    }

    #[derive(Default)]
    struct Pair {
        pub left:  i64,
        pub right: i64
    }

    impl Record for Pair {
        fn shape() -> RecordShape {
            RecordShape::new("Pair", vec![
                FieldDef::new("Left", "pk", FieldType::scalar("i64")),
                FieldDef::new("Right", "pk", FieldType::scalar("i64")),
            ])
        }

        fn slots_mut(&mut self) -> Vec<Slot<'_>> {
            vec![Slot::Value(&mut self.left), Slot::Value(&mut self.right)]
        }
    }

    #[derive(Default)]
    struct Shop {
        pub id:     i64,
        pub region: Option<Box<Region>>,
        pub pair:   Option<Box<Pair>>
    }

    impl Record for Shop {
        fn shape() -> RecordShape {
            RecordShape::new("Shop", vec![
                FieldDef::new("ID", "auto;pk", FieldType::scalar("i64")),
                FieldDef::new(
                    "Region",
                    "ref",
                    FieldType::optional_record::<Region>("Option<Box<Region>>")
                ),
                FieldDef::new("Pair", "ref", FieldType::optional_record::<Pair>("Option<Box<Pair>>")),
            ])
        }

        fn slots_mut(&mut self) -> Vec<Slot<'_>> {
            vec![
                Slot::Value(&mut self.id),
                Slot::Value(&mut self.region),
                Slot::Value(&mut self.pair),
            ]
        }
    }

    #[test]
    fn explicit_table_name() {
        let cache = TypeCache::new();
        assert_eq!(cache.get::<Region>().unwrap().table_name(), "regions");
        assert_eq!(cache.get::<Pair>().unwrap().table_name(), "pair");
    }

    #[test]
    fn build_once_shared_arc() {
        let cache = TypeCache::new();
        assert!(cache.is_empty());
        let first = cache.get::<Region>().unwrap();
        let second = cache.get::<Region>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(RecordType::of::<Region>()));
        assert!(!cache.contains(RecordType::of::<Pair>()));
    }

    #[test]
    fn concurrent_builds_agree() {
        let cache = TypeCache::new();
        let barrier = Barrier::new(6);
        let built: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = (0..6)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        cache.get::<Pair>().unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(built.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn failed_build_is_cached() {
        let cache = TypeCache::new();
        let first = cache.get::<Shop>().unwrap_err();
        let second = cache.get::<Shop>().unwrap_err();
        assert_eq!(first, second);
        assert_eq!(first, ConfigError::ReferenceCardinality {
            record: "Shop",
            field:  "Pair".to_string(),
            target: "Pair",
            found:  2
        });
        assert!(!cache.contains(RecordType::of::<Shop>()));
        assert_eq!(cache.len(), 1);
    }
}
