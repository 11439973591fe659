// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! PostgreSQL adapter.
//!
//! Pairs every statement with the argument list that matches its
//! placeholder numbering, and with the receiver list rows are scanned into.
//!
//! | Operation | SQL | Arguments | Receivers |
//! |-----------|-----|-----------|-----------|
//! | insert one | [`PgAdapter::insert_one`] | non-auto | all |
//! | select one | [`PgAdapter::select_one`] | pk | all |
//! | select many | [`PgAdapter::select_many`] | caller supplied | all (+ total) |
//! | update one | [`PgAdapter::update_one`] | non-pk, then pk | all |
//! | delete one | [`PgAdapter::delete_one`] | pk | all |

use std::sync::Arc;

use crate::{
    cache::TypeCache,
    error::{Error, ResolveError, StatementError},
    metadata::TypeMetadata,
    record::{Column, Record},
    resolve::FieldRef,
    statement::{Dialect, QueryOptions, StatementCache, StatementKind}
};

/// `$N` placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    fn placeholder(&self, position: usize) -> String {
        format!("${position}")
    }
}

/// Statement text together with its bound arguments.
#[derive(Debug)]
pub struct Bound<'a> {
    /// Statement text.
    pub sql: Arc<str>,

    /// Arguments in placeholder order.
    pub args: Vec<FieldRef<'a>>
}

/// Statement and binding source for PostgreSQL.
#[derive(Debug)]
pub struct PgAdapter {
    types:      Arc<TypeCache>,
    statements: StatementCache<Postgres>
}

impl Default for PgAdapter {
    fn default() -> Self {
        Self::new(Arc::new(TypeCache::new()))
    }
}

impl PgAdapter {
    /// Create an adapter over a shared metadata cache.
    pub fn new(types: Arc<TypeCache>) -> Self {
        Self {
            types,
            statements: StatementCache::new(Postgres)
        }
    }

    /// The metadata cache.
    pub fn types(&self) -> &TypeCache {
        &self.types
    }

    /// The statement cache.
    pub fn statements(&self) -> &StatementCache<Postgres> {
        &self.statements
    }

    /// Metadata of `T`.
    ///
    /// # Errors
    ///
    /// Returns the record's configuration error.
    pub fn metadata<T: Record>(&self) -> Result<Arc<TypeMetadata>, StatementError> {
        Ok(self.types.get::<T>()?)
    }

    fn sql<T: Record>(
        &self,
        kind: StatementKind,
        options: &QueryOptions
    ) -> Result<Arc<str>, StatementError> {
        let meta = self.metadata::<T>()?;
        self.statements.get(&meta, kind, options)
    }

    /// `INSERT INTO t (..) VALUES ($1, ..) RETURNING ..`.
    ///
    /// # Errors
    ///
    /// Returns the record's configuration error.
    pub fn insert_one<T: Record>(&self) -> Result<Arc<str>, StatementError> {
        self.sql::<T>(StatementKind::Insert, &QueryOptions::default())
    }

    /// `SELECT .. FROM t WHERE pk=$1 LIMIT 1`.
    ///
    /// # Errors
    ///
    /// [`StatementError::MissingPrimaryKey`] when `T` has no key.
    pub fn select_one<T: Record>(&self) -> Result<Arc<str>, StatementError> {
        self.sql::<T>(StatementKind::SelectOne, &QueryOptions::default())
    }

    /// `SELECT .. FROM t`, unfiltered; the caller appends its own clauses.
    ///
    /// # Errors
    ///
    /// Returns the record's configuration error.
    pub fn select_many<T: Record>(&self, options: &QueryOptions) -> Result<Arc<str>, StatementError> {
        self.sql::<T>(StatementKind::SelectMany, options)
    }

    /// `UPDATE t SET ..=$1 WHERE pk=$n RETURNING ..`.
    ///
    /// # Errors
    ///
    /// [`StatementError::MissingPrimaryKey`] or
    /// [`StatementError::NothingToUpdate`].
    pub fn update_one<T: Record>(&self) -> Result<Arc<str>, StatementError> {
        self.sql::<T>(StatementKind::Update, &QueryOptions::default())
    }

    /// `DELETE FROM t WHERE pk=$1 RETURNING ..`.
    ///
    /// # Errors
    ///
    /// [`StatementError::MissingPrimaryKey`] when `T` has no key.
    pub fn delete_one<T: Record>(&self) -> Result<Arc<str>, StatementError> {
        self.sql::<T>(StatementKind::Delete, &QueryOptions::default())
    }

    /// Insert arguments: the non-auto columns of `src`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when `src` cannot be bound.
    pub fn insert_one_args<'a, T: Record>(
        &self,
        src: &'a mut T
    ) -> Result<Vec<FieldRef<'a>>, ResolveError> {
        let meta = self.types.get::<T>()?;
        self.types.refs(meta.non_auto_fields(), src)
    }

    /// Select-one arguments: the primary key of `src`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when `src` cannot be bound.
    pub fn select_one_args<'a, T: Record>(
        &self,
        src: &'a mut T
    ) -> Result<Vec<FieldRef<'a>>, ResolveError> {
        let meta = self.types.get::<T>()?;
        self.types.refs(meta.pk_fields(), src)
    }

    /// Update arguments: non-key columns first, then the key.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when `src` cannot be bound.
    pub fn update_one_args<'a, T: Record>(
        &self,
        src: &'a mut T
    ) -> Result<Vec<FieldRef<'a>>, ResolveError> {
        let meta = self.types.get::<T>()?;
        let fields = meta.non_pk_fields().concat(meta.pk_fields());
        self.types.refs(&fields, src)
    }

    /// Delete arguments: the primary key of `src`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when `src` cannot be bound.
    pub fn delete_one_args<'a, T: Record>(
        &self,
        src: &'a mut T
    ) -> Result<Vec<FieldRef<'a>>, ResolveError> {
        self.select_one_args(src)
    }

    /// Scan targets of every single-row statement: all columns of `dest`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when `dest` cannot be bound.
    pub fn receivers<'a, T: Record>(
        &self,
        dest: &'a mut T
    ) -> Result<Vec<FieldRef<'a>>, ResolveError> {
        let meta = self.types.get::<T>()?;
        self.types.refs(meta.all_fields(), dest)
    }

    /// Scan targets of a select-many row; `total` receives the window count
    /// when the statement was rendered with [`QueryOptions::with_total`].
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when `dest` cannot be bound.
    pub fn select_many_receivers<'a, T: Record>(
        &self,
        dest: &'a mut T,
        total: Option<&'a mut i64>
    ) -> Result<Vec<FieldRef<'a>>, ResolveError> {
        let mut receivers = self.receivers(dest)?;
        if let Some(total) = total {
            receivers.push(FieldRef::Value(total as &mut dyn Column));
        }
        Ok(receivers)
    }

    /// Insert statement with the arguments of `src`.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] when rendering or binding fails.
    pub fn bind_insert<'a, T: Record>(&self, src: &'a mut T) -> Result<Bound<'a>, Error> {
        Ok(Bound {
            sql:  self.insert_one::<T>()?,
            args: self.insert_one_args(src)?
        })
    }

    /// Select-one statement with the key of `src`.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] when rendering or binding fails.
    pub fn bind_select_one<'a, T: Record>(&self, src: &'a mut T) -> Result<Bound<'a>, Error> {
        Ok(Bound {
            sql:  self.select_one::<T>()?,
            args: self.select_one_args(src)?
        })
    }

    /// Update statement with the arguments of `src`.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] when rendering or binding fails.
    pub fn bind_update<'a, T: Record>(&self, src: &'a mut T) -> Result<Bound<'a>, Error> {
        Ok(Bound {
            sql:  self.update_one::<T>()?,
            args: self.update_one_args(src)?
        })
    }

    /// Delete statement with the key of `src`.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] when rendering or binding fails.
    pub fn bind_delete<'a, T: Record>(&self, src: &'a mut T) -> Result<Bound<'a>, Error> {
        Ok(Bound {
            sql:  self.delete_one::<T>()?,
            args: self.delete_one_args(src)?
        })
    }
}
