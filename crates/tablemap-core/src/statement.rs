// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Single-row statement rendering and caching.
//!
//! | Kind | Shape | Arguments |
//! |------|-------|-----------|
//! | [`Insert`](StatementKind::Insert) | `INSERT INTO t (non-auto) VALUES (...) RETURNING all` | non-auto |
//! | [`SelectOne`](StatementKind::SelectOne) | `SELECT all FROM t WHERE pk LIMIT 1` | pk |
//! | [`SelectMany`](StatementKind::SelectMany) | `SELECT all FROM t` | caller supplied |
//! | [`Update`](StatementKind::Update) | `UPDATE t SET non-pk WHERE pk RETURNING all` | non-pk, then pk |
//! | [`Delete`](StatementKind::Delete) | `DELETE FROM t WHERE pk RETURNING all` | pk |
//!
//! Placeholders are numbered from 1 in argument order; the dialect decides
//! how a numbered placeholder is spelled.

use std::sync::Arc;

use tracing::trace;

use crate::{
    error::StatementError,
    field::FieldList,
    metadata::TypeMetadata,
    once_map::OnceMap,
    record::RecordType
};

/// Column name of the window count in select-many statements.
pub const TOTAL_COUNT_COLUMN: &str = "total_count";

/// SQL dialect specifics.
pub trait Dialect: Send + Sync {
    /// Spelling of the placeholder at 1-based `position`.
    fn placeholder(&self, position: usize) -> String;
}

/// Statement shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum StatementKind {
    /// Insert one row.
    Insert,

    /// Select one row by primary key.
    SelectOne,

    /// Select rows, filtered by the caller.
    SelectMany,

    /// Update one row by primary key.
    Update,

    /// Delete one row by primary key.
    Delete
}

/// Rendering options of select-many statements.
///
/// Other kinds ignore them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct QueryOptions {
    /// Append `COUNT(*) OVER() AS total_count`.
    pub with_total: bool,

    /// Table alias; columns are qualified with it.
    pub alias: Option<String>
}

impl QueryOptions {
    /// Request the window count column.
    #[must_use]
    pub fn with_total(mut self) -> Self {
        self.with_total = true;
        self
    }

    /// Alias the table.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// Cache key of one rendered statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatementKey {
    /// Record the statement is for.
    pub record: RecordType,

    /// Statement shape.
    pub kind: StatementKind,

    /// Options, normalised to the default for every kind but select-many.
    pub options: QueryOptions
}

impl StatementKey {
    /// Build a key, dropping options the kind does not use.
    pub fn new(record: RecordType, kind: StatementKind, options: &QueryOptions) -> Self {
        let options = match kind {
            StatementKind::SelectMany => options.clone(),
            _ => QueryOptions::default()
        };
        Self {
            record,
            kind,
            options
        }
    }
}

/// Rendered statements of one dialect, each rendered once per key.
pub struct StatementCache<D> {
    dialect:    D,
    statements: OnceMap<StatementKey, Arc<str>>
}

impl<D: Dialect> StatementCache<D> {
    /// Create an empty cache.
    pub fn new(dialect: D) -> Self {
        Self {
            dialect,
            statements: OnceMap::default()
        }
    }

    /// The dialect statements are rendered in.
    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    /// Number of rendered statements.
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Check if nothing has been rendered yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Statement text for `meta`, rendered on first request.
    ///
    /// # Errors
    ///
    /// Returns [`StatementError`] when the record cannot express the
    /// statement. Such failures are not cached.
    pub fn get(
        &self,
        meta: &TypeMetadata,
        kind: StatementKind,
        options: &QueryOptions
    ) -> Result<Arc<str>, StatementError> {
        check(meta, kind)?;
        let key = StatementKey::new(meta.record(), kind, options);
        Ok(self.statements.get_or_init(&key, || {
            let sql = self.render(meta, &key);
            trace!(record = meta.type_name(), kind = ?kind, sql = %sql, "statement rendered");
            Arc::from(sql)
        }))
    }

    fn render(&self, meta: &TypeMetadata, key: &StatementKey) -> String {
        let table = meta.table_name();
        let all = meta.all_fields();
        let mut sql = String::with_capacity(64 + all.len() * 24);

        match key.kind {
            StatementKind::Insert => {
                let columns = meta.non_auto_fields();
                sql.push_str("INSERT INTO ");
                sql.push_str(table);
                if columns.is_empty() {
                    sql.push_str(" DEFAULT VALUES");
                } else {
                    sql.push_str(" (");
                    write_names(&mut sql, columns, None);
                    sql.push_str(") VALUES (");
                    self.write_placeholders(&mut sql, columns.len());
                    sql.push(')');
                }
                write_returning(&mut sql, all);
            }
            StatementKind::SelectOne => {
                sql.push_str("SELECT ");
                write_names(&mut sql, all, None);
                sql.push_str(" FROM ");
                sql.push_str(table);
                sql.push_str(" WHERE ");
                self.write_assignments(&mut sql, meta.pk_fields(), 1, " AND ");
                sql.push_str(" LIMIT 1");
            }
            StatementKind::SelectMany => {
                let alias = key.options.alias.as_deref();
                sql.push_str("SELECT ");
                write_names(&mut sql, all, alias);
                if key.options.with_total {
                    if !all.is_empty() {
                        sql.push_str(", ");
                    }
                    sql.push_str("COUNT(*) OVER() AS ");
                    sql.push_str(TOTAL_COUNT_COLUMN);
                }
                sql.push_str(" FROM ");
                sql.push_str(table);
                if let Some(alias) = alias {
                    sql.push(' ');
                    sql.push_str(alias);
                }
            }
            StatementKind::Update => {
                let set = meta.non_pk_fields();
                sql.push_str("UPDATE ");
                sql.push_str(table);
                sql.push_str(" SET ");
                self.write_assignments(&mut sql, set, 1, ", ");
                sql.push_str(" WHERE ");
                self.write_assignments(&mut sql, meta.pk_fields(), set.len() + 1, " AND ");
                write_returning(&mut sql, all);
            }
            StatementKind::Delete => {
                sql.push_str("DELETE FROM ");
                sql.push_str(table);
                sql.push_str(" WHERE ");
                self.write_assignments(&mut sql, meta.pk_fields(), 1, " AND ");
                write_returning(&mut sql, all);
            }
        }

        sql
    }

    fn write_placeholders(&self, sql: &mut String, count: usize) {
        for position in 1..=count {
            if position > 1 {
                sql.push_str(", ");
            }
            sql.push_str(&self.dialect.placeholder(position));
        }
    }

    fn write_assignments(&self, sql: &mut String, fields: &FieldList, start: usize, separator: &str) {
        for (offset, field) in fields.iter().enumerate() {
            if offset > 0 {
                sql.push_str(separator);
            }
            sql.push_str(&field.name);
            sql.push('=');
            sql.push_str(&self.dialect.placeholder(start + offset));
        }
    }
}

impl<D> std::fmt::Debug for StatementCache<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatementCache")
            .field("statements", &self.statements.len())
            .finish_non_exhaustive()
    }
}

/// Preconditions of each statement kind.
fn check(meta: &TypeMetadata, kind: StatementKind) -> Result<(), StatementError> {
    let record = meta.type_name();
    let needs_key = matches!(
        kind,
        StatementKind::SelectOne | StatementKind::Update | StatementKind::Delete
    );
    if needs_key && meta.pk_fields().is_empty() {
        return Err(StatementError::MissingPrimaryKey {
            record
        });
    }
    if kind == StatementKind::Update && meta.non_pk_fields().is_empty() {
        return Err(StatementError::NothingToUpdate {
            record
        });
    }
    Ok(())
}

fn write_names(sql: &mut String, fields: &FieldList, alias: Option<&str>) {
    for (offset, name) in fields.names().enumerate() {
        if offset > 0 {
            sql.push_str(", ");
        }
        if let Some(alias) = alias {
            sql.push_str(alias);
            sql.push('.');
        }
        sql.push_str(name);
    }
}

fn write_returning(sql: &mut String, fields: &FieldList) {
    if !fields.is_empty() {
        sql.push_str(" RETURNING ");
        write_names(sql, fields, None);
    }
}
