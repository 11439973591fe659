// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field metadata builder.
//!
//! Walks the declared fields of one record type and expands them into a flat
//! column list:
//!
//! | Field | Result |
//! |-------|--------|
//! | private | skipped |
//! | `ref` | one `<field>_<pk>` column pointing at the target's primary key |
//! | `inline` | target columns spliced in, names prefixed `<field>_` |
//! | `#[embedded]` | target columns spliced in unchanged |
//! | anything else | one column |
//!
//! Splices are must-resolve edges: the nested type is built in full first,
//! so the splice graph must be acyclic and is checked before any nested
//! build starts. References only need the target's primary key, which is
//! built by a separate key-only walk that never follows references, so
//! records may reference each other freely. Whether the referenced records
//! are themselves valid is checked by the cache once the columns exist.

use std::collections::HashSet;

use crate::{
    cache::TypeCache,
    error::ConfigError,
    field::{FieldDescriptor, ReferenceInfo},
    record::{FieldDef, FieldKind, RecordType},
    tag::{FieldDirective, INLINE, REFERENCE}
};

/// Directive name reported for a misused `#[embedded]` marker.
const EMBEDDED: &str = "embedded";

/// Which columns a walk collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Walk {
    /// Every mapped column.
    Full,

    /// Primary key columns only; references are not followed.
    PrimaryKey
}

/// How one public field expands.
enum Class {
    Plain,
    Splice {
        target: RecordType,
        prefix: Option<String>
    },
    Reference {
        target:   RecordType,
        optional: bool
    }
}

/// Classify a public field. `ref` takes precedence over `inline`, which
/// takes precedence over `#[embedded]`.
fn classify(
    record: &'static str,
    def: &FieldDef,
    directive: &FieldDirective
) -> Result<Class, ConfigError> {
    let not_a_record = |key: &'static str| ConfigError::NotARecord {
        record,
        field: def.ident.to_string(),
        directive: key,
        ty: def.ty.name
    };

    if directive.is_reference {
        return match def.ty.kind {
            FieldKind::Record(target) => Ok(Class::Reference {
                target,
                optional: false
            }),
            FieldKind::OptionalRecord(target) => Ok(Class::Reference {
                target,
                optional: true
            }),
            FieldKind::Scalar | FieldKind::Sequence => Err(not_a_record(REFERENCE))
        };
    }
    if directive.is_inline {
        return match def.ty.kind {
            FieldKind::Record(target) => Ok(Class::Splice {
                target,
                prefix: Some(directive.column_name(def.ident))
            }),
            _ => Err(not_a_record(INLINE))
        };
    }
    if def.embedded {
        return match def.ty.kind {
            FieldKind::Record(target) => Ok(Class::Splice {
                target,
                prefix: None
            }),
            _ => Err(not_a_record(EMBEDDED))
        };
    }
    Ok(Class::Plain)
}

/// Targets of the splice edges leaving `record`.
fn splice_targets(record: RecordType) -> Vec<RecordType> {
    let shape = record.shape();
    shape
        .fields
        .iter()
        .filter(|def| def.is_public())
        .filter_map(|def| {
            let directive = FieldDirective::parse(def.tag);
            match classify(shape.type_name, def, &directive) {
                Ok(Class::Splice {
                    target, ..
                }) => Some(target),
                _ => None
            }
        })
        .collect()
}

/// Reject cycles of embedded or inline records reachable from `root`.
pub(crate) fn check_acyclic(root: RecordType) -> Result<(), ConfigError> {
    fn visit(
        record: RecordType,
        path: &mut Vec<RecordType>,
        done: &mut HashSet<RecordType>
    ) -> Result<(), ConfigError> {
        if done.contains(&record) {
            return Ok(());
        }
        if let Some(start) = path.iter().position(|seen| *seen == record) {
            let mut names: Vec<_> = path[start..]
                .iter()
                .map(|seen| seen.shape().type_name)
                .collect();
            names.push(record.shape().type_name);
            return Err(ConfigError::EmbeddingCycle {
                path: names
            });
        }

        path.push(record);
        for target in splice_targets(record) {
            visit(target, path, done)?;
        }
        path.pop();
        done.insert(record);
        Ok(())
    }

    visit(root, &mut Vec::new(), &mut HashSet::new())
}

/// Expand the declared fields of `record` into columns.
///
/// Nested metadata comes from `cache`, so every type is analysed once no
/// matter how many records embed or reference it.
pub(crate) fn build_fields(
    cache: &TypeCache,
    record: RecordType,
    walk: Walk
) -> Result<Vec<FieldDescriptor>, ConfigError> {
    let shape = record.shape();
    let mut fields = Vec::with_capacity(shape.fields.len());

    for (index, def) in shape.fields.iter().enumerate() {
        if !def.is_public() {
            continue;
        }
        let directive = FieldDirective::parse(def.tag);

        match classify(shape.type_name, def, &directive)? {
            Class::Plain => {
                if walk == Walk::PrimaryKey && !directive.is_pk {
                    continue;
                }
                fields.push(FieldDescriptor {
                    name:        directive.column_name(def.ident),
                    ty:          def.ty.clone(),
                    index_path:  vec![index],
                    is_pk:       directive.is_pk,
                    is_autogen:  directive.is_autogen,
                    is_nullable: directive.is_nullable,
                    reference:   None
                });
            }
            Class::Splice {
                target,
                prefix
            } => {
                let nested = match walk {
                    Walk::Full => cache.columns(target)?.all_fields().clone(),
                    Walk::PrimaryKey => cache.primary_key(target)?
                };
                fields.extend(
                    nested
                        .iter()
                        .cloned()
                        .map(|field| field.prefixed(prefix.as_deref()).nested_under(index))
                );
            }
            Class::Reference {
                target,
                optional
            } => {
                if walk == Walk::PrimaryKey {
                    continue;
                }
                let keys = cache.primary_key(target)?;
                let [key] = keys.as_slice() else {
                    return Err(ConfigError::ReferenceCardinality {
                        record: shape.type_name,
                        field:  def.ident.to_string(),
                        target: target.shape().type_name,
                        found:  keys.len()
                    });
                };
                fields.push(FieldDescriptor {
                    name:        format!("{}_{}", directive.column_name(def.ident), key.name),
                    ty:          def.ty.clone(),
                    index_path:  vec![index],
                    is_pk:       false,
                    is_autogen:  false,
                    is_nullable: optional || directive.is_nullable,
                    reference:   Some(ReferenceInfo {
                        target,
                        field: key.name.clone()
                    })
                });
            }
        }
    }

    Ok(fields)
}
