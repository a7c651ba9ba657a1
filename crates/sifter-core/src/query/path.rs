//! Schema navigation: resolve a segment path against the entity graph.

use crate::model::{
    FieldKind, SchemaProvider,
    registry::{FieldLookup, find_field},
};
use thiserror::Error as ThisError;

///
/// AssociationStep
///
/// One association hop. `owner` is the entity that declares the association
/// (which may be a parent of the entity being traversed).
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssociationStep {
    pub owner: String,
    pub association: String,
    pub target: String,
    pub multi_valued: bool,
}

///
/// ResolvedPath
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedPath {
    pub steps: Vec<AssociationStep>,
    pub column: String,
    pub column_kind: FieldKind,
}

/// Resolve `segments` starting at entity `root`.
///
/// Every segment but the last must be an association hop; the last must be
/// a column. Fields are searched on each entity and then its parents.
pub fn resolve_path(
    schema: &dyn SchemaProvider,
    root: &str,
    segments: &[String],
) -> Result<ResolvedPath, SchemaPathError> {
    let Some((terminal, hops)) = segments.split_last() else {
        return Err(SchemaPathError::EmptyPath {
            entity: root.to_string(),
        });
    };

    let mut current = schema
        .entity(root)
        .ok_or_else(|| SchemaPathError::UnknownEntity {
            entity: root.to_string(),
        })?;
    let mut steps = Vec::with_capacity(hops.len());

    for segment in hops {
        let FieldLookup { declaring, field } = find_field(schema, current, segment)
            .ok_or_else(|| SchemaPathError::unknown_field(&current.name, segment))?;

        if field.is_domain_column() {
            return Err(SchemaPathError::ExpectedAssociation {
                entity: current.name.clone(),
                field: segment.clone(),
            });
        }

        // enums and unmapped non-entity fields pass the hop check but have
        // nothing to traverse into
        let Some(target) = field.target_entity() else {
            return Err(SchemaPathError::NotTraversable {
                entity: current.name.clone(),
                field: segment.clone(),
                kind: field.kind.to_string(),
            });
        };

        let next = schema
            .entity(target)
            .ok_or_else(|| SchemaPathError::UnknownEntity {
                entity: target.to_string(),
            })?;

        steps.push(AssociationStep {
            owner: declaring.name.clone(),
            association: field.name.clone(),
            target: next.name.clone(),
            multi_valued: field.is_multi_valued(),
        });
        current = next;
    }

    let FieldLookup { field, .. } = find_field(schema, current, terminal)
        .ok_or_else(|| SchemaPathError::unknown_field(&current.name, terminal))?;

    if field.is_association() {
        return Err(SchemaPathError::ExpectedColumn {
            entity: current.name.clone(),
            field: terminal.clone(),
        });
    }

    Ok(ResolvedPath {
        steps,
        column: field.name.clone(),
        column_kind: field.kind.clone(),
    })
}

/// Path resolution failures.
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SchemaPathError {
    #[error("unknown entity '{entity}'")]
    UnknownEntity { entity: String },

    #[error("unknown field '{field}' on entity '{entity}'")]
    UnknownField { entity: String, field: String },

    #[error("expected association, found column '{entity}.{field}'")]
    ExpectedAssociation { entity: String, field: String },

    #[error("expected column, found association '{entity}.{field}'")]
    ExpectedColumn { entity: String, field: String },

    #[error("field '{entity}.{field}' of type {kind} cannot be traversed")]
    NotTraversable {
        entity: String,
        field: String,
        kind: String,
    },

    #[error("empty path on entity '{entity}'")]
    EmptyPath { entity: String },
}

impl SchemaPathError {
    fn unknown_field(entity: &str, field: &str) -> Self {
        Self::UnknownField {
            entity: entity.to_string(),
            field: field.to_string(),
        }
    }
}
