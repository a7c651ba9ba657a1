use crate::model::{entity::EntityModel, field::FieldModel};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;

///
/// SchemaProvider
///
/// Answers "what fields does entity X declare" for the compiler.
/// Implementations must be immutable for the lifetime of a compilation.
///

pub trait SchemaProvider: Send + Sync {
    fn entity(&self, name: &str) -> Option<&EntityModel>;
}

///
/// SchemaRegistry
///
/// Finite, caller-supplied set of entity types. Registration validates
/// names and parent links so lookups never have to.
///

#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry {
    entities: BTreeMap<String, EntityModel>,
}

impl SchemaRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
        }
    }

    /// Register one entity type.
    pub fn register(&mut self, model: EntityModel) -> Result<(), SchemaError> {
        if self.entities.contains_key(&model.name) {
            return Err(SchemaError::DuplicateEntity { entity: model.name });
        }

        let mut seen = BTreeSet::new();
        for field in &model.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    entity: model.name.clone(),
                    field: field.name.clone(),
                });
            }
        }

        self.entities.insert(model.name.clone(), model);

        Ok(())
    }

    /// Builder-style registration.
    pub fn with(mut self, model: EntityModel) -> Result<Self, SchemaError> {
        self.register(model)?;

        Ok(self)
    }

    /// Check that every parent link and association target names a
    /// registered entity, and that parent chains are acyclic.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for entity in self.entities.values() {
            if let Some(parent) = &entity.parent
                && !self.entities.contains_key(parent)
            {
                return Err(SchemaError::UnknownParent {
                    entity: entity.name.clone(),
                    parent: parent.clone(),
                });
            }

            for field in &entity.fields {
                if let Some(target) = field.target_entity()
                    && !self.entities.contains_key(target)
                {
                    return Err(SchemaError::UnknownTarget {
                        entity: entity.name.clone(),
                        field: field.name.clone(),
                        target: target.to_string(),
                    });
                }
            }

            let mut chain = BTreeSet::new();
            let mut current = Some(entity);
            while let Some(model) = current {
                if !chain.insert(model.name.as_str()) {
                    return Err(SchemaError::ParentCycle {
                        entity: entity.name.clone(),
                    });
                }
                current = model
                    .parent
                    .as_deref()
                    .and_then(|parent| self.entities.get(parent));
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityModel> {
        self.entities.values()
    }
}

impl SchemaProvider for SchemaRegistry {
    fn entity(&self, name: &str) -> Option<&EntityModel> {
        self.entities.get(name)
    }
}

///
/// FieldLookup
///
/// A field found on an entity or one of its parents, together with the
/// entity that declares it.
///

#[derive(Clone, Copy, Debug)]
pub struct FieldLookup<'a> {
    pub declaring: &'a EntityModel,
    pub field: &'a FieldModel,
}

/// Find a field by name on `entity`, then on each parent in turn.
///
/// The parent chain is always walked to its end; a revisited entity stops
/// the walk so a cyclic provider cannot loop forever.
#[must_use]
pub fn find_field<'a>(
    schema: &'a dyn SchemaProvider,
    entity: &'a EntityModel,
    name: &str,
) -> Option<FieldLookup<'a>> {
    let mut visited = BTreeSet::new();
    let mut current = Some(entity);

    while let Some(model) = current {
        if !visited.insert(model.name.as_str()) {
            break;
        }
        if let Some(field) = model.declared_field(name) {
            return Some(FieldLookup {
                declaring: model,
                field,
            });
        }
        current = model.parent.as_deref().and_then(|parent| schema.entity(parent));
    }

    None
}

/// Schema registration failures.
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SchemaError {
    #[error("entity '{entity}' is already registered")]
    DuplicateEntity { entity: String },

    #[error("entity '{entity}' declares field '{field}' more than once")]
    DuplicateField { entity: String, field: String },

    #[error("entity '{entity}' extends unknown entity '{parent}'")]
    UnknownParent { entity: String, parent: String },

    #[error("field '{entity}.{field}' targets unknown entity '{target}'")]
    UnknownTarget {
        entity: String,
        field: String,
        target: String,
    },

    #[error("entity '{entity}' has a cyclic parent chain")]
    ParentCycle { entity: String },
}
