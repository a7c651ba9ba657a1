use crate::model::field::{FieldKind, FieldModel};
use serde::Serialize;

///
/// EntityModel
/// Runtime model for one entity type in the target schema.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct EntityModel {
    /// Stable entity name used by the registry and by join keys.
    pub name: String,
    /// Registered parent entity whose fields this one inherits.
    pub parent: Option<String>,
    /// Fields declared directly on this entity, in declaration order.
    pub fields: Vec<FieldModel>,
}

impl EntityModel {
    #[must_use]
    pub fn builder(name: &str) -> EntityModelBuilder {
        EntityModelBuilder {
            model: Self {
                name: name.to_string(),
                parent: None,
                fields: Vec::new(),
            },
        }
    }

    /// Field declared directly on this entity (parents are not searched).
    #[must_use]
    pub fn declared_field(&self, name: &str) -> Option<&FieldModel> {
        self.fields.iter().find(|field| field.name == name)
    }
}

///
/// EntityModelBuilder
///

#[derive(Debug)]
pub struct EntityModelBuilder {
    model: EntityModel,
}

impl EntityModelBuilder {
    #[must_use]
    pub fn extends(mut self, parent: &str) -> Self {
        self.model.parent = Some(parent.to_string());
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldModel) -> Self {
        self.model.fields.push(field);
        self
    }

    #[must_use]
    pub fn column(self, name: &str, kind: FieldKind) -> Self {
        self.field(FieldModel::column(name, kind))
    }

    #[must_use]
    pub fn relation(self, name: &str, target: &str) -> Self {
        self.field(FieldModel::relation(name, target))
    }

    #[must_use]
    pub fn relation_many(self, name: &str, target: &str) -> Self {
        self.field(FieldModel::relation_many(name, target))
    }

    #[must_use]
    pub fn build(self) -> EntityModel {
        self.model
    }
}
