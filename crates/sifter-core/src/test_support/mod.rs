pub(crate) mod fixtures;

use crate::{
    filter::{FilterModel, QueryFilter},
    model::{EntityModel, FieldKind, FieldModel, SchemaRegistry},
    obs::{CompileEvent, CompileSink},
    value::Value,
};
use std::{
    collections::BTreeMap,
    marker::PhantomData,
    sync::{Mutex, PoisonError},
};

pub(crate) const STATUS_ENUM_PATH: &str = "Status";

/// Shared test schema.
///
/// Auditable (id, created_at)
/// Person extends Auditable: name, age, email, salary, status, tags,
///   nickname (unmapped), department -> Department
/// Department: name, code, budget, manager -> Person, employees -> [Person]
#[must_use]
pub(crate) fn schema() -> SchemaRegistry {
    let auditable = EntityModel::builder("Auditable")
        .column("id", FieldKind::Uint)
        .column("created_at", FieldKind::Timestamp)
        .build();

    let person = EntityModel::builder("Person")
        .extends("Auditable")
        .column("name", FieldKind::Text)
        .column("age", FieldKind::Int)
        .column("email", FieldKind::Text)
        .column("salary", FieldKind::Float)
        .column(
            "status",
            FieldKind::Enum {
                path: STATUS_ENUM_PATH.to_string(),
            },
        )
        .column("tags", FieldKind::List(Box::new(FieldKind::Text)))
        .field(FieldModel::unmapped("nickname", FieldKind::Text))
        .relation("department", "Department")
        .build();

    let department = EntityModel::builder("Department")
        .column("name", FieldKind::Text)
        .column("code", FieldKind::Text)
        .column("budget", FieldKind::Decimal)
        .relation("manager", "Person")
        .relation_many("employees", "Person")
        .build();

    let registry = SchemaRegistry::new()
        .with(auditable)
        .and_then(|r| r.with(person))
        .and_then(|r| r.with(department))
        .expect("test schema should register");
    registry.validate().expect("test schema should validate");

    registry
}

///
/// ModelSource
///
/// Supplies the filter model for a `ValueFilter`. Each marker type is a
/// distinct filter type, so each has its own cache entry.
///

pub(crate) trait ModelSource: 'static {
    fn model() -> FilterModel;
}

///
/// ValueFilter
///
/// Filter whose field values live in a map. Lets tests declare a model
/// once and vary instance values freely.
///

pub(crate) struct ValueFilter<M> {
    values: BTreeMap<String, Value>,
    _model: PhantomData<M>,
}

impl<M: ModelSource> ValueFilter<M> {
    pub(crate) const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
            _model: PhantomData,
        }
    }

    pub(crate) fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.values.insert(field.to_string(), value.into());
        self
    }
}

impl<M: ModelSource> QueryFilter for ValueFilter<M> {
    fn filter_model() -> FilterModel {
        M::model()
    }

    fn field_value(&self, field: &str) -> Value {
        self.values.get(field).cloned().unwrap_or(Value::Null)
    }
}

///
/// RecordingSink
///
/// Keeps a debug rendering of every event it receives.
///

#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub(crate) fn events(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn count(&self, prefix: &str) -> usize {
        self.events()
            .iter()
            .filter(|event| event.starts_with(prefix))
            .count()
    }
}

impl CompileSink for RecordingSink {
    fn record(&self, event: CompileEvent<'_>) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!("{event:?}"));
    }
}
