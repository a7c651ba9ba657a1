use crate::{
    filter::{FieldShape, FilterField, FilterModel, Operator, OperatorOverrides, QueryFilter},
    value::Value,
};

///
/// AuditFilter
/// Base filter with fields shared by every Auditable entity.
///

#[derive(Clone, Debug, Default)]
pub(crate) struct AuditFilter {
    pub(crate) id: Option<Vec<u64>>,
    pub(crate) created_at: Option<u64>,
}

impl AuditFilter {
    pub(crate) fn model() -> FilterModel {
        FilterModel::builder("AuditFilter")
            .field(FilterField::new("id", FieldShape::list(FieldShape::Uint)).operator(Operator::In))
            .field(FilterField::new("created_at", FieldShape::Uint).operator(Operator::GreaterThan))
            .build()
    }

    fn value(&self, field: &str) -> Value {
        match field {
            "id" => self.id.clone().into(),
            "created_at" => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

impl QueryFilter for AuditFilter {
    fn filter_model() -> FilterModel {
        Self::model()
    }

    fn field_value(&self, field: &str) -> Value {
        self.value(field)
    }
}

///
/// PersonFilter
///
/// Search criteria for `Person`. Association fields use the underscore
/// convention except `manager_email`, which declares its path.
///

#[derive(Clone, Debug, Default)]
pub(crate) struct PersonFilter {
    pub(crate) audit: AuditFilter,
    pub(crate) name: Option<String>,
    pub(crate) age: Option<i64>,
    pub(crate) email: Option<String>,
    pub(crate) department_name: Option<String>,
    pub(crate) department_code: Option<String>,
    pub(crate) manager_email: Option<String>,
    pub(crate) note: Option<String>,
    pub(crate) ops: Option<OperatorOverrides>,
}

impl QueryFilter for PersonFilter {
    fn filter_model() -> FilterModel {
        FilterModel::builder("PersonFilter")
            .field(FilterField::new("name", FieldShape::Text))
            .field(FilterField::new("age", FieldShape::Int))
            .field(FilterField::new("email", FieldShape::Text))
            .field(FilterField::new("department_name", FieldShape::Text))
            .field(FilterField::new("department_code", FieldShape::Text))
            .field(FilterField::new("manager_email", FieldShape::Text).path("department.manager.email"))
            .field(FilterField::new("note", FieldShape::Text).ignored())
            .field(FilterField::overrides("ops"))
            .extends(AuditFilter::model())
            .build()
    }

    fn field_value(&self, field: &str) -> Value {
        match field {
            "name" => self.name.clone().into(),
            "age" => self.age.into(),
            "email" => self.email.clone().into(),
            "department_name" => self.department_name.clone().into(),
            "department_code" => self.department_code.clone().into(),
            "manager_email" => self.manager_email.clone().into(),
            "note" => self.note.clone().into(),
            "ops" => self.ops.clone().map_or(Value::Null, Value::from),
            other => self.audit.value(other),
        }
    }
}
