use crate::{PATH_DELIMITER, filter::Operator};
use serde::Serialize;
use std::fmt;

///
/// FilterModel
///
/// Explicit, registration-time description of one filter type. Fields are
/// ordered: own fields first, then inherited fields from each parent model.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FilterModel {
    pub name: String,
    pub fields: Vec<FilterField>,
}

impl FilterModel {
    #[must_use]
    pub fn builder(name: &str) -> FilterModelBuilder {
        FilterModelBuilder {
            name: name.to_string(),
            fields: Vec::new(),
            parents: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FilterField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

///
/// FilterModelBuilder
///

#[derive(Debug)]
pub struct FilterModelBuilder {
    name: String,
    fields: Vec<FilterField>,
    parents: Vec<FilterModel>,
}

impl FilterModelBuilder {
    #[must_use]
    pub fn field(mut self, field: FilterField) -> Self {
        self.fields.push(field);
        self
    }

    /// Inherit every field of `parent`. Own fields shadow inherited fields
    /// with the same name.
    #[must_use]
    pub fn extends(mut self, parent: FilterModel) -> Self {
        self.parents.push(parent);
        self
    }

    #[must_use]
    pub fn build(self) -> FilterModel {
        let mut fields = self.fields;
        for parent in self.parents {
            for inherited in parent.fields {
                if !fields.iter().any(|field| field.name == inherited.name) {
                    fields.push(inherited);
                }
            }
        }

        FilterModel {
            name: self.name,
            fields,
        }
    }
}

///
/// FilterField
///
/// Per-field configuration: shape, role, ignore flag, explicit path and the
/// field's own operator.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FilterField {
    pub name: String,
    pub shape: FieldShape,
    pub role: FieldRole,
    pub ignored: bool,
    pub path: Vec<String>,
    pub operator: Option<Operator>,
}

impl FilterField {
    #[must_use]
    pub fn new(name: &str, shape: FieldShape) -> Self {
        Self {
            name: name.to_string(),
            shape,
            role: FieldRole::Criterion,
            ignored: false,
            path: Vec::new(),
            operator: None,
        }
    }

    /// Well-formed operator-override carrier (`Map<Text, Operator>`).
    #[must_use]
    pub fn overrides(name: &str) -> Self {
        Self::new(name, FieldShape::operator_map()).operator_overrides()
    }

    /// Mark this field as the operator-override carrier, keeping its shape.
    #[must_use]
    pub const fn operator_overrides(mut self) -> Self {
        self.role = FieldRole::OperatorOverrides;
        self
    }

    #[must_use]
    pub const fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    #[must_use]
    pub const fn operator(mut self, op: Operator) -> Self {
        self.operator = Some(op);
        self
    }

    /// Explicit path as a dotted string (`department.manager.email`).
    #[must_use]
    pub fn path(mut self, path: &str) -> Self {
        self.path = path
            .split(PATH_DELIMITER)
            .filter(|segment| !segment.is_empty())
            .map(ToString::to_string)
            .collect();
        self
    }

    /// Explicit path as individual segments.
    #[must_use]
    pub fn path_segments<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path = segments.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn is_override_carrier(&self) -> bool {
        matches!(self.role, FieldRole::OperatorOverrides)
    }
}

///
/// FieldRole
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum FieldRole {
    #[default]
    Criterion,
    OperatorOverrides,
}

///
/// FieldShape
///
/// Declared type of a filter field. `RawMap` stands for a map declared
/// without concrete type parameters.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum FieldShape {
    Bool,
    Int,
    Uint,
    Float,
    Text,
    Enum(String),
    Operator,
    List(Box<Self>),
    Map { key: Box<Self>, value: Box<Self> },
    RawMap,
}

impl FieldShape {
    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::List(Box::new(element))
    }

    #[must_use]
    pub fn map(key: Self, value: Self) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// The only shape accepted for an operator-override carrier.
    #[must_use]
    pub fn operator_map() -> Self {
        Self::map(Self::Text, Self::Operator)
    }
}

impl fmt::Display for FieldShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enum(path) => write!(f, "Enum<{path}>"),
            Self::List(inner) => write!(f, "List<{inner}>"),
            Self::Map { key, value } => write!(f, "Map<{key}, {value}>"),
            Self::RawMap => write!(f, "Map"),
            scalar => write!(f, "{scalar:?}"),
        }
    }
}
