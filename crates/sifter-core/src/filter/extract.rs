//! Metadata extraction: turn a filter value into ordered `FieldSpec`s plus
//! its operator-override map.

use crate::{
    filter::{
        Operator, QueryFilter,
        model::{FieldShape, FilterField, FilterModel},
    },
    value::{OPERATOR_ENUM_PATH, Value},
};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;

///
/// FieldSpec
///
/// One filter field as seen by the compiler. `value` is instance-specific;
/// everything else comes from the validated model.
///

#[derive(Clone, Debug, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub value: Value,
    pub ignored: bool,
    pub explicit_path: Vec<String>,
    pub operator: Option<Operator>,
}

impl FieldSpec {
    /// Path segments: the explicit path when non-empty, otherwise the field
    /// name split on `separator`. The last segment names the column.
    #[must_use]
    pub fn segments(&self, separator: char) -> Vec<String> {
        if self.explicit_path.is_empty() {
            self.name.split(separator).map(ToString::to_string).collect()
        } else {
            self.explicit_path.clone()
        }
    }
}

///
/// OperatorOverrides
///
/// Per-instance operator overrides keyed by filter field name.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OperatorOverrides(BTreeMap<String, Operator>);

impl OperatorOverrides {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<Operator> {
        self.0.get(field).copied()
    }

    pub fn insert(&mut self, field: &str, op: Operator) -> Option<Operator> {
        self.0.insert(field.to_string(), op)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Operator)> {
        self.0.iter().map(|(field, op)| (field.as_str(), *op))
    }

    /// Decode the runtime value of an override carrier.
    fn from_value(field: &str, value: Value) -> Result<Self, MetadataError> {
        let entries = match value {
            Value::Null => return Ok(Self::new()),
            Value::Map(entries) => entries,
            other => {
                return Err(MetadataError::invalid_type(
                    field,
                    other.kind().to_string(),
                ));
            }
        };

        let mut overrides = Self::new();
        for (key, value) in entries {
            let Value::Text(name) = key else {
                return Err(MetadataError::invalid_type(
                    field,
                    format!("Map<{}, _>", key.kind()),
                ));
            };
            let op = match &value {
                Value::Enum(e) if e.path.as_deref().is_none_or(|p| p == OPERATOR_ENUM_PATH) => {
                    Operator::from_name(&e.variant)
                }
                _ => None,
            };
            let Some(op) = op else {
                return Err(MetadataError::invalid_type(
                    field,
                    format!("Map<Text, {}>", value.kind()),
                ));
            };
            overrides.0.insert(name, op);
        }

        Ok(overrides)
    }
}

impl From<BTreeMap<String, Operator>> for OperatorOverrides {
    fn from(map: BTreeMap<String, Operator>) -> Self {
        Self(map)
    }
}

impl<'a> FromIterator<(&'a str, Operator)> for OperatorOverrides {
    fn from_iter<I: IntoIterator<Item = (&'a str, Operator)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(field, op)| (field.to_string(), op))
                .collect(),
        )
    }
}

impl From<OperatorOverrides> for Value {
    fn from(overrides: OperatorOverrides) -> Self {
        overrides.0.into()
    }
}

///
/// ValidatedFilterModel
///
/// Schema-level result of validating a `FilterModel`: criterion fields in
/// order, and the name of the override carrier if one is declared.
/// Immutable and safe to share between compilations.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidatedFilterModel {
    name: String,
    criteria: Vec<FilterField>,
    carrier: Option<String>,
}

impl ValidatedFilterModel {
    pub fn new(model: FilterModel) -> Result<Self, MetadataError> {
        let mut seen = BTreeSet::new();
        for field in &model.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(MetadataError::DuplicateField {
                    filter: model.name.clone(),
                    field: field.name.clone(),
                });
            }
        }

        let carriers: Vec<&FilterField> = model
            .fields
            .iter()
            .filter(|field| field.is_override_carrier())
            .collect();

        if carriers.len() > 1 {
            return Err(MetadataError::ConflictingMetadata {
                filter: model.name.clone(),
                fields: carriers.iter().map(|field| field.name.clone()).collect(),
            });
        }

        let carrier = match carriers.first() {
            Some(field) if field.shape != FieldShape::operator_map() => {
                return Err(MetadataError::InvalidMetadataType {
                    field: field.name.clone(),
                    declared: field.shape.to_string(),
                    expected: FieldShape::operator_map().to_string(),
                });
            }
            Some(field) => Some(field.name.clone()),
            None => None,
        };

        let criteria = model
            .fields
            .into_iter()
            .filter(|field| !field.is_override_carrier())
            .collect();

        Ok(Self {
            name: model.name,
            criteria,
            carrier,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn criteria(&self) -> &[FilterField] {
        &self.criteria
    }

    #[must_use]
    pub fn carrier(&self) -> Option<&str> {
        self.carrier.as_deref()
    }
}

/// Read a filter value against its validated model.
///
/// Returns one `FieldSpec` per criterion field (ignored fields included and
/// flagged) and the decoded override map. Never mutates the filter.
pub fn extract<F: QueryFilter + ?Sized>(
    filter: &F,
    model: &ValidatedFilterModel,
) -> Result<(Vec<FieldSpec>, OperatorOverrides), MetadataError> {
    let overrides = match model.carrier() {
        Some(carrier) => OperatorOverrides::from_value(carrier, filter.field_value(carrier))?,
        None => OperatorOverrides::new(),
    };

    let specs = model
        .criteria()
        .iter()
        .map(|field| FieldSpec {
            name: field.name.clone(),
            value: if field.ignored {
                Value::Null
            } else {
                filter.field_value(&field.name)
            },
            ignored: field.ignored,
            explicit_path: field.path.clone(),
            operator: field.operator,
        })
        .collect();

    Ok((specs, overrides))
}

/// Filter-model declaration failures.
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum MetadataError {
    #[error("filter '{filter}' declares conflicting operator-override fields {fields:?}")]
    ConflictingMetadata { filter: String, fields: Vec<String> },

    #[error(
        "field '{field}' is declared as operator overrides with type '{declared}', expected '{expected}'"
    )]
    InvalidMetadataType {
        field: String,
        declared: String,
        expected: String,
    },

    #[error("filter '{filter}' declares field '{field}' more than once")]
    DuplicateField { filter: String, field: String },
}

impl MetadataError {
    fn invalid_type(field: &str, declared: String) -> Self {
        Self::InvalidMetadataType {
            field: field.to_string(),
            declared,
            expected: FieldShape::operator_map().to_string(),
        }
    }
}
