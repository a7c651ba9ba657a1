//! Filter models: how the fields of a search-criteria value are matched.
//!
//! A filter type describes itself once through a [`FilterModel`] (field
//! names, shapes, paths, operators and roles) and exposes per-instance field
//! values by name. The compiler never inspects filter types at runtime.

pub(crate) mod cache;
pub mod extract;
pub mod model;


use crate::value::Value;
use derive_more::Display;
use serde::{Deserialize, Serialize};

// re-exports
pub use cache::{CacheStats, stats as cache_stats};
pub use extract::{FieldSpec, MetadataError, OperatorOverrides, ValidatedFilterModel, extract};
pub use model::{FieldRole, FieldShape, FilterField, FilterModel, FilterModelBuilder};

///
/// QueryFilter
///
/// Contract between a caller's filter type and the compiler.
///
/// `filter_model` is schema-level and is validated at most once per type;
/// `field_value` is instance-level and returns `Value::Null` for unset or
/// unknown fields.
///

pub trait QueryFilter {
    fn filter_model() -> FilterModel
    where
        Self: Sized;

    fn field_value(&self, field: &str) -> Value;
}

///
/// Operator
///

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    #[default]
    #[display("EQUAL")]
    Equal,
    #[display("NOT_EQUAL")]
    NotEqual,
    #[display("LIKE")]
    Like,
    #[display("IN")]
    In,
    #[display("LESS_THAN")]
    LessThan,
    #[display("GREATER_THAN")]
    GreaterThan,
}

impl Operator {
    pub const ALL: [Self; 6] = [
        Self::Equal,
        Self::NotEqual,
        Self::Like,
        Self::In,
        Self::LessThan,
        Self::GreaterThan,
    ];

    /// Stable upper-case name, shared by serde and `Display`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Equal => "EQUAL",
            Self::NotEqual => "NOT_EQUAL",
            Self::Like => "LIKE",
            Self::In => "IN",
            Self::LessThan => "LESS_THAN",
            Self::GreaterThan => "GREATER_THAN",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}
