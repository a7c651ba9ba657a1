//! Core runtime for Sifter: values, schema models, filter models, the
//! filter-to-predicate compiler, and the repository glue that hands compiled
//! specifications to an external execution engine.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod obs;
pub mod query;
pub mod repository;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Separator used to derive association paths from filter field names.
pub const DEFAULT_PATH_SEPARATOR: char = '_';

/// Separator used by explicit paths and sort descriptors (`department.name`).
pub const PATH_DELIMITER: char = '.';

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        filter::{
            FieldShape, FilterField, FilterModel, Operator, OperatorOverrides, QueryFilter,
        },
        model::{EntityModel, FieldKind, FieldModel, SchemaProvider, SchemaRegistry},
        query::{
            ColumnRef, OrderDirection, Predicate, QueryCompiler, SortSpec, Specification,
        },
        repository::{Page, PageRequest},
        value::Value,
    };
}
