//! Runtime schema model definitions.
//!
//! This module contains the explicit description of the target entity graph
//! that filters are compiled against. It stands in for an ORM metamodel:
//! callers register every entity type up front, and the compiler only ever
//! sees what was registered.
//!
//! In general:
//! - `field` describes one declared field (column or association)
//! - `entity` groups fields into an entity type with an optional parent
//! - `registry` owns the finite set of entity types and answers lookups
pub mod entity;
pub mod field;
pub mod registry;

// re-exports
pub use entity::{EntityModel, EntityModelBuilder};
pub use field::{FieldKind, FieldModel};
pub use registry::{SchemaError, SchemaProvider, SchemaRegistry};
