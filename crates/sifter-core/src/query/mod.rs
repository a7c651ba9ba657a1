//! Filter-to-predicate compilation.
//!
//! Control flow per compilation:
//! - `filter::extract` reads the filter value into `FieldSpec`s
//! - `path` resolves each field's segment path against the schema
//! - `join` builds or reuses the inner joins that path needs
//! - `operator` turns operator + value + column type into a predicate
//! - `compile` folds everything into one `Specification`

mod compile;
pub mod join;
pub mod operator;
pub mod path;
pub mod predicate;
pub mod sort;
pub mod spec;

#[cfg(test)]
mod tests;

// re-exports
pub use compile::{CompileRequest, QueryCompiler};
pub use join::{JoinId, JoinKind, JoinNode, JoinSet, JoinSource};
pub use operator::{OperatorError, build_predicate, like_pattern, resolve_operator};
pub use path::{AssociationStep, ResolvedPath, SchemaPathError, resolve_path};
pub use predicate::{ColumnRef, CompareOp, ComparePredicate, Predicate};
pub use sort::{OrderDirection, OrderTerm, SortSpec};
pub use spec::Specification;
