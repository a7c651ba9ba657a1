use crate::{
    filter::MetadataError,
    query::{OperatorError, SchemaPathError},
    repository::PageError,
};
use thiserror::Error as ThisError;

///
/// CompileError
///
/// Every failure a compilation (or a repository call around it) can report.
/// Compilation aborts on the first error; no partial specification exists.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CompileError {
    #[error("{0}")]
    Metadata(#[from] MetadataError),

    #[error("{0}")]
    SchemaPath(#[from] SchemaPathError),

    #[error("{0}")]
    Operator(#[from] OperatorError),

    #[error("{0}")]
    Page(#[from] PageError),
}

impl CompileError {
    #[must_use]
    pub const fn is_schema_path(&self) -> bool {
        matches!(self, Self::SchemaPath(_))
    }

    #[must_use]
    pub const fn is_operator_mismatch(&self) -> bool {
        matches!(self, Self::Operator(_))
    }
}
