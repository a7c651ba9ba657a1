//! ## Crate layout
//! - `core`: runtime values, schema and filter models, the compiler,
//!   specifications, repository glue, observability and configuration.
//! - `error`: public error type with a stable kind taxonomy.
//!
//! The `prelude` module carries the vocabulary needed to declare filters,
//! register a schema and run find/count queries through a repository.

pub use sifter_core as core;

pub mod error;

pub use error::{Error, ErrorKind};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        core::{
            prelude::*,
            repository::{FilterRepository, QueryExecutor},
        },
        error::{Error, ErrorKind},
    };
}
