use derive_more::Display;
use serde::{Deserialize, Serialize};
use sifter_core::{config::ConfigError, error::CompileError, model::SchemaError};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{kind}: {message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Failure reported by an execution engine.
    pub fn execute(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Execute, message)
    }
}

impl From<CompileError> for Error {
    fn from(err: CompileError) -> Self {
        let kind = match &err {
            CompileError::Metadata(_) => ErrorKind::Metadata,
            CompileError::SchemaPath(_) => ErrorKind::Schema,
            CompileError::Operator(_) => ErrorKind::Operator,
            CompileError::Page(_) => ErrorKind::Execute,
        };

        Self::new(kind, err.to_string())
    }
}

impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Self {
        Self::new(ErrorKind::Schema, err.to_string())
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorKind::Config, err.to_string())
    }
}

///
/// ErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Filter type declaration is invalid (override carrier, duplicates).
    Metadata,

    /// Schema registration or path resolution failed.
    Schema,

    /// Operator cannot be applied to the field value.
    Operator,

    /// Configuration could not be read or is out of range.
    Config,

    /// Pagination or the execution engine failed.
    Execute,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sifter_core::{
        config::CompilerConfig,
        filter::{FieldShape, FilterField, FilterModel, QueryFilter},
        model::{EntityModel, FieldKind, SchemaRegistry},
        query::QueryCompiler,
        repository::{PageError, PageRequest},
        value::Value,
    };

    struct TwoCarriers;

    impl QueryFilter for TwoCarriers {
        fn filter_model() -> FilterModel {
            FilterModel::builder("TwoCarriers")
                .field(FilterField::overrides("a"))
                .field(FilterField::overrides("b"))
                .build()
        }

        fn field_value(&self, _: &str) -> Value {
            Value::Null
        }
    }

    struct Nickname(&'static str);

    impl QueryFilter for Nickname {
        fn filter_model() -> FilterModel {
            FilterModel::builder("Nickname")
                .field(FilterField::new("nickname", FieldShape::Text))
                .build()
        }

        fn field_value(&self, _: &str) -> Value {
            self.0.into()
        }
    }

    fn schema() -> SchemaRegistry {
        SchemaRegistry::new()
            .with(
                EntityModel::builder("User")
                    .column("name", FieldKind::Text)
                    .build(),
            )
            .expect("register")
    }

    #[test]
    fn compile_errors_map_to_kinds() {
        let schema = schema();
        let compiler = QueryCompiler::new(&schema);

        let metadata: Error = compiler
            .compile(&TwoCarriers, "User")
            .expect_err("conflict")
            .into();
        assert_eq!(metadata.kind, ErrorKind::Metadata);

        let schema_err: Error = compiler
            .compile(&Nickname("x"), "User")
            .expect_err("unknown field")
            .into();
        assert_eq!(schema_err.kind, ErrorKind::Schema);
        assert!(schema_err.message.contains("nickname"));

        let page: Error = CompileError::from(PageError::ZeroPageSize).into();
        assert_eq!(page.kind, ErrorKind::Execute);
        assert!(PageRequest::of(0, 0).is_err());
    }

    #[test]
    fn registration_and_config_errors_map_to_kinds() {
        let duplicate = schema()
            .with(EntityModel::builder("User").build())
            .expect_err("duplicate");
        assert_eq!(Error::from(duplicate).kind, ErrorKind::Schema);

        let config = CompilerConfig::from_toml_str("max_page_size = 0").expect_err("invalid");
        assert_eq!(Error::from(config).kind, ErrorKind::Config);
    }

    #[test]
    fn display_leads_with_kind() {
        let err = Error::execute("engine offline");

        assert_eq!(err.to_string(), "Execute: engine offline");
    }
}
