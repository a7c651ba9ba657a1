use crate::{
    PATH_DELIMITER,
    model::SchemaProvider,
    obs::CompileSink,
    query::{
        join::JoinSet,
        path::{SchemaPathError, resolve_path},
        predicate::ColumnRef,
    },
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// OrderDirection
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    #[default]
    #[display("ASC")]
    Asc,
    #[display("DESC")]
    Desc,
}

///
/// SortSpec
/// Caller-facing sort descriptor: dotted column paths with a direction.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SortSpec {
    fields: Vec<(String, OrderDirection)>,
}

impl SortSpec {
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    #[must_use]
    pub fn by(mut self, path: &str, direction: OrderDirection) -> Self {
        self.fields.push((path.to_string(), direction));
        self
    }

    #[must_use]
    pub fn asc(self, path: &str) -> Self {
        self.by(path, OrderDirection::Asc)
    }

    #[must_use]
    pub fn desc(self, path: &str) -> Self {
        self.by(path, OrderDirection::Desc)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, OrderDirection)> {
        self.fields
            .iter()
            .map(|(path, direction)| (path.as_str(), *direction))
    }
}

///
/// OrderTerm
/// Resolved ordering term of a specification.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct OrderTerm {
    pub column: ColumnRef,
    pub direction: OrderDirection,
}

impl fmt::Display for OrderTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.direction)
    }
}

/// Resolve every sort path against `entity`, reusing joins already planned
/// by the compilation. Depends only on the sort spec and the schema.
pub(crate) fn resolve_order(
    schema: &dyn SchemaProvider,
    entity: &str,
    joins: &mut JoinSet,
    sort: &SortSpec,
    sink: &dyn CompileSink,
) -> Result<Vec<OrderTerm>, SchemaPathError> {
    sort.iter()
        .map(|(path, direction)| {
            let segments: Vec<String> = path
                .split(PATH_DELIMITER)
                .map(ToString::to_string)
                .collect();
            let resolved = resolve_path(schema, entity, &segments)?;
            let source = joins.plan(&resolved.steps, sink);

            Ok(OrderTerm {
                column: ColumnRef::under(source, joins.path_of(source), &resolved.column),
                direction,
            })
        })
        .collect()
}
