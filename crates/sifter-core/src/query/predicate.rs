use crate::{query::join::JoinSource, value::Value};
use derive_more::Display;
use serde::Serialize;
use std::fmt;

///
/// Predicate AST
///
/// Leaf predicates only. A specification holds an ordered list of these
/// that is implicitly AND-combined; there is no OR or NOT composition.
///

///
/// ColumnRef
///
/// A column reached from the query root or from a join.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct ColumnRef {
    pub source: JoinSource,
    pub name: String,
    /// Dotted path from the root, including the column (`department.name`).
    pub path: String,
}

impl ColumnRef {
    /// Column on the query root entity.
    #[must_use]
    pub fn root(name: &str) -> Self {
        Self {
            source: JoinSource::Root,
            name: name.to_string(),
            path: name.to_string(),
        }
    }

    /// Column hanging from `source`, whose dotted path is `parent_path`.
    #[must_use]
    pub fn under(source: JoinSource, parent_path: Option<&str>, name: &str) -> Self {
        let path = match parent_path {
            Some(parent) => format!("{parent}.{name}"),
            None => name.to_string(),
        };

        Self {
            source,
            name: name.to_string(),
            path,
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize)]
pub enum CompareOp {
    #[display("=")]
    Eq,
    #[display("<>")]
    Ne,
    #[display("<")]
    Lt,
    #[display(">")]
    Gt,
    #[display("IN")]
    In,
    #[display("LIKE")]
    Like,
}

///
/// ComparePredicate
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComparePredicate {
    pub column: ColumnRef,
    pub op: CompareOp,
    pub value: Value,
    /// Escape character of a LIKE pattern. Engines must honor it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escape: Option<char>,
}

impl ComparePredicate {
    #[must_use]
    pub const fn new(column: ColumnRef, op: CompareOp, value: Value) -> Self {
        Self {
            column,
            op,
            value,
            escape: None,
        }
    }
}

impl fmt::Display for ComparePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.op, self.value)?;
        match self.escape {
            Some('\'') => write!(f, " ESCAPE ''''"),
            Some(escape) => write!(f, " ESCAPE '{escape}'"),
            None => Ok(()),
        }
    }
}

///
/// Predicate
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Predicate {
    Compare(ComparePredicate),
    IsNull { column: ColumnRef },
    IsNotNull { column: ColumnRef },
}

impl Predicate {
    #[must_use]
    pub const fn compare(column: ColumnRef, op: CompareOp, value: Value) -> Self {
        Self::Compare(ComparePredicate::new(column, op, value))
    }

    #[must_use]
    pub const fn eq(column: ColumnRef, value: Value) -> Self {
        Self::compare(column, CompareOp::Eq, value)
    }

    #[must_use]
    pub const fn ne(column: ColumnRef, value: Value) -> Self {
        Self::compare(column, CompareOp::Ne, value)
    }

    #[must_use]
    pub const fn lt(column: ColumnRef, value: Value) -> Self {
        Self::compare(column, CompareOp::Lt, value)
    }

    #[must_use]
    pub const fn gt(column: ColumnRef, value: Value) -> Self {
        Self::compare(column, CompareOp::Gt, value)
    }

    #[must_use]
    pub const fn in_(column: ColumnRef, values: Vec<Value>) -> Self {
        Self::compare(column, CompareOp::In, Value::List(values))
    }

    /// `pattern` is passed through verbatim, wildcards included. Literal
    /// wildcards inside it are prefixed with `escape`.
    #[must_use]
    pub const fn like(column: ColumnRef, pattern: String, escape: char) -> Self {
        Self::Compare(ComparePredicate {
            column,
            op: CompareOp::Like,
            value: Value::Text(pattern),
            escape: Some(escape),
        })
    }

    #[must_use]
    pub const fn is_null(column: ColumnRef) -> Self {
        Self::IsNull { column }
    }

    #[must_use]
    pub const fn is_not_null(column: ColumnRef) -> Self {
        Self::IsNotNull { column }
    }

    #[must_use]
    pub const fn column(&self) -> &ColumnRef {
        match self {
            Self::Compare(cmp) => &cmp.column,
            Self::IsNull { column } | Self::IsNotNull { column } => column,
        }
    }

    #[must_use]
    pub const fn as_compare(&self) -> Option<&ComparePredicate> {
        match self {
            Self::Compare(cmp) => Some(cmp),
            _ => None,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare(cmp) => write!(f, "{cmp}"),
            Self::IsNull { column } => write!(f, "{column} IS NULL"),
            Self::IsNotNull { column } => write!(f, "{column} IS NOT NULL"),
        }
    }
}
