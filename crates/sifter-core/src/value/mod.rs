//! Runtime values read from filter fields and carried into predicates.


use crate::filter::Operator;
use derive_more::Display;
use serde::Serialize;
use std::{collections::BTreeMap, fmt};

///
/// CONSTANTS
///

/// Largest integer magnitude that survives a round trip through `f64`.
const F64_SAFE_I64: i64 = 1i64 << 53;
const F64_SAFE_U64: u64 = 1u64 << 53;

/// Enum path used when an `Operator` is stored as a value.
pub const OPERATOR_ENUM_PATH: &str = "Operator";

///
/// Value
///
/// Null  → the filter field is unset; the compiler skips it.
/// List  → any sequence-shaped value (lists, sets).
/// Map   → ordered key/value entries; only used by operator-override carriers.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    Enum(ValueEnum),
    List(Vec<Self>),
    Map(Vec<(Self, Self)>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Uint(_) | Self::Float(_))
    }

    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::List(_))
    }

    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Uint(_) => ValueKind::Uint,
            Self::Float(_) => ValueKind::Float,
            Self::Text(_) => ValueKind::Text,
            Self::Enum(_) => ValueKind::Enum,
            Self::List(_) => ValueKind::List,
            Self::Map(_) => ValueKind::Map,
        }
    }

    /// Text form used by substring matching; only text and numbers have one.
    /// Whole floats keep their fractional digit (`1.0`).
    #[must_use]
    pub fn text_form(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Int(v) => Some(v.to_string()),
            Self::Uint(v) => Some(v.to_string()),
            Self::Float(v) => Some(format!("{v:?}")),
            _ => None,
        }
    }

    /// Widen an integer to `f64` only when no precision is lost.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub const fn to_f64_exact(&self) -> Option<f64> {
        match *self {
            Self::Int(v) if v.unsigned_abs() <= F64_SAFE_I64.unsigned_abs() => Some(v as f64),
            Self::Uint(v) if v <= F64_SAFE_U64 => Some(v as f64),
            Self::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Self::Enum(e) => write!(f, "{e}"),
            Self::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Self::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

///
/// ValueEnum
///
/// Enum variant carried by value, with an optional enum path for diagnostics.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ValueEnum {
    pub variant: String,
    pub path: Option<String>,
}

impl ValueEnum {
    #[must_use]
    pub fn new(variant: &str, path: Option<&str>) -> Self {
        Self {
            variant: variant.to_string(),
            path: path.map(ToString::to_string),
        }
    }
}

impl fmt::Display for ValueEnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{path}::{}", self.variant),
            None => write!(f, "{}", self.variant),
        }
    }
}

///
/// ValueKind
///
/// Runtime shape of a value, used in type-mismatch diagnostics.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Uint,
    Float,
    Text,
    Enum,
    List,
    Map,
}

///
/// Conversions
///

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::Int(i64::from(v))
                }
            }
        )*
    };
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::Uint(u64::from(v))
                }
            }
        )*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Self::Text(v.clone())
    }
}

impl From<ValueEnum> for Value {
    fn from(v: ValueEnum) -> Self {
        Self::Enum(v)
    }
}

impl From<Operator> for Value {
    fn from(op: Operator) -> Self {
        Self::Enum(ValueEnum::new(op.name(), Some(OPERATOR_ENUM_PATH)))
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Self>> From<&[T]> for Value {
    fn from(v: &[T]) -> Self {
        Self::List(v.iter().cloned().map(Into::into).collect())
    }
}

impl<V: Into<Self>> From<BTreeMap<String, V>> for Value {
    fn from(map: BTreeMap<String, V>) -> Self {
        Self::Map(
            map.into_iter()
                .map(|(key, value)| (Self::Text(key), value.into()))
                .collect(),
        )
    }
}
