use serde::Serialize;
use std::fmt;

///
/// FieldModel
/// Runtime field metadata used by path resolution and operator checks.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FieldModel {
    /// Field name as used in filter paths.
    pub name: String,
    /// Declared type shape.
    pub kind: FieldKind,
    /// Whether the field carries persistence-column metadata.
    pub column: bool,
}

impl FieldModel {
    /// Persisted column of the given kind.
    #[must_use]
    pub fn column(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            column: true,
        }
    }

    /// Single-valued association to another registered entity.
    #[must_use]
    pub fn relation(name: &str, target: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Entity {
                target: target.to_string(),
            },
            column: false,
        }
    }

    /// Collection-valued association to another registered entity.
    #[must_use]
    pub fn relation_many(name: &str, target: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::List(Box::new(FieldKind::Entity {
                target: target.to_string(),
            })),
            column: false,
        }
    }

    /// Field without persistence-column metadata (embedded or transient).
    #[must_use]
    pub fn unmapped(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            column: false,
        }
    }

    /// Entity type this field points at, looking through collections.
    #[must_use]
    pub fn target_entity(&self) -> Option<&str> {
        match self.kind.element() {
            FieldKind::Entity { target } => Some(target),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_association(&self) -> bool {
        self.target_entity().is_some()
    }

    #[must_use]
    pub const fn is_multi_valued(&self) -> bool {
        self.kind.is_collection()
    }

    /// A field is a domain column when it is a persisted, non-enum,
    /// non-association field. Only non-domain-columns may be path hops.
    #[must_use]
    pub fn is_domain_column(&self) -> bool {
        self.column && !self.is_association() && !self.kind.element().is_enum()
    }
}

///
/// FieldKind
///
/// Minimal type surface needed by the navigator and the operator engine.
/// Collections wrap their element kind; associations name their target.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum FieldKind {
    // Scalar primitives
    Bool,
    Date,
    Decimal,
    Float,
    Int,
    Text,
    Timestamp,
    Uint,
    Ulid,
    Enum { path: String },

    // References
    Entity { target: String },

    // Collections
    List(Box<Self>),
    Set(Box<Self>),
    Map { key: Box<Self>, value: Box<Self> },
}

impl FieldKind {
    /// Element kind for collections (map value for maps), or self.
    #[must_use]
    pub fn element(&self) -> &Self {
        match self {
            Self::List(inner) | Self::Set(inner) => inner.element(),
            Self::Map { value, .. } => value.element(),
            _ => self,
        }
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::List(_) | Self::Set(_) | Self::Map { .. })
    }

    #[must_use]
    pub const fn is_enum(&self) -> bool {
        matches!(self, Self::Enum { .. })
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enum { path } => write!(f, "Enum<{path}>"),
            Self::Entity { target } => write!(f, "Entity<{target}>"),
            Self::List(inner) => write!(f, "List<{inner}>"),
            Self::Set(inner) => write!(f, "Set<{inner}>"),
            Self::Map { key, value } => write!(f, "Map<{key}, {value}>"),
            scalar => write!(f, "{scalar:?}"),
        }
    }
}
