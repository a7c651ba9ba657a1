use crate::query::{join::JoinNode, predicate::Predicate, sort::OrderTerm};
use serde::Serialize;
use std::fmt;

///
/// Specification
///
/// Opaque, immutable result of one compilation: the root entity, the joins
/// it needs, a flat conjunction of predicates, and an ordering clause.
/// Building it never touches storage; an execution engine interprets it.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Specification {
    entity: String,
    joins: Vec<JoinNode>,
    predicates: Vec<Predicate>,
    order: Vec<OrderTerm>,
}

impl Specification {
    pub(crate) const fn new(
        entity: String,
        joins: Vec<JoinNode>,
        predicates: Vec<Predicate>,
        order: Vec<OrderTerm>,
    ) -> Self {
        Self {
            entity,
            joins,
            predicates,
            order,
        }
    }

    #[must_use]
    pub fn entity(&self) -> &str {
        &self.entity
    }

    #[must_use]
    pub fn joins(&self) -> &[JoinNode] {
        &self.joins
    }

    /// Conjunction members, filter predicates first, then extra predicates.
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    #[must_use]
    pub fn order(&self) -> &[OrderTerm] {
        &self.order
    }

    /// True when the conjunction is empty (matches every row).
    #[must_use]
    pub const fn is_unfiltered(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl fmt::Display for Specification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FROM {}", self.entity)?;

        for join in &self.joins {
            write!(
                f,
                "\n  {} JOIN {}.{} AS {} ({})",
                join.kind, join.owning_type, join.association, join.path, join.target
            )?;
        }

        if !self.predicates.is_empty() {
            write!(f, "\nWHERE ")?;
            for (i, predicate) in self.predicates.iter().enumerate() {
                if i > 0 {
                    write!(f, "\n  AND ")?;
                }
                write!(f, "{predicate}")?;
            }
        }

        if !self.order.is_empty() {
            write!(f, "\nORDER BY ")?;
            for (i, term) in self.order.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{term}")?;
            }
        }

        Ok(())
    }
}
