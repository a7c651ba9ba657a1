//! Operator engine: map (operator, value, column type) to a predicate.

use crate::{
    filter::{FieldSpec, Operator, OperatorOverrides},
    model::FieldKind,
    query::predicate::{ColumnRef, Predicate},
    value::{Value, ValueKind},
};
use thiserror::Error as ThisError;

/// Pick the operator for one field: instance override, then the field's
/// registered operator, then `EQUAL`.
#[must_use]
pub fn resolve_operator(field: &FieldSpec, overrides: &OperatorOverrides) -> Operator {
    overrides
        .get(&field.name)
        .or(field.operator)
        .unwrap_or_default()
}

/// Build the predicate for one field. Pure; `value` must not be null.
pub fn build_predicate(
    field: &str,
    op: Operator,
    value: Value,
    column: ColumnRef,
    column_kind: &FieldKind,
    like_escape: char,
) -> Result<Predicate, OperatorError> {
    match op {
        Operator::Equal => Ok(Predicate::eq(column, value)),
        Operator::NotEqual => Ok(Predicate::ne(column, value)),

        Operator::Like => {
            let Some(text) = value.text_form() else {
                return Err(OperatorError::mismatch(
                    field,
                    op,
                    &value,
                    column_kind,
                    "value is not text or a number",
                ));
            };

            Ok(Predicate::like(
                column,
                like_pattern(&text, like_escape),
                like_escape,
            ))
        }

        Operator::In => match value {
            Value::List(items) => Ok(Predicate::in_(column, items)),
            other => Err(OperatorError::mismatch(
                field,
                op,
                &other,
                column_kind,
                "value is not a collection",
            )),
        },

        Operator::LessThan | Operator::GreaterThan => {
            if !value.is_numeric() {
                return Err(OperatorError::mismatch(
                    field,
                    op,
                    &value,
                    column_kind,
                    "value is not a number",
                ));
            }
            let Some(coerced) = coerce_numeric(&value, column_kind) else {
                return Err(OperatorError::mismatch(
                    field,
                    op,
                    &value,
                    column_kind,
                    "value does not coerce to the column type",
                ));
            };

            Ok(if op == Operator::LessThan {
                Predicate::lt(column, coerced)
            } else {
                Predicate::gt(column, coerced)
            })
        }
    }
}

/// Wrap `text` in `%` wildcards, escaping literal wildcards and the escape
/// character itself.
#[must_use]
pub fn like_pattern(text: &str, escape: char) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if ch == '%' || ch == '_' || ch == escape {
            pattern.push(escape);
        }
        pattern.push(ch);
    }
    pattern.push('%');

    pattern
}

/// Convert a numeric value to the column's numeric representation.
/// Timestamps compare as unsigned epoch values. Narrowing or lossy
/// conversions are refused, as are NaN and infinities.
fn coerce_numeric(value: &Value, kind: &FieldKind) -> Option<Value> {
    match (kind, value) {
        (FieldKind::Int, Value::Int(v)) => Some(Value::Int(*v)),
        (FieldKind::Int, Value::Uint(v)) => i64::try_from(*v).ok().map(Value::Int),
        (FieldKind::Uint | FieldKind::Timestamp, Value::Uint(v)) => Some(Value::Uint(*v)),
        (FieldKind::Uint | FieldKind::Timestamp, Value::Int(v)) => {
            u64::try_from(*v).ok().map(Value::Uint)
        }
        (FieldKind::Float | FieldKind::Decimal, v) => v
            .to_f64_exact()
            .filter(|f| f.is_finite())
            .map(Value::Float),
        _ => None,
    }
}

/// Operator/value compatibility failures.
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum OperatorError {
    #[error(
        "operator {op} is not valid for field '{field}' ({value} value against {column} column): {reason}"
    )]
    OperatorTypeMismatch {
        field: String,
        op: Operator,
        value: ValueKind,
        column: String,
        reason: &'static str,
    },
}

impl OperatorError {
    fn mismatch(
        field: &str,
        op: Operator,
        value: &Value,
        column: &FieldKind,
        reason: &'static str,
    ) -> Self {
        Self::OperatorTypeMismatch {
            field: field.to_string(),
            op,
            value: value.kind(),
            column: column.to_string(),
            reason,
        }
    }
}
