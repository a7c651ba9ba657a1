
use crate::{
    filter::{FieldShape, FilterField, FilterModel, Operator},
    test_support::ModelSource,
};

///
/// Staff
///
/// Filter over `Person` with one field of every operator the compiler
/// supports, all reachable through the underscore convention.
///

pub(crate) struct Staff;

impl ModelSource for Staff {
    fn model() -> FilterModel {
        FilterModel::builder("Staff")
            .field(FilterField::new("name", FieldShape::Text).operator(Operator::Like))
            .field(FilterField::new("age", FieldShape::Int).operator(Operator::GreaterThan))
            .field(FilterField::new("department_manager_email", FieldShape::Text))
            .field(FilterField::new("department_name", FieldShape::Text))
            .field(FilterField::new("email", FieldShape::Text).operator(Operator::NotEqual))
            .field(FilterField::new("salary", FieldShape::Float).operator(Operator::LessThan))
            .field(
                FilterField::new("id", FieldShape::list(FieldShape::Uint)).operator(Operator::In),
            )
            .field(FilterField::overrides("ops"))
            .build()
    }
}
