//! Typed, ad-hoc filtering of JSON-like records.
//!
//! Conditions on the same field are OR-ed, groups of different fields are
//! AND-ed. Evaluation never fails; anything malformed degrades to a
//! non-match (or, for incomplete conditions, to no constraint at all).

pub mod authoring;
pub mod coerce;
pub mod defaults;
pub mod engine;
pub mod matchers;
pub mod types;
pub mod validate;

pub use authoring::{ConditionIdGenerator, FilterSet};
pub use coerce::get_nested_value;
pub use defaults::{default_value, default_value_for_operator};
pub use engine::{apply_filters, apply_filters_at};
pub use matchers::match_condition;
pub use types::{
    DateRange, FieldDefinition, FieldType, FilterCondition, FilterValue, NumberRange, Operator,
    Record, SelectOption,
};
pub use validate::{count_active_filters, is_valid_filter};
