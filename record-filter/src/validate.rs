use crate::types::{FilterCondition, FilterValue};

/// Whether a condition is complete enough to take part in a filter pass.
///
/// Half-edited conditions (no field, no operator, or an empty value) are not
/// an error; they are just left out of evaluation.
pub fn is_valid_filter(condition: &FilterCondition) -> bool {
    if condition.field_key.is_empty() {
        return false;
    }
    let Some(operator) = condition.operator else {
        return false;
    };
    if operator.is_relative_date() {
        return true;
    }
    match &condition.value {
        None => false,
        Some(FilterValue::Text(s)) => !s.is_empty(),
        Some(FilterValue::StringList(items)) => !items.is_empty(),
        Some(FilterValue::DateRange(range)) => !range.is_empty(),
        Some(FilterValue::NumberRange(range)) => !range.is_empty(),
        Some(FilterValue::Number(_)) | Some(FilterValue::Boolean(_)) => true,
    }
}

/// Number of conditions that would currently affect a filter pass.
pub fn count_active_filters(conditions: &[FilterCondition]) -> usize {
    conditions.iter().filter(|c| is_valid_filter(c)).count()
}
