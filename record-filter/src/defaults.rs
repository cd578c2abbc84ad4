use crate::types::{DateRange, FieldType, FilterValue, NumberRange, Operator};

/// The canonical empty value for a field type.
pub fn default_value(field_type: FieldType) -> FilterValue {
    match field_type {
        FieldType::Text | FieldType::SingleSelect => FilterValue::Text(String::new()),
        FieldType::Number => FilterValue::Number(0.0),
        FieldType::Date => FilterValue::DateRange(DateRange::default()),
        FieldType::Amount => FilterValue::NumberRange(NumberRange::default()),
        FieldType::MultiSelect => FilterValue::StringList(Vec::new()),
        FieldType::Boolean => FilterValue::Boolean(true),
    }
}

/// Like [`default_value`], but for operators whose value shape differs from
/// the field type's natural one.
pub fn default_value_for_operator(field_type: FieldType, operator: Operator) -> FilterValue {
    match operator {
        Operator::Last7days | Operator::Last30days | Operator::Last90days => {
            FilterValue::DateRange(DateRange::default())
        }
        Operator::NumberBetween => FilterValue::NumberRange(NumberRange::default()),
        _ => default_value(field_type),
    }
}
