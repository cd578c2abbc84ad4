use record_filter::{is_valid_filter, FieldType, FilterCondition, FilterSet, FilterValue};

/// Why a condition does or does not take part in a filter pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionStatus {
    Active,
    MissingField,
    MissingOperator,
    MissingValue,
    /// Complete, but the key matches no field so it filters nothing.
    UnknownField,
    /// Complete, but the operator belongs to another field type and so
    /// matches no record.
    OperatorNotForType(FieldType),
}

impl std::fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConditionStatus::Active => write!(f, "active"),
            ConditionStatus::MissingField => write!(f, "inactive: no field selected"),
            ConditionStatus::MissingOperator => write!(f, "inactive: no operator selected"),
            ConditionStatus::MissingValue => write!(f, "inactive: no value entered"),
            ConditionStatus::UnknownField => write!(f, "ignored: unknown field"),
            ConditionStatus::OperatorNotForType(t) => {
                write!(f, "matches nothing: operator not valid for {} fields", t)
            }
        }
    }
}

pub fn condition_status(set: &FilterSet, condition: &FilterCondition) -> ConditionStatus {
    if condition.field_key.is_empty() {
        return ConditionStatus::MissingField;
    }
    let Some(operator) = condition.operator else {
        return ConditionStatus::MissingOperator;
    };
    if !is_valid_filter(condition) {
        return ConditionStatus::MissingValue;
    }
    match set.field(&condition.field_key) {
        None => ConditionStatus::UnknownField,
        Some(field) if !field.field_type.accepts(operator) => {
            ConditionStatus::OperatorNotForType(field.field_type)
        }
        Some(_) => ConditionStatus::Active,
    }
}

/// Short human form of a condition value.
pub fn describe_value(value: Option<&FilterValue>) -> String {
    match value {
        None => "-".to_string(),
        Some(FilterValue::Text(s)) => format!("{:?}", s),
        Some(FilterValue::Number(n)) => n.to_string(),
        Some(FilterValue::Boolean(b)) => b.to_string(),
        Some(FilterValue::StringList(items)) => format!("[{}]", items.join(", ")),
        Some(FilterValue::DateRange(range)) => format!("{} .. {}", range.start, range.end),
        Some(FilterValue::NumberRange(range)) => format!(
            "{} .. {}",
            range.min.map(|n| n.to_string()).unwrap_or_default(),
            range.max.map(|n| n.to_string()).unwrap_or_default()
        ),
    }
}
