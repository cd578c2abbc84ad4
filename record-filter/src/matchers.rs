//! One predicate per field family.
//!
//! Every matcher is total: a value of the wrong shape, an unparseable number,
//! an invalid date or a bad pattern is a non-match, never an error.

use chrono::{DateTime, Duration, Utc};
use regex::{Regex, RegexBuilder};
use serde_json::Value;

use crate::coerce::{
    as_date, as_number, as_string_list, as_text, get_nested_value, is_truthy, parse_date,
    parse_number,
};
use crate::types::{FieldDefinition, FieldType, FilterCondition, FilterValue, Operator};

/// Upper bound on the compiled size of a user supplied pattern.
const REGEX_SIZE_LIMIT: usize = 1 << 20;

/// Decides whether `record` satisfies `condition` for a field described by
/// `field`. Never fails: incomplete conditions and mismatched shapes are
/// simply `false`.
pub fn match_condition(
    field: &FieldDefinition,
    condition: &FilterCondition,
    record: &Value,
    now: DateTime<Utc>,
) -> bool {
    let Some(operator) = condition.operator else {
        return false;
    };
    let record_value = get_nested_value(record, &field.key);
    if field.field_type == FieldType::Date {
        if let Some(days) = operator.relative_days() {
            return match_relative_date(record_value, days, now);
        }
    }
    let Some(value) = condition.value.as_ref() else {
        return false;
    };
    match field.field_type {
        FieldType::Text => match_text(record_value, value, operator),
        FieldType::Number => match_number(record_value, value, operator),
        FieldType::Date => match_date(record_value, value, operator, now),
        FieldType::Amount => match operator {
            Operator::Between => match_number_range(record_value, value),
            _ => false,
        },
        FieldType::SingleSelect => match_single_select(record_value, value, operator),
        FieldType::MultiSelect => match_multi_select(record_value, value, operator),
        FieldType::Boolean => match_boolean(record_value, value, operator),
    }
}

fn condition_text(value: &FilterValue) -> Option<String> {
    match value {
        FilterValue::Text(s) => Some(s.clone()),
        FilterValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Compiles a case-insensitive pattern, or `None` if it is invalid or too big.
pub fn compile_pattern(pattern: &str) -> Option<Regex> {
    match RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
    {
        Ok(re) => Some(re),
        Err(e) => {
            log::debug!("Ignoring invalid filter pattern {:?}: {}", pattern, e);
            None
        }
    }
}

/// Runs an already compiled pattern against the raw text of a record value.
pub fn match_pattern(record: Option<&Value>, pattern: &Regex) -> bool {
    pattern.is_match(&as_text(record))
}

pub fn match_text(record: Option<&Value>, value: &FilterValue, operator: Operator) -> bool {
    let Some(needle) = condition_text(value) else {
        return false;
    };
    if operator == Operator::Regex {
        return compile_pattern(&needle).is_some_and(|re| match_pattern(record, &re));
    }

    let haystack = as_text(record).to_lowercase();
    let needle = needle.to_lowercase();
    match operator {
        Operator::Equals => haystack == needle,
        Operator::Contains => haystack.contains(&needle),
        Operator::StartsWith => haystack.starts_with(&needle),
        Operator::EndsWith => haystack.ends_with(&needle),
        Operator::DoesNotContain => !haystack.contains(&needle),
        _ => false,
    }
}

pub fn match_number(record: Option<&Value>, value: &FilterValue, operator: Operator) -> bool {
    if operator == Operator::NumberBetween {
        return match_number_range(record, value);
    }
    let actual = as_number(record);
    let expected = match value {
        FilterValue::Number(n) => *n,
        FilterValue::Text(s) => parse_number(s),
        _ => return false,
    };
    if actual.is_nan() || expected.is_nan() {
        return false;
    }
    match operator {
        Operator::Eq => actual == expected,
        Operator::Neq => actual != expected,
        Operator::Gt => actual > expected,
        Operator::Lt => actual < expected,
        Operator::Gte => actual >= expected,
        Operator::Lte => actual <= expected,
        _ => false,
    }
}

/// Inclusive min/max check shared by `numberBetween` and amount `between`.
pub fn match_number_range(record: Option<&Value>, value: &FilterValue) -> bool {
    match value {
        FilterValue::NumberRange(range) => range.contains(as_number(record)),
        _ => false,
    }
}

/// True when the record date falls strictly after `now - days`. Needs no
/// condition value.
pub fn match_relative_date(record: Option<&Value>, days: i64, now: DateTime<Utc>) -> bool {
    as_date(record).is_some_and(|actual| actual > now - Duration::days(days))
}

pub fn match_date(
    record: Option<&Value>,
    value: &FilterValue,
    operator: Operator,
    now: DateTime<Utc>,
) -> bool {
    if let Some(days) = operator.relative_days() {
        return match_relative_date(record, days, now);
    }
    let Some(actual) = as_date(record) else {
        return false;
    };
    let FilterValue::DateRange(range) = value else {
        return false;
    };
    // `None` for an empty bound, `Some(None)` for a bound that does not parse.
    let bound = |s: &str| -> Option<Option<DateTime<Utc>>> {
        if s.is_empty() {
            None
        } else {
            Some(parse_date(s))
        }
    };
    let start = bound(&range.start);
    let end = bound(&range.end);

    match operator {
        Operator::Between => {
            let after_start = match start {
                None => true,
                Some(Some(start)) => actual >= start,
                Some(None) => false,
            };
            let before_end = match end {
                None => true,
                Some(Some(end)) => actual <= end,
                Some(None) => false,
            };
            after_start && before_end
        }
        Operator::Before => match end.or(start) {
            None => true,
            Some(Some(limit)) => actual < limit,
            Some(None) => false,
        },
        Operator::After => match start.or(end) {
            None => true,
            Some(Some(limit)) => actual > limit,
            Some(None) => false,
        },
        _ => false,
    }
}

pub fn match_single_select(record: Option<&Value>, value: &FilterValue, operator: Operator) -> bool {
    let Some(expected) = condition_text(value) else {
        return false;
    };
    let actual = as_text(record);
    match operator {
        Operator::Is => actual == expected,
        Operator::IsNot => actual != expected,
        _ => false,
    }
}

pub fn match_multi_select(record: Option<&Value>, value: &FilterValue, operator: Operator) -> bool {
    let FilterValue::StringList(selected) = value else {
        return false;
    };
    let Some(actual) = as_string_list(record) else {
        return false;
    };
    match operator {
        Operator::In => selected.is_empty() || selected.iter().any(|s| actual.contains(s)),
        Operator::NotIn => !selected.iter().any(|s| actual.contains(s)),
        Operator::All => selected.iter().all(|s| actual.contains(s)),
        _ => false,
    }
}

pub fn match_boolean(record: Option<&Value>, value: &FilterValue, operator: Operator) -> bool {
    let FilterValue::Boolean(expected) = value else {
        return false;
    };
    match operator {
        Operator::Is => is_truthy(record) == *expected,
        _ => false,
    }
}
