//! The filter pass: AND across field groups, OR within a group.

use std::borrow::Cow;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use regex::Regex;

use crate::coerce::get_nested_value;
use crate::matchers::{compile_pattern, match_condition, match_pattern};
use crate::types::{FieldDefinition, FieldType, FilterCondition, FilterValue, Operator, Record};
use crate::validate::is_valid_filter;

type AHashMap<K, V> = HashMap<K, V, BuildHasherDefault<ahash::AHasher>>;

/// Filters `records` against `conditions`, reading the wall clock once for
/// the relative date operators. See [`apply_filters_at`].
pub fn apply_filters<'a>(
    records: &'a [Record],
    conditions: &[FilterCondition],
    fields: &[FieldDefinition],
) -> Cow<'a, [Record]> {
    apply_filters_at(records, conditions, fields, Utc::now())
}

/// Filters `records`, keeping the ones that satisfy every field group.
///
/// Conditions are grouped by field key. A record is kept when, for every
/// group, at least one of the group's conditions matches. Incomplete
/// conditions are ignored, and groups on a key with no field definition do
/// not constrain the result. With no complete conditions the input is
/// returned as is, borrowed.
///
/// Output order follows input order. This never fails.
pub fn apply_filters_at<'a>(
    records: &'a [Record],
    conditions: &[FilterCondition],
    fields: &[FieldDefinition],
    now: DateTime<Utc>,
) -> Cow<'a, [Record]> {
    let active: Vec<&FilterCondition> = conditions.iter().filter(|c| is_valid_filter(c)).collect();
    if active.is_empty() {
        return Cow::Borrowed(records);
    }
    log::debug!(
        "Filtering {} records with {} of {} conditions",
        records.len(),
        active.len(),
        conditions.len()
    );

    let definitions: AHashMap<&str, &FieldDefinition> =
        fields.iter().map(|f| (f.key.as_str(), f)).collect();

    let mut by_field: IndexMap<&str, Vec<&FilterCondition>> = IndexMap::new();
    for condition in active {
        by_field
            .entry(condition.field_key.as_str())
            .or_default()
            .push(condition);
    }

    let groups: Vec<FieldGroup> = by_field
        .into_iter()
        .filter_map(|(key, conditions)| match definitions.get(key).copied() {
            Some(field) => Some(FieldGroup::new(field, conditions)),
            None => {
                log::debug!(
                    "No field definition for {:?}, ignoring {} condition(s)",
                    key,
                    conditions.len()
                );
                None
            }
        })
        .collect();

    let kept: Vec<Record> = records
        .iter()
        .filter(|record| groups.iter().all(|group| group.matches(record, now)))
        .cloned()
        .collect();
    log::trace!("{} of {} records kept", kept.len(), records.len());
    Cow::Owned(kept)
}

/// Conditions sharing one field key.
struct FieldGroup<'a> {
    field: &'a FieldDefinition,
    conditions: Vec<PreparedCondition<'a>>,
}

enum PreparedCondition<'a> {
    /// Text regex condition, compiled once per pass. `None` never matches.
    Pattern(Option<Regex>),
    Plain(&'a FilterCondition),
}

impl<'a> FieldGroup<'a> {
    fn new(field: &'a FieldDefinition, conditions: Vec<&'a FilterCondition>) -> Self {
        let conditions = conditions
            .into_iter()
            .map(|condition| PreparedCondition::new(field, condition))
            .collect();
        Self { field, conditions }
    }

    fn matches(&self, record: &Record, now: DateTime<Utc>) -> bool {
        self.conditions.iter().any(|condition| match condition {
            PreparedCondition::Pattern(pattern) => pattern
                .as_ref()
                .is_some_and(|re| match_pattern(get_nested_value(record, &self.field.key), re)),
            PreparedCondition::Plain(condition) => {
                match_condition(self.field, condition, record, now)
            }
        })
    }
}

impl<'a> PreparedCondition<'a> {
    fn new(field: &FieldDefinition, condition: &'a FilterCondition) -> Self {
        if field.field_type != FieldType::Text || condition.operator != Some(Operator::Regex) {
            return PreparedCondition::Plain(condition);
        }
        let pattern = match &condition.value {
            Some(FilterValue::Text(pattern)) => compile_pattern(pattern),
            Some(FilterValue::Number(n)) => compile_pattern(&n.to_string()),
            _ => None,
        };
        PreparedCondition::Pattern(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NumberRange;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn condition(id: &str, key: &str, op: Operator, value: FilterValue) -> FilterCondition {
        FilterCondition {
            id: id.to_string(),
            field_key: key.to_string(),
            operator: Some(op),
            value: Some(value),
        }
    }

    #[test]
    fn test_no_conditions_borrows_input() {
        let records = vec![json!({"name": "Alice"})];
        let fields = vec![FieldDefinition::new("name", "Name", FieldType::Text)];
        let result = apply_filters_at(&records, &[], &fields, now());
        assert!(matches!(result, Cow::Borrowed(_)));

        let incomplete = FilterCondition {
            id: "filter-1".into(),
            field_key: String::new(),
            operator: None,
            value: None,
        };
        let result = apply_filters_at(&records, &[incomplete], &fields, now());
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result.as_ref(), records.as_slice());
    }

    #[test]
    fn test_text_contains_scenario() {
        let records = vec![json!({"name": "Alice"}), json!({"name": "Bob"})];
        let fields = vec![FieldDefinition::new("name", "Name", FieldType::Text)];
        let conditions = vec![condition("1", "name", Operator::Contains, "ali".into())];
        let result = apply_filters_at(&records, &conditions, &fields, now());
        assert_eq!(result.as_ref(), &[json!({"name": "Alice"})]);
    }

    #[test]
    fn test_number_between_scenario() {
        let records = vec![
            json!({"salary": 40000}),
            json!({"salary": 60000}),
            json!({"salary": 90000}),
        ];
        let fields = vec![FieldDefinition::new("salary", "Salary", FieldType::Number)];
        let range = NumberRange::new(Some(50000.0), Some(100000.0));
        let conditions = vec![condition("1", "salary", Operator::NumberBetween, range.into())];
        let result = apply_filters_at(&records, &conditions, &fields, now());
        assert_eq!(
            result.as_ref(),
            &[json!({"salary": 60000}), json!({"salary": 90000})]
        );
    }

    #[test]
    fn test_invalid_regex_matches_nothing() {
        let records = vec![json!({"name": "Alice"}), json!({"name": "("})];
        let fields = vec![FieldDefinition::new("name", "Name", FieldType::Text)];
        let conditions = vec![condition("1", "name", Operator::Regex, "(".into())];
        let result = apply_filters_at(&records, &conditions, &fields, now());
        assert!(result.is_empty());
    }

    #[test]
    fn test_compiled_regex_is_case_insensitive() {
        let records = vec![json!({"name": "Alice"}), json!({"name": "Bob"})];
        let fields = vec![FieldDefinition::new("name", "Name", FieldType::Text)];
        let conditions = vec![condition("1", "name", Operator::Regex, "^A".into())];
        let result = apply_filters_at(&records, &conditions, &fields, now());
        assert_eq!(result.as_ref(), &[json!({"name": "Alice"})]);

        let conditions = vec![condition("1", "name", Operator::Regex, "^a".into())];
        let result = apply_filters_at(&records, &conditions, &fields, now());
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_or_within_group_and_across_groups() {
        let records = vec![
            json!({"id": 1, "department": "Engineering", "isActive": true}),
            json!({"id": 2, "department": "Sales", "isActive": false}),
            json!({"id": 3, "department": "Sales", "isActive": true}),
            json!({"id": 4, "department": "Marketing", "isActive": true}),
        ];
        let fields = vec![
            FieldDefinition::new("department", "Department", FieldType::SingleSelect)
                .with_options(["Engineering", "Sales", "Marketing"]),
            FieldDefinition::new("isActive", "Active", FieldType::Boolean),
        ];
        let conditions = vec![
            condition("1", "department", Operator::Is, "Engineering".into()),
            condition("2", "isActive", Operator::Is, true.into()),
            condition("3", "department", Operator::Is, "Sales".into()),
        ];
        let result = apply_filters_at(&records, &conditions, &fields, now());
        let ids: Vec<_> = result.iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!(1), json!(3)]);
    }

    #[test]
    fn test_unknown_field_does_not_constrain() {
        let records = vec![json!({"name": "Alice"}), json!({"name": "Bob"})];
        let fields = vec![FieldDefinition::new("name", "Name", FieldType::Text)];
        let with_ghost = vec![
            condition("1", "ghost", Operator::Equals, "boo".into()),
            condition("2", "name", Operator::StartsWith, "b".into()),
        ];
        let without_ghost = vec![condition("2", "name", Operator::StartsWith, "b".into())];
        assert_eq!(
            apply_filters_at(&records, &with_ghost, &fields, now()),
            apply_filters_at(&records, &without_ghost, &fields, now())
        );

        let only_ghost = vec![condition("1", "ghost", Operator::Equals, "boo".into())];
        assert_eq!(
            apply_filters_at(&records, &only_ghost, &fields, now()).as_ref(),
            records.as_slice()
        );
    }

    #[test]
    fn test_operator_from_other_family_excludes_all() {
        let records = vec![json!({"age": 30})];
        let fields = vec![FieldDefinition::new("age", "Age", FieldType::Number)];
        let conditions = vec![condition("1", "age", Operator::Contains, "3".into())];
        assert!(apply_filters_at(&records, &conditions, &fields, now()).is_empty());
    }
}
