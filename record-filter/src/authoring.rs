//! Helpers for building and editing conditions the way an editor does:
//! changing the field resets operator and value, changing the operator
//! resets the value.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::defaults::{default_value, default_value_for_operator};
use crate::engine::apply_filters_at;
use crate::types::{FieldDefinition, FieldType, FilterCondition, FilterValue, Operator, Record};
use crate::validate::count_active_filters;

/// Hands out opaque, increasing condition ids such as `filter-1`.
#[derive(Debug, Clone)]
pub struct ConditionIdGenerator {
    prefix: String,
    next: u64,
}

impl Default for ConditionIdGenerator {
    fn default() -> Self {
        Self::new("filter")
    }
}

impl ConditionIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// Continues numbering after the highest `<prefix>-<n>` id already in use.
    pub fn resume_after(prefix: impl Into<String>, existing: &[FilterCondition]) -> Self {
        let prefix = prefix.into();
        let highest = existing
            .iter()
            .filter_map(|c| c.id.strip_prefix(prefix.as_str()))
            .filter_map(|rest| rest.strip_prefix('-'))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            prefix,
            next: highest + 1,
        }
    }

    pub fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

impl FilterCondition {
    /// A fresh condition with no field and no operator yet.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_key: String::new(),
            operator: None,
            value: Some(FilterValue::Text(String::new())),
        }
    }

    pub fn set_field(&mut self, field: &FieldDefinition) {
        self.field_key = field.key.clone();
        self.operator = None;
        self.value = Some(default_value(field.field_type));
    }

    pub fn set_operator(&mut self, field_type: FieldType, operator: Operator) {
        self.operator = Some(operator);
        self.value = Some(default_value_for_operator(field_type, operator));
    }

    pub fn set_value(&mut self, value: impl Into<FilterValue>) {
        self.value = Some(value.into());
    }
}

/// A schema plus the conditions currently composed against it. This is the
/// document editors and the command line load and save.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct FilterSet {
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub conditions: Vec<FilterCondition>,
}

impl FilterSet {
    pub fn new(fields: Vec<FieldDefinition>) -> Self {
        Self {
            fields,
            conditions: Vec::new(),
        }
    }

    pub fn field(&self, key: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Appends an empty condition and returns it for editing.
    pub fn add_condition(&mut self, ids: &mut ConditionIdGenerator) -> &mut FilterCondition {
        self.conditions.push(FilterCondition::new(ids.next_id()));
        let last = self.conditions.len() - 1;
        &mut self.conditions[last]
    }

    pub fn remove_condition(&mut self, id: &str) -> Option<FilterCondition> {
        let index = self.conditions.iter().position(|c| c.id == id)?;
        Some(self.conditions.remove(index))
    }

    pub fn condition_mut(&mut self, id: &str) -> Option<&mut FilterCondition> {
        self.conditions.iter_mut().find(|c| c.id == id)
    }

    pub fn clear(&mut self) {
        self.conditions.clear();
    }

    pub fn active_count(&self) -> usize {
        count_active_filters(&self.conditions)
    }

    pub fn apply<'a>(&self, records: &'a [Record], now: DateTime<Utc>) -> Cow<'a, [Record]> {
        apply_filters_at(records, &self.conditions, &self.fields, now)
    }
}
