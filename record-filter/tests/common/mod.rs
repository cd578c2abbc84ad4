//! Shared employee dataset and schema for the record-filter integration tests

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use record_filter::{FieldDefinition, FieldType, FilterCondition, FilterValue, Operator, Record};
use serde_json::json;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Fixed evaluation time so the relative date operators are deterministic.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
}

pub fn employee_fields() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::new("name", "Name", FieldType::Text),
        FieldDefinition::new("salary", "Salary", FieldType::Number),
        FieldDefinition::new("hiredAt", "Hired", FieldType::Date),
        FieldDefinition::new("compensation.bonus", "Bonus", FieldType::Amount),
        FieldDefinition::new("department", "Department", FieldType::SingleSelect)
            .with_options(["Engineering", "Sales", "Marketing"]),
        FieldDefinition::new("skills", "Skills", FieldType::MultiSelect)
            .with_options(["React", "SQL", "Go", "Rust"]),
        FieldDefinition::new("isActive", "Active", FieldType::Boolean),
        FieldDefinition {
            nested: true,
            ..FieldDefinition::new("address.city", "City", FieldType::Text)
        },
    ]
}

pub fn employees() -> Vec<Record> {
    vec![
        json!({
            "id": 1,
            "name": "Alice Johnson",
            "salary": 95000,
            "hiredAt": "2024-06-25",
            "compensation": {"bonus": 12000},
            "department": "Engineering",
            "skills": ["React", "SQL", "Rust"],
            "isActive": true,
            "address": {"city": "Berlin"}
        }),
        json!({
            "id": 2,
            "name": "Bob Smith",
            "salary": 40000,
            "hiredAt": "2023-11-02",
            "compensation": {"bonus": 1500},
            "department": "Sales",
            "skills": ["SQL"],
            "isActive": false,
            "address": {"city": "Hamburg"}
        }),
        json!({
            "id": 3,
            "name": "Carol White",
            "salary": "60000",
            "hiredAt": "2024-05-10T09:00:00Z",
            "compensation": {"bonus": 4000},
            "department": "Sales",
            "skills": ["Go", "React"],
            "isActive": true,
            "address": {"city": "Munich"}
        }),
        json!({
            "id": 4,
            "name": "Dan Brown",
            "salary": null,
            "hiredAt": "someday",
            "department": "Marketing",
            "skills": "React",
            "isActive": 1
        }),
    ]
}

pub fn condition(id: &str, key: &str, op: Operator, value: impl Into<FilterValue>) -> FilterCondition {
    FilterCondition {
        id: id.to_string(),
        field_key: key.to_string(),
        operator: Some(op),
        value: Some(value.into()),
    }
}

pub fn ids(records: &[Record]) -> Vec<i64> {
    records.iter().filter_map(|r| r["id"].as_i64()).collect()
}
