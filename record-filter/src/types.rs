use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A single filterable entity. Always a JSON-like mapping in practice, but any
/// value is accepted and simply fails to resolve field paths.
pub type Record = serde_json::Value;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Amount,
    SingleSelect,
    MultiSelect,
    Boolean,
}

impl FieldType {
    pub const ALL: [FieldType; 7] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Date,
        FieldType::Amount,
        FieldType::SingleSelect,
        FieldType::MultiSelect,
        FieldType::Boolean,
    ];

    /// Operators an editor may offer for this field type, in display order.
    pub fn operators(&self) -> &'static [Operator] {
        match self {
            FieldType::Text => &[
                Operator::Equals,
                Operator::Contains,
                Operator::StartsWith,
                Operator::EndsWith,
                Operator::DoesNotContain,
                Operator::Regex,
            ],
            FieldType::Number => &[
                Operator::Eq,
                Operator::Neq,
                Operator::Gt,
                Operator::Lt,
                Operator::Gte,
                Operator::Lte,
                Operator::NumberBetween,
            ],
            FieldType::Date => &[
                Operator::Between,
                Operator::Before,
                Operator::After,
                Operator::Last7days,
                Operator::Last30days,
                Operator::Last90days,
            ],
            FieldType::Amount => &[Operator::Between],
            FieldType::SingleSelect => &[Operator::Is, Operator::IsNot],
            FieldType::MultiSelect => &[Operator::In, Operator::NotIn, Operator::All],
            FieldType::Boolean => &[Operator::Is],
        }
    }

    pub fn accepts(&self, operator: Operator) -> bool {
        self.operators().contains(&operator)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Amount => "amount",
            FieldType::SingleSelect => "singleSelect",
            FieldType::MultiSelect => "multiSelect",
            FieldType::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Invalid field type: {}", s))
    }
}

/// Every operator known to the engine. `Between` is shared by date and amount
/// fields, `Is` by single-select and boolean fields.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    // text
    Equals,
    Contains,
    StartsWith,
    EndsWith,
    DoesNotContain,
    Regex,
    // number
    Eq,
    Neq,
    Gt,
    Lt,
    Gte,
    Lte,
    NumberBetween,
    // date, amount
    Between,
    Before,
    After,
    Last7days,
    Last30days,
    Last90days,
    // selects, boolean
    Is,
    IsNot,
    In,
    NotIn,
    All,
}

impl Operator {
    pub const ALL: [Operator; 24] = [
        Operator::Equals,
        Operator::Contains,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::DoesNotContain,
        Operator::Regex,
        Operator::Eq,
        Operator::Neq,
        Operator::Gt,
        Operator::Lt,
        Operator::Gte,
        Operator::Lte,
        Operator::NumberBetween,
        Operator::Between,
        Operator::Before,
        Operator::After,
        Operator::Last7days,
        Operator::Last30days,
        Operator::Last90days,
        Operator::Is,
        Operator::IsNot,
        Operator::In,
        Operator::NotIn,
        Operator::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::Contains => "contains",
            Operator::StartsWith => "startsWith",
            Operator::EndsWith => "endsWith",
            Operator::DoesNotContain => "doesNotContain",
            Operator::Regex => "regex",
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
            Operator::Gte => "gte",
            Operator::Lte => "lte",
            Operator::NumberBetween => "numberBetween",
            Operator::Between => "between",
            Operator::Before => "before",
            Operator::After => "after",
            Operator::Last7days => "last7days",
            Operator::Last30days => "last30days",
            Operator::Last90days => "last90days",
            Operator::Is => "is",
            Operator::IsNot => "isNot",
            Operator::In => "in",
            Operator::NotIn => "notIn",
            Operator::All => "all",
        }
    }

    /// Window length for the relative date operators.
    pub fn relative_days(&self) -> Option<i64> {
        match self {
            Operator::Last7days => Some(7),
            Operator::Last30days => Some(30),
            Operator::Last90days => Some(90),
            _ => None,
        }
    }

    pub fn is_relative_date(&self) -> bool {
        self.relative_days().is_some()
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .iter()
            .find(|op| op.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Invalid filter operator: {}", s))
    }
}

/// Date bounds as entered by the user. An empty string means "no bound".
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DateRange {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub start: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub end: String,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_empty() && self.end.is_empty()
    }
}

/// Numeric bounds; `None` is an open end. Unset bounds serialize as `""`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NumberRange {
    #[serde(
        default,
        deserialize_with = "deserialize_bound",
        serialize_with = "serialize_bound"
    )]
    pub min: Option<f64>,
    #[serde(
        default,
        deserialize_with = "deserialize_bound",
        serialize_with = "serialize_bound"
    )]
    pub max: Option<f64>,
}

impl NumberRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Inclusive containment with open ends treated as infinite.
    pub fn contains(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        value >= self.min.unwrap_or(f64::NEG_INFINITY) && value <= self.max.unwrap_or(f64::INFINITY)
    }
}

/// The value side of a condition. Which shape is meaningful depends on the
/// field type and operator; see [`crate::default_value_for_operator`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum FilterValue {
    Boolean(bool),
    Number(f64),
    Text(String),
    StringList(Vec<String>),
    DateRange(DateRange),
    NumberRange(NumberRange),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Number(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Boolean(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(value: Vec<String>) -> Self {
        FilterValue::StringList(value)
    }
}

impl From<DateRange> for FilterValue {
    fn from(value: DateRange) -> Self {
        FilterValue::DateRange(value)
    }
}

impl From<NumberRange> for FilterValue {
    fn from(value: NumberRange) -> Self {
        FilterValue::NumberRange(value)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

/// Describes one filterable field of the record shape.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FieldDefinition {
    /// Dot-separated path into a record, e.g. `address.city`.
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Choices for the select types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    /// Informational only. Paths are always traversed.
    #[serde(default)]
    pub nested: bool,
}

impl FieldDefinition {
    pub fn new(key: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            field_type,
            options: Vec::new(),
            nested: false,
        }
    }

    pub fn with_options<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = values
            .into_iter()
            .map(|v| {
                let v = v.into();
                SelectOption {
                    label: v.clone(),
                    value: v,
                }
            })
            .collect();
        self
    }
}

/// One user-specified constraint. `field_key` is empty and `operator` is
/// `None` until the user picks them.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    pub id: String,
    #[serde(default)]
    pub field_key: String,
    #[serde(
        default,
        deserialize_with = "deserialize_operator",
        serialize_with = "serialize_operator"
    )]
    pub operator: Option<Operator>,
    #[serde(default)]
    pub value: Option<FilterValue>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_operator<'de, D>(deserializer: D) -> Result<Option<Operator>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => Operator::from_str(s.trim()).map(Some).map_err(de::Error::custom),
    }
}

fn serialize_operator<S>(operator: &Option<Operator>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(operator.map(|op| op.as_str()).unwrap_or(""))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBound {
    Number(f64),
    Text(String),
}

fn deserialize_bound<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawBound>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawBound::Number(n)) => Ok(Some(n)),
        Some(RawBound::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawBound::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("Invalid range bound: {}", s))),
    }
}

fn serialize_bound<S>(bound: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match bound {
        Some(n) => serializer.serialize_f64(*n),
        None => serializer.serialize_str(""),
    }
}
