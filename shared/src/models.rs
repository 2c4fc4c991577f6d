use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use uuid::Uuid;

/// A single cell of a usage record. Tabular sources hand over text, JSON
/// sources may hand over numbers or nulls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Text view of the value; `None` for nulls.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::Null => None,
            FieldValue::Number(n) => Some(Cow::Owned(n.to_string())),
            FieldValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<Option<FieldValue>> for FieldValue {
    fn from(value: Option<FieldValue>) -> Self {
        value.unwrap_or(FieldValue::Null)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Number(n) => n.as_f64().map(FieldValue::Number).unwrap_or(FieldValue::Null),
            serde_json::Value::String(s) => FieldValue::Text(s),
            other => FieldValue::Text(other.to_string()),
        }
    }
}

/// One usage event. Field order is the order of the source columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub fields: Vec<(String, FieldValue)>,
}

impl UsageRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(field, _)| field == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(field, _)| field == name).map(|(_, value)| value)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

/// An ordered batch of usage records sharing one column set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageDataset {
    pub columns: Vec<String>,
    pub records: Vec<UsageRecord>,
}

impl UsageDataset {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, records: Vec::new() }
    }

    /// Builds a dataset whose column order is taken from the first record.
    pub fn from_records(records: Vec<UsageRecord>) -> Self {
        let columns = records
            .first()
            .map(|r| r.field_names().map(str::to_string).collect())
            .unwrap_or_default();
        Self { columns, records }
    }

    pub fn push(&mut self, record: UsageRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A part used by a production process, joined against usage data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessPart {
    pub process: String,
    pub item_identity: String,
    pub display_name: String,
}

impl ProcessPart {
    pub fn new(process: &str, item_identity: &str, display_name: &str) -> Self {
        Self {
            process: process.to_string(),
            item_identity: item_identity.to_string(),
            display_name: display_name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Criticality {
    #[serde(rename = "CRITICAL")]
    Critical,
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "MEDIUM")]
    Medium,
    #[serde(rename = "LOW")]
    Low,
    /// No usage evidence for the item. Not part of the ranked tiers.
    #[serde(rename = "NO DATA")]
    NoData,
}

impl Criticality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Criticality::Critical => "CRITICAL",
            Criticality::High => "HIGH",
            Criticality::Medium => "MEDIUM",
            Criticality::Low => "LOW",
            Criticality::NoData => "NO DATA",
        }
    }

    /// LOW < MEDIUM < HIGH < CRITICAL; `NoData` has no rank.
    pub fn rank(&self) -> Option<u8> {
        match self {
            Criticality::Low => Some(0),
            Criticality::Medium => Some(1),
            Criticality::High => Some(2),
            Criticality::Critical => Some(3),
            Criticality::NoData => None,
        }
    }
}

impl fmt::Display for Criticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemUsageSummary {
    pub item_identity: String,
    pub display_name: String,
    pub description: String,
    pub total_usage: f64,
    pub usage_count: usize,
    pub avg_usage_per_request: f64,
    pub mean_daily_demand: f64,
    pub std_daily_demand: f64,
    pub current_stock: f64,
    pub safety_stock: f64,
    pub reorder_point: f64,
    pub criticality: Criticality,
}

impl ItemUsageSummary {
    /// Row for an item that has no usage records at all.
    pub fn no_data(item_identity: &str, display_name: &str) -> Self {
        Self {
            item_identity: item_identity.to_string(),
            display_name: display_name.to_string(),
            description: crate::UNKNOWN_TEXT.to_string(),
            total_usage: 0.0,
            usage_count: 0,
            avg_usage_per_request: 0.0,
            mean_daily_demand: 0.0,
            std_daily_demand: 0.0,
            current_stock: 0.0,
            safety_stock: 0.0,
            reorder_point: 0.0,
            criticality: Criticality::NoData,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessItemSummary {
    pub process: String,
    pub summary: ItemUsageSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Overview of a loaded usage dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub record_count: usize,
    pub columns: Vec<String>,
    pub unique_items: Option<usize>,
    pub total_quantity: Option<f64>,
    pub date_column: Option<String>,
    pub date_range: Option<DateRange>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub no_data: usize,
}

impl TierCounts {
    pub fn from_tiers<'a>(tiers: impl IntoIterator<Item = &'a Criticality>) -> Self {
        let mut counts = Self::default();
        for tier in tiers {
            match tier {
                Criticality::Critical => counts.critical += 1,
                Criticality::High => counts.high += 1,
                Criticality::Medium => counts.medium += 1,
                Criticality::Low => counts.low += 1,
                Criticality::NoData => counts.no_data += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low + self.no_data
    }
}

/// Result of one analysis run. Replaced wholesale by the next run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSnapshot<T> {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<T>,
}

impl<T> AnalysisSnapshot<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            rows,
        }
    }
}
