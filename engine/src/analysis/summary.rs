// Dataset overview for presentation code.
use super::field_discovery::FieldMapping;
use super::normalize::{identity_key, parse_number};
use chrono::{NaiveDate, NaiveDateTime};
use shared::models::{DatasetSummary, DateRange, UsageDataset};
use std::collections::HashSet;

const DATE_KEYWORDS: [&str; 3] = ["date", "time", "created"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M:%S"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"];

pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

pub fn summarize_dataset(dataset: &UsageDataset) -> DatasetSummary {
    let mapping = FieldMapping::resolve(&dataset.columns);

    let unique_items = mapping.identity.as_deref().map(|col| {
        dataset
            .records
            .iter()
            .map(|r| identity_key(r.get(col)))
            .collect::<HashSet<_>>()
            .len()
    });

    let total_quantity = mapping.quantity.as_deref().map(|col| {
        dataset
            .records
            .iter()
            .map(|r| parse_number(r.get(col)).value().abs())
            .sum::<f64>()
    });

    let date_column = dataset
        .columns
        .iter()
        .find(|c| {
            let lower = c.to_lowercase();
            DATE_KEYWORDS.iter().any(|kw| lower.contains(kw))
        })
        .cloned();

    let date_range = date_column.as_deref().and_then(|col| {
        let stamps = dataset
            .records
            .iter()
            .filter_map(|r| r.get(col).and_then(|v| v.as_text().and_then(|t| parse_timestamp(&t))));
        stamps.fold(None, |range: Option<DateRange>, ts| match range {
            None => Some(DateRange { start: ts, end: ts }),
            Some(r) => Some(DateRange { start: r.start.min(ts), end: r.end.max(ts) }),
        })
    });

    DatasetSummary {
        record_count: dataset.len(),
        columns: dataset.columns.clone(),
        unique_items,
        total_quantity,
        date_column,
        date_range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use shared::models::UsageRecord;

    #[test]
    fn test_parse_timestamp_formats() {
        let ts = parse_timestamp("2024-03-05 14:30:00").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day(), ts.hour()), (2024, 3, 5, 14));
        let ts = parse_timestamp("30/12/2024").unwrap();
        assert_eq!((ts.month(), ts.day()), (12, 30));
        // Not a valid day/month, falls through to month/day.
        let ts = parse_timestamp("12/31/2024").unwrap();
        assert_eq!((ts.month(), ts.day()), (12, 31));
        assert!(parse_timestamp("45678912345").is_none());
    }

    #[test]
    fn test_summarize_dataset() {
        let dataset = UsageDataset::from_records(vec![
            UsageRecord::new().with("Request Date", "2024-01-10").with("Item Number", "A1").with("Requested Qty", "10"),
            UsageRecord::new().with("Request Date", "2024-02-09").with("Item Number", "A1 ").with("Requested Qty", "-4"),
            UsageRecord::new().with("Request Date", "bad").with("Item Number", "B2").with("Requested Qty", "x"),
        ]);
        let summary = summarize_dataset(&dataset);
        assert_eq!(summary.record_count, 3);
        assert_eq!(summary.unique_items, Some(2));
        assert_eq!(summary.total_quantity, Some(14.0));
        assert_eq!(summary.date_column.as_deref(), Some("Request Date"));
        let range = summary.date_range.unwrap();
        assert_eq!(range.span_days(), 30);
    }

    #[test]
    fn test_summary_without_known_columns() {
        let dataset = UsageDataset::from_records(vec![UsageRecord::new().with("foo", "1")]);
        let summary = summarize_dataset(&dataset);
        assert_eq!(summary.unique_items, None);
        assert_eq!(summary.total_quantity, None);
        assert_eq!(summary.date_column, None);
        assert_eq!(summary.date_range, None);
    }
}
