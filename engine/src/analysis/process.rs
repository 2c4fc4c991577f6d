// Process parts: building the (process, item, name) triples from a table,
// ordering joined results, and narrowing them to one process.
use shared::models::{ProcessItemSummary, ProcessPart, UsageDataset};
use shared::UNKNOWN_TEXT;

pub const PROCESS_COLUMN: &str = "Process";
pub const ITEM_COLUMN: &str = "Item Number";
pub const NAME_COLUMN: &str = "Part Name";

// Exact name first, otherwise the first column whose lower-cased name contains any keyword.
fn pick_column<'a>(columns: &'a [String], exact: &str, any_of: &[&str]) -> Option<&'a str> {
    columns
        .iter()
        .find(|c| c.as_str() == exact)
        .or_else(|| {
            columns.iter().find(|c| {
                let lower = c.to_lowercase();
                any_of.iter().any(|kw| lower.contains(kw))
            })
        })
        .map(String::as_str)
}

/// Reads process part triples; unresolvable columns and null cells become "Unknown".
pub fn process_parts_from_dataset(dataset: &UsageDataset) -> Vec<ProcessPart> {
    let process_col = pick_column(&dataset.columns, PROCESS_COLUMN, &["process", "operation"]);
    let item_col = pick_column(&dataset.columns, ITEM_COLUMN, &["item", "part", "number"]);
    let name_col = pick_column(&dataset.columns, NAME_COLUMN, &["name", "description"]);

    tracing::debug!(?process_col, ?item_col, ?name_col, "Resolved process part columns");

    let text = |record: &shared::models::UsageRecord, column: Option<&str>| -> String {
        column
            .and_then(|c| record.get(c))
            .and_then(|v| v.as_text().map(|t| t.trim().to_string()))
            .unwrap_or_else(|| UNKNOWN_TEXT.to_string())
    };

    dataset
        .records
        .iter()
        .map(|record| ProcessPart {
            process: text(record, process_col),
            item_identity: text(record, item_col),
            display_name: text(record, name_col),
        })
        .collect()
}

/// Process name ascending, then total usage descending. Stable.
pub fn sort_process_rows(rows: &mut [ProcessItemSummary]) {
    rows.sort_by(|a, b| {
        a.process
            .cmp(&b.process)
            .then_with(|| b.summary.total_usage.total_cmp(&a.summary.total_usage))
    });
}

/// Distinct process names, sorted.
pub fn process_names(rows: &[ProcessItemSummary]) -> Vec<String> {
    let mut names: Vec<String> = rows.iter().map(|r| r.process.clone()).collect();
    names.sort();
    names.dedup();
    names
}

pub fn filter_by_process(rows: &[ProcessItemSummary], process: &str) -> Vec<ProcessItemSummary> {
    rows.iter().filter(|r| r.process == process).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{ItemUsageSummary, UsageRecord};

    fn row(process: &str, item: &str, total: f64) -> ProcessItemSummary {
        let mut summary = ItemUsageSummary::no_data(item, "name");
        summary.total_usage = total;
        ProcessItemSummary { process: process.to_string(), summary }
    }

    #[test]
    fn test_exact_columns() {
        let dataset = UsageDataset::from_records(vec![UsageRecord::new()
            .with("Process", " Milling ")
            .with("Item Number", "A1 ")
            .with("Part Name", "Bearing")]);
        let parts = process_parts_from_dataset(&dataset);
        assert_eq!(parts, vec![ProcessPart::new("Milling", "A1", "Bearing")]);
    }

    #[test]
    fn test_fallback_columns() {
        let dataset = UsageDataset::from_records(vec![UsageRecord::new()
            .with("Operation Step", "Welding")
            .with("Part Code", "W-9")
            .with("Description", "Tip")]);
        let parts = process_parts_from_dataset(&dataset);
        assert_eq!(parts, vec![ProcessPart::new("Welding", "W-9", "Tip")]);
    }

    #[test]
    fn test_unresolved_columns_become_unknown() {
        let dataset = UsageDataset::from_records(vec![UsageRecord::new().with("Item Number", "A1")]);
        let parts = process_parts_from_dataset(&dataset);
        assert_eq!(parts[0].process, "Unknown");
        assert_eq!(parts[0].item_identity, "A1");
        assert_eq!(parts[0].display_name, "Unknown");
    }

    #[test]
    fn test_sort_by_process_then_usage() {
        let mut rows = vec![row("B", "x", 1.0), row("A", "y", 2.0), row("A", "z", 9.0), row("B", "w", 3.0)];
        sort_process_rows(&mut rows);
        let order: Vec<&str> = rows.iter().map(|r| r.summary.item_identity.as_str()).collect();
        assert_eq!(order, vec!["z", "y", "w", "x"]);
    }

    #[test]
    fn test_names_and_filter() {
        let rows = vec![row("B", "x", 1.0), row("A", "y", 2.0), row("B", "w", 3.0)];
        assert_eq!(process_names(&rows), vec!["A".to_string(), "B".to_string()]);
        let only_b = filter_by_process(&rows, "B");
        assert_eq!(only_b.len(), 2);
        assert!(filter_by_process(&rows, "C").is_empty());
    }
}
