use crate::config::AnalysisSettings;
use crate::error::{EngineError, EngineResult};
use csv::{ReaderBuilder, StringRecord};
use shared::models::{FieldValue, UsageDataset, UsageRecord};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// Remark columns checked, in order, by the emergency-request filter.
const REMARK_COLUMNS: [&str; 2] = ["Remark", "Remarks"];

/// `.csv` files are comma separated; anything else (`.txt`, `.tsv`) is tab separated.
pub fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => b',',
        _ => b'\t',
    }
}

pub struct UsageCsvParser;

impl UsageCsvParser {
    /// Reads a delimited file with a header row. Empty cells become `Null`.
    pub fn load_records_from_csv(file_path: &Path) -> EngineResult<UsageDataset> {
        let file = File::open(file_path)?;
        let mut rdr = ReaderBuilder::new()
            .delimiter(delimiter_for(file_path))
            .has_headers(true)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let headers = rdr.headers()?.clone();
        let columns: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
        if columns.iter().all(|c| c.is_empty()) {
            return Err(EngineError::CsvDataFormatError(format!(
                "No header row found in '{}'",
                file_path.display()
            )));
        }

        let mut dataset = UsageDataset::new(columns);
        for (idx, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| {
                EngineError::CsvDataFormatError(format!("Error reading record at line {}: {}", idx + 2, e))
            })?;
            // Short rows are padded with nulls; surplus cells have no column to land in.
            if record.len() > dataset.columns.len() {
                return Err(EngineError::CsvDataFormatError(format!(
                    "Record at line {} has {} fields, but the header has {}",
                    idx + 2,
                    record.len(),
                    dataset.columns.len()
                )));
            }
            dataset.push(Self::to_usage_record(&dataset.columns, &record));
        }

        tracing::debug!(path = %file_path.display(), records = dataset.len(), "Loaded usage file");
        Ok(dataset)
    }

    fn to_usage_record(columns: &[String], record: &StringRecord) -> UsageRecord {
        let mut usage = UsageRecord::new();
        for (idx, column) in columns.iter().enumerate() {
            let value = match record.get(idx) {
                Some(cell) if !cell.trim().is_empty() => FieldValue::Text(cell.to_string()),
                _ => FieldValue::Null,
            };
            usage.set(column, value);
        }
        usage
    }

    /// Loads one usage file and applies the load-time filters from `settings`.
    pub fn load_dataset(file_path: &Path, settings: &AnalysisSettings) -> EngineResult<UsageDataset> {
        let dataset = Self::load_records_from_csv(file_path)?;
        Ok(if settings.emergency_requests_only {
            emergency_requests_only(dataset)
        } else {
            dataset
        })
    }

    /// Loads several files into one dataset using the first file's columns.
    /// Columns a later file lacks are `Null`; columns only it has are dropped.
    pub fn load_datasets<P: AsRef<Path>>(file_paths: &[P], settings: &AnalysisSettings) -> EngineResult<UsageDataset> {
        let mut combined: Option<UsageDataset> = None;

        for path in file_paths {
            let next = Self::load_dataset(path.as_ref(), settings)?;
            match combined.as_mut() {
                None => combined = Some(next),
                Some(all) => {
                    if next.columns != all.columns {
                        tracing::warn!(
                            path = %path.as_ref().display(),
                            "Column set differs from the first file; realigning"
                        );
                    }
                    for record in next.records {
                        let mut aligned = UsageRecord::new();
                        for column in &all.columns {
                            aligned.set(column, record.get(column).cloned().unwrap_or(FieldValue::Null));
                        }
                        all.push(aligned);
                    }
                }
            }
        }

        combined.ok_or_else(|| EngineError::NoDataLoaded("No usage files given".to_string()))
    }
}

/// Keeps rows whose remark mentions an emergency request ("EM" or "em").
/// Datasets without a remark column pass through untouched.
pub fn emergency_requests_only(dataset: UsageDataset) -> UsageDataset {
    let remark_col = match REMARK_COLUMNS.iter().find(|c| dataset.columns.iter().any(|col| col.as_str() == **c)) {
        Some(col) => col.to_string(),
        None => return dataset,
    };

    let before = dataset.len();
    let UsageDataset { columns, records } = dataset;
    let records: Vec<UsageRecord> = records
        .into_iter()
        .filter(|r| {
            r.get(&remark_col)
                .and_then(|v| v.as_text().map(|t| t.contains("EM") || t.contains("em")))
                .unwrap_or(false)
        })
        .collect();

    tracing::info!(remark_column = %remark_col, before, after = records.len(), "Filtered to emergency requests");
    UsageDataset { columns, records }
}
