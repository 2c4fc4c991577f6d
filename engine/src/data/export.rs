// Writes analysis results back out as CSV.
use crate::error::EngineResult;
use chrono::NaiveDateTime;
use serde::Serialize;
use shared::models::{ItemUsageSummary, ProcessItemSummary};
use std::path::Path;

#[derive(Debug, Serialize)]
struct ItemRow<'a> {
    #[serde(rename = "Item Number")]
    item_identity: &'a str,
    #[serde(rename = "Part Name")]
    display_name: &'a str,
    #[serde(rename = "Description 2")]
    description: &'a str,
    #[serde(rename = "Total Usage")]
    total_usage: f64,
    #[serde(rename = "Usage Count")]
    usage_count: usize,
    #[serde(rename = "Avg Usage per Request")]
    avg_usage_per_request: f64,
    #[serde(rename = "D_Mean_per_Day")]
    mean_daily_demand: f64,
    #[serde(rename = "D_Std_per_Day")]
    std_daily_demand: f64,
    #[serde(rename = "Current Stock")]
    current_stock: f64,
    #[serde(rename = "Safety Stock")]
    safety_stock: f64,
    #[serde(rename = "Reorder Point")]
    reorder_point: f64,
    #[serde(rename = "Criticality")]
    criticality: &'static str,
}

impl<'a> From<&'a ItemUsageSummary> for ItemRow<'a> {
    fn from(item: &'a ItemUsageSummary) -> Self {
        ItemRow {
            item_identity: &item.item_identity,
            display_name: &item.display_name,
            description: &item.description,
            total_usage: item.total_usage,
            usage_count: item.usage_count,
            avg_usage_per_request: item.avg_usage_per_request,
            mean_daily_demand: item.mean_daily_demand,
            std_daily_demand: item.std_daily_demand,
            current_stock: item.current_stock,
            safety_stock: item.safety_stock,
            reorder_point: item.reorder_point,
            criticality: item.criticality.as_str(),
        }
    }
}

// csv cannot write headers for nested structs, so the process row repeats the item columns.
#[derive(Debug, Serialize)]
struct ProcessRow<'a> {
    #[serde(rename = "Process")]
    process: &'a str,
    #[serde(rename = "Item Number")]
    item_identity: &'a str,
    #[serde(rename = "Part Name")]
    display_name: &'a str,
    #[serde(rename = "Description 2")]
    description: &'a str,
    #[serde(rename = "Total Usage")]
    total_usage: f64,
    #[serde(rename = "Usage Count")]
    usage_count: usize,
    #[serde(rename = "Avg Usage per Request")]
    avg_usage_per_request: f64,
    #[serde(rename = "D_Mean_per_Day")]
    mean_daily_demand: f64,
    #[serde(rename = "D_Std_per_Day")]
    std_daily_demand: f64,
    #[serde(rename = "Current Stock")]
    current_stock: f64,
    #[serde(rename = "Safety Stock")]
    safety_stock: f64,
    #[serde(rename = "Reorder Point")]
    reorder_point: f64,
    #[serde(rename = "Criticality")]
    criticality: &'static str,
}

impl<'a> From<&'a ProcessItemSummary> for ProcessRow<'a> {
    fn from(row: &'a ProcessItemSummary) -> Self {
        let item = ItemRow::from(&row.summary);
        ProcessRow {
            process: &row.process,
            item_identity: item.item_identity,
            display_name: item.display_name,
            description: item.description,
            total_usage: item.total_usage,
            usage_count: item.usage_count,
            avg_usage_per_request: item.avg_usage_per_request,
            mean_daily_demand: item.mean_daily_demand,
            std_daily_demand: item.std_daily_demand,
            current_stock: item.current_stock,
            safety_stock: item.safety_stock,
            reorder_point: item.reorder_point,
            criticality: item.criticality,
        }
    }
}

pub fn default_export_file_name(at: NaiveDateTime) -> String {
    format!("Safety_Stock_Analysis_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

/// Returns the number of data rows written.
pub fn export_results_csv(path: &Path, items: &[ItemUsageSummary]) -> EngineResult<usize> {
    let mut wtr = csv::Writer::from_path(path)?;
    for item in items {
        wtr.serialize(ItemRow::from(item))?;
    }
    wtr.flush()?;
    tracing::info!(path = %path.display(), rows = items.len(), "Exported safety stock results");
    Ok(items.len())
}

pub fn export_process_results_csv(path: &Path, rows: &[ProcessItemSummary]) -> EngineResult<usize> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(ProcessRow::from(row))?;
    }
    wtr.flush()?;
    tracing::info!(path = %path.display(), rows = rows.len(), "Exported process results");
    Ok(rows.len())
}
