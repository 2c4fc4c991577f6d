// Request and response types for the analysis service, plus the service itself.
use serde::Serialize;
use shared::models::{DatasetSummary, TierCounts};
use std::path::PathBuf;
use std::sync::Arc;

use crate::data::workspace_store::{ItemSnapshot, ProcessSnapshot};

pub mod analysis_service;
pub mod job;

pub use analysis_service::AnalysisService;
pub use job::CancelHandle;

#[derive(Debug, Clone)]
pub struct LoadUsageRequest {
    pub file_paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadUsageResponse {
    pub records_loaded: usize,
    pub message: String,
    pub summary: DatasetSummary,
}

#[derive(Debug, Clone)]
pub struct LoadProcessPartsRequest {
    pub file_path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadProcessPartsResponse {
    pub parts_loaded: usize,
    pub processes: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct RunAnalysisRequest {
    pub cancel: CancelHandle,
}

#[derive(Debug, Clone)]
pub struct RunAnalysisResponse {
    pub snapshot: Arc<ItemSnapshot>,
    pub tiers: TierCounts,
}

#[derive(Debug, Clone, Default)]
pub struct RunProcessAnalysisRequest {
    /// Narrow the returned rows to one process. The stored snapshot always holds every process.
    pub process: Option<String>,
    pub cancel: CancelHandle,
}

#[derive(Debug, Clone)]
pub struct RunProcessAnalysisResponse {
    pub snapshot: Arc<ProcessSnapshot>,
    pub rows: Vec<shared::models::ProcessItemSummary>,
    pub processes: Vec<String>,
    pub tiers: TierCounts,
}

#[derive(Debug, Clone, Default)]
pub struct ExportRequest {
    /// Item results path. Defaults to a timestamped name in the working directory.
    pub file_path: Option<PathBuf>,
    /// Written only when process results exist.
    pub process_file_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportResponse {
    pub path: PathBuf,
    pub rows_written: usize,
    pub process_path: Option<PathBuf>,
    pub process_rows_written: usize,
}
