// Handler for writing the latest results to CSV
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::data::export::{default_export_file_name, export_process_results_csv, export_results_csv};
use crate::data::workspace_store::AnalysisWorkspace;
use crate::error::{EngineError, EngineResult};
use crate::services::job::{run_job, CancelHandle};
use crate::services::{ExportRequest, ExportResponse};

pub async fn handle_export_results(
    req_payload: ExportRequest,
    workspace: Arc<RwLock<AnalysisWorkspace>>,
) -> EngineResult<ExportResponse> {
    let (items, process_rows) = {
        let store = workspace.read().await;
        let items = store
            .item_results()
            .ok_or_else(|| EngineError::NoDataLoaded("No analysis results to export".to_string()))?;
        (items, store.process_results())
    };

    let path = req_payload
        .file_path
        .unwrap_or_else(|| PathBuf::from(default_export_file_name(Local::now().naive_local())));
    let process_target = match (req_payload.process_file_path, process_rows) {
        (Some(p), Some(rows)) => Some((p, rows)),
        (Some(p), None) => {
            tracing::warn!(path = %p.display(), "No process results to export; skipping");
            None
        }
        (None, _) => None,
    };

    run_job("export_results", &CancelHandle::new(), move || {
        let rows_written = export_results_csv(&path, &items.rows)?;
        let (process_path, process_rows_written) = match process_target {
            Some((p, rows)) => {
                let written = export_process_results_csv(&p, &rows.rows)?;
                (Some(p), written)
            }
            None => (None, 0),
        };
        Ok(ExportResponse { path, rows_written, process_path, process_rows_written })
    })
    .await
}
