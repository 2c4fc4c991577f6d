// Handler for loading the process parts table
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::analysis::process::process_parts_from_dataset;
use crate::data::csv_parser::UsageCsvParser;
use crate::data::workspace_store::AnalysisWorkspace;
use crate::error::EngineResult;
use crate::services::job::{run_job, CancelHandle};
use crate::services::{LoadProcessPartsRequest, LoadProcessPartsResponse};

pub async fn handle_load_process_parts(
    req_payload: LoadProcessPartsRequest,
    workspace: Arc<RwLock<AnalysisWorkspace>>,
) -> EngineResult<LoadProcessPartsResponse> {
    let path = req_payload.file_path.clone();
    // The remark filter applies to usage data only.
    let parts = run_job("load_process_parts", &CancelHandle::new(), move || {
        let table = UsageCsvParser::load_records_from_csv(&path)?;
        Ok(process_parts_from_dataset(&table))
    })
    .await?;

    let processes: Vec<String> = parts
        .iter()
        .map(|p| p.process.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let parts_loaded = parts.len();
    workspace.write().await.set_process_parts(parts);

    tracing::info!(path = %req_payload.file_path.display(), parts_loaded, processes = processes.len(), "Loaded process parts");
    Ok(LoadProcessPartsResponse {
        parts_loaded,
        message: format!("Loaded {} parts across {} process(es)", parts_loaded, processes.len()),
        processes,
    })
}
