// Handler for loading usage files into the workspace
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::analysis::summary::summarize_dataset;
use crate::config::AnalysisSettings;
use crate::data::csv_parser::UsageCsvParser;
use crate::data::workspace_store::AnalysisWorkspace;
use crate::error::EngineResult;
use crate::services::job::{run_job, CancelHandle};
use crate::services::{LoadUsageRequest, LoadUsageResponse};

pub async fn handle_load_usage_data(
    req_payload: LoadUsageRequest,
    workspace: Arc<RwLock<AnalysisWorkspace>>,
    settings: AnalysisSettings,
) -> EngineResult<LoadUsageResponse> {
    let file_count = req_payload.file_paths.len();
    let (dataset, summary) = run_job("load_usage_data", &CancelHandle::new(), move || {
        let dataset = UsageCsvParser::load_datasets(&req_payload.file_paths, &settings)?;
        let summary = summarize_dataset(&dataset);
        Ok((dataset, summary))
    })
    .await?;

    let records_loaded = dataset.len();
    workspace.write().await.set_usage(dataset);

    Ok(LoadUsageResponse {
        records_loaded,
        message: format!("Loaded {} usage records from {} file(s)", records_loaded, file_count),
        summary,
    })
}
