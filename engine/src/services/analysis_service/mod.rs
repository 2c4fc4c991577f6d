// engine/src/services/analysis_service/mod.rs
// AnalysisService owns the shared workspace and dispatches to one handler module per operation.
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{
    ExportRequest, ExportResponse, LoadProcessPartsRequest, LoadProcessPartsResponse, LoadUsageRequest,
    LoadUsageResponse, RunAnalysisRequest, RunAnalysisResponse, RunProcessAnalysisRequest,
    RunProcessAnalysisResponse,
};
use crate::analysis::summary::summarize_dataset;
use crate::config::AnalysisSettings;
use crate::data::workspace_store::AnalysisWorkspace;
use crate::error::EngineResult;
use shared::models::{DatasetSummary, ProcessPart, UsageDataset};

pub mod export_results;
pub mod load_process_parts;
pub mod load_usage_data;
pub mod run_analysis;
pub mod run_process_analysis;

pub struct AnalysisService {
    workspace: Arc<RwLock<AnalysisWorkspace>>,
    settings: AnalysisSettings,
}

impl AnalysisService {
    pub fn new(workspace: Arc<RwLock<AnalysisWorkspace>>, settings: AnalysisSettings) -> EngineResult<Self> {
        settings.validate()?;
        Ok(AnalysisService { workspace, settings })
    }

    pub fn workspace(&self) -> Arc<RwLock<AnalysisWorkspace>> {
        self.workspace.clone()
    }

    pub async fn load_usage_data(&self, request: LoadUsageRequest) -> EngineResult<LoadUsageResponse> {
        tracing::info!(files = ?request.file_paths, "Received LoadUsageRequest, dispatching to handler.");
        load_usage_data::handle_load_usage_data(request, self.workspace.clone(), self.settings.clone()).await
    }

    /// Installs an in-memory dataset as-is. Load-time filters are not applied.
    pub async fn set_usage_dataset(&self, dataset: UsageDataset) -> DatasetSummary {
        let summary = summarize_dataset(&dataset);
        self.workspace.write().await.set_usage(dataset);
        summary
    }

    pub async fn load_process_parts(&self, request: LoadProcessPartsRequest) -> EngineResult<LoadProcessPartsResponse> {
        tracing::info!(path = %request.file_path.display(), "Received LoadProcessPartsRequest, dispatching to handler.");
        load_process_parts::handle_load_process_parts(request, self.workspace.clone()).await
    }

    pub async fn set_process_parts(&self, parts: Vec<ProcessPart>) {
        self.workspace.write().await.set_process_parts(parts);
    }

    pub async fn run_analysis(&self, request: RunAnalysisRequest) -> EngineResult<RunAnalysisResponse> {
        tracing::info!("Received RunAnalysisRequest, dispatching to handler.");
        run_analysis::handle_run_analysis(request, self.workspace.clone(), self.settings.clone()).await
    }

    pub async fn run_process_analysis(
        &self,
        request: RunProcessAnalysisRequest,
    ) -> EngineResult<RunProcessAnalysisResponse> {
        tracing::info!(process = ?request.process, "Received RunProcessAnalysisRequest, dispatching to handler.");
        run_process_analysis::handle_run_process_analysis(request, self.workspace.clone(), self.settings.clone()).await
    }

    pub async fn export_results(&self, request: ExportRequest) -> EngineResult<ExportResponse> {
        tracing::info!(path = ?request.file_path, "Received ExportRequest, dispatching to handler.");
        export_results::handle_export_results(request, self.workspace.clone()).await
    }

    pub async fn clear(&self) {
        self.workspace.write().await.clear();
        tracing::info!("Cleared analysis workspace");
    }
}
