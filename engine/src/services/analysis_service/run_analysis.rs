// Handler for the per-item safety stock run
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::analysis::SafetyStockEstimator;
use crate::config::AnalysisSettings;
use crate::data::workspace_store::AnalysisWorkspace;
use crate::error::{EngineError, EngineResult};
use crate::services::job::run_job;
use crate::services::{RunAnalysisRequest, RunAnalysisResponse};
use shared::models::{AnalysisSnapshot, TierCounts};

pub async fn handle_run_analysis(
    req_payload: RunAnalysisRequest,
    workspace: Arc<RwLock<AnalysisWorkspace>>,
    settings: AnalysisSettings,
) -> EngineResult<RunAnalysisResponse> {
    let dataset = workspace
        .read()
        .await
        .usage()
        .ok_or_else(|| EngineError::NoDataLoaded("Load usage data before running the analysis".to_string()))?;

    let input = dataset.clone();
    let rows = run_job("run_analysis", &req_payload.cancel, move || {
        SafetyStockEstimator::new(settings)?.analyze(&input)
    })
    .await?;

    let tiers = TierCounts::from_tiers(rows.iter().map(|r| &r.criticality));
    let snapshot = AnalysisSnapshot::new(rows);

    let mut store = workspace.write().await;
    let snapshot = match store.usage() {
        Some(current) if Arc::ptr_eq(&current, &dataset) => store.set_item_results(snapshot),
        _ => {
            tracing::warn!(run_id = %snapshot.run_id, "Usage data changed during the run; result not stored");
            Arc::new(snapshot)
        }
    };

    Ok(RunAnalysisResponse { snapshot, tiers })
}
