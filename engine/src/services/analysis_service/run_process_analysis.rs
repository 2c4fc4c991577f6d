// Handler for the process-scoped run
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::analysis::process::{filter_by_process, process_names};
use crate::analysis::SafetyStockEstimator;
use crate::config::AnalysisSettings;
use crate::data::workspace_store::AnalysisWorkspace;
use crate::error::{EngineError, EngineResult};
use crate::services::job::run_job;
use crate::services::{RunProcessAnalysisRequest, RunProcessAnalysisResponse};
use shared::models::{AnalysisSnapshot, TierCounts};

pub async fn handle_run_process_analysis(
    req_payload: RunProcessAnalysisRequest,
    workspace: Arc<RwLock<AnalysisWorkspace>>,
    settings: AnalysisSettings,
) -> EngineResult<RunProcessAnalysisResponse> {
    let (dataset, parts) = {
        let store = workspace.read().await;
        let dataset = store
            .usage()
            .ok_or_else(|| EngineError::NoDataLoaded("Load usage data before running the process analysis".to_string()))?;
        let parts = store
            .process_parts()
            .ok_or_else(|| EngineError::NoDataLoaded("Load process parts before running the process analysis".to_string()))?;
        (dataset, parts)
    };

    let (input, input_parts) = (dataset.clone(), parts.clone());
    let rows = run_job("run_process_analysis", &req_payload.cancel, move || {
        SafetyStockEstimator::new(settings)?.analyze_processes(&input, &input_parts)
    })
    .await?;

    let processes = process_names(&rows);
    let selected = match req_payload.process.as_deref() {
        Some(name) => filter_by_process(&rows, name),
        None => rows.clone(),
    };
    let tiers = TierCounts::from_tiers(selected.iter().map(|r| &r.summary.criticality));
    let snapshot = AnalysisSnapshot::new(rows);

    let mut store = workspace.write().await;
    let still_current = matches!(
        (store.usage(), store.process_parts()),
        (Some(d), Some(p)) if Arc::ptr_eq(&d, &dataset) && Arc::ptr_eq(&p, &parts)
    );
    let snapshot = if still_current {
        store.set_process_results(snapshot)
    } else {
        tracing::warn!(run_id = %snapshot.run_id, "Inputs changed during the process run; result not stored");
        Arc::new(snapshot)
    };

    Ok(RunProcessAnalysisResponse { snapshot, rows: selected, processes, tiers })
}
