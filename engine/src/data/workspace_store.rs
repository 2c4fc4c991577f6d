// Holds the latest loaded inputs and analysis snapshots.
// Every setter replaces the previous value wholesale; nothing is merged.
use shared::models::{AnalysisSnapshot, ItemUsageSummary, ProcessItemSummary, ProcessPart, UsageDataset};
use std::sync::Arc;

pub type ItemSnapshot = AnalysisSnapshot<ItemUsageSummary>;
pub type ProcessSnapshot = AnalysisSnapshot<ProcessItemSummary>;

#[derive(Debug, Default)]
pub struct AnalysisWorkspace {
    usage: Option<Arc<UsageDataset>>,
    process_parts: Option<Arc<Vec<ProcessPart>>>,
    item_results: Option<Arc<ItemSnapshot>>,
    process_results: Option<Arc<ProcessSnapshot>>,
}

impl AnalysisWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// New usage data invalidates every result computed from the old data.
    pub fn set_usage(&mut self, dataset: UsageDataset) -> Arc<UsageDataset> {
        let dataset = Arc::new(dataset);
        self.usage = Some(dataset.clone());
        self.item_results = None;
        self.process_results = None;
        dataset
    }

    pub fn set_process_parts(&mut self, parts: Vec<ProcessPart>) -> Arc<Vec<ProcessPart>> {
        let parts = Arc::new(parts);
        self.process_parts = Some(parts.clone());
        self.process_results = None;
        parts
    }

    pub fn set_item_results(&mut self, snapshot: ItemSnapshot) -> Arc<ItemSnapshot> {
        let snapshot = Arc::new(snapshot);
        self.item_results = Some(snapshot.clone());
        snapshot
    }

    pub fn set_process_results(&mut self, snapshot: ProcessSnapshot) -> Arc<ProcessSnapshot> {
        let snapshot = Arc::new(snapshot);
        self.process_results = Some(snapshot.clone());
        snapshot
    }

    pub fn usage(&self) -> Option<Arc<UsageDataset>> {
        self.usage.clone()
    }

    pub fn process_parts(&self) -> Option<Arc<Vec<ProcessPart>>> {
        self.process_parts.clone()
    }

    pub fn item_results(&self) -> Option<Arc<ItemSnapshot>> {
        self.item_results.clone()
    }

    pub fn process_results(&self) -> Option<Arc<ProcessSnapshot>> {
        self.process_results.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.usage.is_none() && self.process_parts.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
