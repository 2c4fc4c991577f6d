// Groups normalized records by item identity and derives per-item demand statistics.
use super::normalize::NormalizedRecord;
use shared::utils::sample_std_dev;
use std::collections::HashMap;

/// All records of one item, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageGroup {
    pub identity: String,
    pub quantities: Vec<f64>,
    /// Stock of the first record seen for the item, 0 when unknown.
    pub current_stock: f64,
    pub display_name: Option<String>,
    pub description: Option<String>,
}

impl UsageGroup {
    fn start(record: &NormalizedRecord) -> Self {
        Self {
            identity: record.identity.clone(),
            quantities: Vec::new(),
            current_stock: record.stock.map(|s| s.value()).unwrap_or(0.0),
            display_name: record.display_name.clone(),
            description: record.description.clone(),
        }
    }

    pub fn usage_count(&self) -> usize {
        self.quantities.len()
    }

    pub fn total_usage(&self) -> f64 {
        self.quantities.iter().sum()
    }
}

/// Groups in first-seen order.
pub fn group_by_identity(records: &[NormalizedRecord]) -> Vec<UsageGroup> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<UsageGroup> = Vec::new();

    for record in records {
        let slot = *index.entry(record.identity.as_str()).or_insert_with(|| {
            groups.push(UsageGroup::start(record));
            groups.len() - 1
        });
        groups[slot].quantities.push(record.quantity.value());
    }
    groups
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandStatistics {
    pub total_usage: f64,
    pub usage_count: usize,
    pub avg_usage_per_request: f64,
    pub mean_daily_demand: f64,
    pub std_daily_demand: f64,
}

impl DemandStatistics {
    /// `window_days` is the fixed observation window total usage is spread over.
    pub fn from_quantities(quantities: &[f64], window_days: u32) -> Self {
        let total_usage: f64 = quantities.iter().sum();
        let usage_count = quantities.len();
        DemandStatistics {
            total_usage,
            usage_count,
            avg_usage_per_request: if usage_count > 0 { total_usage / usage_count as f64 } else { 0.0 },
            mean_daily_demand: total_usage / window_days as f64,
            std_daily_demand: if usage_count > 1 { sample_std_dev(quantities) } else { 0.0 },
        }
    }
}
