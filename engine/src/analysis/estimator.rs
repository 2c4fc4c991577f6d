// The safety-stock estimator: one stateless pass from a usage dataset to per-item summaries.
use super::aggregate::{group_by_identity, DemandStatistics, UsageGroup};
use super::criticality::classify;
use super::field_discovery::{FieldMapping, ResolvedFields};
use super::normalize::{normalize_records, NormalizedBatch};
use super::process::sort_process_rows;
use super::safety_stock::SafetyStockPolicy;
use crate::config::{AnalysisSettings, SortOrder};
use crate::error::EngineResult;
use shared::models::{ItemUsageSummary, ProcessItemSummary, ProcessPart, UsageDataset};
use shared::UNKNOWN_TEXT;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct SafetyStockEstimator {
    settings: AnalysisSettings,
}

impl SafetyStockEstimator {
    /// Rejects settings that would make the demand statistics meaningless.
    pub fn new(settings: AnalysisSettings) -> EngineResult<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    fn policy(&self) -> SafetyStockPolicy {
        SafetyStockPolicy::from(&self.settings)
    }

    /// Columns to resolve roles against. Falls back to the first record's
    /// field names when the dataset declares none.
    fn schema(dataset: &UsageDataset) -> Vec<String> {
        if !dataset.columns.is_empty() {
            return dataset.columns.clone();
        }
        dataset
            .records
            .first()
            .map(|r| r.field_names().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Resolves roles and normalizes every record. `Ok(None)` for an input
    /// with neither columns nor records.
    fn prepare(&self, dataset: &UsageDataset) -> EngineResult<Option<NormalizedBatch>> {
        let columns = Self::schema(dataset);
        if columns.is_empty() && dataset.is_empty() {
            return Ok(None);
        }
        let fields: ResolvedFields = FieldMapping::resolve(&columns).require()?;
        Ok(Some(normalize_records(&dataset.records, &fields, self.settings.max_text_len)))
    }

    fn summarize(&self, group: &UsageGroup, display_name: Option<&str>) -> ItemUsageSummary {
        let stats = DemandStatistics::from_quantities(&group.quantities, self.settings.observation_window_days);
        let policy = self.policy();
        let safety_stock = policy.safety_stock(stats.std_daily_demand);

        ItemUsageSummary {
            item_identity: group.identity.clone(),
            display_name: display_name
                .or(group.display_name.as_deref())
                .unwrap_or(UNKNOWN_TEXT)
                .to_string(),
            description: group.description.clone().unwrap_or_else(|| UNKNOWN_TEXT.to_string()),
            total_usage: stats.total_usage,
            usage_count: stats.usage_count,
            avg_usage_per_request: stats.avg_usage_per_request,
            mean_daily_demand: stats.mean_daily_demand,
            std_daily_demand: stats.std_daily_demand,
            current_stock: group.current_stock,
            safety_stock,
            reorder_point: policy.reorder_point(stats.mean_daily_demand, safety_stock),
            criticality: classify(stats.mean_daily_demand),
        }
    }

    /// Per-item usage summaries, ordered by the configured sort order.
    pub fn analyze(&self, dataset: &UsageDataset) -> EngineResult<Vec<ItemUsageSummary>> {
        let batch = match self.prepare(dataset)? {
            Some(batch) => batch,
            None => return Ok(Vec::new()),
        };

        let mut items: Vec<ItemUsageSummary> = group_by_identity(&batch.records)
            .iter()
            .map(|group| self.summarize(group, None))
            .collect();

        if self.settings.sort_order == SortOrder::TotalUsageDesc {
            items.sort_by(|a, b| b.total_usage.total_cmp(&a.total_usage));
        }

        tracing::info!(records = dataset.len(), items = items.len(), "Safety stock analysis complete");
        Ok(items)
    }

    /// Joins process parts against usage data. Parts with no usage get a
    /// zeroed `NO DATA` row; rows are grouped by process, heaviest usage first.
    pub fn analyze_processes(&self, dataset: &UsageDataset, parts: &[ProcessPart]) -> EngineResult<Vec<ProcessItemSummary>> {
        let groups = match self.prepare(dataset)? {
            Some(batch) => group_by_identity(&batch.records),
            None => Vec::new(),
        };
        let by_identity: HashMap<&str, &UsageGroup> = groups.iter().map(|g| (g.identity.as_str(), g)).collect();

        let mut rows: Vec<ProcessItemSummary> = parts
            .iter()
            .map(|part| {
                let key = part.item_identity.trim();
                let summary = match by_identity.get(key) {
                    Some(group) => self.summarize(group, Some(part.display_name.as_str())),
                    None => ItemUsageSummary::no_data(key, &part.display_name),
                };
                ProcessItemSummary { process: part.process.clone(), summary }
            })
            .collect();

        sort_process_rows(&mut rows);

        let without_data = rows.iter().filter(|r| r.summary.usage_count == 0).count();
        tracing::info!(parts = parts.len(), without_data, "Process analysis complete");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::field_discovery::FieldRole;
    use crate::error::EngineError;
    use shared::models::{Criticality, FieldValue, UsageRecord};

    fn approx(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() < tol, "{} != {} (tol {})", a, b, tol);
    }

    fn usage(item: &str, qty: &str) -> UsageRecord {
        UsageRecord::new().with("Item Number", item).with("Requested Qty", qty)
    }

    fn example_dataset() -> UsageDataset {
        UsageDataset::from_records(vec![usage("A1", "10"), usage("A1", "-4"), usage("B2", "1")])
    }

    #[test]
    fn test_worked_example() {
        let items = SafetyStockEstimator::default().analyze(&example_dataset()).unwrap();
        assert_eq!(items.len(), 2);

        let a1 = &items[0];
        assert_eq!(a1.item_identity, "A1");
        assert_eq!(a1.total_usage, 14.0);
        assert_eq!(a1.usage_count, 2);
        approx(a1.mean_daily_demand, 0.467, 1e-3);
        approx(a1.std_daily_demand, 4.243, 1e-3);
        approx(a1.safety_stock, 38.35, 0.01);
        approx(a1.reorder_point, 52.35, 0.01);
        assert_eq!(a1.criticality, Criticality::Low);
        assert_eq!(a1.display_name, "Unknown");
        assert_eq!(a1.current_stock, 0.0);

        let b2 = &items[1];
        assert_eq!(b2.item_identity, "B2");
        assert_eq!(b2.total_usage, 1.0);
        assert_eq!(b2.usage_count, 1);
        assert_eq!(b2.std_daily_demand, 0.0);
        assert_eq!(b2.safety_stock, 0.0);
        approx(b2.reorder_point, 1.0, 1e-9);
        assert_eq!(b2.criticality, Criticality::Low);
    }

    #[test]
    fn test_formulas_hold_for_every_row() {
        let dataset = UsageDataset::from_records(vec![
            usage("A", "3"), usage("A", "8"), usage("A", "1"),
            usage("B", "400"), usage("B", "100"),
            usage("C", "junk"), usage("D", "75"),
        ]);
        for row in SafetyStockEstimator::default().analyze(&dataset).unwrap() {
            approx(row.safety_stock, 1.65 * 30f64.sqrt() * row.std_daily_demand, 1e-9);
            approx(row.reorder_point, row.mean_daily_demand * 30.0 + row.safety_stock, 1e-9);
            assert_eq!(row.criticality, classify(row.mean_daily_demand));
            if row.usage_count <= 1 {
                assert_eq!(row.std_daily_demand, 0.0);
                assert_eq!(row.safety_stock, 0.0);
            }
        }
    }

    #[test]
    fn test_usage_count_matches_trimmed_identity() {
        let dataset = UsageDataset::from_records(vec![usage(" X ", "1"), usage("X", "2"), usage("X  ", "bad"), usage("Y", "1")]);
        let items = SafetyStockEstimator::default().analyze(&dataset).unwrap();
        let x = items.iter().find(|i| i.item_identity == "X").unwrap();
        assert_eq!(x.usage_count, 3);
        assert_eq!(x.total_usage, 3.0);
        let identities: Vec<&str> = items.iter().map(|i| i.item_identity.as_str()).collect();
        assert_eq!(identities.len(), 2);
    }

    #[test]
    fn test_high_demand_tiers() {
        let dataset = UsageDataset::from_records(vec![usage("HOT", "301"), usage("WARM", "150"), usage("MID", "61")]);
        let items = SafetyStockEstimator::default().analyze(&dataset).unwrap();
        assert_eq!(items[0].criticality, Criticality::Critical);
        // 150 / 30 = 5 exactly, boundary goes to the lower tier
        assert_eq!(items[1].criticality, Criticality::Medium);
        assert_eq!(items[2].criticality, Criticality::Medium);
    }

    #[test]
    fn test_missing_identity_fails() {
        let dataset = UsageDataset::from_records(vec![UsageRecord::new().with("Part", "A1").with("Requested Qty", "1")]);
        let err = SafetyStockEstimator::default().analyze(&dataset).unwrap_err();
        assert_eq!(err.missing_roles(), &[FieldRole::Identity]);
    }

    #[test]
    fn test_missing_quantity_fails_even_without_rows() {
        let dataset = UsageDataset::new(vec!["Item Number".to_string()]);
        let err = SafetyStockEstimator::default().analyze(&dataset).unwrap_err();
        assert!(matches!(err, EngineError::MissingRequiredField(ref roles) if roles == &vec![FieldRole::Quantity]));
    }

    #[test]
    fn test_new_rejects_zero_observation_window() {
        let settings = AnalysisSettings { observation_window_days: 0, ..Default::default() };
        let err = SafetyStockEstimator::new(settings).unwrap_err();
        assert!(matches!(err, EngineError::ConfigError(_)));
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let estimator = SafetyStockEstimator::default();
        assert!(estimator.analyze(&UsageDataset::default()).unwrap().is_empty());
        let declared = UsageDataset::new(vec!["Item Number".to_string(), "Requested Qty".to_string()]);
        assert!(estimator.analyze(&declared).unwrap().is_empty());
    }

    #[test]
    fn test_stock_and_names_from_first_record() {
        let dataset = UsageDataset::from_records(vec![
            UsageRecord::new()
                .with("Item Number", "A1")
                .with("Part Name", "Seal")
                .with("Description 2", "Viton")
                .with("Requested Qty", FieldValue::Number(2.0))
                .with("Qty On Hand", "15"),
            UsageRecord::new()
                .with("Item Number", "A1")
                .with("Part Name", "Seal (new)")
                .with("Description 2", "Other")
                .with("Requested Qty", FieldValue::Number(3.0))
                .with("Qty On Hand", "4"),
        ]);
        let items = SafetyStockEstimator::default().analyze(&dataset).unwrap();
        assert_eq!(items[0].current_stock, 15.0);
        assert_eq!(items[0].display_name, "Seal");
        assert_eq!(items[0].description, "Viton");
        assert_eq!(items[0].avg_usage_per_request, 2.5);
    }

    #[test]
    fn test_insertion_order() {
        let settings = AnalysisSettings { sort_order: SortOrder::Insertion, ..Default::default() };
        let items = SafetyStockEstimator::new(settings).unwrap().analyze(&UsageDataset::from_records(vec![usage("small", "1"), usage("big", "100")])).unwrap();
        assert_eq!(items[0].item_identity, "small");

        let items = SafetyStockEstimator::default().analyze(&UsageDataset::from_records(vec![usage("small", "1"), usage("big", "100")])).unwrap();
        assert_eq!(items[0].item_identity, "big");
    }

    #[test]
    fn test_custom_policy_settings() {
        let settings = AnalysisSettings { service_level_z: 2.0, lead_time_days: 4, observation_window_days: 10, ..Default::default() };
        let items = SafetyStockEstimator::new(settings).unwrap().analyze(&UsageDataset::from_records(vec![usage("A", "10"), usage("A", "4")])).unwrap();
        approx(items[0].mean_daily_demand, 1.4, 1e-12);
        approx(items[0].safety_stock, 2.0 * 2.0 * 18f64.sqrt(), 1e-9);
        approx(items[0].reorder_point, 1.4 * 4.0 + items[0].safety_stock, 1e-9);
    }

    #[test]
    fn test_reruns_are_independent() {
        let estimator = SafetyStockEstimator::default();
        let first = estimator.analyze(&example_dataset()).unwrap();
        let _other = estimator.analyze(&UsageDataset::from_records(vec![usage("Z", "999")])).unwrap();
        let again = estimator.analyze(&example_dataset()).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_process_variant() {
        let parts = vec![
            ProcessPart::new("Milling", "B2", "Bushing"),
            ProcessPart::new("Assembly", "ZZ9", "Ghost part"),
            ProcessPart::new("Milling", " A1 ", "Arbor"),
        ];
        let rows = SafetyStockEstimator::default().analyze_processes(&example_dataset(), &parts).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].process, "Assembly");
        let ghost = &rows[0].summary;
        assert_eq!(ghost.item_identity, "ZZ9");
        assert_eq!(ghost.criticality, Criticality::NoData);
        assert_eq!(ghost.total_usage, 0.0);
        assert_eq!(ghost.usage_count, 0);
        assert_eq!(ghost.safety_stock, 0.0);
        assert_eq!(ghost.reorder_point, 0.0);

        assert_eq!(rows[1].process, "Milling");
        assert_eq!(rows[1].summary.item_identity, "A1");
        assert_eq!(rows[1].summary.display_name, "Arbor");
        assert_eq!(rows[1].summary.usage_count, 2);
        approx(rows[1].summary.safety_stock, 38.35, 0.01);
        assert_eq!(rows[2].summary.item_identity, "B2");
    }

    #[test]
    fn test_process_variant_without_usage_rows() {
        let parts = vec![ProcessPart::new("P", "A1", "x")];
        let rows = SafetyStockEstimator::default().analyze_processes(&UsageDataset::default(), &parts).unwrap();
        assert_eq!(rows[0].summary.criticality, Criticality::NoData);
    }
}
