// Safety stock and reorder point under a normal approximation of demand.
//
//   safety_stock  = Z * sqrt(lead_time_days) * std_daily_demand
//   reorder_point = mean_daily_demand * lead_time_days + safety_stock
use crate::config::AnalysisSettings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafetyStockPolicy {
    pub service_level_z: f64,
    pub lead_time_days: u32,
}

impl SafetyStockPolicy {
    pub fn new(service_level_z: f64, lead_time_days: u32) -> Self {
        Self { service_level_z, lead_time_days }
    }

    pub fn safety_stock(&self, std_daily_demand: f64) -> f64 {
        self.service_level_z * (self.lead_time_days as f64).sqrt() * std_daily_demand
    }

    pub fn reorder_point(&self, mean_daily_demand: f64, safety_stock: f64) -> f64 {
        mean_daily_demand * self.lead_time_days as f64 + safety_stock
    }
}

impl Default for SafetyStockPolicy {
    fn default() -> Self {
        Self::from(&AnalysisSettings::default())
    }
}

impl From<&AnalysisSettings> for SafetyStockPolicy {
    fn from(settings: &AnalysisSettings) -> Self {
        Self::new(settings.service_level_z, settings.lead_time_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = SafetyStockPolicy::default();
        assert_eq!(policy.service_level_z, 1.65);
        assert_eq!(policy.lead_time_days, 30);
    }

    #[test]
    fn test_safety_stock_formula() {
        let policy = SafetyStockPolicy::default();
        let std = 18f64.sqrt();
        let ss = policy.safety_stock(std);
        assert!((ss - 1.65 * 30f64.sqrt() * std).abs() < 1e-12);
        assert!((ss - 38.35).abs() < 0.01);
        assert_eq!(policy.safety_stock(0.0), 0.0);
    }

    #[test]
    fn test_reorder_point_formula() {
        let policy = SafetyStockPolicy::default();
        let mean = 14.0 / 30.0;
        let ss = policy.safety_stock(18f64.sqrt());
        let rop = policy.reorder_point(mean, ss);
        assert!((rop - (14.0 + ss)).abs() < 1e-9);
        assert!((rop - 52.35).abs() < 0.01);
    }

    #[test]
    fn test_custom_lead_time() {
        let policy = SafetyStockPolicy::new(2.0, 4);
        assert_eq!(policy.safety_stock(3.0), 12.0);
        assert_eq!(policy.reorder_point(1.5, 12.0), 18.0);
    }
}
