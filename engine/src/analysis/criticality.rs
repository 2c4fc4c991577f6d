// Criticality tiers from mean daily demand. Strict greater-than comparisons,
// highest threshold first, so a value exactly on a boundary lands in the lower tier.
use shared::models::Criticality;

pub const CRITICAL_ABOVE: f64 = 10.0;
pub const HIGH_ABOVE: f64 = 5.0;
pub const MEDIUM_ABOVE: f64 = 2.0;

pub fn classify(mean_daily_demand: f64) -> Criticality {
    if mean_daily_demand > CRITICAL_ABOVE {
        Criticality::Critical
    } else if mean_daily_demand > HIGH_ABOVE {
        Criticality::High
    } else if mean_daily_demand > MEDIUM_ABOVE {
        Criticality::Medium
    } else {
        Criticality::Low
    }
}
