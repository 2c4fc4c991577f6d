// Demand aggregation and safety-stock estimation
pub mod aggregate;
pub mod criticality;
pub mod estimator;
pub mod field_discovery;
pub mod normalize;
pub mod process;
pub mod safety_stock;
pub mod summary;

pub use estimator::SafetyStockEstimator;
pub use field_discovery::{FieldMapping, FieldRole, ResolvedFields};
pub use normalize::ParsedNumber;
pub use safety_stock::SafetyStockPolicy;
