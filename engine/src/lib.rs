// Engine library root

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod services;

pub use analysis::{FieldRole, SafetyStockEstimator};
pub use config::AnalysisSettings;
pub use error::{EngineError, EngineResult};
pub use services::{AnalysisService, CancelHandle};
