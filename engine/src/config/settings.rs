// Analysis settings, loaded from a JSON file or left at their defaults.
use crate::error::EngineError;
use serde::Deserialize;
use std::path::Path;

/// Service-level factor for ~95% one-sided confidence.
pub const DEFAULT_SERVICE_LEVEL_Z: f64 = 1.65;
pub const DEFAULT_LEAD_TIME_DAYS: u32 = 30;
/// Usage is assumed to cover this many days; not derived from timestamps.
pub const DEFAULT_OBSERVATION_WINDOW_DAYS: u32 = 30;
pub const DEFAULT_MAX_TEXT_LEN: usize = 100;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Descending total usage, ties kept in first-seen order.
    #[default]
    TotalUsageDesc,
    /// First-seen order of each item in the input.
    Insertion,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AnalysisSettings {
    pub service_level_z: f64,
    pub lead_time_days: u32,
    pub observation_window_days: u32,
    pub sort_order: SortOrder,
    pub emergency_requests_only: bool,
    pub max_text_len: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            service_level_z: DEFAULT_SERVICE_LEVEL_Z,
            lead_time_days: DEFAULT_LEAD_TIME_DAYS,
            observation_window_days: DEFAULT_OBSERVATION_WINDOW_DAYS,
            sort_order: SortOrder::TotalUsageDesc,
            emergency_requests_only: true,
            max_text_len: DEFAULT_MAX_TEXT_LEN,
        }
    }
}

impl AnalysisSettings {
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let settings: AnalysisSettings = serde_json::from_str(json)
            .map_err(|e| EngineError::ConfigError(format!("Invalid settings JSON: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| EngineError::ConfigError(format!("Failed to read '{}': {}", path.display(), e)))?;
        let settings = Self::from_json_str(&contents)?;
        tracing::debug!(path = %path.display(), ?settings, "Loaded analysis settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.service_level_z.is_finite() || self.service_level_z <= 0.0 {
            return Err(EngineError::ConfigError(format!(
                "service_level_z must be a finite positive number, got {}",
                self.service_level_z
            )));
        }
        if self.lead_time_days == 0 {
            return Err(EngineError::ConfigError("lead_time_days must be greater than 0".to_string()));
        }
        if self.observation_window_days == 0 {
            return Err(EngineError::ConfigError("observation_window_days must be greater than 0".to_string()));
        }
        Ok(())
    }
}
