pub mod app_config;
pub mod config;
pub mod report;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use report::{
    city_from_location, AnalysisRequest, Issue, ListingResult, PageSummary, Priority, Report,
    Scores, ERROR_CATEGORY,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
