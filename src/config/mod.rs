//! Analysis settings management

mod analysis_config;

pub use analysis_config::default_config_path;
pub use analysis_config::AnalysisConfig;
