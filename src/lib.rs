// Root module exports
pub mod analysis;
pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod report;

// Re-export common items for convenience
pub use analysis::events::{Event, EventCorrelation};
pub use analysis::prediction::{Prediction, PredictionSet, ProjectedEmpty};
pub use analysis::{run, AnalysisReport, Sample, Segment, Trend};
pub use config::AnalysisConfig;
pub use error::{AppError, Result};
pub use loader::{LoadedEvents, LoadedSamples, RejectReason, RejectedRecord};
pub use logging::init_logger;
