pub mod analyze_session;
pub mod analyzer;
pub mod config;
pub mod error;
pub mod filter;
pub mod fleet;
pub mod laps;
pub mod metrics;
pub mod models;
pub mod storage;
pub mod telemetry;
pub mod types;
pub mod zones;

pub use analyze_session::analyze_session;
pub use analyzer::Analyzer;
pub use config::{AnalyticsConfig, HrBounds, ZoneBound, ZoneTable};
pub use error::{ConfigError, EngineError};
pub use filter::{filter_valid_samples, ValidSample};
pub use fleet::aggregate_fleet;
pub use laps::{
    bound_to_session, lap_segments, normalize_laps, LapEncoding, LapSegment, LapSeparator,
    LapSequence,
};
pub use metrics::{ratio, HrSource, HrStats};
pub use models::{ExportMeta, HeartRateSample, LapRecord, TrainingExport, TrainingSession};
pub use storage::{load_config, save_config};
pub use telemetry::EngineMetrics;
pub use types::{
    ExportReport, FleetReport, FleetTotals, GlobalHr, HrTrendPoint, MonthlySeries,
    RecentSession, SessionDetail, SessionReport,
};
pub use zones::{classify, zone_distribution, ZoneBucket, ZoneDistribution};
