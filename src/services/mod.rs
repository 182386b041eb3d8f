pub mod merge;
pub mod preferences;
pub mod telemetry;
