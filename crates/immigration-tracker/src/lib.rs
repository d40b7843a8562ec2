pub mod config;
pub mod deadlines;
pub mod error;
pub mod profiles;
pub mod storage;
pub mod telemetry;
