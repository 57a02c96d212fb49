//! # ippool Telemetry
//!
//! Crate for logging and metrics around the IP pool allocators.

pub mod logging;
pub mod metrics;

pub use logging::TracingLogger;
pub use metrics::PoolMetrics;
