//! ## ippool-telemetry::logging
//! **Structured logging with `tracing`**
//!
//! [`init`] installs the process-wide subscriber. [`TracingLogger`] is the
//! pool logger used outside of tests: every pool event becomes one `tracing`
//! record carrying the network name, the address and the pool it touched.

use ippool_config::TelemetryConfig;
use ippool_core::address::{format_ip, IpFamily};
use ippool_core::{PoolEvent, PoolLogger};
use tracing::{debug, error};
use tracing_subscriber::{fmt, EnvFilter};

const LOG_TAG: &str = "[ip-reservation][in-memory-ip-provider]";

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins over the configured level. Calling this twice is
/// harmless; the second install is ignored.
pub fn init(config: &TelemetryConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(config.log_targets)
        .try_init();
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl PoolLogger for TracingLogger {
    fn log(&self, network: &str, family: IpFamily, event: &PoolEvent) {
        match *event {
            PoolEvent::Allocated { ip } => {
                let ip = format_ip(ip, family);
                debug!(network, ip = %ip, "{LOG_TAG} Allocating dynamic ip '{ip}'");
            }
            PoolEvent::Exhausted => {
                debug!(network, "{LOG_TAG} No dynamic ip available");
            }
            PoolEvent::Reserved { ip, kind } => {
                let ip = format_ip(ip, family);
                debug!(network, ip = %ip, pool = %kind, "{LOG_TAG} Reserved {kind} ip '{ip}'");
            }
            PoolEvent::ReserveFailed { ip } => {
                let ip = format_ip(ip, family);
                error!(network, ip = %ip, "{LOG_TAG} Failed to reserve ip '{ip}'");
            }
            PoolEvent::Released { ip, kind } => {
                let ip = format_ip(ip, family);
                debug!(network, ip = %ip, pool = %kind, "{LOG_TAG} Releasing {kind} ip '{ip}'");
            }
            PoolEvent::ReleaseRejected { ip } => {
                let ip = format_ip(ip, family);
                debug!(
                    network,
                    ip = %ip,
                    "{LOG_TAG} Failed to release ip '{ip}': does not belong to static or dynamic pool"
                );
            }
        }
    }
}
