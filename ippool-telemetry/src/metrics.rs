//! ## ippool-telemetry::metrics
//! **Prometheus counters for pool operations**
//!
//! [`PoolMetrics`] is a pool logger that counts instead of printing. Combine
//! it with [`TracingLogger`](crate::TracingLogger) through
//! [`FanoutLogger`](ippool_core::FanoutLogger) to get both.

use ippool_core::address::IpFamily;
use ippool_core::{PoolEvent, PoolKind, PoolLogger};
use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

#[derive(Debug, Clone)]
pub struct PoolMetrics {
    pub registry: Registry,
    pub allocations: IntCounterVec,
    pub exhaustions: IntCounterVec,
    pub reservations: IntCounterVec,
    pub reserve_failures: IntCounterVec,
    pub releases: IntCounterVec,
    pub release_rejections: IntCounterVec,
}

impl PoolMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let allocations = counter(
            &registry,
            "ippool_allocations_total",
            "Dynamic addresses handed out",
            &["network"],
        )?;
        let exhaustions = counter(
            &registry,
            "ippool_exhaustions_total",
            "Dynamic allocations that found the pool empty",
            &["network"],
        )?;
        let reservations = counter(
            &registry,
            "ippool_reservations_total",
            "Specific addresses reserved",
            &["network", "pool"],
        )?;
        let reserve_failures = counter(
            &registry,
            "ippool_reserve_failures_total",
            "Reservations of addresses not available in either pool",
            &["network"],
        )?;
        let releases = counter(
            &registry,
            "ippool_releases_total",
            "Addresses returned to a pool",
            &["network", "pool"],
        )?;
        let release_rejections = counter(
            &registry,
            "ippool_release_rejections_total",
            "Releases of addresses owned by neither pool",
            &["network"],
        )?;

        Ok(Self {
            registry,
            allocations,
            exhaustions,
            reservations,
            reserve_failures,
            releases,
            release_rejections,
        })
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    fn by_network(vec: &IntCounterVec, network: &str) -> IntCounter {
        vec.with_label_values(&[network])
    }

    fn by_pool(vec: &IntCounterVec, network: &str, kind: PoolKind) -> IntCounter {
        let pool = kind.to_string();
        vec.with_label_values(&[network, pool.as_str()])
    }
}

fn counter(
    registry: &Registry,
    name: &str,
    help: &str,
    labels: &[&str],
) -> Result<IntCounterVec, prometheus::Error> {
    let vec = IntCounterVec::new(Opts::new(name, help), labels)?;
    registry.register(Box::new(vec.clone()))?;
    Ok(vec)
}

impl PoolLogger for PoolMetrics {
    fn log(&self, network: &str, _family: IpFamily, event: &PoolEvent) {
        match *event {
            PoolEvent::Allocated { .. } => Self::by_network(&self.allocations, network).inc(),
            PoolEvent::Exhausted => Self::by_network(&self.exhaustions, network).inc(),
            PoolEvent::Reserved { kind, .. } => {
                Self::by_pool(&self.reservations, network, kind).inc()
            }
            PoolEvent::ReserveFailed { .. } => {
                Self::by_network(&self.reserve_failures, network).inc()
            }
            PoolEvent::Released { kind, .. } => Self::by_pool(&self.releases, network, kind).inc(),
            PoolEvent::ReleaseRejected { .. } => {
                Self::by_network(&self.release_rejections, network).inc()
            }
        }
    }
}
