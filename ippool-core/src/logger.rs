//! ## ippool-core::logger
//! **Injected diagnostics capability**
//!
//! The pool reports each outcome as a [`PoolEvent`] to the [`PoolLogger`] it
//! was built with. Implementations decide where the trace goes; tests use
//! [`NoopLogger`] or a recording logger.

use crate::address::{IpFamily, IpInt};
use crate::pool::PoolKind;

/// One diagnostic trace emitted by an allocator operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolEvent {
    Allocated { ip: IpInt },
    Exhausted,
    Reserved { ip: IpInt, kind: PoolKind },
    ReserveFailed { ip: IpInt },
    Released { ip: IpInt, kind: PoolKind },
    ReleaseRejected { ip: IpInt },
}

pub trait PoolLogger {
    fn log(&self, network: &str, family: IpFamily, event: &PoolEvent);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl PoolLogger for NoopLogger {
    #[inline]
    fn log(&self, _network: &str, _family: IpFamily, _event: &PoolEvent) {}
}

/// Sends every event to two loggers, `A` first.
#[derive(Debug, Default, Clone)]
pub struct FanoutLogger<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> FanoutLogger<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: PoolLogger, B: PoolLogger> PoolLogger for FanoutLogger<A, B> {
    fn log(&self, network: &str, family: IpFamily, event: &PoolEvent) {
        self.first.log(network, family, event);
        self.second.log(network, family, event);
    }
}

impl<L: PoolLogger + ?Sized> PoolLogger for &L {
    fn log(&self, network: &str, family: IpFamily, event: &PoolEvent) {
        (**self).log(network, family, event)
    }
}

impl<L: PoolLogger + ?Sized> PoolLogger for Box<L> {
    fn log(&self, network: &str, family: IpFamily, event: &PoolEvent) {
        (**self).log(network, family, event)
    }
}

impl<L: PoolLogger + ?Sized> PoolLogger for std::sync::Arc<L> {
    fn log(&self, network: &str, family: IpFamily, event: &PoolEvent) {
        (**self).log(network, family, event)
    }
}
