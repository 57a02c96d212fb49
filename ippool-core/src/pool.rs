//! ## ippool-core::pool
//! **Per-network dynamic/static address bookkeeping**
//!
//! Construction snapshots two immutable pools, the dynamic pool
//! (`range - reserved - static`) and the static pool, and seeds one mutable
//! available set from each. Held addresses are simply absent from their
//! available set; the pool does not track who holds them.
//!
//! ### Allocation order
//! [`IpPool::allocate_dynamic_ip`] always hands out the lowest numeric
//! address still available. Callers should not rely on any other order.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::address::{format_ip, AddressRange, IpFamily, IpInt, ToIpInt};
use crate::error::PoolError;
use crate::logger::{NoopLogger, PoolEvent, PoolLogger};

/// Which pool an address was reserved from or released into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    Static,
    Dynamic,
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolKind::Static => f.write_str("static"),
            PoolKind::Dynamic => f.write_str("dynamic"),
        }
    }
}

/// Allocator for the addresses of one network range.
///
/// Not thread-safe. Every method takes `&mut self` or `&self` and performs no
/// locking; share it across workflows only behind a caller-held lock.
///
/// Available addresses live in ordered sets, so allocate, reserve and release
/// cost O(log n) rather than O(1). The ordering is what makes allocation
/// lowest-first. Pool classification on release uses hash sets and is O(1).
pub struct IpPool<L: PoolLogger = NoopLogger> {
    network_name: String,
    range: AddressRange,
    dynamic_pool: HashSet<IpInt>,
    static_pool: HashSet<IpInt>,
    available_dynamic: BTreeSet<IpInt>,
    available_static: BTreeSet<IpInt>,
    logger: L,
}

impl IpPool<NoopLogger> {
    /// Build a pool that emits no diagnostics.
    pub fn without_logging<R, S>(
        network_name: impl Into<String>,
        range: AddressRange,
        reserved: R,
        static_ips: S,
    ) -> Self
    where
        R: IntoIterator,
        R::Item: ToIpInt,
        S: IntoIterator,
        S::Item: ToIpInt,
    {
        Self::new(network_name, range, reserved, static_ips, NoopLogger)
    }
}

impl<L: PoolLogger> IpPool<L> {
    /// Build the pools for `range`.
    ///
    /// Addresses in `static_ips` are removed from dynamic eligibility even when
    /// they are not also listed in `reserved`. Overlapping or out-of-range
    /// inputs are accepted as given. Every address of the range is visited
    /// once, so the range must be small enough to enumerate.
    pub fn new<R, S>(
        network_name: impl Into<String>,
        range: AddressRange,
        reserved: R,
        static_ips: S,
        logger: L,
    ) -> Self
    where
        R: IntoIterator,
        R::Item: ToIpInt,
        S: IntoIterator,
        S::Item: ToIpInt,
    {
        let reserved: HashSet<IpInt> = reserved.into_iter().map(|ip| ip.to_ip_int()).collect();
        let available_static: BTreeSet<IpInt> =
            static_ips.into_iter().map(|ip| ip.to_ip_int()).collect();

        let available_dynamic: BTreeSet<IpInt> = range
            .iter()
            .filter(|ip| !reserved.contains(ip) && !available_static.contains(ip))
            .collect();

        Self {
            network_name: network_name.into(),
            range,
            dynamic_pool: available_dynamic.iter().copied().collect(),
            static_pool: available_static.iter().copied().collect(),
            available_dynamic,
            available_static,
            logger,
        }
    }

    pub fn network_name(&self) -> &str {
        &self.network_name
    }

    pub fn range(&self) -> &AddressRange {
        &self.range
    }

    pub fn logger(&self) -> &L {
        &self.logger
    }

    /// Take the lowest available dynamic address.
    ///
    /// `None` means the dynamic pool is exhausted, which is an ordinary
    /// outcome the caller is expected to branch on.
    pub fn allocate_dynamic_ip(&mut self) -> Option<IpInt> {
        match self.available_dynamic.pop_first() {
            Some(ip) => {
                self.emit(PoolEvent::Allocated { ip });
                Some(ip)
            }
            None => {
                self.emit(PoolEvent::Exhausted);
                None
            }
        }
    }

    /// Claim a specific address, preferring the static pool.
    ///
    /// Returns `None` when the address is held already or belongs to neither
    /// pool; the two cases are not distinguished.
    pub fn reserve_ip(&mut self, ip: impl ToIpInt) -> Option<PoolKind> {
        let ip = ip.to_ip_int();
        let kind = if self.available_static.remove(&ip) {
            Some(PoolKind::Static)
        } else if self.available_dynamic.remove(&ip) {
            Some(PoolKind::Dynamic)
        } else {
            None
        };

        match kind {
            Some(kind) => self.emit(PoolEvent::Reserved { ip, kind }),
            None => self.emit(PoolEvent::ReserveFailed { ip }),
        }
        kind
    }

    /// Return an address to the pool it was classified into at construction.
    ///
    /// Releasing an address that is already available is a no-op success.
    /// Releasing an address outside both pools fails with
    /// [`PoolError::IpNotOwned`].
    pub fn release_ip(&mut self, ip: impl ToIpInt) -> Result<PoolKind, PoolError> {
        let ip = ip.to_ip_int();
        match self.classify(ip) {
            Some(PoolKind::Dynamic) => {
                self.available_dynamic.insert(ip);
                self.emit(PoolEvent::Released {
                    ip,
                    kind: PoolKind::Dynamic,
                });
                Ok(PoolKind::Dynamic)
            }
            Some(PoolKind::Static) => {
                self.available_static.insert(ip);
                self.emit(PoolEvent::Released {
                    ip,
                    kind: PoolKind::Static,
                });
                Ok(PoolKind::Static)
            }
            None => {
                self.emit(PoolEvent::ReleaseRejected { ip });
                Err(PoolError::IpNotOwned {
                    ip: format_ip(ip, self.range.family()),
                    network: self.network_name.clone(),
                })
            }
        }
    }

    /// Pool membership fixed at construction, regardless of availability.
    pub fn classify(&self, ip: impl ToIpInt) -> Option<PoolKind> {
        let ip = ip.to_ip_int();
        if self.dynamic_pool.contains(&ip) {
            Some(PoolKind::Dynamic)
        } else if self.static_pool.contains(&ip) {
            Some(PoolKind::Static)
        } else {
            None
        }
    }

    pub fn is_available(&self, ip: impl ToIpInt) -> bool {
        let ip = ip.to_ip_int();
        self.available_dynamic.contains(&ip) || self.available_static.contains(&ip)
    }

    pub fn available_dynamic_count(&self) -> usize {
        self.available_dynamic.len()
    }

    pub fn available_static_count(&self) -> usize {
        self.available_static.len()
    }

    pub fn dynamic_pool_len(&self) -> usize {
        self.dynamic_pool.len()
    }

    pub fn static_pool_len(&self) -> usize {
        self.static_pool.len()
    }

    fn family(&self) -> IpFamily {
        self.range.family()
    }

    #[inline]
    fn emit(&self, event: PoolEvent) {
        self.logger.log(&self.network_name, self.family(), &event);
    }
}

impl<L: PoolLogger> fmt::Debug for IpPool<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IpPool")
            .field("network_name", &self.network_name)
            .field("range", &self.range)
            .field("dynamic_pool", &self.dynamic_pool.len())
            .field("static_pool", &self.static_pool.len())
            .field("available_dynamic", &self.available_dynamic.len())
            .field("available_static", &self.available_static.len())
            .finish()
    }
}
