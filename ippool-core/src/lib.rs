//! # ippool-core
//!
//! In-memory IP address allocator for a single network range.
//!
//! One [`IpPool`] is built per network from its address range plus the
//! addresses already reserved elsewhere and the addresses designated static.
//! It hands out dynamic addresses, reserves specific ones, and takes them
//! back. Nothing is persisted; an allocator rebuilt after a restart must be
//! re-seeded by its owner from durable reservation state.
//!
//! ### Key Submodules:
//! - `address`: integer encoding of IPv4/IPv6 and inclusive ranges
//! - `pool`: the allocator itself
//! - `logger`: injected diagnostics capability
//!
//! The allocator is single-threaded; callers serialize access per network.

pub mod address;
pub mod error;
pub mod logger;
pub mod pool;

pub mod prelude {
    pub use crate::address::*;
    pub use crate::error::*;
    pub use crate::logger::*;
    pub use crate::pool::*;
}

pub use address::{AddressRange, IpFamily, IpInt, ToIpInt};
pub use error::PoolError;
pub use logger::{FanoutLogger, NoopLogger, PoolEvent, PoolLogger};
pub use pool::{IpPool, PoolKind};
