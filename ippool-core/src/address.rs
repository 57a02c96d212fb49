//! ## ippool-core::address
//! **Integer encoding of IPv4/IPv6 addresses**
//!
//! The allocator never looks at address text. Every address is an ordered
//! `u128`, with IPv4 occupying the low 32 bits.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use ipnetwork::IpNetwork;

use crate::error::PoolError;

/// Integer form of an address.
pub type IpInt = u128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpFamily {
    V4,
    V6,
}

impl IpFamily {
    pub fn of(addr: &IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => IpFamily::V4,
            IpAddr::V6(_) => IpFamily::V6,
        }
    }
}

/// Conversion into the integer form accepted by every pool operation.
pub trait ToIpInt {
    fn to_ip_int(&self) -> IpInt;
}

impl ToIpInt for u32 {
    fn to_ip_int(&self) -> IpInt {
        IpInt::from(*self)
    }
}

impl ToIpInt for u128 {
    fn to_ip_int(&self) -> IpInt {
        *self
    }
}

impl ToIpInt for Ipv4Addr {
    fn to_ip_int(&self) -> IpInt {
        IpInt::from(u32::from(*self))
    }
}

impl ToIpInt for Ipv6Addr {
    fn to_ip_int(&self) -> IpInt {
        u128::from(*self)
    }
}

impl ToIpInt for IpAddr {
    fn to_ip_int(&self) -> IpInt {
        match self {
            IpAddr::V4(v4) => v4.to_ip_int(),
            IpAddr::V6(v6) => v6.to_ip_int(),
        }
    }
}

impl<T: ToIpInt + ?Sized> ToIpInt for &T {
    fn to_ip_int(&self) -> IpInt {
        (**self).to_ip_int()
    }
}

/// Render an integer address in its family's text form.
///
/// IPv4 values wider than 32 bits cannot come from a well-formed range and
/// are printed as the raw integer.
pub fn format_ip(ip: IpInt, family: IpFamily) -> String {
    match family {
        IpFamily::V4 => match u32::try_from(ip) {
            Ok(v4) => Ipv4Addr::from(v4).to_string(),
            Err(_) => ip.to_string(),
        },
        IpFamily::V6 => Ipv6Addr::from(ip).to_string(),
    }
}

/// Inclusive span `[first, last]` of addresses under one allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRange {
    first: IpInt,
    last: IpInt,
    family: IpFamily,
}

impl AddressRange {
    /// A range with `first > last` is empty.
    pub fn new(first: impl ToIpInt, last: impl ToIpInt, family: IpFamily) -> Self {
        Self {
            first: first.to_ip_int(),
            last: last.to_ip_int(),
            family,
        }
    }

    /// Shorthand for an IPv4 range given as integers.
    pub fn ipv4(first: u32, last: u32) -> Self {
        Self::new(first, last, IpFamily::V4)
    }

    pub fn from_addrs(first: IpAddr, last: IpAddr) -> Result<Self, PoolError> {
        let family = IpFamily::of(&first);
        if family != IpFamily::of(&last) {
            return Err(PoolError::MixedFamilies {
                first: first.to_string(),
                last: last.to_string(),
            });
        }
        Ok(Self::new(first, last, family))
    }

    /// Every address of a CIDR block, network and broadcast included.
    pub fn from_network(network: IpNetwork) -> Self {
        match network {
            IpNetwork::V4(net) => Self::new(net.network(), net.broadcast(), IpFamily::V4),
            IpNetwork::V6(net) => {
                let first = u128::from(net.network());
                let host_bits = 128 - u32::from(net.prefix());
                let last = match host_bits {
                    128 => u128::MAX,
                    bits => first | ((1u128 << bits) - 1),
                };
                Self::new(first, last, IpFamily::V6)
            }
        }
    }

    pub fn first(&self) -> IpInt {
        self.first
    }

    pub fn last(&self) -> IpInt {
        self.last
    }

    pub fn family(&self) -> IpFamily {
        self.family
    }

    pub fn is_empty(&self) -> bool {
        self.first > self.last
    }

    /// Number of addresses in the range, saturating for a full IPv6 space.
    pub fn len(&self) -> u128 {
        if self.is_empty() {
            0
        } else {
            (self.last - self.first).saturating_add(1)
        }
    }

    pub fn contains(&self, ip: impl ToIpInt) -> bool {
        let ip = ip.to_ip_int();
        self.first <= ip && ip <= self.last
    }

    pub fn iter(&self) -> std::ops::RangeInclusive<IpInt> {
        self.first..=self.last
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            format_ip(self.first, self.family),
            format_ip(self.last, self.family)
        )
    }
}
