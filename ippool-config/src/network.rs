//! Network range definitions.
//!
//! Each entry names one network and supplies the inputs of its allocator:
//! the inclusive address range, the addresses excluded from dynamic use,
//! and the addresses designated static. Subnet semantics (which addresses
//! are gateways or broadcast) are decided by whoever writes the file.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use ippool_core::{AddressRange, IpPool, PoolLogger};

use crate::error::ConfigError;
use crate::validation;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[validate(schema(function = validation::validate_address_families))]
pub struct NetworkConfig {
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    #[validate(custom(function = validation::validate_range))]
    pub range: RangeConfig,

    /// Excluded from the dynamic pool without becoming static.
    #[serde(default)]
    pub reserved: Vec<IpAddr>,

    #[serde(default, rename = "static")]
    pub static_ips: Vec<IpAddr>,
}

/// Inclusive `first..=last` bounds.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct RangeConfig {
    pub first: IpAddr,
    pub last: IpAddr,
}

impl NetworkConfig {
    pub fn address_range(&self) -> Result<AddressRange, ConfigError> {
        AddressRange::from_addrs(self.range.first, self.range.last).map_err(|source| {
            ConfigError::Pool {
                network: self.name.clone(),
                source,
            }
        })
    }

    /// Build this network's allocator.
    pub fn build_pool<L: PoolLogger>(&self, logger: L) -> Result<IpPool<L>, ConfigError> {
        Ok(IpPool::new(
            self.name.clone(),
            self.address_range()?,
            &self.reserved,
            &self.static_ips,
            logger,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ippool_core::{NoopLogger, PoolKind};

    fn network() -> NetworkConfig {
        NetworkConfig {
            name: "default".into(),
            range: RangeConfig {
                first: "10.0.0.1".parse().unwrap(),
                last: "10.0.0.4".parse().unwrap(),
            },
            reserved: vec!["10.0.0.1".parse().unwrap()],
            static_ips: vec!["10.0.0.2".parse().unwrap()],
        }
    }

    #[test]
    fn builds_classified_pool() {
        let mut pool = network().build_pool(NoopLogger).unwrap();
        assert_eq!(pool.network_name(), "default");
        assert_eq!(pool.dynamic_pool_len(), 2);
        let fixed: IpAddr = "10.0.0.2".parse().unwrap();
        assert_eq!(pool.reserve_ip(fixed), Some(PoolKind::Static));
    }

    #[test]
    fn mixed_family_range_does_not_build() {
        let mut config = network();
        config.range.last = "2001:db8::1".parse().unwrap();
        assert!(config.validate().is_err());
        assert!(matches!(
            config.build_pool(NoopLogger),
            Err(ConfigError::Pool { .. })
        ));
    }

    #[test]
    fn foreign_family_static_address_is_invalid() {
        let config = NetworkConfig {
            name: "v6".into(),
            range: RangeConfig {
                first: "::1".parse().unwrap(),
                last: "::10".parse().unwrap(),
            },
            reserved: Vec::new(),
            static_ips: vec!["0.0.0.5".parse().unwrap()],
        };
        let errors = config.validate().unwrap_err();
        assert!(format!("{:?}", errors).contains("address_family_mismatch"));
    }

    #[test]
    fn oversized_range_is_invalid() {
        let mut config = network();
        config.range = RangeConfig {
            first: "2001:db8::".parse().unwrap(),
            last: "2001:db8::ffff:ffff:ffff:ffff".parse().unwrap(),
        };
        config.reserved.clear();
        config.static_ips.clear();
        let errors = config.validate().unwrap_err();
        assert!(format!("{:?}", errors).contains("range_too_large"));
    }

    #[test]
    fn empty_name_is_invalid() {
        let mut config = network();
        config.name.clear();
        assert!(config.validate().is_err());
    }
}
