// ippool-config/src/validation.rs
//! Custom validation functions for configuration.

use std::collections::HashSet;

use ippool_core::ToIpInt;
use validator::ValidationError;

use crate::network::{NetworkConfig, RangeConfig};

/// Largest range a pool may be built for; every address is enumerated.
pub const MAX_RANGE_LEN: u128 = 1 << 24;

/// Validate that a range is bounded by two addresses of one family, in order,
/// and is small enough to enumerate.
pub fn validate_range(range: &RangeConfig) -> Result<(), ValidationError> {
    if range.first.is_ipv4() != range.last.is_ipv4() {
        return Err(ValidationError::new("mixed_address_families"));
    }
    if range.first > range.last {
        return Err(ValidationError::new("range_first_after_last"));
    }
    let span = range.last.to_ip_int() - range.first.to_ip_int();
    if span >= MAX_RANGE_LEN {
        return Err(ValidationError::new("range_too_large"));
    }
    Ok(())
}

/// Validate that reserved and static addresses share the range's family.
pub fn validate_address_families(network: &NetworkConfig) -> Result<(), ValidationError> {
    let v4 = network.range.first.is_ipv4();
    if network
        .reserved
        .iter()
        .chain(&network.static_ips)
        .all(|ip| ip.is_ipv4() == v4)
    {
        Ok(())
    } else {
        Err(ValidationError::new("address_family_mismatch"))
    }
}

/// Validate that no two networks share a name.
pub fn validate_unique_names(networks: &[NetworkConfig]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    if networks.iter().all(|n| seen.insert(n.name.as_str())) {
        Ok(())
    } else {
        Err(ValidationError::new("duplicate_network_name"))
    }
}

/// Validate a `tracing` level name.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid = ["trace", "debug", "info", "warn", "error"].contains(&level.to_lowercase().as_str());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(first: &str, last: &str) -> RangeConfig {
        RangeConfig {
            first: first.parse().unwrap(),
            last: last.parse().unwrap(),
        }
    }

    #[test]
    fn range_checks() {
        assert!(validate_range(&range("10.0.0.1", "10.0.0.9")).is_ok());
        assert!(validate_range(&range("10.0.0.1", "10.0.0.1")).is_ok());
        assert!(validate_range(&range("10.0.0.9", "10.0.0.1")).is_err());
        assert!(validate_range(&range("10.0.0.1", "::1")).is_err());
    }

    #[test]
    fn range_size_is_capped() {
        assert!(validate_range(&range("10.0.0.0", "10.255.255.255")).is_ok());
        assert!(validate_range(&range("10.0.0.0", "11.0.0.0")).is_err());

        let err = validate_range(&range("2001:db8::", "2001:db8::ffff:ffff:ffff:ffff")).unwrap_err();
        assert_eq!(err.code, "range_too_large");
    }

    #[test]
    fn pool_addresses_must_match_range_family() {
        let mut network = NetworkConfig {
            name: "v6".into(),
            range: range("::1", "::10"),
            reserved: vec!["::1".parse().unwrap()],
            static_ips: vec!["::5".parse().unwrap()],
        };
        assert!(validate_address_families(&network).is_ok());

        network.static_ips = vec!["0.0.0.5".parse().unwrap()];
        let err = validate_address_families(&network).unwrap_err();
        assert_eq!(err.code, "address_family_mismatch");

        network.static_ips.clear();
        network.reserved.push("10.0.0.1".parse().unwrap());
        assert!(validate_address_families(&network).is_err());
    }

    #[test]
    fn log_level_is_case_insensitive() {
        assert!(validate_log_level("DEBUG").is_ok());
        assert!(validate_log_level("verbose").is_err());
    }
}
