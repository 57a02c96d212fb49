//! # ippool Configuration
//!
//! Layered configuration for the per-network IP allocators.
//!
//! ## Features
//! - **Network Definitions**: name, inclusive range, reserved and static addresses
//! - **Validation**: shape checks on every entry before any allocator is built
//! - **Environment Awareness**: `IPPOOL_ENV` selects an override file

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use ippool_core::{IpPool, PoolLogger};

mod error;
mod network;
mod telemetry;
mod validation;

pub use error::ConfigError;
pub use network::{NetworkConfig, RangeConfig};
pub use telemetry::TelemetryConfig;

/// Top‑level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct IpPoolConfig {
    /// Logging parameters.
    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// One entry per network; each gets its own allocator.
    #[validate(nested)]
    #[validate(custom(function = validation::validate_unique_names))]
    #[serde(default)]
    pub networks: Vec<NetworkConfig>,
}

impl IpPoolConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default Values
    /// 2. `config/ippool.yaml` - Base settings. If missing, defaults are used.
    /// 3. `config/<environment>.yaml` - Environment‑specific overrides.
    /// 4. `IPPOOL_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(IpPoolConfig::default()));

        if Path::new("config/ippool.yaml").exists() {
            figment = figment.merge(Yaml::file("config/ippool.yaml"));
        }

        let env = std::env::var("IPPOOL_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::extract(figment.merge(Env::prefixed("IPPOOL_").split("__")))
    }

    /// Load configuration from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        Self::extract(
            Figment::from(Serialized::defaults(IpPoolConfig::default()))
                .merge(Yaml::file(path))
                .merge(Env::prefixed("IPPOOL_").split("__")),
        )
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }

    pub fn network(&self, name: &str) -> Option<&NetworkConfig> {
        self.networks.iter().find(|n| n.name == name)
    }

    /// Build one independent allocator per configured network, keyed by name.
    pub fn build_pools<L, F>(
        &self,
        mut make_logger: F,
    ) -> Result<BTreeMap<String, IpPool<L>>, ConfigError>
    where
        L: PoolLogger,
        F: FnMut(&NetworkConfig) -> L,
    {
        self.networks
            .iter()
            .map(|network| -> Result<_, ConfigError> {
                let pool = network.build_pool(make_logger(network))?;
                Ok((network.name.clone(), pool))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use ippool_core::{NoopLogger, PoolKind};

    const NETWORKS: &str = r#"
telemetry:
  log_level: debug
networks:
  - name: default
    range: { first: 10.0.0.1, last: 10.0.0.4 }
    reserved: [10.0.0.1]
    static: [10.0.0.2]
  - name: v6
    range: { first: "2001:db8::1", last: "2001:db8::8" }
"#;

    #[test]
    fn full_config_validation() {
        let config = IpPoolConfig::default();
        config.validate().expect("Default config should validate");
        assert!(config.networks.is_empty());
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn loads_networks_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file("pools.yaml", NETWORKS)?;
            let config = IpPoolConfig::load_from_path("pools.yaml").map_err(|e| e.to_string())?;

            assert_eq!(config.telemetry.log_level, "debug");
            assert_eq!(config.networks.len(), 2);
            let default = config.network("default").expect("default network");
            assert_eq!(default.reserved.len(), 1);
            assert_eq!(default.static_ips.len(), 1);
            assert!(config.network("v6").expect("v6 network").static_ips.is_empty());
            Ok(())
        });
    }

    #[test]
    fn environment_override() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file("config/ippool.yaml", NETWORKS)?;
            jail.set_env("IPPOOL_TELEMETRY__LOG_LEVEL", "warn");

            let config = IpPoolConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.telemetry.log_level, "warn");
            assert_eq!(config.networks.len(), 2);
            Ok(())
        });
    }

    #[test]
    fn missing_file_is_reported() {
        let err = IpPoolConfig::load_from_path("does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn duplicate_network_names_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "pools.yaml",
                r#"
networks:
  - name: default
    range: { first: 10.0.0.1, last: 10.0.0.4 }
  - name: default
    range: { first: 10.0.1.1, last: 10.0.1.4 }
"#,
            )?;
            let err = IpPoolConfig::load_from_path("pools.yaml").unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)));
            assert!(err.to_string().contains("duplicate_network_name"));
            Ok(())
        });
    }

    #[test]
    fn inverted_range_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "pools.yaml",
                r#"
networks:
  - name: backwards
    range: { first: 10.0.0.9, last: 10.0.0.1 }
"#,
            )?;
            let err = IpPoolConfig::load_from_path("pools.yaml").unwrap_err();
            assert!(err.to_string().contains("range_first_after_last"));
            Ok(())
        });
    }

    #[test]
    fn builds_one_pool_per_network() {
        Jail::expect_with(|jail| {
            jail.create_file("pools.yaml", NETWORKS)?;
            let config = IpPoolConfig::load_from_path("pools.yaml").map_err(|e| e.to_string())?;
            let mut pools = config
                .build_pools(|_| NoopLogger)
                .map_err(|e| e.to_string())?;

            assert_eq!(pools.len(), 2);
            let default = pools.get_mut("default").expect("default pool");
            assert_eq!(default.allocate_dynamic_ip(), Some(0x0a00_0003));
            assert_eq!(default.reserve_ip(0x0a00_0002u32), Some(PoolKind::Static));

            let v6 = pools.get_mut("v6").expect("v6 pool");
            assert_eq!(v6.available_dynamic_count(), 8);
            assert!(v6.release_ip(0x0a00_0002u32).is_err());
            Ok(())
        });
    }
}
