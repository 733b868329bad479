use std::collections::BTreeMap;
use std::str::FromStr;

use alloy::primitives::Address;
use thiserror::Error;

use token_admin_core::GasPolicy;

pub const ENV_RUNTIME_PROFILE: &str = "TOKEN_ADMIN_RUNTIME_PROFILE";
pub const ENV_EIP1193_PROXY_URL: &str = "TOKEN_ADMIN_EIP1193_PROXY_URL";
pub const ENV_RPC_TIMEOUT_MS: &str = "TOKEN_ADMIN_RPC_TIMEOUT_MS";
pub const ENV_RECEIPT_TIMEOUT_MS: &str = "TOKEN_ADMIN_RECEIPT_TIMEOUT_MS";
pub const ENV_RECEIPT_POLL_INTERVAL_MS: &str = "TOKEN_ADMIN_RECEIPT_POLL_INTERVAL_MS";
pub const ENV_GAS_PADDING_PERCENT: &str = "TOKEN_ADMIN_GAS_PADDING_PERCENT";
pub const ENV_BULK_GAS_PADDING_PERCENT: &str = "TOKEN_ADMIN_BULK_GAS_PADDING_PERCENT";
pub const ENV_TOKEN_LOGO_URL: &str = "TOKEN_ADMIN_TOKEN_LOGO_URL";
/// Per-chain contract address variables are `TOKEN_ADMIN_CONTRACT_<chain id>`.
pub const ENV_CONTRACT_PREFIX: &str = "TOKEN_ADMIN_CONTRACT_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeProfile {
    #[default]
    Development,
    Production,
}

impl FromStr for RuntimeProfile {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "dev" | "development" => Ok(RuntimeProfile::Development),
            "prod" | "production" => Ok(RuntimeProfile::Production),
            other => Err(ConfigError::UnknownProfile(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown runtime profile: {0}")]
    UnknownProfile(String),
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: String, value: String },
    #[error("{var} must be a 0x-prefixed address, got {value:?}")]
    InvalidAddress { var: String, value: String },
}

#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub runtime_profile: RuntimeProfile,
    pub eip1193_proxy_url: Option<String>,
    pub rpc_timeout_ms: u64,
    pub receipt_timeout_ms: u64,
    pub receipt_poll_interval_ms: u64,
    pub contract_addresses: BTreeMap<u64, Address>,
    pub gas_padding_percent: u64,
    pub bulk_gas_padding_percent: u64,
    pub token_logo_url: Option<String>,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        let gas = GasPolicy::default();
        Self {
            runtime_profile: RuntimeProfile::Development,
            eip1193_proxy_url: None,
            rpc_timeout_ms: 15_000,
            receipt_timeout_ms: 120_000,
            receipt_poll_interval_ms: 2_000,
            contract_addresses: BTreeMap::new(),
            gas_padding_percent: gas.single_padding_percent,
            bulk_gas_padding_percent: gas.bulk_padding_percent,
            token_logo_url: None,
        }
    }
}

impl AdapterConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key/value source. Unset or blank keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(raw) = get(ENV_RUNTIME_PROFILE) {
            config.runtime_profile = raw.parse()?;
        }
        config.eip1193_proxy_url = get(ENV_EIP1193_PROXY_URL);
        config.token_logo_url = get(ENV_TOKEN_LOGO_URL);

        let number = |key: &str, default: u64| -> Result<u64, ConfigError> {
            match get(key) {
                None => Ok(default),
                Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidNumber {
                    var: key.to_owned(),
                    value: raw,
                }),
            }
        };
        config.rpc_timeout_ms = number(ENV_RPC_TIMEOUT_MS, config.rpc_timeout_ms)?;
        config.receipt_timeout_ms = number(ENV_RECEIPT_TIMEOUT_MS, config.receipt_timeout_ms)?;
        config.receipt_poll_interval_ms =
            number(ENV_RECEIPT_POLL_INTERVAL_MS, config.receipt_poll_interval_ms)?;
        config.gas_padding_percent = number(ENV_GAS_PADDING_PERCENT, config.gas_padding_percent)?;
        config.bulk_gas_padding_percent =
            number(ENV_BULK_GAS_PADDING_PERCENT, config.bulk_gas_padding_percent)?;

        for network in token_admin_core::NETWORKS {
            let var = format!("{ENV_CONTRACT_PREFIX}{}", network.chain_id);
            if let Some(raw) = get(&var) {
                let address = raw
                    .parse::<Address>()
                    .map_err(|_| ConfigError::InvalidAddress {
                        var: var.clone(),
                        value: raw.clone(),
                    })?;
                config.contract_addresses.insert(network.chain_id, address);
            }
        }

        Ok(config)
    }

    pub fn strict_runtime_required(&self) -> bool {
        self.runtime_profile == RuntimeProfile::Production
    }

    pub fn gas_policy(&self) -> GasPolicy {
        GasPolicy {
            single_padding_percent: self.gas_padding_percent,
            bulk_padding_percent: self.bulk_gas_padding_percent,
        }
    }

    pub fn contract_address(&self, chain_id: u64) -> Option<Address> {
        self.contract_addresses.get(&chain_id).copied()
    }

    pub fn with_contract(mut self, chain_id: u64, address: Address) -> Self {
        self.contract_addresses.insert(chain_id, address);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_owned())
        }
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = AdapterConfig::from_lookup(|_| None).expect("defaults");
        assert_eq!(config.runtime_profile, RuntimeProfile::Development);
        assert_eq!(config.receipt_timeout_ms, 120_000);
        assert_eq!(config.gas_policy(), GasPolicy::default());
        assert!(config.contract_addresses.is_empty());
        assert!(!config.strict_runtime_required());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = AdapterConfig::from_lookup(lookup(&[
            (ENV_RUNTIME_PROFILE, "Production"),
            (ENV_EIP1193_PROXY_URL, " http://127.0.0.1:8545 "),
            (ENV_GAS_PADDING_PERCENT, "25"),
            (
                "TOKEN_ADMIN_CONTRACT_11155111",
                "0x00000000000000000000000000000000000C0DE0",
            ),
            ("TOKEN_ADMIN_CONTRACT_1", "0x00000000000000000000000000000000000C0DE1"),
        ]))
        .expect("valid overrides");

        assert!(config.strict_runtime_required());
        assert_eq!(
            config.eip1193_proxy_url.as_deref(),
            Some("http://127.0.0.1:8545")
        );
        assert_eq!(config.gas_policy().single_padding_percent, 25);
        assert_eq!(config.gas_policy().bulk_padding_percent, 30);
        assert!(config.contract_address(11_155_111).is_some());
        assert_eq!(config.contract_address(1), None);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = AdapterConfig::from_lookup(lookup(&[(ENV_RPC_TIMEOUT_MS, "soon")]))
            .expect_err("not a number");
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));

        let err = AdapterConfig::from_lookup(lookup(&[("TOKEN_ADMIN_CONTRACT_137", "0x1234")]))
            .expect_err("short address");
        assert!(matches!(err, ConfigError::InvalidAddress { .. }));

        let err = AdapterConfig::from_lookup(lookup(&[(ENV_RUNTIME_PROFILE, "staging")]))
            .expect_err("unknown profile");
        assert_eq!(err, ConfigError::UnknownProfile("staging".to_owned()));
    }
}
