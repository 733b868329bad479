//! Network catalog and the single active-chain context.

use alloy::primitives::{Address, B256};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{AddChainParams, NativeCurrency};
use crate::ports::{PortError, WalletPort, UNRECOGNIZED_CHAIN_CODE, USER_REJECTED_CODE};

pub const DEFAULT_CHAIN_ID: u64 = 137;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkDescriptor {
    pub chain_id: u64,
    pub internal_name: &'static str,
    pub explorer_base_url: &'static str,
    pub display_name: &'static str,
    pub native_currency: &'static str,
    pub chain_id_hex: &'static str,
    pub rpc_urls: &'static [&'static str],
    pub block_explorer_urls: &'static [&'static str],
    pub is_testnet: bool,
}

impl NetworkDescriptor {
    pub fn add_chain_params(&self) -> AddChainParams {
        AddChainParams {
            chain_id: self.chain_id_hex.to_owned(),
            chain_name: self.display_name.to_owned(),
            native_currency: NativeCurrency {
                name: self.native_currency.to_owned(),
                symbol: self.native_currency.to_owned(),
                decimals: 18,
            },
            rpc_urls: self.rpc_urls.iter().map(|s| (*s).to_owned()).collect(),
            block_explorer_urls: self
                .block_explorer_urls
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
        }
    }

    pub fn tx_url(&self, tx_hash: B256) -> String {
        format!("{}/tx/{tx_hash}", self.explorer_base_url)
    }

    pub fn address_url(&self, address: Address) -> String {
        format!("{}/address/{address}", self.explorer_base_url)
    }

    pub fn token_url(&self, contract: Address) -> String {
        format!("{}/token/{contract}", self.explorer_base_url)
    }

    pub fn holders_url(&self, contract: Address) -> String {
        format!("{}/token/{contract}#balances", self.explorer_base_url)
    }

    pub fn display_label(&self) -> String {
        if self.is_testnet {
            format!("🌐 네트워크: {} [테스트넷]", self.display_name)
        } else {
            format!("🌐 네트워크: {}", self.display_name)
        }
    }
}

pub const NETWORKS: &[NetworkDescriptor] = &[
    NetworkDescriptor {
        chain_id: 137,
        internal_name: "polygon",
        explorer_base_url: "https://polygonscan.com",
        display_name: "Polygon Mainnet",
        native_currency: "POL",
        chain_id_hex: "0x89",
        rpc_urls: &["https://polygon-rpc.com/"],
        block_explorer_urls: &["https://polygonscan.com"],
        is_testnet: false,
    },
    NetworkDescriptor {
        chain_id: 11_155_111,
        internal_name: "sepolia",
        explorer_base_url: "https://sepolia.etherscan.io",
        display_name: "Sepolia Testnet",
        native_currency: "ETH",
        chain_id_hex: "0xaa36a7",
        rpc_urls: &["https://rpc.sepolia.org/"],
        block_explorer_urls: &["https://sepolia.etherscan.io"],
        is_testnet: true,
    },
];

pub fn descriptor(chain_id: u64) -> Option<&'static NetworkDescriptor> {
    NETWORKS.iter().find(|n| n.chain_id == chain_id)
}

pub fn default_descriptor() -> &'static NetworkDescriptor {
    &NETWORKS[0]
}

pub fn descriptor_or_default(chain_id: u64) -> &'static NetworkDescriptor {
    descriptor(chain_id).unwrap_or_else(default_descriptor)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("지원하지 않는 네트워크입니다. (chain id {0})")]
    Unsupported(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkTransition {
    pub from: u64,
    pub to: u64,
}

impl NetworkTransition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Holds the one active chain id. Every explorer or currency lookup reads through here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkContext {
    active: u64,
}

impl Default for NetworkContext {
    fn default() -> Self {
        Self {
            active: DEFAULT_CHAIN_ID,
        }
    }
}

impl NetworkContext {
    pub fn active_chain_id(&self) -> u64 {
        self.active
    }

    pub fn active(&self) -> &'static NetworkDescriptor {
        descriptor_or_default(self.active)
    }

    pub fn transition(&mut self, chain_id: u64) -> Result<NetworkTransition, NetworkError> {
        if descriptor(chain_id).is_none() {
            return Err(NetworkError::Unsupported(chain_id));
        }
        let transition = NetworkTransition {
            from: self.active,
            to: chain_id,
        };
        self.active = chain_id;
        debug!(from = transition.from, to = transition.to, "active network transition");
        Ok(transition)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    Switched,
    /// The wallet did not know the chain and accepted `wallet_addEthereumChain`.
    Added,
    Cancelled,
    AddFailed,
}

impl SwitchOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, SwitchOutcome::Switched | SwitchOutcome::Added)
    }
}

/// Asks the wallet to move to `target`, adding the chain when the wallet reports it unknown.
/// Cancellation is reported as an outcome; any other wallet error propagates.
pub fn switch_wallet_chain<W: WalletPort>(
    wallet: &W,
    target: &NetworkDescriptor,
) -> Result<SwitchOutcome, PortError> {
    match wallet.switch_chain(target.chain_id_hex) {
        Ok(()) => Ok(SwitchOutcome::Switched),
        Err(e) if e.has_numeric_code(UNRECOGNIZED_CHAIN_CODE) => {
            match wallet.add_chain(&target.add_chain_params()) {
                Ok(()) => Ok(SwitchOutcome::Added),
                Err(add_err) => {
                    warn!(chain_id = target.chain_id, error = %add_err, "wallet_addEthereumChain failed");
                    Ok(SwitchOutcome::AddFailed)
                }
            }
        }
        Err(e) if e.has_numeric_code(USER_REJECTED_CODE) => Ok(SwitchOutcome::Cancelled),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_exactly_the_two_reference_networks() {
        assert_eq!(NETWORKS.len(), 2);
        assert_eq!(descriptor(137).expect("polygon").native_currency, "POL");
        assert_eq!(descriptor(11_155_111).expect("sepolia").chain_id_hex, "0xaa36a7");
        assert!(descriptor(1).is_none());
        assert_eq!(descriptor_or_default(1).chain_id, DEFAULT_CHAIN_ID);
    }

    #[test]
    fn unsupported_transition_keeps_active_chain() {
        let mut ctx = NetworkContext::default();
        let err = ctx.transition(1).expect_err("chain 1 unsupported");
        assert_eq!(err, NetworkError::Unsupported(1));
        assert_eq!(ctx.active_chain_id(), DEFAULT_CHAIN_ID);

        let t = ctx.transition(11_155_111).expect("sepolia supported");
        assert!(t.changed());
        assert_eq!(ctx.active().internal_name, "sepolia");
    }

    #[test]
    fn add_chain_params_carry_full_metadata() {
        let params = descriptor(11_155_111).expect("sepolia").add_chain_params();
        let json = serde_json::to_value(&params).expect("serialize");
        assert_eq!(json["chainId"], "0xaa36a7");
        assert_eq!(json["chainName"], "Sepolia Testnet");
        assert_eq!(json["nativeCurrency"]["decimals"], 18);
        assert_eq!(json["rpcUrls"][0], "https://rpc.sepolia.org/");
        assert_eq!(json["blockExplorerUrls"][0], "https://sepolia.etherscan.io");
    }
}
