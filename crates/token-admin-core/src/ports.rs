use std::fmt;

use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::{
    AddChainParams, ContractCall, DisplayField, LockupRecord, Notice, TxReceipt, WalletEvent,
    WatchAssetParams,
};

/// EIP-1193 code for a request the user rejected in the wallet.
pub const USER_REJECTED_CODE: i64 = 4001;
/// EIP-3085 code for `wallet_switchEthereumChain` on a chain the wallet does not know.
pub const UNRECOGNIZED_CHAIN_CODE: i64 = 4902;

#[derive(Debug, Clone, Error)]
pub enum PortError {
    #[error("port not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("network request failed: {0}")]
    Transport(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("policy error: {0}")]
    Policy(String),
    #[error("{0}")]
    Provider(ProviderError),
}

impl PortError {
    pub fn provider_code(&self) -> Option<&ErrorCode> {
        match self {
            PortError::Provider(e) => e.code.as_ref(),
            _ => None,
        }
    }

    pub fn has_numeric_code(&self, code: i64) -> bool {
        matches!(self.provider_code(), Some(ErrorCode::Numeric(c)) if *c == code)
    }
}

impl From<ProviderError> for PortError {
    fn from(value: ProviderError) -> Self {
        PortError::Provider(value)
    }
}

/// Wallet / JSON-RPC error codes arrive either as integers (EIP-1193, JSON-RPC) or as
/// symbolic strings (`ACTION_REJECTED`, `INSUFFICIENT_FUNDS`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Numeric(i64),
    Named(String),
}

impl ErrorCode {
    pub fn is(&self, name: &str) -> bool {
        matches!(self, ErrorCode::Named(n) if n == name)
    }
}

/// A provider-side error object as reported by the wallet or node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Box<ProviderError>>,
}

impl ProviderError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(ErrorCode::Numeric(code)),
            message: message.into(),
            data: None,
            error: None,
        }
    }

    pub fn named(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(ErrorCode::Named(code.into())),
            message: message.into(),
            data: None,
            error: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Best-effort conversion of any JSON failure value. Objects are read field by field,
    /// strings become the message, everything else is stringified.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => {
                let code = map.get("code").and_then(|c| match c {
                    Value::Number(n) => n.as_i64().map(ErrorCode::Numeric),
                    Value::String(s) => Some(ErrorCode::Named(s.clone())),
                    _ => None,
                });
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_owned();
                let data = map.get("data").cloned().filter(|d| !d.is_null());
                let error = map
                    .get("error")
                    .filter(|e| e.is_object())
                    .map(|e| Box::new(Self::from_value(e)));
                Self {
                    code,
                    message,
                    data,
                    error,
                }
            }
            Value::String(s) => Self {
                message: s.clone(),
                ..Self::default()
            },
            Value::Null => Self::default(),
            other => Self {
                message: other.to_string(),
                ..Self::default()
            },
        }
    }

    pub fn data_message(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.get("message"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn nested_message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .map(|e| e.message.as_str())
            .filter(|s| !s.is_empty())
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            return f.write_str(&self.message);
        }
        match &self.code {
            Some(ErrorCode::Numeric(c)) => write!(f, "provider error {c}"),
            Some(ErrorCode::Named(c)) => write!(f, "provider error {c}"),
            None => Ok(()),
        }
    }
}

pub trait WalletPort {
    fn request_accounts(&self) -> Result<Vec<Address>, PortError>;
    fn chain_id(&self) -> Result<u64, PortError>;
    fn switch_chain(&self, chain_id_hex: &str) -> Result<(), PortError>;
    fn add_chain(&self, params: &AddChainParams) -> Result<(), PortError>;
    /// `None` when the wallet gives no definite answer.
    fn watch_asset(&self, asset: &WatchAssetParams) -> Result<Option<bool>, PortError>;
    fn drain_events(&self) -> Result<Vec<WalletEvent>, PortError>;
}

pub trait TokenContractPort {
    fn rebuild(&self, chain_id: u64) -> Result<(), PortError>;

    fn name(&self) -> Result<String, PortError>;
    fn symbol(&self) -> Result<String, PortError>;
    fn decimals(&self) -> Result<u8, PortError>;
    fn total_supply(&self) -> Result<U256, PortError>;
    fn paused(&self) -> Result<bool, PortError>;
    fn owner(&self) -> Result<Address, PortError>;
    fn balance_of(&self, account: Address) -> Result<U256, PortError>;
    fn locked_balance(&self, account: Address) -> Result<U256, PortError>;
    fn unlocked_balance_of(&self, account: Address) -> Result<U256, PortError>;
    fn locked_info(&self, account: Address) -> Result<LockupRecord, PortError>;
    fn native_balance(&self, account: Address) -> Result<U256, PortError>;

    fn estimate_gas(&self, from: Address, call: &ContractCall) -> Result<u64, PortError>;
    fn submit(&self, from: Address, call: &ContractCall, gas_limit: u64)
        -> Result<B256, PortError>;
    fn wait_for_confirmation(&self, tx_hash: B256) -> Result<TxReceipt, PortError>;
}

/// Selects the deployed contract address for a chain.
pub trait AddressResolverPort: Send + Sync {
    fn update_contract_address(&self, chain_id: u64);
    fn contract_address(&self) -> Option<Address>;
}

pub trait UiPort {
    fn notify(&self, notice: Notice);
    fn set_result(&self, field: DisplayField, text: String);
    fn set_connected(&self, connected: bool);
    fn set_owner_controls(&self, enabled: bool);
}
