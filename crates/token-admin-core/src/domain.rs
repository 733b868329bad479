use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// Unit label appended to every token amount shown to the user.
pub const TOKEN_UNIT_LABEL: &str = "ETH(Custom)";

/// Maximum number of recipients accepted by `multiTransfer`.
pub const MAX_BULK_RECIPIENTS: usize = 300;

/// Smallest per-row amount accepted in a bulk transfer.
pub const MIN_BULK_AMOUNT: f64 = 0.000_001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasPolicy {
    pub single_padding_percent: u64,
    pub bulk_padding_percent: u64,
}

impl Default for GasPolicy {
    fn default() -> Self {
        Self {
            single_padding_percent: 20,
            bulk_padding_percent: 30,
        }
    }
}

impl GasPolicy {
    pub fn padding_for(&self, action: ActionKind) -> u64 {
        match action {
            ActionKind::MultiTransfer => self.bulk_padding_percent,
            _ => self.single_padding_percent,
        }
    }

    /// `estimate * (100 + padding) / 100`, saturating.
    pub fn padded_limit(&self, action: ActionKind, estimate: u64) -> u64 {
        let factor = 100u128 + u128::from(self.padding_for(action));
        let padded = u128::from(estimate) * factor / 100;
        u64::try_from(padded).unwrap_or(u64::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WalletSession {
    pub address: Option<Address>,
}

impl WalletSession {
    pub fn connected(address: Address) -> Self {
        Self {
            address: Some(address),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockupRecord {
    pub locked_amount: U256,
    pub remaining_seconds: U256,
    pub expiration_timestamp: U256,
}

impl LockupRecord {
    pub fn is_active(&self) -> bool {
        !self.locked_amount.is_zero() && !self.remaining_seconds.is_zero()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceBreakdown {
    pub total: U256,
    pub locked: U256,
    pub unlocked: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractGlobals {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: U256,
    pub paused: bool,
    pub owner: Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletRole {
    Owner,
    Holder,
}

impl WalletRole {
    pub fn resolve(session_address: Address, owner: Address) -> Self {
        // Address equality is byte-wise, so hex casing never matters here.
        if session_address == owner {
            WalletRole::Owner
        } else {
            WalletRole::Holder
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WalletRole::Owner => "OWNER (관리자)",
            WalletRole::Holder => "일반 사용자",
        }
    }
}

/// One editable row of the bulk-transfer form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkTransferRow {
    pub address: String,
    pub amount: String,
}

impl BulkTransferRow {
    pub fn new(address: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            amount: amount.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.address.trim().is_empty() && self.amount.trim().is_empty()
    }
}

/// A bulk-transfer request that passed validation and is ready to become a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkTransferPlan {
    pub recipients: Vec<Address>,
    pub amounts: Vec<String>,
    pub amounts_wei: Vec<U256>,
    pub total_wei: U256,
}

impl BulkTransferPlan {
    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }
}

/// Every mutating entry point of the token contract, with arguments already in base units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    Pause,
    Unpause,
    Transfer {
        to: Address,
        amount: U256,
    },
    MultiTransfer {
        recipients: Vec<Address>,
        amounts: Vec<U256>,
    },
    Burn {
        amount: U256,
    },
    SetLockup {
        account: Address,
        minutes: U256,
        amount: U256,
    },
    ExtendLockup {
        account: Address,
        minutes: U256,
    },
    DecreaseLockAmount {
        account: Address,
        new_amount: U256,
    },
    ReleaseLockup {
        account: Address,
        amount: U256,
    },
    ClearExpiredLockup {
        account: Address,
    },
}

impl ContractCall {
    pub fn kind(&self) -> ActionKind {
        match self {
            ContractCall::Pause => ActionKind::Pause,
            ContractCall::Unpause => ActionKind::Unpause,
            ContractCall::Transfer { .. } => ActionKind::Transfer,
            ContractCall::MultiTransfer { .. } => ActionKind::MultiTransfer,
            ContractCall::Burn { .. } => ActionKind::Burn,
            ContractCall::SetLockup { .. } => ActionKind::SetLockup,
            ContractCall::ExtendLockup { .. } => ActionKind::ExtendLockup,
            ContractCall::DecreaseLockAmount { .. } => ActionKind::DecreaseLockAmount,
            ContractCall::ReleaseLockup { .. } => ActionKind::ReleaseLockup,
            ContractCall::ClearExpiredLockup { .. } => ActionKind::ClearExpiredLockup,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Pause,
    Unpause,
    SetLockup,
    ExtendLockup,
    DecreaseLockAmount,
    ReleaseLockup,
    ClearExpiredLockup,
    Transfer,
    MultiTransfer,
    Burn,
}

impl ActionKind {
    pub fn method_name(&self) -> &'static str {
        match self {
            ActionKind::Pause => "pause",
            ActionKind::Unpause => "unpause",
            ActionKind::SetLockup => "setLockup",
            ActionKind::ExtendLockup => "extendLockup",
            ActionKind::DecreaseLockAmount => "decreaseLockAmount",
            ActionKind::ReleaseLockup => "releaseLockup",
            ActionKind::ClearExpiredLockup => "clearExpiredLockup",
            ActionKind::Transfer => "transfer",
            ActionKind::MultiTransfer => "multiTransfer",
            ActionKind::Burn => "burn",
        }
    }

    pub fn refresh_scope(&self) -> RefreshScope {
        match self {
            ActionKind::Transfer | ActionKind::MultiTransfer => RefreshScope::Wallet,
            ActionKind::Burn => RefreshScope::All,
            _ => RefreshScope::Contract,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshScope {
    Wallet,
    Contract,
    All,
}

impl RefreshScope {
    pub fn includes_wallet(&self) -> bool {
        matches!(self, RefreshScope::Wallet | RefreshScope::All)
    }

    pub fn includes_contract(&self) -> bool {
        matches!(self, RefreshScope::Contract | RefreshScope::All)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransaction {
    pub hash: B256,
    pub submitted: bool,
    /// `None` until the confirmation wait has an answer.
    pub confirmed: Option<bool>,
}

impl PendingTransaction {
    pub fn submitted(hash: B256) -> Self {
        Self {
            hash,
            submitted: true,
            confirmed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: Option<u64>,
    pub success: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Submitted,
    Failure,
    Warning,
    Info,
}

/// A modal notice shown to the user at the end of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub body: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, body: impl Into<String>) -> Self {
        Self {
            kind,
            body: body.into(),
        }
    }
}

/// Result panels and labels the orchestrator writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayField {
    WalletAddress,
    WalletBalance,
    TokenBalance,
    WalletRole,
    NetworkDisplay,
    ExplorerContract,
    ExplorerTokenTracker,
    ExplorerHolders,
    ContractName,
    ContractSymbol,
    ContractDecimals,
    TotalSupply,
    Paused,
    Owner,
    LockupInfoResult,
    UnlockedBalanceResult,
    BalanceResult,
    MultiTransferPreview,
}

/// Parameters for `wallet_addEthereumChain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Parameters for `wallet_watchAsset` (ERC20).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchAssetParams {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletEvent {
    AccountsChanged(Vec<Address>),
    ChainChanged(u64),
}
