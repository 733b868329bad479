use std::sync::{Arc, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol;
use alloy::sol_types::{SolCall, SolInterface};
use serde_json::{json, Value};
use tracing::{debug, info};

use token_admin_core::domain::{ContractCall, LockupRecord, TxReceipt};
use token_admin_core::{PortError, ProviderError, TokenContractPort};

use crate::resolver::ContractAddressCell;
use crate::{AdapterConfig, Eip1193Adapter};

sol! {
    #[allow(missing_docs)]
    interface ITokenAdmin {
        function name() external view returns (string tokenName);
        function symbol() external view returns (string tokenSymbol);
        function decimals() external view returns (uint8 tokenDecimals);
        function totalSupply() external view returns (uint256 supply);
        function paused() external view returns (bool isPaused);
        function owner() external view returns (address contractOwner);
        function balanceOf(address account) external view returns (uint256 balance);
        function lockedBalance(address account) external view returns (uint256 locked);
        function unlockedBalanceOf(address account) external view returns (uint256 unlocked);
        function lockedInfo(address account)
            external
            view
            returns (uint256 lockedAmount, uint256 remainingSeconds, uint256 expirationTimestamp);

        function pause() external;
        function unpause() external;
        function transfer(address to, uint256 amount) external returns (bool success);
        function multiTransfer(address[] recipients, uint256[] amounts) external;
        function burn(uint256 amount) external;
        function setLockup(address account, uint256 lockMinutes, uint256 amount) external;
        function extendLockup(address account, uint256 extraMinutes) external;
        function decreaseLockAmount(address account, uint256 newAmount) external;
        function releaseLockup(address account, uint256 amount) external;
        function clearExpiredLockup(address account) external;

        error NoLockupExists();
        error LockupNotExpired();
        error LockupExpired();
        error OnlyDecrease();
        error AmountExceedsLocked();
        error InvalidLockupDuration();
        error InsufficientBalance();
        error InsufficientUnlockedBalance();
        error InvalidAmount();
        error ZeroAddress();
        error ZeroAmountInBatch();
        error EmptyRecipients();
        error TooManyRecipients();
        error ArrayLengthMismatch();
        error EnforcedPause();
    }
}

/// Name of the custom error encoded in revert `data`, if it is one of ours.
pub fn custom_error_name(data: &[u8]) -> Option<&'static str> {
    use ITokenAdmin::ITokenAdminErrors as E;

    let name = match E::abi_decode(data, true).ok()? {
        E::NoLockupExists(_) => "NoLockupExists",
        E::LockupNotExpired(_) => "LockupNotExpired",
        E::LockupExpired(_) => "LockupExpired",
        E::OnlyDecrease(_) => "OnlyDecrease",
        E::AmountExceedsLocked(_) => "AmountExceedsLocked",
        E::InvalidLockupDuration(_) => "InvalidLockupDuration",
        E::InsufficientBalance(_) => "InsufficientBalance",
        E::InsufficientUnlockedBalance(_) => "InsufficientUnlockedBalance",
        E::InvalidAmount(_) => "InvalidAmount",
        E::ZeroAddress(_) => "ZeroAddress",
        E::ZeroAmountInBatch(_) => "ZeroAmountInBatch",
        E::EmptyRecipients(_) => "EmptyRecipients",
        E::TooManyRecipients(_) => "TooManyRecipients",
        E::ArrayLengthMismatch(_) => "ArrayLengthMismatch",
        E::EnforcedPause(_) => "EnforcedPause",
    };
    Some(name)
}

/// Nodes report custom-error reverts as `execution reverted` plus the raw selector in
/// `data` (or `data.data`). Rewrites such errors so the message carries the error name.
fn decode_revert(err: PortError) -> PortError {
    let PortError::Provider(provider) = err else {
        return err;
    };
    let raw = provider
        .data
        .as_ref()
        .and_then(|d| d.as_str().or_else(|| d.get("data").and_then(Value::as_str)))
        .and_then(|hex| hex.parse::<Bytes>().ok());
    let Some(name) = raw.as_ref().and_then(|b| custom_error_name(b)) else {
        return PortError::Provider(provider);
    };
    debug!(error = name, "decoded custom revert");
    let message = format!("execution reverted: {name}()");
    PortError::Provider(ProviderError {
        code: provider.code,
        message: message.clone(),
        data: Some(json!({ "message": message, "data": raw })),
        error: None,
    })
}

/// ABI-encodes a contract call for `eth_estimateGas` / `eth_sendTransaction`.
pub fn encode_call(call: &ContractCall) -> Bytes {
    use ITokenAdmin as T;

    let data = match call.clone() {
        ContractCall::Pause => T::pauseCall {}.abi_encode(),
        ContractCall::Unpause => T::unpauseCall {}.abi_encode(),
        ContractCall::Transfer { to, amount } => T::transferCall { to, amount }.abi_encode(),
        ContractCall::MultiTransfer {
            recipients,
            amounts,
        } => T::multiTransferCall {
            recipients,
            amounts,
        }
        .abi_encode(),
        ContractCall::Burn { amount } => T::burnCall { amount }.abi_encode(),
        ContractCall::SetLockup {
            account,
            minutes,
            amount,
        } => T::setLockupCall {
            account,
            lockMinutes: minutes,
            amount,
        }
        .abi_encode(),
        ContractCall::ExtendLockup { account, minutes } => T::extendLockupCall {
            account,
            extraMinutes: minutes,
        }
        .abi_encode(),
        ContractCall::DecreaseLockAmount {
            account,
            new_amount,
        } => T::decreaseLockAmountCall {
            account,
            newAmount: new_amount,
        }
        .abi_encode(),
        ContractCall::ReleaseLockup { account, amount } => {
            T::releaseLockupCall { account, amount }.abi_encode()
        }
        ContractCall::ClearExpiredLockup { account } => {
            T::clearExpiredLockupCall { account }.abi_encode()
        }
    };
    Bytes::from(data)
}

/// Token contract bound to the wallet transport. Reads go out as `eth_call`, writes as
/// `eth_sendTransaction` signed by the wallet.
#[derive(Debug, Clone)]
pub struct TokenContractAdapter {
    provider: Eip1193Adapter,
    address: ContractAddressCell,
    bound_chain: Arc<RwLock<Option<u64>>>,
    receipt_timeout: Duration,
    receipt_poll_interval: Duration,
}

impl TokenContractAdapter {
    pub fn new(provider: Eip1193Adapter, address: ContractAddressCell, config: &AdapterConfig) -> Self {
        Self {
            provider,
            address,
            bound_chain: Arc::new(RwLock::new(None)),
            receipt_timeout: Duration::from_millis(config.receipt_timeout_ms),
            receipt_poll_interval: Duration::from_millis(config.receipt_poll_interval_ms),
        }
    }

    pub fn bound_chain(&self) -> Option<u64> {
        self.bound_chain.read().ok().and_then(|g| *g)
    }

    /// Contract address for the bound chain. Refuses calls once the resolver has moved to a
    /// chain this adapter has not been rebuilt for.
    fn target(&self) -> Result<Address, PortError> {
        let resolved_chain = self.address.chain_id();
        if let Some(bound) = self.bound_chain() {
            if bound != resolved_chain {
                return Err(PortError::Policy(format!(
                    "contract bound to chain {bound} but the active chain is {resolved_chain}"
                )));
            }
        }
        self.address
            .get()
            .ok_or_else(|| PortError::Policy("no contract address for the active network".to_owned()))
    }

    fn read<C: SolCall>(&self, call: &C) -> Result<C::Return, PortError> {
        let to = self.target()?;
        let data = Bytes::from(call.abi_encode());
        let result = self
            .provider
            .request("eth_call", json!([{ "to": to, "data": data }, "latest"]))?;
        let raw: Bytes = serde_json::from_value(result)
            .map_err(|e| PortError::Validation(format!("{}: invalid call result: {e}", C::SIGNATURE)))?;
        C::abi_decode_returns(&raw, true)
            .map_err(|e| PortError::Validation(format!("{}: {e}", C::SIGNATURE)))
    }

    fn transaction(&self, from: Address, call: &ContractCall) -> Result<Value, PortError> {
        Ok(json!({
            "from": from,
            "to": self.target()?,
            "data": encode_call(call),
        }))
    }

    fn fetch_receipt(&self, tx_hash: B256) -> Result<Option<TxReceipt>, PortError> {
        let result = self
            .provider
            .request("eth_getTransactionReceipt", json!([tx_hash]))?;
        if result.is_null() {
            return Ok(None);
        }
        let status = result.get("status").map(parse_quantity).transpose()?;
        Ok(Some(TxReceipt {
            tx_hash,
            block_number: result.get("blockNumber").map(parse_quantity).transpose()?,
            gas_used: result.get("gasUsed").map(parse_quantity).transpose()?,
            success: status == Some(1),
        }))
    }
}

impl TokenContractPort for TokenContractAdapter {
    fn rebuild(&self, chain_id: u64) -> Result<(), PortError> {
        let resolved_chain = self.address.chain_id();
        if resolved_chain != chain_id {
            return Err(PortError::Policy(format!(
                "contract address resolved for chain {resolved_chain}, not {chain_id}"
            )));
        }
        *self
            .bound_chain
            .write()
            .map_err(|e| PortError::Transport(format!("contract lock poisoned: {e}")))? =
            Some(chain_id);
        let address = self.target()?;
        debug!(chain_id, %address, "token contract rebound");
        Ok(())
    }

    fn name(&self) -> Result<String, PortError> {
        Ok(self.read(&ITokenAdmin::nameCall {})?.tokenName)
    }

    fn symbol(&self) -> Result<String, PortError> {
        Ok(self.read(&ITokenAdmin::symbolCall {})?.tokenSymbol)
    }

    fn decimals(&self) -> Result<u8, PortError> {
        Ok(self.read(&ITokenAdmin::decimalsCall {})?.tokenDecimals)
    }

    fn total_supply(&self) -> Result<U256, PortError> {
        Ok(self.read(&ITokenAdmin::totalSupplyCall {})?.supply)
    }

    fn paused(&self) -> Result<bool, PortError> {
        Ok(self.read(&ITokenAdmin::pausedCall {})?.isPaused)
    }

    fn owner(&self) -> Result<Address, PortError> {
        Ok(self.read(&ITokenAdmin::ownerCall {})?.contractOwner)
    }

    fn balance_of(&self, account: Address) -> Result<U256, PortError> {
        Ok(self.read(&ITokenAdmin::balanceOfCall { account })?.balance)
    }

    fn locked_balance(&self, account: Address) -> Result<U256, PortError> {
        Ok(self.read(&ITokenAdmin::lockedBalanceCall { account })?.locked)
    }

    fn unlocked_balance_of(&self, account: Address) -> Result<U256, PortError> {
        Ok(self
            .read(&ITokenAdmin::unlockedBalanceOfCall { account })?
            .unlocked)
    }

    fn locked_info(&self, account: Address) -> Result<LockupRecord, PortError> {
        let info = self.read(&ITokenAdmin::lockedInfoCall { account })?;
        Ok(LockupRecord {
            locked_amount: info.lockedAmount,
            remaining_seconds: info.remainingSeconds,
            expiration_timestamp: info.expirationTimestamp,
        })
    }

    fn native_balance(&self, account: Address) -> Result<U256, PortError> {
        let result = self
            .provider
            .request("eth_getBalance", json!([account, "latest"]))?;
        let raw = result
            .as_str()
            .ok_or_else(|| PortError::Validation("eth_getBalance result must be string".to_owned()))?;
        raw.parse::<U256>()
            .map_err(|e| PortError::Validation(format!("invalid balance {raw}: {e}")))
    }

    fn estimate_gas(&self, from: Address, call: &ContractCall) -> Result<u64, PortError> {
        let tx = self.transaction(from, call)?;
        let result = self
            .provider
            .request("eth_estimateGas", json!([tx]))
            .map_err(decode_revert)?;
        parse_quantity(&result)
    }

    fn submit(&self, from: Address, call: &ContractCall, gas_limit: u64) -> Result<B256, PortError> {
        let mut tx = self.transaction(from, call)?;
        tx["gas"] = json!(format!("{gas_limit:#x}"));
        let result = self
            .provider
            .request("eth_sendTransaction", json!([tx]))
            .map_err(decode_revert)?;
        let raw = result.as_str().ok_or_else(|| {
            PortError::Validation("eth_sendTransaction result must be string".to_owned())
        })?;
        let hash = raw
            .parse::<B256>()
            .map_err(|e| PortError::Validation(format!("invalid transaction hash {raw}: {e}")))?;
        info!(method = call.kind().method_name(), %hash, "transaction sent");
        Ok(hash)
    }

    fn wait_for_confirmation(&self, tx_hash: B256) -> Result<TxReceipt, PortError> {
        let deadline = Instant::now() + self.receipt_timeout;
        loop {
            if let Some(receipt) = self.fetch_receipt(tx_hash)? {
                return Ok(receipt);
            }
            if Instant::now() + self.receipt_poll_interval > deadline {
                return Err(PortError::Timeout(format!(
                    "no receipt for {tx_hash} after {} ms",
                    self.receipt_timeout.as_millis()
                )));
            }
            thread::sleep(self.receipt_poll_interval);
        }
    }
}

fn parse_quantity(value: &Value) -> Result<u64, PortError> {
    let raw = value
        .as_str()
        .ok_or_else(|| PortError::Validation(format!("quantity must be a hex string, got {value}")))?;
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| PortError::Validation(format!("quantity missing 0x prefix: {raw}")))?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| PortError::Validation(format!("invalid quantity {raw}: {e}")))
}
