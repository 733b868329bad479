use alloy::primitives::{Address, B256, U256};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::bulk::{plan_bulk_transfer, render_preview, render_preview_error, BulkTransferError};
use crate::classify::{classify, ClassifiedError};
use crate::domain::{
    ActionKind, BulkTransferPlan, BulkTransferRow, ContractCall, DisplayField, GasPolicy, Notice,
    NoticeKind, PendingTransaction, RefreshScope, TxReceipt, WalletEvent, WatchAssetParams,
    TOKEN_UNIT_LABEL,
};
use crate::network::{
    descriptor, switch_wallet_chain, NetworkDescriptor, NetworkError, NetworkTransition,
    SwitchOutcome,
};
use crate::ports::{AddressResolverPort, PortError, TokenContractPort, UiPort, WalletPort};
use crate::refresh::{self, RefreshReport};
use crate::state_machine::{session_transition, AppState, RowCountError, SessionChange};
use crate::validation::{
    format_base_units_fixed, require_address, require_amount, require_minutes, ValidationError,
    DEFAULT_AMOUNT_MIN,
};

pub const MSG_CONNECT_FIRST: &str = "지갑 연결 먼저 해주세요.";
pub const MSG_UNSUPPORTED_NETWORK: &str = "지원하지 않는 네트워크입니다.";
pub const MSG_SWITCH_CANCELLED: &str = "네트워크 전환이 취소되었습니다.";
pub const MSG_SWITCH_FAILED: &str = "네트워크 전환에 실패했습니다.";
pub const MSG_CONNECT_FAILED: &str = "지갑 연결 실패";
pub const MSG_NOT_CONNECTED_LABEL: &str = "연결되지 않음";
pub const MSG_TOKEN_ADDED: &str = "✅ 토큰이 지갑에 추가되었습니다.";
pub const MSG_TOKEN_ADD_FAILED: &str = "토큰 추가 실패: ";
pub const MSG_NO_CONTRACT_ADDRESS: &str = "컨트랙트 주소가 설정되지 않았습니다.";
/// Placeholder for explorer links when the active chain has no contract.
pub const NO_LINK: &str = "-";

/// Symbol and decimals registered with `wallet_watchAsset`.
pub const WATCH_ASSET_SYMBOL: &str = "ETH";
pub const WATCH_ASSET_DECIMALS: u8 = 18;

/// A mutating dashboard action with its form inputs exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    Pause,
    Unpause,
    SetLockup {
        account: String,
        minutes: String,
        amount: String,
    },
    ExtendLockup {
        account: String,
        minutes: String,
    },
    DecreaseLockAmount {
        account: String,
        new_amount: String,
    },
    ReleaseLockup {
        account: String,
        amount: String,
    },
    ClearExpiredLockup {
        account: String,
    },
    Transfer {
        to: String,
        amount: String,
    },
    MultiTransfer {
        rows: Vec<BulkTransferRow>,
    },
    Burn {
        amount: String,
    },
}

impl AdminCommand {
    pub fn kind(&self) -> ActionKind {
        match self {
            AdminCommand::Pause => ActionKind::Pause,
            AdminCommand::Unpause => ActionKind::Unpause,
            AdminCommand::SetLockup { .. } => ActionKind::SetLockup,
            AdminCommand::ExtendLockup { .. } => ActionKind::ExtendLockup,
            AdminCommand::DecreaseLockAmount { .. } => ActionKind::DecreaseLockAmount,
            AdminCommand::ReleaseLockup { .. } => ActionKind::ReleaseLockup,
            AdminCommand::ClearExpiredLockup { .. } => ActionKind::ClearExpiredLockup,
            AdminCommand::Transfer { .. } => ActionKind::Transfer,
            AdminCommand::MultiTransfer { .. } => ActionKind::MultiTransfer,
            AdminCommand::Burn { .. } => ActionKind::Burn,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("{}", MSG_CONNECT_FIRST)]
    NotConnected,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Bulk(#[from] BulkTransferError),
    #[error("{}", .0.message)]
    Chain(ClassifiedError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Confirmed {
        action: ActionKind,
        tx_hash: B256,
        gas_used: Option<u64>,
        explorer_url: String,
    },
    /// Broadcast, but the confirmation wait failed or timed out. Not an error.
    SubmittedUnconfirmed {
        action: ActionKind,
        tx_hash: B256,
        explorer_url: String,
    },
    Failed {
        action: ActionKind,
        error: ActionError,
    },
}

impl ActionOutcome {
    pub fn action(&self) -> ActionKind {
        match self {
            ActionOutcome::Confirmed { action, .. }
            | ActionOutcome::SubmittedUnconfirmed { action, .. }
            | ActionOutcome::Failed { action, .. } => *action,
        }
    }

    pub fn tx_hash(&self) -> Option<B256> {
        match self {
            ActionOutcome::Confirmed { tx_hash, .. }
            | ActionOutcome::SubmittedUnconfirmed { tx_hash, .. } => Some(*tx_hash),
            ActionOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ActionError> {
        match self {
            ActionOutcome::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// A validated action: the exact call plus what the success notice should say.
struct PreparedAction {
    call: ContractCall,
    headline: &'static str,
    details: String,
    bulk: Option<BulkTransferPlan>,
}

impl PreparedAction {
    fn new(call: ContractCall, headline: &'static str, details: String) -> Self {
        Self {
            call,
            headline,
            details,
            bulk: None,
        }
    }
}

pub struct Orchestrator<W, C, U>
where
    W: WalletPort,
    C: TokenContractPort + Sync,
    U: UiPort + Sync,
{
    pub wallet: W,
    pub contract: C,
    pub ui: U,
    pub resolver: Option<Box<dyn AddressResolverPort>>,
    pub gas: GasPolicy,
    pub token_logo_url: Option<String>,
    state: AppState,
    last_transaction: Option<PendingTransaction>,
}

impl<W, C, U> Orchestrator<W, C, U>
where
    W: WalletPort,
    C: TokenContractPort + Sync,
    U: UiPort + Sync,
{
    pub fn new(wallet: W, contract: C, ui: U) -> Self {
        Self {
            wallet,
            contract,
            ui,
            resolver: None,
            gas: GasPolicy::default(),
            token_logo_url: None,
            state: AppState::default(),
            last_transaction: None,
        }
    }

    pub fn with_resolver(mut self, resolver: Box<dyn AddressResolverPort>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_gas_policy(mut self, gas: GasPolicy) -> Self {
        self.gas = gas;
        self
    }

    pub fn with_token_logo_url(mut self, url: Option<String>) -> Self {
        self.token_logo_url = url;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn active_network(&self) -> &'static NetworkDescriptor {
        self.state.network.active()
    }

    pub fn last_transaction(&self) -> Option<PendingTransaction> {
        self.last_transaction
    }

    pub fn contract_address(&self) -> Option<Address> {
        self.resolver.as_ref().and_then(|r| r.contract_address())
    }

    /// Runs one mutating action end to end. Never panics and never retries.
    pub fn handle(&mut self, command: AdminCommand) -> ActionOutcome {
        let action = command.kind();
        let Some(from) = self.state.session.address else {
            self.ui
                .notify(Notice::new(NoticeKind::Failure, MSG_CONNECT_FIRST));
            return ActionOutcome::Failed {
                action,
                error: ActionError::NotConnected,
            };
        };

        let prepared = match self.prepare(command) {
            Ok(p) => p,
            Err(error) => {
                debug!(action = action.method_name(), %error, "input rejected");
                self.ui
                    .notify(Notice::new(NoticeKind::Failure, error.to_string()));
                return ActionOutcome::Failed { action, error };
            }
        };

        self.execute(from, prepared)
    }

    fn prepare(&self, command: AdminCommand) -> Result<PreparedAction, ActionError> {
        let prepared = match command {
            AdminCommand::Pause => {
                PreparedAction::new(ContractCall::Pause, "토큰 일시정지 완료", String::new())
            }
            AdminCommand::Unpause => {
                PreparedAction::new(ContractCall::Unpause, "토큰 정상화 완료", String::new())
            }
            AdminCommand::SetLockup {
                account,
                minutes,
                amount,
            } => {
                let target = require_address("락업 주소", &account)?;
                let mins = require_minutes("락업 시간", &minutes)?;
                let wei = require_amount("락업 수량", &amount, DEFAULT_AMOUNT_MIN)?;
                PreparedAction::new(
                    ContractCall::SetLockup {
                        account: target,
                        minutes: mins,
                        amount: wei,
                    },
                    "락업 설정 완료",
                    format!(
                        "주소: {}\n수량: {} {TOKEN_UNIT_LABEL}\n시간: {}분\n\n",
                        account.trim(),
                        amount.trim(),
                        minutes.trim()
                    ),
                )
            }
            AdminCommand::ExtendLockup { account, minutes } => {
                let target = require_address("연장 주소", &account)?;
                let mins = require_minutes("연장 시간", &minutes)?;
                PreparedAction::new(
                    ContractCall::ExtendLockup {
                        account: target,
                        minutes: mins,
                    },
                    "락업 연장 완료",
                    format!(
                        "주소: {}\n추가 시간: {}분\n\n",
                        account.trim(),
                        minutes.trim()
                    ),
                )
            }
            AdminCommand::DecreaseLockAmount {
                account,
                new_amount,
            } => {
                let target = require_address("감소 주소", &account)?;
                let wei = require_amount("새 락업 수량", &new_amount, DEFAULT_AMOUNT_MIN)?;
                PreparedAction::new(
                    ContractCall::DecreaseLockAmount {
                        account: target,
                        new_amount: wei,
                    },
                    "락업 수량 감소 완료",
                    format!(
                        "주소: {}\n새로운 락업 수량: {} {TOKEN_UNIT_LABEL}\n\n",
                        account.trim(),
                        new_amount.trim()
                    ),
                )
            }
            AdminCommand::ReleaseLockup { account, amount } => {
                let target = require_address("해제 주소", &account)?;
                let wei = require_amount("해제 수량", &amount, DEFAULT_AMOUNT_MIN)?;
                PreparedAction::new(
                    ContractCall::ReleaseLockup {
                        account: target,
                        amount: wei,
                    },
                    "락업 부분 해제 완료",
                    format!(
                        "주소: {}\n해제된 수량: {} {TOKEN_UNIT_LABEL}\n\n",
                        account.trim(),
                        amount.trim()
                    ),
                )
            }
            AdminCommand::ClearExpiredLockup { account } => {
                let target = require_address("제거 주소", &account)?;
                PreparedAction::new(
                    ContractCall::ClearExpiredLockup { account: target },
                    "만료된 락업 제거 완료",
                    format!("주소: {}\n\n", account.trim()),
                )
            }
            AdminCommand::Transfer { to, amount } => {
                let target = require_address("받는 주소", &to)?;
                let wei = require_amount("전송 수량", &amount, DEFAULT_AMOUNT_MIN)?;
                PreparedAction::new(
                    ContractCall::Transfer {
                        to: target,
                        amount: wei,
                    },
                    "전송 완료!",
                    format!(
                        "받는 주소: {}\n전송 수량: {} {TOKEN_UNIT_LABEL}\n\n",
                        to.trim(),
                        amount.trim()
                    ),
                )
            }
            AdminCommand::MultiTransfer { rows } => {
                let plan = self.preview_multi_transfer(&rows)?;
                let details = format!(
                    "총 수신자: {}명\n총 전송량: {} {TOKEN_UNIT_LABEL}\n\n",
                    plan.len(),
                    format_base_units_fixed(plan.total_wei, 4)
                );
                PreparedAction {
                    call: ContractCall::MultiTransfer {
                        recipients: plan.recipients.clone(),
                        amounts: plan.amounts_wei.clone(),
                    },
                    headline: "멀티 전송 완료!",
                    details,
                    bulk: Some(plan),
                }
            }
            AdminCommand::Burn { amount } => {
                let wei = require_amount("소각 수량", &amount, DEFAULT_AMOUNT_MIN)?;
                PreparedAction::new(
                    ContractCall::Burn { amount: wei },
                    "소각 완료!",
                    format!("소각된 수량: {} {TOKEN_UNIT_LABEL}\n\n", amount.trim()),
                )
            }
        };
        Ok(prepared)
    }

    /// Validates the bulk rows and renders the preview. Submission calls this same function.
    pub fn preview_multi_transfer(
        &self,
        rows: &[BulkTransferRow],
    ) -> Result<BulkTransferPlan, BulkTransferError> {
        match plan_bulk_transfer(rows) {
            Ok(plan) => {
                self.ui
                    .set_result(DisplayField::MultiTransferPreview, render_preview(&plan));
                Ok(plan)
            }
            Err(e) => {
                self.ui
                    .set_result(DisplayField::MultiTransferPreview, render_preview_error(&e));
                Err(e)
            }
        }
    }

    fn execute(&mut self, from: Address, prepared: PreparedAction) -> ActionOutcome {
        let action = prepared.call.kind();
        let network = self.state.network.active();

        let tx_hash = match self.submit(from, &prepared.call) {
            Ok(hash) => hash,
            Err(err) => {
                let classified = classify(&err, network);
                warn!(
                    action = action.method_name(),
                    error = %err,
                    category = ?classified.category,
                    "transaction failed before submission"
                );
                if prepared.bulk.is_some() {
                    self.ui.set_result(
                        DisplayField::MultiTransferPreview,
                        format!("❌ 전송 실패: {}", classified.message),
                    );
                }
                self.ui
                    .notify(Notice::new(NoticeKind::Failure, classified.message.clone()));
                return ActionOutcome::Failed {
                    action,
                    error: ActionError::Chain(classified),
                };
            }
        };

        let explorer_url = network.tx_url(tx_hash);
        let mut pending = PendingTransaction::submitted(tx_hash);
        self.last_transaction = Some(pending);
        if prepared.bulk.is_some() {
            self.ui.set_result(
                DisplayField::MultiTransferPreview,
                format!("⏳ 트랜잭션 처리 중...\n\n해시: {tx_hash}\n\n{explorer_url}"),
            );
        }

        let receipt = self.await_receipt(action, tx_hash);
        pending.confirmed = Some(receipt.is_some());
        self.last_transaction = Some(pending);

        let outcome = match receipt {
            Some(receipt) => {
                info!(
                    action = action.method_name(),
                    %tx_hash,
                    block = ?receipt.block_number,
                    gas_used = ?receipt.gas_used,
                    "transaction confirmed"
                );
                self.notify_confirmed(&prepared, tx_hash, &receipt);
                ActionOutcome::Confirmed {
                    action,
                    tx_hash,
                    gas_used: receipt.gas_used,
                    explorer_url,
                }
            }
            None => {
                self.ui.notify(Notice::new(
                    NoticeKind::Submitted,
                    format!("⚠️ 트랜잭션 전송됨\n\n트랜잭션 해시: {tx_hash}\n\n{explorer_url}"),
                ));
                ActionOutcome::SubmittedUnconfirmed {
                    action,
                    tx_hash,
                    explorer_url,
                }
            }
        };

        self.refresh(action.refresh_scope());
        outcome
    }

    /// Estimate, pad, send. Returns the hash as soon as the wallet accepts the transaction.
    fn submit(&self, from: Address, call: &ContractCall) -> Result<B256, PortError> {
        let action = call.kind();
        let estimate = self.contract.estimate_gas(from, call)?;
        let gas_limit = self.gas.padded_limit(action, estimate);
        debug!(
            action = action.method_name(),
            estimate,
            gas_limit,
            padding = self.gas.padding_for(action),
            "gas estimated"
        );
        let tx_hash = self.contract.submit(from, call, gas_limit)?;
        info!(action = action.method_name(), %tx_hash, gas_limit, "transaction submitted");
        Ok(tx_hash)
    }

    /// `None` when the receipt never arrived or reports a revert.
    fn await_receipt(&self, action: ActionKind, tx_hash: B256) -> Option<TxReceipt> {
        match self.contract.wait_for_confirmation(tx_hash) {
            Ok(receipt) if receipt.success => Some(receipt),
            Ok(_) => {
                warn!(action = action.method_name(), %tx_hash, "receipt reports failure");
                None
            }
            Err(e) => {
                warn!(action = action.method_name(), %tx_hash, error = %e, "confirmation wait failed");
                None
            }
        }
    }

    fn notify_confirmed(&self, prepared: &PreparedAction, tx_hash: B256, receipt: &TxReceipt) {
        if let Some(plan) = &prepared.bulk {
            let total = format_base_units_fixed(plan.total_wei, 4);
            let gas_used = receipt
                .gas_used
                .map(|g| g.to_string())
                .unwrap_or_else(|| "-".to_owned());
            self.ui.set_result(
                DisplayField::MultiTransferPreview,
                format!(
                    "✅ 멀티 전송 완료!\n\n총 수신자: {}명\n총 전송량: {total} {TOKEN_UNIT_LABEL}\n가스 사용: {gas_used}\n\n트랜잭션 해시: {tx_hash}",
                    plan.len()
                ),
            );
            self.ui.notify(Notice::new(
                NoticeKind::Success,
                format!(
                    "✅ 멀티 전송 완료!\n\n{}명에게 {total} {TOKEN_UNIT_LABEL} 전송됨",
                    plan.len()
                ),
            ));
            return;
        }
        self.ui.notify(Notice::new(
            NoticeKind::Success,
            format!(
                "✅ {}\n\n{}트랜잭션 해시: {tx_hash}",
                prepared.headline, prepared.details
            ),
        ));
    }

    pub fn refresh(&self, scope: RefreshScope) -> RefreshReport {
        refresh::refresh(
            &self.contract,
            &self.ui,
            &self.state.session,
            self.state.network.active(),
            scope,
        )
    }

    pub fn check_lockup_info(&self, raw_account: &str) {
        refresh::check_lockup_info(&self.contract, &self.ui, raw_account);
    }

    pub fn check_unlocked_balance(&self, raw_account: &str) {
        refresh::check_unlocked_balance(&self.contract, &self.ui, raw_account);
    }

    pub fn check_balance(&self, raw_account: &str) {
        refresh::check_balance(&self.contract, &self.ui, raw_account);
    }

    /// User-initiated network change.
    pub fn select_network(&mut self, chain_id: u64) -> Result<NetworkTransition, NetworkError> {
        let transition = match self.state.network.transition(chain_id) {
            Ok(t) => t,
            Err(e) => {
                warn!(chain_id, "unsupported network selected");
                self.ui
                    .notify(Notice::new(NoticeKind::Warning, MSG_UNSUPPORTED_NETWORK));
                return Err(e);
            }
        };

        self.update_resolver(chain_id);
        self.sync_network_display();

        if self.state.session.is_connected() {
            let target = self.state.network.active();
            match self.switch_wallet_to(target) {
                Ok(true) => {
                    self.rebuild_contract(chain_id);
                    self.refresh(RefreshScope::All);
                }
                Ok(false) => {}
                Err(e) => self.notify_switch_failure(&e),
            }
        }
        Ok(transition)
    }

    /// Wallet switch with the cancellation notice; `Ok(true)` when the wallet is now on `target`.
    fn switch_wallet_to(&self, target: &NetworkDescriptor) -> Result<bool, PortError> {
        let outcome = switch_wallet_chain(&self.wallet, target)?;
        debug!(chain_id = target.chain_id, ?outcome, "wallet chain switch");
        if outcome == SwitchOutcome::Cancelled {
            self.ui
                .notify(Notice::new(NoticeKind::Info, MSG_SWITCH_CANCELLED));
        }
        Ok(outcome.succeeded())
    }

    fn notify_switch_failure(&self, err: &PortError) {
        let classified = classify(err, self.state.network.active());
        warn!(error = %err, "network switch failed");
        self.ui.notify(Notice::new(
            NoticeKind::Failure,
            format!("{MSG_SWITCH_FAILED}\n\n{}", classified.message),
        ));
    }

    /// Moves the wallet onto the active chain if it is elsewhere, then rebuilds chain-bound
    /// handles. `Ok(false)` when the wallet declined to switch.
    pub fn ensure_wallet_on_active_network(&mut self) -> Result<bool, PortError> {
        let active = self.state.network.active();
        let wallet_chain = self.wallet.chain_id()?;
        if wallet_chain != active.chain_id {
            debug!(wallet_chain, target = active.chain_id, "wallet on a different chain");
            if !self.switch_wallet_to(active)? {
                return Ok(false);
            }
        }
        self.rebuild_contract(active.chain_id);
        self.sync_network_display();
        Ok(true)
    }

    pub fn connect_wallet(&mut self) -> Option<Address> {
        match self.ensure_wallet_on_active_network() {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => {
                self.notify_switch_failure(&e);
                return None;
            }
        }

        let accounts = match self.wallet.request_accounts() {
            Ok(accounts) => accounts,
            Err(e) => {
                let classified = classify(&e, self.state.network.active());
                warn!(error = %e, "eth_requestAccounts failed");
                self.ui
                    .notify(Notice::new(NoticeKind::Failure, classified.message));
                return None;
            }
        };
        if accounts.is_empty() {
            self.ui
                .notify(Notice::new(NoticeKind::Failure, MSG_CONNECT_FAILED));
            return None;
        }

        self.apply_session(&accounts);
        info!(address = %accounts[0], chain_id = self.state.network.active_chain_id(), "wallet connected");
        self.refresh(RefreshScope::All);
        self.state.session.address
    }

    /// Applies an account list reported by the wallet and refreshes when the account changed.
    pub fn set_wallet_session(&mut self, accounts: &[Address]) -> SessionChange {
        let change = self.apply_session(accounts);
        if change.needs_refresh() {
            self.refresh(RefreshScope::All);
        }
        change
    }

    fn apply_session(&mut self, accounts: &[Address]) -> SessionChange {
        let change = session_transition(&mut self.state.session, accounts);
        match change {
            SessionChange::Connected(address) | SessionChange::Switched { to: address, .. } => {
                self.ui
                    .set_result(DisplayField::WalletAddress, address.to_string());
                self.ui.set_connected(true);
            }
            SessionChange::Disconnected => {
                info!("wallet disconnected");
                self.ui.set_result(
                    DisplayField::WalletAddress,
                    MSG_NOT_CONNECTED_LABEL.to_owned(),
                );
                self.ui.set_connected(false);
                self.ui.set_owner_controls(false);
            }
            SessionChange::Unchanged => {}
        }
        debug!(?change, "wallet session transition");
        change
    }

    pub fn apply_wallet_event(&mut self, event: WalletEvent) {
        match event {
            WalletEvent::AccountsChanged(accounts) => {
                self.set_wallet_session(&accounts);
            }
            WalletEvent::ChainChanged(chain_id) => self.apply_wallet_chain(chain_id),
        }
    }

    pub fn poll_wallet_events(&mut self) {
        match self.wallet.drain_events() {
            Ok(events) => {
                for event in events {
                    self.apply_wallet_event(event);
                }
            }
            Err(e) => warn!(error = %e, "failed to drain wallet events"),
        }
    }

    /// Wallet-originated chain change: same side effects as a selection, minus the switch request.
    fn apply_wallet_chain(&mut self, chain_id: u64) {
        if descriptor(chain_id).is_none() {
            debug!(chain_id, "ignoring chainChanged to unsupported chain");
            return;
        }
        if let Err(e) = self.state.network.transition(chain_id) {
            warn!(chain_id, error = %e, "chain transition rejected");
            return;
        }
        self.update_resolver(chain_id);
        self.rebuild_contract(chain_id);
        self.sync_network_display();
        if self.state.session.is_connected() {
            self.refresh(RefreshScope::All);
        }
    }

    pub fn add_token_to_wallet(&mut self) -> bool {
        // Proceeds even when the switch is declined; the wallet decides what to show.
        if let Err(e) = self.ensure_wallet_on_active_network() {
            warn!(error = %e, "network check before watchAsset failed");
        }

        let Some(address) = self.contract_address() else {
            self.ui.notify(Notice::new(
                NoticeKind::Failure,
                format!("{MSG_TOKEN_ADD_FAILED}{MSG_NO_CONTRACT_ADDRESS}"),
            ));
            return false;
        };

        let params = WatchAssetParams {
            address,
            symbol: WATCH_ASSET_SYMBOL.to_owned(),
            decimals: WATCH_ASSET_DECIMALS,
            image: self.token_logo_url.clone(),
        };
        match self.wallet.watch_asset(&params) {
            Ok(Some(false)) => {
                debug!(%address, "wallet declined watchAsset");
                false
            }
            Ok(_) => {
                self.ui.notify(Notice::new(NoticeKind::Success, MSG_TOKEN_ADDED));
                true
            }
            Err(e) => {
                let classified = classify(&e, self.state.network.active());
                self.ui.notify(Notice::new(
                    NoticeKind::Failure,
                    format!("{MSG_TOKEN_ADD_FAILED}{}", classified.message),
                ));
                false
            }
        }
    }

    fn update_resolver(&self, chain_id: u64) {
        if let Some(resolver) = &self.resolver {
            resolver.update_contract_address(chain_id);
        }
    }

    fn rebuild_contract(&self, chain_id: u64) {
        if let Err(e) = self.contract.rebuild(chain_id) {
            warn!(chain_id, error = %e, "provider rebuild failed");
        }
    }

    /// Network label plus the three explorer links for the current contract. Links are
    /// cleared when the active chain has no contract.
    pub fn sync_network_display(&self) {
        let network = self.state.network.active();
        self.ui
            .set_result(DisplayField::NetworkDisplay, network.display_label());
        let links = match self.contract_address() {
            Some(contract) => [
                network.address_url(contract),
                network.token_url(contract),
                network.holders_url(contract),
            ],
            None => {
                debug!(chain_id = network.chain_id, "no contract on active chain");
                [NO_LINK.to_owned(), NO_LINK.to_owned(), NO_LINK.to_owned()]
            }
        };
        let [contract, tracker, holders] = links;
        self.ui.set_result(DisplayField::ExplorerContract, contract);
        self.ui.set_result(DisplayField::ExplorerTokenTracker, tracker);
        self.ui.set_result(DisplayField::ExplorerHolders, holders);
    }

    pub fn bulk_rows_mut(&mut self) -> &mut [BulkTransferRow] {
        self.state.bulk_rows.rows_mut()
    }

    pub fn bulk_rows(&self) -> Vec<BulkTransferRow> {
        self.state.bulk_rows.rows().to_vec()
    }

    pub fn add_bulk_row(&mut self) {
        if let Err(e) = self.state.bulk_rows.add_row() {
            self.ui.notify(Notice::new(NoticeKind::Warning, e.to_string()));
        }
    }

    pub fn remove_bulk_row(&mut self) {
        self.state.bulk_rows.remove_row();
    }

    pub fn fill_bulk_rows(&mut self) {
        self.state.bulk_rows.fill_to_maximum();
    }

    pub fn set_bulk_row_count(&mut self, raw: &str) -> Result<usize, RowCountError> {
        match self.state.bulk_rows.set_row_count(raw) {
            Ok(n) => {
                self.ui.notify(Notice::new(
                    NoticeKind::Info,
                    format!("{n}개의 입력 줄이 생성되었습니다."),
                ));
                Ok(n)
            }
            Err(e) => {
                self.ui.notify(Notice::new(NoticeKind::Warning, e.to_string()));
                Err(e)
            }
        }
    }

    /// Submits the rows currently held in the state.
    pub fn execute_multi_transfer(&mut self) -> ActionOutcome {
        let rows = self.bulk_rows();
        self.handle(AdminCommand::MultiTransfer { rows })
    }

    /// Base-unit total of the rows currently held in the state, if they validate.
    pub fn bulk_total(&self) -> Option<U256> {
        plan_bulk_transfer(self.state.bulk_rows.rows())
            .ok()
            .map(|p| p.total_wei)
    }
}
