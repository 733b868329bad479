#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, B256, U256};

use token_admin_core::domain::{
    AddChainParams, ContractCall, DisplayField, LockupRecord, Notice, NoticeKind, TxReceipt,
    WalletEvent, WatchAssetParams,
};
use token_admin_core::{
    AddressResolverPort, Orchestrator, PortError, ProviderError, TokenContractPort, UiPort,
    WalletPort,
};

pub const ALICE: &str = "0x1111111111111111111111111111111111111111";
pub const BOB: &str = "0x2222222222222222222222222222222222222222";
pub const OWNER: &str = "0x000000000000000000000000000000000000bEEF";
pub const CONTRACT: &str = "0x00000000000000000000000000000000000C0DE0";

pub fn addr(raw: &str) -> Address {
    raw.parse().expect("valid test address")
}

pub fn ether(n: u64) -> U256 {
    U256::from(n) * U256::from(1_000_000_000_000_000_000u128)
}

pub fn tx_hash(seed: u8) -> B256 {
    B256::repeat_byte(seed)
}

#[derive(Debug)]
pub struct WalletState {
    pub accounts: Vec<Address>,
    pub chain_id: u64,
    pub known_chains: HashSet<String>,
    pub switch_error: Option<PortError>,
    pub add_error: Option<PortError>,
    pub accounts_error: Option<PortError>,
    pub watch_result: Result<Option<bool>, PortError>,
    pub events: VecDeque<WalletEvent>,
    pub switch_requests: Vec<String>,
    pub add_requests: Vec<AddChainParams>,
    pub watch_requests: Vec<WatchAssetParams>,
}

#[derive(Debug)]
pub struct FakeWallet {
    pub state: Mutex<WalletState>,
}

impl FakeWallet {
    pub fn on_chain(chain_id: u64, accounts: Vec<Address>) -> Self {
        let known_chains = ["0x89", "0xaa36a7"].iter().map(|s| s.to_string()).collect();
        Self {
            state: Mutex::new(WalletState {
                accounts,
                chain_id,
                known_chains,
                switch_error: None,
                add_error: None,
                accounts_error: None,
                watch_result: Ok(Some(true)),
                events: VecDeque::new(),
                switch_requests: Vec::new(),
                add_requests: Vec::new(),
                watch_requests: Vec::new(),
            }),
        }
    }

    pub fn lock(&self) -> std::sync::MutexGuard<'_, WalletState> {
        self.state.lock().expect("wallet state lock")
    }
}

fn parse_hex_chain(hex: &str) -> u64 {
    u64::from_str_radix(hex.trim_start_matches("0x"), 16).expect("hex chain id")
}

impl WalletPort for FakeWallet {
    fn request_accounts(&self) -> Result<Vec<Address>, PortError> {
        let state = self.lock();
        match &state.accounts_error {
            Some(e) => Err(e.clone()),
            None => Ok(state.accounts.clone()),
        }
    }

    fn chain_id(&self) -> Result<u64, PortError> {
        Ok(self.lock().chain_id)
    }

    fn switch_chain(&self, chain_id_hex: &str) -> Result<(), PortError> {
        let mut state = self.lock();
        state.switch_requests.push(chain_id_hex.to_owned());
        if let Some(e) = &state.switch_error {
            return Err(e.clone());
        }
        if !state.known_chains.contains(chain_id_hex) {
            return Err(ProviderError::new(4902, "Unrecognized chain ID").into());
        }
        state.chain_id = parse_hex_chain(chain_id_hex);
        Ok(())
    }

    fn add_chain(&self, params: &AddChainParams) -> Result<(), PortError> {
        let mut state = self.lock();
        state.add_requests.push(params.clone());
        if let Some(e) = &state.add_error {
            return Err(e.clone());
        }
        state.known_chains.insert(params.chain_id.clone());
        state.chain_id = parse_hex_chain(&params.chain_id);
        Ok(())
    }

    fn watch_asset(&self, asset: &WatchAssetParams) -> Result<Option<bool>, PortError> {
        let mut state = self.lock();
        state.watch_requests.push(asset.clone());
        state.watch_result.clone()
    }

    fn drain_events(&self) -> Result<Vec<WalletEvent>, PortError> {
        Ok(self.lock().events.drain(..).collect())
    }
}

#[derive(Debug)]
pub struct ContractState {
    pub owner: Address,
    pub paused: bool,
    pub balances: HashMap<Address, U256>,
    pub locked: HashMap<Address, U256>,
    pub lockups: HashMap<Address, LockupRecord>,
    pub native: U256,
    pub failing_reads: HashSet<&'static str>,
    pub estimate: Result<u64, PortError>,
    pub submit: Result<B256, PortError>,
    pub confirmation: Result<TxReceipt, PortError>,
    pub calls: Vec<&'static str>,
    pub estimated: Vec<ContractCall>,
    pub submitted: Vec<(ContractCall, u64)>,
    pub rebuilds: Vec<u64>,
}

#[derive(Debug)]
pub struct FakeContract {
    pub state: Mutex<ContractState>,
}

impl Default for FakeContract {
    fn default() -> Self {
        let hash = tx_hash(0xab);
        Self {
            state: Mutex::new(ContractState {
                owner: addr(OWNER),
                paused: false,
                balances: HashMap::new(),
                locked: HashMap::new(),
                lockups: HashMap::new(),
                native: ether(3),
                failing_reads: HashSet::new(),
                estimate: Ok(100_000),
                submit: Ok(hash),
                confirmation: Ok(TxReceipt {
                    tx_hash: hash,
                    block_number: Some(42),
                    gas_used: Some(90_000),
                    success: true,
                }),
                calls: Vec::new(),
                estimated: Vec::new(),
                submitted: Vec::new(),
                rebuilds: Vec::new(),
            }),
        }
    }
}

impl FakeContract {
    pub fn lock(&self) -> std::sync::MutexGuard<'_, ContractState> {
        self.state.lock().expect("contract state lock")
    }

    fn read<T>(&self, name: &'static str, f: impl FnOnce(&ContractState) -> T) -> Result<T, PortError> {
        let mut state = self.lock();
        state.calls.push(name);
        if state.failing_reads.contains(name) {
            return Err(PortError::Transport(format!("{name} unavailable")));
        }
        Ok(f(&state))
    }
}

impl TokenContractPort for FakeContract {
    fn rebuild(&self, chain_id: u64) -> Result<(), PortError> {
        self.lock().rebuilds.push(chain_id);
        Ok(())
    }

    fn name(&self) -> Result<String, PortError> {
        self.read("name", |_| "Custom Token".to_owned())
    }

    fn symbol(&self) -> Result<String, PortError> {
        self.read("symbol", |_| "CTK".to_owned())
    }

    fn decimals(&self) -> Result<u8, PortError> {
        self.read("decimals", |_| 18)
    }

    fn total_supply(&self) -> Result<U256, PortError> {
        self.read("total_supply", |_| ether(1_000))
    }

    fn paused(&self) -> Result<bool, PortError> {
        self.read("paused", |s| s.paused)
    }

    fn owner(&self) -> Result<Address, PortError> {
        self.read("owner", |s| s.owner)
    }

    fn balance_of(&self, account: Address) -> Result<U256, PortError> {
        self.read("balance_of", |s| {
            s.balances.get(&account).copied().unwrap_or_default()
        })
    }

    fn locked_balance(&self, account: Address) -> Result<U256, PortError> {
        self.read("locked_balance", |s| {
            s.locked.get(&account).copied().unwrap_or_default()
        })
    }

    fn unlocked_balance_of(&self, account: Address) -> Result<U256, PortError> {
        self.read("unlocked_balance_of", |s| {
            let total = s.balances.get(&account).copied().unwrap_or_default();
            let locked = s.locked.get(&account).copied().unwrap_or_default();
            total.saturating_sub(locked)
        })
    }

    fn locked_info(&self, account: Address) -> Result<LockupRecord, PortError> {
        self.read("locked_info", |s| {
            s.lockups.get(&account).copied().unwrap_or(LockupRecord {
                locked_amount: U256::ZERO,
                remaining_seconds: U256::ZERO,
                expiration_timestamp: U256::ZERO,
            })
        })
    }

    fn native_balance(&self, _account: Address) -> Result<U256, PortError> {
        self.read("native_balance", |s| s.native)
    }

    fn estimate_gas(&self, _from: Address, call: &ContractCall) -> Result<u64, PortError> {
        let mut state = self.lock();
        state.estimated.push(call.clone());
        state.estimate.clone()
    }

    fn submit(&self, _from: Address, call: &ContractCall, gas_limit: u64) -> Result<B256, PortError> {
        let mut state = self.lock();
        state.submitted.push((call.clone(), gas_limit));
        state.submit.clone()
    }

    fn wait_for_confirmation(&self, _tx_hash: B256) -> Result<TxReceipt, PortError> {
        self.lock().confirmation.clone()
    }
}

#[derive(Debug, Default)]
pub struct UiLog {
    pub notices: Vec<Notice>,
    pub fields: HashMap<DisplayField, String>,
    pub connected: Option<bool>,
    pub owner_controls: Option<bool>,
}

#[derive(Debug, Default)]
pub struct RecordingUi {
    pub log: Mutex<UiLog>,
}

impl RecordingUi {
    pub fn lock(&self) -> std::sync::MutexGuard<'_, UiLog> {
        self.log.lock().expect("ui log lock")
    }

    pub fn field(&self, field: DisplayField) -> Option<String> {
        self.lock().fields.get(&field).cloned()
    }

    pub fn last_notice(&self) -> Option<Notice> {
        self.lock().notices.last().cloned()
    }

    pub fn notices_of(&self, kind: NoticeKind) -> Vec<String> {
        self.lock()
            .notices
            .iter()
            .filter(|n| n.kind == kind)
            .map(|n| n.body.clone())
            .collect()
    }
}

impl UiPort for RecordingUi {
    fn notify(&self, notice: Notice) {
        self.lock().notices.push(notice);
    }

    fn set_result(&self, field: DisplayField, text: String) {
        self.lock().fields.insert(field, text);
    }

    fn set_connected(&self, connected: bool) {
        self.lock().connected = Some(connected);
    }

    fn set_owner_controls(&self, enabled: bool) {
        self.lock().owner_controls = Some(enabled);
    }
}

/// Resolver that returns the same address on every chain except those in `undeployed`,
/// and records the updates.
#[derive(Debug, Clone, Default)]
pub struct FakeResolver {
    pub updates: Arc<Mutex<Vec<u64>>>,
    pub undeployed: Arc<Mutex<HashSet<u64>>>,
}

impl AddressResolverPort for FakeResolver {
    fn update_contract_address(&self, chain_id: u64) {
        self.updates.lock().expect("resolver lock").push(chain_id);
    }

    fn contract_address(&self) -> Option<Address> {
        let current = self.updates.lock().expect("resolver lock").last().copied();
        let undeployed = self.undeployed.lock().expect("resolver lock");
        match current {
            Some(chain_id) if undeployed.contains(&chain_id) => None,
            _ => Some(addr(CONTRACT)),
        }
    }
}

pub type TestOrchestrator = Orchestrator<FakeWallet, FakeContract, RecordingUi>;

pub fn orchestrator_with_wallet(wallet: FakeWallet) -> (TestOrchestrator, FakeResolver) {
    let resolver = FakeResolver::default();
    let orch = Orchestrator::new(wallet, FakeContract::default(), RecordingUi::default())
        .with_resolver(Box::new(resolver.clone()));
    (orch, resolver)
}

pub fn disconnected() -> (TestOrchestrator, FakeResolver) {
    orchestrator_with_wallet(FakeWallet::on_chain(137, vec![addr(ALICE)]))
}

/// Orchestrator with ALICE connected on Polygon; connection notices cleared.
pub fn connected() -> (TestOrchestrator, FakeResolver) {
    let (mut orch, resolver) = disconnected();
    orch.connect_wallet().expect("wallet connects");
    orch.ui.lock().notices.clear();
    orch.contract.lock().calls.clear();
    (orch, resolver)
}
