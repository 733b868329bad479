use std::collections::{BTreeSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use alloy::primitives::{keccak256, Address};
use serde_json::{json, Value};
use tracing::debug;

use token_admin_core::domain::{AddChainParams, WalletEvent, WatchAssetParams};
use token_admin_core::network::DEFAULT_CHAIN_ID;
use token_admin_core::ports::UNRECOGNIZED_CHAIN_CODE;
use token_admin_core::{PortError, ProviderError, WalletPort};

use crate::AdapterConfig;

/// Wallet transport speaking EIP-1193 request semantics.
///
/// Cloning shares the underlying session state, so the wallet port and the contract adapter
/// observe the same accounts and chain.
#[derive(Debug, Clone)]
pub struct Eip1193Adapter {
    mode: ProviderMode,
    state: Arc<Mutex<ProviderState>>,
}

#[derive(Debug, Clone)]
enum ProviderMode {
    Disabled(String),
    Deterministic,
    Proxy(ProxyRuntime),
}

#[derive(Debug, Clone)]
struct ProxyRuntime {
    base_url: String,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Clone)]
struct ProviderState {
    accounts: Vec<Address>,
    chain_id: u64,
    /// Chains the deterministic wallet accepts without `wallet_addEthereumChain`.
    known_chains: BTreeSet<u64>,
    /// Set once accounts have been requested; proxy polling only diffs after that.
    observed: bool,
    sent_count: u64,
    events: VecDeque<WalletEvent>,
}

impl Default for ProviderState {
    fn default() -> Self {
        Self {
            accounts: vec![Address::with_last_byte(1)],
            chain_id: DEFAULT_CHAIN_ID,
            known_chains: BTreeSet::from([DEFAULT_CHAIN_ID]),
            observed: false,
            sent_count: 0,
            events: VecDeque::new(),
        }
    }
}

impl Default for Eip1193Adapter {
    fn default() -> Self {
        Self::with_config(AdapterConfig::default())
    }
}

impl Eip1193Adapter {
    pub fn with_config(config: AdapterConfig) -> Self {
        let mode = if let Some(ref base_url) = config.eip1193_proxy_url {
            let timeout = Duration::from_millis(config.rpc_timeout_ms);
            match reqwest::blocking::Client::builder().timeout(timeout).build() {
                Ok(client) => ProviderMode::Proxy(ProxyRuntime {
                    base_url: base_url.clone(),
                    client,
                }),
                Err(e) => {
                    if config.strict_runtime_required() {
                        ProviderMode::Disabled(format!(
                            "failed to initialize EIP-1193 proxy client in production profile: {e}"
                        ))
                    } else {
                        ProviderMode::Deterministic
                    }
                }
            }
        } else if config.strict_runtime_required() {
            ProviderMode::Disabled(
                "EIP-1193 proxy URL not configured in production runtime profile".to_owned(),
            )
        } else {
            ProviderMode::Deterministic
        };
        debug!(mode = mode.label(), "eip1193 adapter initialised");

        Self {
            mode,
            state: Arc::new(Mutex::new(ProviderState::default())),
        }
    }

    pub fn is_deterministic(&self) -> bool {
        matches!(self.mode, ProviderMode::Deterministic)
    }

    fn check_mode(&self) -> Result<(), PortError> {
        if let ProviderMode::Disabled(reason) = &self.mode {
            return Err(PortError::Policy(reason.clone()));
        }
        Ok(())
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, ProviderState>, PortError> {
        self.state
            .lock()
            .map_err(|e| PortError::Transport(format!("provider lock poisoned: {e}")))
    }

    /// Issues one EIP-1193 request and returns its `result`.
    pub fn request(&self, method: &str, params: Value) -> Result<Value, PortError> {
        match &self.mode {
            ProviderMode::Disabled(reason) => Err(PortError::Policy(reason.clone())),
            ProviderMode::Proxy(proxy) => proxy_call(proxy, method, params),
            ProviderMode::Deterministic => self.deterministic_request(method, &params),
        }
    }

    fn deterministic_request(&self, method: &str, params: &Value) -> Result<Value, PortError> {
        let mut g = self.lock_state()?;
        match method {
            "eth_requestAccounts" | "eth_accounts" => Ok(json!(g
                .accounts
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>())),
            "eth_chainId" => Ok(json!(format!("{:#x}", g.chain_id))),
            "wallet_switchEthereumChain" => {
                let chain_id = params
                    .get(0)
                    .and_then(|p| p.get("chainId"))
                    .ok_or_else(|| PortError::Validation("missing chainId".to_owned()))
                    .and_then(json_chain_id_to_u64)?;
                if !g.known_chains.contains(&chain_id) {
                    return Err(ProviderError::new(
                        UNRECOGNIZED_CHAIN_CODE,
                        format!("Unrecognized chain ID {chain_id:#x}"),
                    )
                    .into());
                }
                if g.chain_id != chain_id {
                    g.chain_id = chain_id;
                    g.events.push_back(WalletEvent::ChainChanged(chain_id));
                }
                Ok(Value::Null)
            }
            "wallet_addEthereumChain" => {
                let chain_id = params
                    .get(0)
                    .and_then(|p| p.get("chainId"))
                    .ok_or_else(|| PortError::Validation("missing chainId".to_owned()))
                    .and_then(json_chain_id_to_u64)?;
                g.known_chains.insert(chain_id);
                if g.chain_id != chain_id {
                    g.chain_id = chain_id;
                    g.events.push_back(WalletEvent::ChainChanged(chain_id));
                }
                Ok(Value::Null)
            }
            "wallet_watchAsset" => Ok(Value::Bool(true)),
            "eth_getBalance" => Ok(json!("0x0")),
            "eth_sendTransaction" => {
                g.sent_count = g.sent_count.saturating_add(1);
                let mut seed = g.sent_count.to_be_bytes().to_vec();
                seed.extend_from_slice(params.to_string().as_bytes());
                Ok(json!(keccak256(seed).to_string()))
            }
            _ => Err(PortError::NotImplemented(
                "deterministic wallet does not serve node queries",
            )),
        }
    }

    pub fn debug_inject_accounts_changed(&self, accounts: Vec<Address>) -> Result<(), PortError> {
        let mut g = self.lock_state()?;
        g.accounts = accounts.clone();
        g.events.push_back(WalletEvent::AccountsChanged(accounts));
        Ok(())
    }

    pub fn debug_inject_chain_changed(&self, chain_id: u64) -> Result<(), PortError> {
        let mut g = self.lock_state()?;
        g.chain_id = chain_id;
        g.known_chains.insert(chain_id);
        g.events.push_back(WalletEvent::ChainChanged(chain_id));
        Ok(())
    }

    /// Diffs the bridge's current accounts and chain against the last snapshot.
    fn poll_proxy_snapshot(&self) -> Result<(), PortError> {
        if !self.lock_state()?.observed {
            return Ok(());
        }
        let accounts = parse_accounts(&self.request("eth_accounts", json!([]))?)?;
        let chain_id = json_chain_id_to_u64(&self.request("eth_chainId", json!([]))?)?;

        let mut g = self.lock_state()?;
        if g.accounts != accounts {
            g.accounts = accounts.clone();
            g.events.push_back(WalletEvent::AccountsChanged(accounts));
        }
        if g.chain_id != chain_id {
            g.chain_id = chain_id;
            g.events.push_back(WalletEvent::ChainChanged(chain_id));
        }
        Ok(())
    }
}

impl ProviderMode {
    fn label(&self) -> &'static str {
        match self {
            ProviderMode::Disabled(_) => "disabled",
            ProviderMode::Deterministic => "deterministic",
            ProviderMode::Proxy(_) => "proxy",
        }
    }
}

impl WalletPort for Eip1193Adapter {
    fn request_accounts(&self) -> Result<Vec<Address>, PortError> {
        self.check_mode()?;
        let accounts = parse_accounts(&self.request("eth_requestAccounts", json!([]))?)?;
        let mut g = self.lock_state()?;
        g.accounts = accounts.clone();
        g.observed = true;
        Ok(accounts)
    }

    fn chain_id(&self) -> Result<u64, PortError> {
        self.check_mode()?;
        let chain_id = json_chain_id_to_u64(&self.request("eth_chainId", json!([]))?)?;
        self.lock_state()?.chain_id = chain_id;
        Ok(chain_id)
    }

    fn switch_chain(&self, chain_id_hex: &str) -> Result<(), PortError> {
        self.check_mode()?;
        self.request(
            "wallet_switchEthereumChain",
            json!([{ "chainId": chain_id_hex }]),
        )?;
        // The wallet also emits chainChanged; drain_events reports it.
        self.lock_state()?.chain_id = parse_chain_id_str(chain_id_hex)?;
        Ok(())
    }

    fn add_chain(&self, params: &AddChainParams) -> Result<(), PortError> {
        self.check_mode()?;
        let params = serde_json::to_value(params)
            .map_err(|e| PortError::Validation(format!("invalid chain params: {e}")))?;
        self.request("wallet_addEthereumChain", json!([params]))?;
        Ok(())
    }

    fn watch_asset(&self, asset: &WatchAssetParams) -> Result<Option<bool>, PortError> {
        self.check_mode()?;
        let options = serde_json::to_value(asset)
            .map_err(|e| PortError::Validation(format!("invalid asset params: {e}")))?;
        let result = self.request(
            "wallet_watchAsset",
            json!({ "type": "ERC20", "options": options }),
        )?;
        Ok(result.as_bool())
    }

    fn drain_events(&self) -> Result<Vec<WalletEvent>, PortError> {
        self.check_mode()?;
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            self.poll_proxy_snapshot()?;
        }
        Ok(self.lock_state()?.events.drain(..).collect())
    }
}

fn proxy_call(proxy: &ProxyRuntime, method: &str, params: Value) -> Result<Value, PortError> {
    let payload = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method,
        "params": params,
    });
    let response = proxy
        .client
        .post(&proxy.base_url)
        .json(&payload)
        .send()
        .map_err(|e| {
            if e.is_timeout() {
                PortError::Timeout(format!("{method}: {e}"))
            } else {
                PortError::Transport(format!("eip1193 proxy request failed: {e}"))
            }
        })?;
    let status = response.status();
    let body: Value = response
        .json()
        .map_err(|e| PortError::Transport(format!("eip1193 proxy json decode failed: {e}")))?;
    if let Some(err) = body.get("error").filter(|e| !e.is_null()) {
        return Err(ProviderError::from_value(err).into());
    }
    if !status.is_success() {
        return Err(PortError::Transport(format!(
            "eip1193 proxy status {status}: {body}"
        )));
    }
    body.get("result")
        .cloned()
        .ok_or_else(|| PortError::Transport("eip1193 proxy missing result".to_owned()))
}

fn parse_accounts(result: &Value) -> Result<Vec<Address>, PortError> {
    let arr = result
        .as_array()
        .ok_or_else(|| PortError::Transport("accounts result must be array".to_owned()))?;
    arr.iter()
        .map(|item| {
            item.as_str()
                .ok_or_else(|| PortError::Transport("account item must be string".to_owned()))?
                .parse::<Address>()
                .map_err(|e| PortError::Validation(format!("invalid account: {e}")))
        })
        .collect()
}

pub(crate) fn json_chain_id_to_u64(value: &Value) -> Result<u64, PortError> {
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    let s = value
        .as_str()
        .ok_or_else(|| PortError::Validation("chain id must be string or number".to_owned()))?;
    parse_chain_id_str(s)
}

pub(crate) fn parse_chain_id_str(raw: &str) -> Result<u64, PortError> {
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
            .map_err(|e| PortError::Validation(format!("invalid hex chain id: {e}")))
    } else {
        raw.parse()
            .map_err(|e| PortError::Validation(format!("invalid chain id: {e}")))
    }
}
