//! Read-only contract queries feeding the dashboard's display fields.
//!
//! Every query is independent: a failed read is logged and rendered locally, it never
//! aborts its siblings or the action that triggered the refresh.

use std::sync::Mutex;
use std::thread;

use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::domain::{
    BalanceBreakdown, DisplayField, LockupRecord, RefreshScope, WalletRole, WalletSession,
    TOKEN_UNIT_LABEL,
};
use crate::network::NetworkDescriptor;
use crate::ports::{PortError, TokenContractPort, UiPort};
use crate::validation::{format_base_units, format_base_units_fixed, require_address};

pub const LOOKUP_FAILED_PREFIX: &str = "조회 실패: ";
pub const NO_ACTIVE_LOCKUP: &str = "❌ 락업 상태가 아닙니다.";

/// Names of the queries that failed during one refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub failed: Vec<&'static str>,
}

impl RefreshReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

struct FailureLog(Mutex<Vec<&'static str>>);

impl FailureLog {
    fn new() -> Self {
        Self(Mutex::new(Vec::new()))
    }

    fn record(&self, query: &'static str, err: &PortError) {
        warn!(query, error = %err, "read query failed");
        if let Ok(mut failed) = self.0.lock() {
            failed.push(query);
        }
    }

    fn into_report(self) -> RefreshReport {
        let mut failed = self.0.into_inner().unwrap_or_default();
        failed.sort_unstable();
        RefreshReport { failed }
    }
}

/// Re-reads everything in `scope` for the connected account. No-op without a session.
pub fn refresh<C, U>(
    contract: &C,
    ui: &U,
    session: &WalletSession,
    network: &NetworkDescriptor,
    scope: RefreshScope,
) -> RefreshReport
where
    C: TokenContractPort + Sync,
    U: UiPort + Sync,
{
    let Some(account) = session.address else {
        debug!(?scope, "refresh skipped, no wallet session");
        return RefreshReport::default();
    };

    let failures = FailureLog::new();
    thread::scope(|s| {
        if scope.includes_wallet() {
            s.spawn(|| refresh_native_balance(contract, ui, &failures, account, network));
            s.spawn(|| refresh_token_balance(contract, ui, &failures, account));
            s.spawn(|| refresh_role(contract, ui, &failures, account));
        }
        if scope.includes_contract() {
            refresh_contract_globals(s, contract, ui, &failures);
        }
    });
    failures.into_report()
}

fn refresh_native_balance<C: TokenContractPort, U: UiPort>(
    contract: &C,
    ui: &U,
    failures: &FailureLog,
    account: Address,
    network: &NetworkDescriptor,
) {
    let text = match contract.native_balance(account) {
        Ok(wei) => format!(
            "{} {}",
            format_base_units_fixed(wei, 4),
            network.native_currency
        ),
        Err(e) => {
            failures.record("native_balance", &e);
            "잔액 확인 실패".to_owned()
        }
    };
    ui.set_result(DisplayField::WalletBalance, text);
}

fn refresh_token_balance<C: TokenContractPort, U: UiPort>(
    contract: &C,
    ui: &U,
    failures: &FailureLog,
    account: Address,
) {
    let text = match contract.balance_of(account) {
        Ok(wei) => format!("{} {TOKEN_UNIT_LABEL}", format_base_units_fixed(wei, 2)),
        Err(e) => {
            failures.record("token_balance", &e);
            "토큰 잔액 확인 실패".to_owned()
        }
    };
    ui.set_result(DisplayField::TokenBalance, text);
}

/// The role only gates owner-only controls in the UI.
fn refresh_role<C: TokenContractPort, U: UiPort>(
    contract: &C,
    ui: &U,
    failures: &FailureLog,
    account: Address,
) {
    match contract.owner() {
        Ok(owner) => {
            let role = WalletRole::resolve(account, owner);
            ui.set_result(DisplayField::WalletRole, role.label().to_owned());
            ui.set_owner_controls(role == WalletRole::Owner);
        }
        Err(e) => {
            failures.record("role", &e);
            ui.set_result(DisplayField::WalletRole, "권한 확인 실패".to_owned());
            ui.set_owner_controls(false);
        }
    }
}

fn refresh_contract_globals<'scope, 'env, C, U>(
    s: &'scope thread::Scope<'scope, 'env>,
    contract: &'env C,
    ui: &'env U,
    failures: &'env FailureLog,
) where
    C: TokenContractPort + Sync,
    U: UiPort + Sync,
{
    s.spawn(move || match contract.name() {
        Ok(v) => ui.set_result(DisplayField::ContractName, v),
        Err(e) => failures.record("name", &e),
    });
    s.spawn(move || match contract.symbol() {
        Ok(v) => ui.set_result(DisplayField::ContractSymbol, v),
        Err(e) => failures.record("symbol", &e),
    });
    s.spawn(move || match contract.decimals() {
        Ok(v) => ui.set_result(DisplayField::ContractDecimals, v.to_string()),
        Err(e) => failures.record("decimals", &e),
    });
    s.spawn(move || match contract.total_supply() {
        Ok(v) => ui.set_result(
            DisplayField::TotalSupply,
            format!("{} {TOKEN_UNIT_LABEL}", format_base_units(v)),
        ),
        Err(e) => failures.record("total_supply", &e),
    });
    s.spawn(move || match contract.paused() {
        Ok(paused) => ui.set_result(DisplayField::Paused, paused_label(paused).to_owned()),
        Err(e) => failures.record("paused", &e),
    });
    s.spawn(move || match contract.owner() {
        Ok(owner) => ui.set_result(DisplayField::Owner, owner.to_string()),
        Err(e) => failures.record("owner", &e),
    });
}

pub fn paused_label(paused: bool) -> &'static str {
    if paused {
        "일시정지 상태"
    } else {
        "정상"
    }
}

pub fn read_balance_breakdown<C: TokenContractPort>(
    contract: &C,
    account: Address,
) -> Result<BalanceBreakdown, PortError> {
    Ok(BalanceBreakdown {
        unlocked: contract.unlocked_balance_of(account)?,
        total: contract.balance_of(account)?,
        locked: contract.locked_balance(account)?,
    })
}

/// `1일 2시간 3분 4초`; leading zero units are omitted, seconds always shown.
pub fn format_remaining(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;

    let mut out = String::new();
    if days > 0 {
        out.push_str(&format!("{days}일 "));
    }
    if hours > 0 {
        out.push_str(&format!("{hours}시간 "));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}분 "));
    }
    out.push_str(&format!("{secs}초"));
    out
}

fn saturating_u64(v: U256) -> u64 {
    u64::try_from(v).unwrap_or(u64::MAX)
}

fn format_utc(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

pub fn render_lockup(record: &LockupRecord, now: DateTime<Utc>) -> String {
    if !record.is_active() {
        return NO_ACTIVE_LOCKUP.to_owned();
    }
    format!(
        "✅ 락업 정보\n\n🔒 락업 수량: {} {TOKEN_UNIT_LABEL}\n⏱ 남은 시간: {}\n📅 만료 일시: {}\n🌐 현재 시간: {}",
        format_base_units(record.locked_amount),
        format_remaining(saturating_u64(record.remaining_seconds)),
        format_utc(saturating_u64(record.expiration_timestamp)),
        now.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

pub fn render_breakdown(b: &BalanceBreakdown) -> String {
    format!(
        "✅ 잔액 정보\n\n💰 전체 보유: {} {TOKEN_UNIT_LABEL}\n🔒 락업 중: {} {TOKEN_UNIT_LABEL}\n✅ 사용 가능: {} {TOKEN_UNIT_LABEL}",
        format_base_units(b.total),
        format_base_units(b.locked),
        format_base_units(b.unlocked),
    )
}

pub fn render_balance(total: U256) -> String {
    format!(
        "💰 전체 잔액: {} {TOKEN_UNIT_LABEL}\n\n💡 이 중 일부는 락업되어 있을 수 있습니다.",
        format_base_units(total)
    )
}

fn lookup<U, T>(
    ui: &U,
    field: DisplayField,
    raw: &str,
    query: impl FnOnce(Address) -> Result<T, PortError>,
    render: impl FnOnce(&T) -> String,
) -> Option<T>
where
    U: UiPort,
{
    let account = match require_address("조회 주소", raw) {
        Ok(a) => a,
        Err(e) => {
            ui.set_result(field, format!("{LOOKUP_FAILED_PREFIX}{e}"));
            return None;
        }
    };
    match query(account) {
        Ok(value) => {
            ui.set_result(field, render(&value));
            Some(value)
        }
        Err(e) => {
            warn!(?field, %account, error = %e, "address lookup failed");
            ui.set_result(field, format!("{LOOKUP_FAILED_PREFIX}{e}"));
            None
        }
    }
}

pub fn check_lockup_info<C: TokenContractPort, U: UiPort>(
    contract: &C,
    ui: &U,
    raw_account: &str,
) -> Option<LockupRecord> {
    lookup(
        ui,
        DisplayField::LockupInfoResult,
        raw_account,
        |a| contract.locked_info(a),
        |r| render_lockup(r, Utc::now()),
    )
}

pub fn check_unlocked_balance<C: TokenContractPort, U: UiPort>(
    contract: &C,
    ui: &U,
    raw_account: &str,
) -> Option<BalanceBreakdown> {
    lookup(
        ui,
        DisplayField::UnlockedBalanceResult,
        raw_account,
        |a| read_balance_breakdown(contract, a),
        render_breakdown,
    )
}

pub fn check_balance<C: TokenContractPort, U: UiPort>(
    contract: &C,
    ui: &U,
    raw_account: &str,
) -> Option<U256> {
    lookup(
        ui,
        DisplayField::BalanceResult,
        raw_account,
        |a| contract.balance_of(a),
        |total| render_balance(*total),
    )
}
