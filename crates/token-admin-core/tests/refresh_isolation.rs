mod common;

use alloy::primitives::U256;

use common::*;
use token_admin_core::domain::{DisplayField, LockupRecord, RefreshScope};
use token_admin_core::refresh::{LOOKUP_FAILED_PREFIX, NO_ACTIVE_LOCKUP};

#[test]
fn full_refresh_populates_every_field() {
    let (orch, _) = connected();
    orch.contract.lock().balances.insert(addr(ALICE), ether(12));

    let report = orch.refresh(RefreshScope::All);
    assert!(report.is_clean(), "unexpected failures: {:?}", report.failed);

    let field = |f| orch.ui.field(f).expect("field populated");
    assert_eq!(field(DisplayField::WalletBalance), "3.0000 POL");
    assert_eq!(field(DisplayField::TokenBalance), "12.00 ETH(Custom)");
    assert_eq!(field(DisplayField::WalletRole), "일반 사용자");
    assert_eq!(field(DisplayField::ContractName), "Custom Token");
    assert_eq!(field(DisplayField::ContractSymbol), "CTK");
    assert_eq!(field(DisplayField::ContractDecimals), "18");
    assert_eq!(field(DisplayField::TotalSupply), "1000.0 ETH(Custom)");
    assert_eq!(field(DisplayField::Paused), "정상");
    assert_eq!(field(DisplayField::Owner), addr(OWNER).to_string());
    assert_eq!(orch.ui.lock().owner_controls, Some(false));
}

#[test]
fn one_failing_query_does_not_block_the_others() {
    let (orch, _) = connected();
    {
        let mut contract = orch.contract.lock();
        contract.failing_reads.insert("native_balance");
        contract.failing_reads.insert("owner");
        contract.paused = true;
    }

    let report = orch.refresh(RefreshScope::All);
    assert_eq!(report.failed, vec!["native_balance", "owner", "role"]);

    assert_eq!(
        orch.ui.field(DisplayField::WalletBalance).as_deref(),
        Some("잔액 확인 실패")
    );
    assert_eq!(
        orch.ui.field(DisplayField::WalletRole).as_deref(),
        Some("권한 확인 실패")
    );
    assert_eq!(orch.ui.lock().owner_controls, Some(false));
    assert_eq!(
        orch.ui.field(DisplayField::Paused).as_deref(),
        Some("일시정지 상태")
    );
    assert_eq!(
        orch.ui.field(DisplayField::TokenBalance).as_deref(),
        Some("0.00 ETH(Custom)")
    );
}

#[test]
fn refresh_without_session_reads_nothing() {
    let (orch, _) = disconnected();
    let report = orch.refresh(RefreshScope::All);
    assert!(report.is_clean());
    assert!(orch.contract.lock().calls.is_empty());
}

#[test]
fn lockup_lookup_renders_summary_or_inactive() {
    let (orch, _) = disconnected();
    orch.contract.lock().lockups.insert(
        addr(BOB),
        LockupRecord {
            locked_amount: ether(5),
            remaining_seconds: U256::from(90_061u64),
            expiration_timestamp: U256::from(1_700_000_000u64),
        },
    );

    orch.check_lockup_info(BOB);
    let text = orch
        .ui
        .field(DisplayField::LockupInfoResult)
        .expect("lockup text");
    assert!(text.starts_with("✅ 락업 정보"));
    assert!(text.contains("5.0 ETH(Custom)"));
    assert!(text.contains("1일 1시간 1분 1초"));

    orch.check_lockup_info(ALICE);
    assert_eq!(
        orch.ui.field(DisplayField::LockupInfoResult).as_deref(),
        Some(NO_ACTIVE_LOCKUP)
    );
}

#[test]
fn address_lookups_report_failures_inline() {
    let (orch, _) = disconnected();
    orch.check_balance("0x1234");
    let text = orch
        .ui
        .field(DisplayField::BalanceResult)
        .expect("failure text");
    assert!(text.starts_with(LOOKUP_FAILED_PREFIX));
    assert!(text.contains("주소 형식 오류"));
    assert!(orch.contract.lock().calls.is_empty());

    orch.contract.lock().failing_reads.insert("locked_balance");
    orch.check_unlocked_balance(ALICE);
    let text = orch
        .ui
        .field(DisplayField::UnlockedBalanceResult)
        .expect("failure text");
    assert_eq!(
        text,
        format!("{LOOKUP_FAILED_PREFIX}network request failed: locked_balance unavailable")
    );
}

#[test]
fn balance_breakdown_lists_three_figures() {
    let (orch, _) = disconnected();
    {
        let mut contract = orch.contract.lock();
        contract.balances.insert(addr(ALICE), ether(10));
        contract.locked.insert(addr(ALICE), ether(4));
    }
    orch.check_unlocked_balance(ALICE);
    let text = orch
        .ui
        .field(DisplayField::UnlockedBalanceResult)
        .expect("breakdown");
    assert!(text.contains("💰 전체 보유: 10.0 ETH(Custom)"));
    assert!(text.contains("🔒 락업 중: 4.0 ETH(Custom)"));
    assert!(text.contains("✅ 사용 가능: 6.0 ETH(Custom)"));

    orch.check_balance(ALICE);
    assert!(orch
        .ui
        .field(DisplayField::BalanceResult)
        .expect("balance")
        .starts_with("💰 전체 잔액: 10.0 ETH(Custom)"));
}
