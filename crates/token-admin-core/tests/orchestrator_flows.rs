mod common;

use alloy::primitives::U256;

use common::*;
use token_admin_core::classify::MSG_CANCELLED;
use token_admin_core::domain::{ContractCall, DisplayField, GasPolicy, NoticeKind, TxReceipt};
use token_admin_core::orchestrator::{MSG_CONNECT_FIRST, MSG_TOKEN_ADDED};
use token_admin_core::{
    ActionError, ActionKind, ActionOutcome, AdminCommand, ErrorCategory, PortError,
    ProviderError, ValidationError,
};

#[test]
fn actions_require_a_wallet_session() {
    let (mut orch, _) = disconnected();
    let outcome = orch.handle(AdminCommand::Pause);
    assert_eq!(
        outcome,
        ActionOutcome::Failed {
            action: ActionKind::Pause,
            error: ActionError::NotConnected
        }
    );
    assert_eq!(
        orch.ui.last_notice().expect("notice").body,
        MSG_CONNECT_FIRST
    );
    assert!(orch.contract.lock().estimated.is_empty());
}

#[test]
fn single_action_pads_gas_by_twenty_percent() {
    let (mut orch, _) = connected();
    let outcome = orch.handle(AdminCommand::Transfer {
        to: BOB.to_owned(),
        amount: "1.5".to_owned(),
    });

    let expected_hash = tx_hash(0xab);
    match &outcome {
        ActionOutcome::Confirmed {
            action,
            tx_hash,
            gas_used,
            explorer_url,
        } => {
            assert_eq!(*action, ActionKind::Transfer);
            assert_eq!(*tx_hash, expected_hash);
            assert_eq!(*gas_used, Some(90_000));
            assert_eq!(
                explorer_url,
                &format!("https://polygonscan.com/tx/{expected_hash}")
            );
        }
        other => panic!("expected confirmed outcome, got {other:?}"),
    }

    let contract = orch.contract.lock();
    assert_eq!(contract.submitted.len(), 1);
    let (call, gas_limit) = &contract.submitted[0];
    assert_eq!(*gas_limit, 120_000);
    assert_eq!(
        *call,
        ContractCall::Transfer {
            to: addr(BOB),
            amount: U256::from(1_500_000_000_000_000_000u128),
        }
    );
    drop(contract);

    let notice = orch.ui.last_notice().expect("success notice");
    assert_eq!(notice.kind, NoticeKind::Success);
    assert!(notice.body.starts_with("✅ 전송 완료!"));
    assert!(notice.body.contains("전송 수량: 1.5 ETH(Custom)"));
}

#[test]
fn confirmation_timeout_is_submitted_not_failed() {
    let (mut orch, _) = connected();
    orch.contract.lock().confirmation = Err(PortError::Timeout("receipt".to_owned()));

    let outcome = orch.handle(AdminCommand::Burn {
        amount: "10".to_owned(),
    });

    let hash = tx_hash(0xab);
    assert_eq!(
        outcome,
        ActionOutcome::SubmittedUnconfirmed {
            action: ActionKind::Burn,
            tx_hash: hash,
            explorer_url: format!("https://polygonscan.com/tx/{hash}"),
        }
    );
    let notice = orch.ui.last_notice().expect("submitted notice");
    assert_eq!(notice.kind, NoticeKind::Submitted);
    assert!(notice.body.contains(&hash.to_string()));

    let pending = orch.last_transaction().expect("tracked transaction");
    assert!(pending.submitted);
    assert_eq!(pending.confirmed, Some(false));
}

#[test]
fn reverted_receipt_is_reported_as_unconfirmed() {
    let (mut orch, _) = connected();
    orch.contract.lock().confirmation = Ok(TxReceipt {
        tx_hash: tx_hash(0xab),
        block_number: Some(7),
        gas_used: Some(21_000),
        success: false,
    });
    let outcome = orch.handle(AdminCommand::Unpause);
    assert!(matches!(outcome, ActionOutcome::SubmittedUnconfirmed { .. }));
}

#[test]
fn validation_failure_never_reaches_the_chain() {
    let (mut orch, _) = connected();
    let outcome = orch.handle(AdminCommand::SetLockup {
        account: ALICE.to_owned(),
        minutes: "1.5".to_owned(),
        amount: "10".to_owned(),
    });
    assert_eq!(
        outcome.error(),
        Some(&ActionError::Validation(ValidationError::InvalidMinutes {
            field: "락업 시간"
        }))
    );
    let contract = orch.contract.lock();
    assert!(contract.estimated.is_empty());
    assert!(contract.submitted.is_empty());
}

#[test]
fn each_field_is_checked_in_order() {
    let (mut orch, _) = connected();
    let outcome = orch.handle(AdminCommand::ReleaseLockup {
        account: "not-an-address".to_owned(),
        amount: "abc".to_owned(),
    });
    assert_eq!(
        outcome.error().map(ToString::to_string).as_deref(),
        Some("해제 주소: 주소 형식 오류")
    );

    let outcome = orch.handle(AdminCommand::Burn {
        amount: "-1".to_owned(),
    });
    assert_eq!(
        outcome.error(),
        Some(&ActionError::Validation(ValidationError::InvalidAmount {
            field: "소각 수량"
        }))
    );
}

#[test]
fn estimation_failure_is_classified_and_not_submitted() {
    let (mut orch, _) = connected();
    orch.contract.lock().estimate = Err(
        ProviderError::new(-32603, "Internal JSON-RPC error.")
            .with_data(serde_json::json!({ "message": "execution reverted: NoLockupExists()" }))
            .into(),
    );

    let outcome = orch.handle(AdminCommand::ClearExpiredLockup {
        account: BOB.to_owned(),
    });
    match outcome.error() {
        Some(ActionError::Chain(classified)) => {
            assert_eq!(classified.category, ErrorCategory::KnownRevert);
            assert_eq!(classified.message, "락업이 존재하지 않습니다.");
        }
        other => panic!("expected classified chain error, got {other:?}"),
    }
    assert!(orch.contract.lock().submitted.is_empty());
    assert_eq!(
        orch.ui.last_notice().expect("failure notice").kind,
        NoticeKind::Failure
    );
}

#[test]
fn wallet_rejection_at_submit_is_a_cancellation() {
    let (mut orch, _) = connected();
    orch.contract.lock().submit = Err(ProviderError::new(4001, "User denied").into());
    let outcome = orch.handle(AdminCommand::Pause);
    match outcome.error() {
        Some(ActionError::Chain(classified)) => {
            assert_eq!(classified.category, ErrorCategory::UserCancelled);
            assert_eq!(classified.message, MSG_CANCELLED);
        }
        other => panic!("expected cancellation, got {other:?}"),
    }
    assert!(orch.last_transaction().is_none());
}

#[test]
fn lockup_actions_pass_minutes_and_base_units() {
    let (mut orch, _) = connected();
    orch.handle(AdminCommand::SetLockup {
        account: ALICE.to_owned(),
        minutes: "60".to_owned(),
        amount: "2".to_owned(),
    });
    orch.handle(AdminCommand::ExtendLockup {
        account: ALICE.to_owned(),
        minutes: "30".to_owned(),
    });
    orch.handle(AdminCommand::DecreaseLockAmount {
        account: ALICE.to_owned(),
        new_amount: "1".to_owned(),
    });

    let contract = orch.contract.lock();
    let calls: Vec<_> = contract.submitted.iter().map(|(c, _)| c.clone()).collect();
    assert_eq!(
        calls,
        vec![
            ContractCall::SetLockup {
                account: addr(ALICE),
                minutes: U256::from(60u64),
                amount: ether(2),
            },
            ContractCall::ExtendLockup {
                account: addr(ALICE),
                minutes: U256::from(30u64),
            },
            ContractCall::DecreaseLockAmount {
                account: addr(ALICE),
                new_amount: ether(1),
            },
        ]
    );
}

#[test]
fn refresh_scope_follows_the_action() {
    let (mut orch, _) = connected();
    orch.handle(AdminCommand::Pause);
    {
        let contract = orch.contract.lock();
        assert!(contract.calls.contains(&"paused"));
        assert!(!contract.calls.contains(&"native_balance"));
    }

    orch.contract.lock().calls.clear();
    orch.handle(AdminCommand::Transfer {
        to: BOB.to_owned(),
        amount: "1".to_owned(),
    });
    {
        let contract = orch.contract.lock();
        assert!(contract.calls.contains(&"native_balance"));
        assert!(!contract.calls.contains(&"paused"));
    }

    orch.contract.lock().calls.clear();
    orch.handle(AdminCommand::Burn {
        amount: "1".to_owned(),
    });
    let contract = orch.contract.lock();
    assert!(contract.calls.contains(&"native_balance"));
    assert!(contract.calls.contains(&"paused"));
}

#[test]
fn custom_gas_policy_is_applied() {
    let (orch, _) = connected();
    let mut orch = orch.with_gas_policy(GasPolicy {
        single_padding_percent: 50,
        bulk_padding_percent: 30,
    });
    orch.handle(AdminCommand::Pause);
    assert_eq!(orch.contract.lock().submitted[0].1, 150_000);
}

#[test]
fn account_change_swaps_session_and_empty_list_disconnects() {
    let (mut orch, _) = connected();
    orch.set_wallet_session(&[addr(OWNER)]);
    assert_eq!(orch.state().session.address, Some(addr(OWNER)));
    assert_eq!(orch.ui.lock().owner_controls, Some(true));
    assert_eq!(
        orch.ui.field(DisplayField::WalletRole).as_deref(),
        Some("OWNER (관리자)")
    );

    orch.set_wallet_session(&[]);
    assert!(!orch.state().session.is_connected());
    assert_eq!(orch.ui.lock().connected, Some(false));
    assert_eq!(orch.ui.lock().owner_controls, Some(false));
    assert_eq!(
        orch.handle(AdminCommand::Unpause).error(),
        Some(&ActionError::NotConnected)
    );
}

#[test]
fn connect_with_no_accounts_fails() {
    let (mut orch, _) = orchestrator_with_wallet(FakeWallet::on_chain(137, vec![]));
    assert!(orch.connect_wallet().is_none());
    assert_eq!(
        orch.ui.last_notice().expect("failure notice").body,
        "지갑 연결 실패"
    );
    assert!(!orch.state().session.is_connected());
}

#[test]
fn add_token_registers_contract_with_wallet() {
    let (orch, _) = connected();
    let mut orch = orch.with_token_logo_url(Some("https://example.org/logo.png".to_owned()));
    assert!(orch.add_token_to_wallet());

    let request = orch.wallet.lock().watch_requests[0].clone();
    assert_eq!(request.address, addr(CONTRACT));
    assert_eq!(request.decimals, 18);
    assert_eq!(request.image.as_deref(), Some("https://example.org/logo.png"));
    assert_eq!(orch.ui.last_notice().expect("notice").body, MSG_TOKEN_ADDED);

    orch.wallet.lock().watch_result = Ok(Some(false));
    orch.ui.lock().notices.clear();
    assert!(!orch.add_token_to_wallet());
    assert!(orch.ui.last_notice().is_none());
}
