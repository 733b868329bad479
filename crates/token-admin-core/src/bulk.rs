//! Bulk-transfer planning. Preview and submission both go through [`plan_bulk_transfer`].

use alloy::primitives::U256;
use thiserror::Error;

use crate::domain::{
    BulkTransferPlan, BulkTransferRow, MAX_BULK_RECIPIENTS, MIN_BULK_AMOUNT, TOKEN_UNIT_LABEL,
};
use crate::validation::{format_base_units_fixed, require_address, require_amount};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BulkTransferError {
    /// Rows are numbered from 1, as displayed.
    #[error("{row}번 줄 주소가 유효하지 않습니다.")]
    RowAddress { row: usize },
    #[error("{row}번 줄 수량이 유효하지 않습니다.")]
    RowAmount { row: usize },
    #[error("입력된 데이터가 없습니다.")]
    Empty,
    #[error("수신자가 너무 많습니다 ({count}명 / 최대 {limit}명)")]
    TooMany { count: usize, limit: usize },
}

pub fn plan_bulk_transfer(rows: &[BulkTransferRow]) -> Result<BulkTransferPlan, BulkTransferError> {
    let mut plan = BulkTransferPlan {
        recipients: Vec::new(),
        amounts: Vec::new(),
        amounts_wei: Vec::new(),
        total_wei: U256::ZERO,
    };

    for (idx, row) in rows.iter().enumerate() {
        if row.is_blank() {
            continue;
        }
        let number = idx + 1;
        let recipient = require_address("recipient", &row.address)
            .map_err(|_| BulkTransferError::RowAddress { row: number })?;
        let amount = row.amount.trim();
        let wei = require_amount("amount", amount, MIN_BULK_AMOUNT)
            .map_err(|_| BulkTransferError::RowAmount { row: number })?;

        plan.recipients.push(recipient);
        plan.amounts.push(amount.to_owned());
        plan.amounts_wei.push(wei);
        plan.total_wei = plan.total_wei.saturating_add(wei);
    }

    if plan.is_empty() {
        return Err(BulkTransferError::Empty);
    }
    if plan.len() > MAX_BULK_RECIPIENTS {
        return Err(BulkTransferError::TooMany {
            count: plan.len(),
            limit: MAX_BULK_RECIPIENTS,
        });
    }
    Ok(plan)
}

/// `0x1234...abcd`
pub fn short_address(raw: &str) -> String {
    let raw = raw.trim();
    if raw.len() <= 10 || !raw.is_ascii() {
        return raw.to_owned();
    }
    format!("{}...{}", &raw[..6], &raw[raw.len() - 4..])
}

pub fn render_preview(plan: &BulkTransferPlan) -> String {
    let mut out = String::from("✅ 멀티 전송 미리보기\n\n");
    out.push_str(&format!("📊 총 수신자: {}명\n", plan.len()));
    out.push_str(&format!(
        "💰 총 전송량: {} {TOKEN_UNIT_LABEL}\n\n",
        format_base_units_fixed(plan.total_wei, 4)
    ));
    out.push_str("📋 상세 내역:\n");
    for (i, (recipient, amount)) in plan.recipients.iter().zip(&plan.amounts).enumerate() {
        out.push_str(&format!(
            "  {}. {} → {amount} {TOKEN_UNIT_LABEL}\n",
            i + 1,
            short_address(&recipient.to_string())
        ));
    }
    out
}

/// Question asked before a bulk transfer is sent.
pub fn render_confirmation(plan: &BulkTransferPlan) -> String {
    format!(
        "멀티 전송을 실행하시겠습니까?\n\n총 수신자: {}명\n총 전송량: {} {TOKEN_UNIT_LABEL}\n\n⚠️ 이 작업은 취소할 수 없습니다.",
        plan.len(),
        format_base_units_fixed(plan.total_wei, 4)
    )
}

pub fn render_preview_error(err: &BulkTransferError) -> String {
    match err {
        BulkTransferError::Empty => err.to_string(),
        _ => format!("❌ {err}"),
    }
}
