//! Maps wallet, RPC and contract failures onto a fixed set of user-facing messages.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::network::NetworkDescriptor;
use crate::ports::{ErrorCode, PortError, ProviderError, USER_REJECTED_CODE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    UserCancelled,
    TransientNetwork,
    WrongNetworkOrMissingContract,
    KnownRevert,
    GenericRevert,
    InsufficientGasFunds,
    NonceTooLow,
    UnderpricedReplacement,
    GasEstimationFailed,
    MalformedInput,
    NetworkError,
    Other,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    pub category: ErrorCategory,
    pub message: String,
}

impl ClassifiedError {
    fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

pub const MSG_CANCELLED: &str = "트랜잭션을 취소하였습니다.";
pub const MSG_TIMEOUT: &str = "RPC 서버 응답 대기 중 타임아웃이 발생했습니다.\n\n트랜잭션은 전송되었을 수 있으니 Explorer에서 확인해주세요.";
pub const MSG_CONTRACT_NOT_FOUND: &str =
    "현재 네트워크에서 컨트랙트를 찾을 수 없습니다. 네트워크와 컨트랙트 주소를 확인해주세요.";
pub const MSG_GENERIC_REVERT: &str = "컨트랙트 호출에 실패했습니다. 입력값과 권한을 확인해주세요.";
pub const MSG_NONCE_TOO_LOW: &str = "논스가 낮습니다. 잠시 후 다시 시도해주세요.";
pub const MSG_UNDERPRICED: &str = "가스 가격/한도를 높여 재시도하세요.";
pub const MSG_GAS_ESTIMATION: &str =
    "가스 추정에 실패했습니다. 입력값, 권한, 컨트랙트 상태를 확인해주세요.";
pub const MSG_INVALID_ADDRESS: &str = "잘못된 주소 형식입니다.";
pub const MSG_INVALID_NUMBER: &str = "숫자 형식이 올바르지 않습니다.";
pub const MSG_NETWORK: &str = "네트워크 오류입니다.";
pub const MSG_UNKNOWN: &str = "알 수 없는 오류가 발생했습니다.";

/// Custom-error name fragments, checked in order. `LockupNotExpired` must precede
/// `LockupExpired` and `InsufficientBalance` is not a substring of its unlocked sibling.
const KNOWN_REVERTS: &[(&str, &str)] = &[
    ("nolockupexists", "락업이 존재하지 않습니다."),
    ("lockupnotexpired", "락업이 아직 만료되지 않았습니다."),
    ("lockupexpired", "락업이 이미 만료되었습니다."),
    ("onlydecrease", "현재 락업 수량보다 작은 값만 입력 가능합니다."),
    ("amountexceedslocked", "해제할 수량이 현재 락업 수량보다 많습니다."),
    ("invalidlockupduration", "유효하지 않은 락업 시간입니다."),
    ("insufficientbalance", "잔액이 부족합니다."),
    ("insufficientunlockedbalance", "잠금 해제된 잔액이 부족합니다."),
    ("invalidamount", "유효하지 않은 수량입니다."),
    ("zeroaddress", "유효하지 않은 주소입니다."),
    ("zeroamountinbatch", "수량이 0인 항목이 있습니다."),
    ("emptyrecipients", "수신자 목록이 비어있습니다."),
    ("toomanyrecipients", "수신자가 너무 많습니다 (최대 300명)."),
    ("arraylengthmismatch", "주소와 수량의 개수가 일치하지 않습니다."),
    ("enforcedpause", "컨트랙트가 일시정지 상태입니다."),
];

static TRANSIENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)timeout|timed out|could not detect network|missing response|failed to fetch|network request failed",
    )
    .expect("static regex")
});
static CONTRACT_NOT_FOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)returned values aren't valid|did it run out of gas|not using the correct abi|requesting data from a block number that does not exist|node which is not fully synced",
    )
    .expect("static regex")
});
static REVERT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)execution reverted|call exception|contract call failed").expect("static regex")
});
static REVERT_REASON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)reverted with reason string ['"]([^'"]+)['"]"#).expect("static regex")
});
static INSUFFICIENT_FUNDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)insufficient funds").expect("static regex"));
static NONCE_TOO_LOW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)nonce too low").expect("static regex"));
static UNDERPRICED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)replacement (fee|underpriced)").expect("static regex"));
static GAS_ESTIMATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)gas required exceeds allowance|always failing transaction")
        .expect("static regex")
});
static INVALID_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)invalid address").expect("static regex"));
static INVALID_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)invalid (bignumber|number|uint)").expect("static regex"));
static NETWORK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)network error|chain|wrong network|unsupported chain id").expect("static regex")
});

/// Everything the rules look at, pulled out of the failure once.
struct FailureView {
    code: Option<ErrorCode>,
    top_message: String,
    message: String,
}

impl FailureView {
    fn from_port_error(err: &PortError) -> Self {
        match err {
            PortError::Provider(p) => Self::from_provider(p),
            other => {
                let text = other.to_string();
                Self {
                    code: None,
                    top_message: text.clone(),
                    message: text,
                }
            }
        }
    }

    fn from_provider(p: &ProviderError) -> Self {
        let message = p
            .data_message()
            .or_else(|| p.nested_message())
            .map(str::to_owned)
            .or_else(|| Some(p.message.clone()).filter(|m| !m.is_empty()))
            .or_else(|| {
                (p.code.is_some() || p.data.is_some())
                    .then(|| serde_json::to_string(p).ok())
                    .flatten()
            })
            .unwrap_or_default();
        Self {
            code: p.code.clone(),
            top_message: p.message.clone(),
            message,
        }
    }

    fn has_code(&self, numeric: Option<i64>, named: &str) -> bool {
        match &self.code {
            Some(ErrorCode::Numeric(c)) => Some(*c) == numeric,
            Some(ErrorCode::Named(n)) => n == named,
            None => false,
        }
    }
}

pub fn classify(err: &PortError, network: &NetworkDescriptor) -> ClassifiedError {
    classify_view(FailureView::from_port_error(err), network)
}

/// Classifies an arbitrary JSON failure value (wallet error objects, strings, ...).
pub fn classify_value(value: &Value, network: &NetworkDescriptor) -> ClassifiedError {
    classify_view(
        FailureView::from_provider(&ProviderError::from_value(value)),
        network,
    )
}

fn classify_view(view: FailureView, network: &NetworkDescriptor) -> ClassifiedError {
    if view.has_code(Some(USER_REJECTED_CODE), "ACTION_REJECTED")
        || view.top_message.to_lowercase().contains("user rejected")
    {
        return ClassifiedError::new(ErrorCategory::UserCancelled, MSG_CANCELLED);
    }

    let msg = view.message.as_str();
    if msg.trim().is_empty() && view.code.is_none() {
        return ClassifiedError::new(ErrorCategory::Unknown, MSG_UNKNOWN);
    }

    if TRANSIENT.is_match(msg) {
        return ClassifiedError::new(ErrorCategory::TransientNetwork, MSG_TIMEOUT);
    }

    if CONTRACT_NOT_FOUND.is_match(msg) {
        return ClassifiedError::new(
            ErrorCategory::WrongNetworkOrMissingContract,
            MSG_CONTRACT_NOT_FOUND,
        );
    }

    if REVERT.is_match(msg) {
        return classify_revert(msg);
    }

    if INSUFFICIENT_FUNDS.is_match(msg) || view.has_code(None, "INSUFFICIENT_FUNDS") {
        let currency = network.native_currency;
        return ClassifiedError::new(
            ErrorCategory::InsufficientGasFunds,
            format!("지갑 잔액({currency})이 부족합니다. 가스비를 위한 {currency}가 필요합니다."),
        );
    }

    if NONCE_TOO_LOW.is_match(msg) {
        return ClassifiedError::new(ErrorCategory::NonceTooLow, MSG_NONCE_TOO_LOW);
    }
    if UNDERPRICED.is_match(msg) {
        return ClassifiedError::new(ErrorCategory::UnderpricedReplacement, MSG_UNDERPRICED);
    }

    if view.has_code(None, "UNPREDICTABLE_GAS_LIMIT") || GAS_ESTIMATION.is_match(msg) {
        return ClassifiedError::new(ErrorCategory::GasEstimationFailed, MSG_GAS_ESTIMATION);
    }

    if INVALID_ADDRESS.is_match(msg) {
        return ClassifiedError::new(ErrorCategory::MalformedInput, MSG_INVALID_ADDRESS);
    }
    if INVALID_NUMBER.is_match(msg) {
        return ClassifiedError::new(ErrorCategory::MalformedInput, MSG_INVALID_NUMBER);
    }
    if NETWORK.is_match(msg) {
        return ClassifiedError::new(ErrorCategory::NetworkError, MSG_NETWORK);
    }

    ClassifiedError::new(ErrorCategory::Other, format!("오류: {msg}"))
}

fn classify_revert(msg: &str) -> ClassifiedError {
    if let Some(reason) = REVERT_REASON.captures(msg).and_then(|c| c.get(1)) {
        return ClassifiedError::new(
            ErrorCategory::KnownRevert,
            format!("컨트랙트 실행 거부: {}", reason.as_str()),
        );
    }
    let lowered = msg.to_lowercase();
    KNOWN_REVERTS
        .iter()
        .find(|(fragment, _)| lowered.contains(fragment))
        .map(|(_, sentence)| ClassifiedError::new(ErrorCategory::KnownRevert, *sentence))
        .unwrap_or_else(|| ClassifiedError::new(ErrorCategory::GenericRevert, MSG_GENERIC_REVERT))
}
