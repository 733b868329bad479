pub mod bulk;
pub mod classify;
pub mod domain;
pub mod network;
pub mod orchestrator;
pub mod ports;
pub mod refresh;
pub mod state_machine;
pub mod validation;

pub use bulk::{plan_bulk_transfer, BulkTransferError};
pub use classify::{classify, classify_value, ClassifiedError, ErrorCategory};
pub use domain::{
    ActionKind, BulkTransferRow, ContractCall, DisplayField, GasPolicy, LockupRecord, Notice,
    NoticeKind, RefreshScope, TxReceipt, WalletEvent,
};
pub use network::{NetworkContext, NetworkDescriptor, NetworkError, NETWORKS};
pub use orchestrator::{ActionError, ActionOutcome, AdminCommand, Orchestrator};
pub use ports::{
    AddressResolverPort, ErrorCode, PortError, ProviderError, TokenContractPort, UiPort,
    WalletPort,
};
pub use state_machine::{AppState, BulkRowSet, SessionChange};
pub use validation::ValidationError;
