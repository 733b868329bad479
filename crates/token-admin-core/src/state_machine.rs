use alloy::primitives::Address;
use thiserror::Error;

use crate::domain::{BulkTransferRow, WalletSession, MAX_BULK_RECIPIENTS};
use crate::network::NetworkContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    Connected(Address),
    Switched { from: Address, to: Address },
    Disconnected,
    Unchanged,
}

impl SessionChange {
    pub fn needs_refresh(&self) -> bool {
        matches!(self, SessionChange::Connected(_) | SessionChange::Switched { .. })
    }
}

/// Applies the wallet's current account list to the session. Only the first account counts.
pub fn session_transition(session: &mut WalletSession, accounts: &[Address]) -> SessionChange {
    match (session.address, accounts.first().copied()) {
        (None, None) => SessionChange::Unchanged,
        (Some(_), None) => {
            session.address = None;
            SessionChange::Disconnected
        }
        (None, Some(next)) => {
            session.address = Some(next);
            SessionChange::Connected(next)
        }
        (Some(current), Some(next)) if current == next => SessionChange::Unchanged,
        (Some(current), Some(next)) => {
            session.address = Some(next);
            SessionChange::Switched {
                from: current,
                to: next,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowCountError {
    #[error("줄 개수를 입력해주세요.")]
    Missing,
    #[error("최대 {}개까지 가능합니다.", MAX_BULK_RECIPIENTS)]
    AtMaximum,
    #[error("1 ~ {} 사이의 숫자를 입력해주세요.", MAX_BULK_RECIPIENTS)]
    OutOfRange,
}

/// The editable bulk-transfer rows. Always between 1 and `MAX_BULK_RECIPIENTS` rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRowSet {
    rows: Vec<BulkTransferRow>,
}

impl Default for BulkRowSet {
    fn default() -> Self {
        Self {
            rows: vec![BulkTransferRow::default()],
        }
    }
}

impl BulkRowSet {
    pub fn rows(&self) -> &[BulkTransferRow] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [BulkTransferRow] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn add_row(&mut self) -> Result<(), RowCountError> {
        if self.rows.len() >= MAX_BULK_RECIPIENTS {
            return Err(RowCountError::AtMaximum);
        }
        self.rows.push(BulkTransferRow::default());
        Ok(())
    }

    pub fn remove_row(&mut self) {
        if self.rows.len() > 1 {
            self.rows.pop();
        }
    }

    pub fn fill_to_maximum(&mut self) {
        self.rows.resize_with(MAX_BULK_RECIPIENTS, BulkTransferRow::default);
    }

    /// Parses the "row count" input; existing row contents are kept where they still fit.
    pub fn set_row_count(&mut self, raw: &str) -> Result<usize, RowCountError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(RowCountError::Missing);
        }
        let count: usize = raw
            .parse()
            .map_err(|_| RowCountError::OutOfRange)?;
        if !(1..=MAX_BULK_RECIPIENTS).contains(&count) {
            return Err(RowCountError::OutOfRange);
        }
        self.rows.resize_with(count, BulkTransferRow::default);
        Ok(count)
    }
}

/// Everything the controller owns and mutates.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub network: NetworkContext,
    pub session: WalletSession,
    pub bulk_rows: BulkRowSet,
}
