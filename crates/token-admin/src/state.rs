//! UI-side state: the `UiPort` the orchestrator writes into, and the form inputs.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use token_admin_core::domain::{DisplayField, Notice};
use token_admin_core::UiPort;

/// Notices older than this are dropped from the history panel.
const MAX_NOTICES: usize = 50;

#[derive(Debug, Clone, Default)]
pub struct UiSnapshot {
    pub fields: HashMap<DisplayField, String>,
    /// Notice currently shown in the modal window.
    pub open_notice: Option<Notice>,
    pub history: VecDeque<Notice>,
    pub connected: bool,
    pub owner_controls: bool,
    /// An action is running on the worker thread; controls are disabled.
    pub pending: bool,
}

impl UiSnapshot {
    pub fn field(&self, field: DisplayField) -> &str {
        self.fields.get(&field).map(String::as_str).unwrap_or("-")
    }
}

/// `UiPort` backed by a shared snapshot that the egui frame renders from.
#[derive(Debug, Clone, Default)]
pub struct DashboardUi {
    snapshot: Arc<Mutex<UiSnapshot>>,
}

impl DashboardUi {
    pub fn lock(&self) -> MutexGuard<'_, UiSnapshot> {
        match self.snapshot.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Copy of the current snapshot; rendering must not hold the lock while the
    /// orchestrator writes.
    pub fn view(&self) -> UiSnapshot {
        self.lock().clone()
    }

    pub fn dismiss_notice(&self) {
        self.lock().open_notice = None;
    }

    /// Marks an action as running. `false` when one already is.
    pub fn begin_pending(&self) -> bool {
        let mut g = self.lock();
        if g.pending {
            return false;
        }
        g.pending = true;
        true
    }

    pub fn end_pending(&self) {
        self.lock().pending = false;
    }
}

impl UiPort for DashboardUi {
    fn notify(&self, notice: Notice) {
        tracing::debug!(kind = ?notice.kind, "notice");
        let mut g = self.lock();
        g.history.push_front(notice.clone());
        g.history.truncate(MAX_NOTICES);
        g.open_notice = Some(notice);
    }

    fn set_result(&self, field: DisplayField, text: String) {
        self.lock().fields.insert(field, text);
    }

    fn set_connected(&self, connected: bool) {
        self.lock().connected = connected;
    }

    fn set_owner_controls(&self, enabled: bool) {
        self.lock().owner_controls = enabled;
    }
}

/// Raw text of every input box on the dashboard.
#[derive(Debug, Clone, Default)]
pub struct Forms {
    pub lockup_account: String,
    pub lockup_minutes: String,
    pub lockup_amount: String,
    pub extend_account: String,
    pub extend_minutes: String,
    pub decrease_account: String,
    pub decrease_amount: String,
    pub release_account: String,
    pub release_amount: String,
    pub clear_account: String,
    pub transfer_to: String,
    pub transfer_amount: String,
    pub burn_amount: String,
    pub lookup_lockup: String,
    pub lookup_unlocked: String,
    pub lookup_balance: String,
    pub bulk_row_count: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use token_admin_core::domain::NoticeKind;

    #[test]
    fn notices_open_the_modal_and_keep_history() {
        let ui = DashboardUi::default();
        ui.notify(Notice::new(NoticeKind::Info, "first"));
        ui.notify(Notice::new(NoticeKind::Success, "second"));

        let g = ui.lock();
        assert_eq!(g.open_notice.as_ref().map(|n| n.body.as_str()), Some("second"));
        assert_eq!(g.history.len(), 2);
        assert_eq!(g.history[0].body, "second");
        drop(g);

        ui.dismiss_notice();
        assert!(ui.lock().open_notice.is_none());
    }

    #[test]
    fn only_one_action_runs_at_a_time() {
        let ui = DashboardUi::default();
        assert!(ui.begin_pending());
        assert!(ui.view().pending);
        assert!(!ui.begin_pending());

        ui.end_pending();
        assert!(!ui.view().pending);
        assert!(ui.begin_pending());
    }

    #[test]
    fn unset_fields_render_as_dash() {
        let ui = DashboardUi::default();
        ui.set_result(DisplayField::Owner, "0xabc".to_owned());
        let g = ui.lock();
        assert_eq!(g.field(DisplayField::Owner), "0xabc");
        assert_eq!(g.field(DisplayField::Paused), "-");
    }
}
