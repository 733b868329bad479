//! Dashboard window and update loop

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use std::thread;
use std::time::{Duration, Instant};

use eframe::egui;

use token_admin_adapters::{Eip1193Adapter, TokenContractAdapter};
use token_admin_core::bulk::render_confirmation;
use token_admin_core::domain::{BulkTransferRow, DisplayField};
use token_admin_core::orchestrator::MSG_NOT_CONNECTED_LABEL;
use token_admin_core::{AdminCommand, Orchestrator, RefreshScope, NETWORKS};

use crate::state::{DashboardUi, Forms, UiSnapshot};
use crate::ui;

pub type Controller = Orchestrator<Eip1193Adapter, TokenContractAdapter, DashboardUi>;

const WALLET_POLL_INTERVAL: Duration = Duration::from_secs(1);
const PENDING_REPAINT_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    Lockup,
    Unlocked,
    Balance,
}

/// What the user asked for during one frame; applied after rendering.
#[derive(Debug, Clone)]
enum Intent {
    SelectNetwork(u64),
    Connect,
    AddToken,
    Refresh,
    Command(AdminCommand),
    Lookup(Lookup, String),
    BulkAddRow,
    BulkRemoveRow,
    BulkFill,
    BulkSetCount(String),
    BulkPreview,
    BulkExecute,
    BulkConfirmed,
    BulkCancelled,
    DismissNotice,
}

/// Work that talks to the wallet or the chain. Runs on a worker thread.
#[derive(Debug)]
enum Job {
    SelectNetwork(u64),
    Connect,
    AddToken,
    Refresh,
    Command(AdminCommand),
    Lookup(Lookup, String),
    MultiTransfer,
}

impl Job {
    fn run(self, c: &mut Controller) {
        match self {
            Job::SelectNetwork(chain_id) => {
                // Rejections are already reported through a notice.
                let _ = c.select_network(chain_id);
            }
            Job::Connect => {
                c.connect_wallet();
            }
            Job::AddToken => {
                c.add_token_to_wallet();
            }
            Job::Refresh => {
                c.refresh(RefreshScope::All);
            }
            Job::Command(command) => {
                let outcome = c.handle(command);
                tracing::debug!(?outcome, "action finished");
            }
            Job::Lookup(Lookup::Lockup, account) => c.check_lockup_info(&account),
            Job::Lookup(Lookup::Unlocked, account) => c.check_unlocked_balance(&account),
            Job::Lookup(Lookup::Balance, account) => c.check_balance(&account),
            Job::MultiTransfer => {
                let outcome = c.execute_multi_transfer();
                tracing::debug!(?outcome, "multi transfer finished");
            }
        }
    }
}

fn lock_controller(controller: &Mutex<Controller>) -> MutexGuard<'_, Controller> {
    match controller.lock() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    }
}

pub struct App {
    controller: Arc<Mutex<Controller>>,
    ui_state: DashboardUi,
    forms: Forms,
    /// Editable copy of the bulk rows; written back before every bulk operation.
    rows: Vec<BulkTransferRow>,
    active_chain: u64,
    /// Confirmation text while a bulk transfer awaits the user's answer.
    bulk_confirm: Option<String>,
    polling: Arc<AtomicBool>,
    last_wallet_poll: Instant,
}

impl App {
    pub fn new(_cc: &eframe::CreationContext<'_>, controller: Controller) -> Self {
        controller.sync_network_display();
        let ui_state = controller.ui.clone();
        let rows = controller.bulk_rows();
        let active_chain = controller.active_network().chain_id;
        Self {
            controller: Arc::new(Mutex::new(controller)),
            ui_state,
            forms: Forms::default(),
            rows,
            active_chain,
            bulk_confirm: None,
            polling: Arc::new(AtomicBool::new(false)),
            last_wallet_poll: Instant::now(),
        }
    }

    /// Runs `f` against the controller unless a worker holds it. Bulk rows are written back
    /// first and re-read afterwards.
    fn with_controller<R>(&mut self, f: impl FnOnce(&mut Controller) -> R) -> Option<R> {
        let controller = Arc::clone(&self.controller);
        let mut c = match controller.try_lock() {
            Ok(g) => g,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return None,
        };
        for (dst, src) in c.bulk_rows_mut().iter_mut().zip(&self.rows) {
            dst.clone_from(src);
        }
        let out = f(&mut *c);
        self.rows = c.bulk_rows();
        self.active_chain = c.active_network().chain_id;
        Some(out)
    }

    /// Moves `job` onto a worker thread. Ignored while another action is pending.
    fn spawn_job(&mut self, ctx: &egui::Context, job: Job) {
        if !self.ui_state.begin_pending() {
            tracing::debug!(?job, "action already pending");
            return;
        }
        let controller = Arc::clone(&self.controller);
        let ui_state = self.ui_state.clone();
        let ctx = ctx.clone();
        thread::spawn(move || {
            job.run(&mut *lock_controller(&controller));
            ui_state.end_pending();
            ctx.request_repaint();
        });
    }

    fn poll_wallet(&mut self, ctx: &egui::Context, pending: bool) {
        if pending || self.last_wallet_poll.elapsed() < WALLET_POLL_INTERVAL {
            return;
        }
        self.last_wallet_poll = Instant::now();
        if self.polling.swap(true, Ordering::AcqRel) {
            return;
        }
        let controller = Arc::clone(&self.controller);
        let polling = Arc::clone(&self.polling);
        let ctx = ctx.clone();
        thread::spawn(move || {
            lock_controller(&controller).poll_wallet_events();
            polling.store(false, Ordering::Release);
            ctx.request_repaint();
        });
    }

    fn dispatch(&mut self, ctx: &egui::Context, intent: Intent) {
        match intent {
            Intent::SelectNetwork(chain_id) => self.spawn_job(ctx, Job::SelectNetwork(chain_id)),
            Intent::Connect => self.spawn_job(ctx, Job::Connect),
            Intent::AddToken => self.spawn_job(ctx, Job::AddToken),
            Intent::Refresh => self.spawn_job(ctx, Job::Refresh),
            Intent::Command(command) => self.spawn_job(ctx, Job::Command(command)),
            Intent::Lookup(kind, account) => self.spawn_job(ctx, Job::Lookup(kind, account)),
            Intent::BulkAddRow => {
                self.with_controller(|c| c.add_bulk_row());
            }
            Intent::BulkRemoveRow => {
                self.with_controller(|c| c.remove_bulk_row());
            }
            Intent::BulkFill => {
                self.with_controller(|c| c.fill_bulk_rows());
            }
            Intent::BulkSetCount(raw) => {
                self.with_controller(|c| {
                    let _ = c.set_bulk_row_count(&raw);
                });
            }
            Intent::BulkPreview => {
                self.with_controller(|c| {
                    let rows = c.bulk_rows();
                    let _ = c.preview_multi_transfer(&rows);
                });
            }
            Intent::BulkExecute => {
                // Invalid rows leave their error in the preview panel and nothing to confirm.
                let plan = self
                    .with_controller(|c| {
                        let rows = c.bulk_rows();
                        c.preview_multi_transfer(&rows).ok()
                    })
                    .flatten();
                self.bulk_confirm = plan.as_ref().map(render_confirmation);
            }
            Intent::BulkConfirmed => {
                if self.bulk_confirm.take().is_some() {
                    self.spawn_job(ctx, Job::MultiTransfer);
                }
            }
            Intent::BulkCancelled => self.bulk_confirm = None,
            Intent::DismissNotice => self.ui_state.dismiss_notice(),
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());

        let pending = self.ui_state.view().pending;
        self.poll_wallet(ctx, pending);
        if pending {
            ctx.request_repaint_after(PENDING_REPAINT_INTERVAL);
        } else {
            self.with_controller(|_| ());
            ctx.request_repaint_after(WALLET_POLL_INTERVAL);
        }

        let view = self.ui_state.view();
        let enabled = !view.pending;
        let mut intents = Vec::new();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| self.render_header(ui, &view, &mut intents));
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if view.pending {
                    ui.spinner();
                    ui.label("처리 중...");
                    ui.separator();
                }
                ui.label(
                    egui::RichText::new(format!(
                        "v{} · {} · {}",
                        env!("CARGO_PKG_VERSION"),
                        env!("GIT_HASH"),
                        env!("BUILD_TIME")
                    ))
                    .small()
                    .weak(),
                );
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_enabled_ui(enabled, |ui| {
                    ui.add_space(10.0);
                    self.render_wallet(ui, &view, &mut intents);
                    self.render_contract(ui, &view);
                    self.render_admin(ui, &view, &mut intents);
                    self.render_transfer(ui, &view, &mut intents);
                    self.render_bulk(ui, &view, &mut intents);
                    self.render_lookups(ui, &view, &mut intents);
                    ui.add_space(20.0);
                });
            });
        });

        if let Some(prompt) = &self.bulk_confirm {
            render_bulk_confirm_window(ctx, prompt, &mut intents);
        }
        render_notice_window(ctx, &view, &mut intents);

        for intent in intents {
            self.dispatch(ctx, intent);
        }
    }
}

impl App {
    fn render_header(&self, ui: &mut egui::Ui, view: &UiSnapshot, intents: &mut Vec<Intent>) {
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.heading(egui::RichText::new("🪙 Token Admin").size(22.0).color(ui::ACCENT));
            ui.add_space(20.0);
            ui.separator();

            let active = self.active_chain;
            for network in NETWORKS {
                if ui
                    .selectable_label(network.chain_id == active, network.display_name)
                    .clicked()
                    && network.chain_id != active
                {
                    intents.push(Intent::SelectNetwork(network.chain_id));
                }
            }

            ui.separator();
            if view.connected {
                if ui::secondary_button(ui, "🦊 토큰 추가") {
                    intents.push(Intent::AddToken);
                }
            } else if ui::action_button(ui, "🔌 지갑 연결", true) {
                intents.push(Intent::Connect);
            }
        });
        ui.label(view.field(DisplayField::NetworkDisplay));
        ui.add_space(4.0);
    }

    fn render_wallet(&self, ui: &mut egui::Ui, view: &UiSnapshot, intents: &mut Vec<Intent>) {
        ui::styled_heading(ui, "내 지갑");
        ui::card(ui, |ui| {
            let address = view
                .fields
                .get(&DisplayField::WalletAddress)
                .map(String::as_str)
                .unwrap_or(MSG_NOT_CONNECTED_LABEL);
            ui::value_row(ui, "주소", address);
            ui::value_row(ui, "잔액", view.field(DisplayField::WalletBalance));
            ui::value_row(ui, "토큰", view.field(DisplayField::TokenBalance));
            ui::value_row(ui, "권한", view.field(DisplayField::WalletRole));
            if ui.add_enabled(view.connected, egui::Button::new("🔄 새로고침")).clicked() {
                intents.push(Intent::Refresh);
            }
        });
    }

    fn render_contract(&self, ui: &mut egui::Ui, view: &UiSnapshot) {
        ui::section_header(ui, "컨트랙트 정보");
        ui::value_row(ui, "이름", view.field(DisplayField::ContractName));
        ui::value_row(ui, "심볼", view.field(DisplayField::ContractSymbol));
        ui::value_row(ui, "소수점", view.field(DisplayField::ContractDecimals));
        ui::value_row(ui, "총 발행량", view.field(DisplayField::TotalSupply));
        ui::value_row(ui, "상태", view.field(DisplayField::Paused));
        ui::value_row(ui, "Owner", view.field(DisplayField::Owner));
        ui.horizontal(|ui| {
            ui::explorer_link(ui, "컨트랙트", view.field(DisplayField::ExplorerContract));
            ui::explorer_link(ui, "토큰 트래커", view.field(DisplayField::ExplorerTokenTracker));
            ui::explorer_link(ui, "홀더", view.field(DisplayField::ExplorerHolders));
        });
    }

    fn render_admin(&mut self, ui: &mut egui::Ui, view: &UiSnapshot, intents: &mut Vec<Intent>) {
        ui::section_header(ui, "관리자 기능");
        let enabled = view.connected && view.owner_controls;
        if !enabled {
            ui.label(egui::RichText::new("OWNER 지갑으로 연결하면 사용할 수 있습니다.").weak());
        }
        let f = &mut self.forms;

        ui.horizontal(|ui| {
            if ui::action_button(ui, "⏸ 일시정지", enabled) {
                intents.push(Intent::Command(AdminCommand::Pause));
            }
            if ui::action_button(ui, "▶ 재개", enabled) {
                intents.push(Intent::Command(AdminCommand::Unpause));
            }
        });

        ui.add_space(6.0);
        ui::labeled_input(ui, "락업 주소", &mut f.lockup_account, "0x...");
        ui::labeled_input(ui, "락업 시간(분)", &mut f.lockup_minutes, "1 ~ 5256000");
        ui::labeled_input(ui, "락업 수량", &mut f.lockup_amount, "0.0");
        if ui::action_button(ui, "🔒 락업 설정", enabled) {
            intents.push(Intent::Command(AdminCommand::SetLockup {
                account: f.lockup_account.clone(),
                minutes: f.lockup_minutes.clone(),
                amount: f.lockup_amount.clone(),
            }));
        }

        ui.add_space(6.0);
        ui::labeled_input(ui, "연장 주소", &mut f.extend_account, "0x...");
        ui::labeled_input(ui, "연장 시간(분)", &mut f.extend_minutes, "1 ~ 5256000");
        if ui::action_button(ui, "⏩ 락업 연장", enabled) {
            intents.push(Intent::Command(AdminCommand::ExtendLockup {
                account: f.extend_account.clone(),
                minutes: f.extend_minutes.clone(),
            }));
        }

        ui.add_space(6.0);
        ui::labeled_input(ui, "감소 주소", &mut f.decrease_account, "0x...");
        ui::labeled_input(ui, "새 락업 수량", &mut f.decrease_amount, "0.0");
        if ui::action_button(ui, "➖ 락업 수량 감소", enabled) {
            intents.push(Intent::Command(AdminCommand::DecreaseLockAmount {
                account: f.decrease_account.clone(),
                new_amount: f.decrease_amount.clone(),
            }));
        }

        ui.add_space(6.0);
        ui::labeled_input(ui, "해제 주소", &mut f.release_account, "0x...");
        ui::labeled_input(ui, "해제 수량", &mut f.release_amount, "0.0");
        if ui::action_button(ui, "🔓 락업 해제", enabled) {
            intents.push(Intent::Command(AdminCommand::ReleaseLockup {
                account: f.release_account.clone(),
                amount: f.release_amount.clone(),
            }));
        }

        ui.add_space(6.0);
        ui::labeled_input(ui, "제거 주소", &mut f.clear_account, "0x...");
        if ui::action_button(ui, "🧹 만료 락업 제거", enabled) {
            intents.push(Intent::Command(AdminCommand::ClearExpiredLockup {
                account: f.clear_account.clone(),
            }));
        }

        ui.add_space(6.0);
        ui::labeled_input(ui, "소각 수량", &mut f.burn_amount, "0.0");
        if ui::action_button(ui, "🔥 소각", enabled) {
            intents.push(Intent::Command(AdminCommand::Burn {
                amount: f.burn_amount.clone(),
            }));
        }
    }

    fn render_transfer(&mut self, ui: &mut egui::Ui, view: &UiSnapshot, intents: &mut Vec<Intent>) {
        ui::section_header(ui, "토큰 전송");
        let f = &mut self.forms;
        ui::labeled_input(ui, "받는 주소", &mut f.transfer_to, "0x...");
        ui::labeled_input(ui, "전송 수량", &mut f.transfer_amount, "0.0");
        if ui::action_button(ui, "📤 전송", view.connected) {
            intents.push(Intent::Command(AdminCommand::Transfer {
                to: f.transfer_to.clone(),
                amount: f.transfer_amount.clone(),
            }));
        }
    }

    fn render_bulk(&mut self, ui: &mut egui::Ui, view: &UiSnapshot, intents: &mut Vec<Intent>) {
        ui::section_header(ui, "멀티 전송");
        ui.horizontal(|ui| {
            ui.label("줄 개수:");
            ui.add(egui::TextEdit::singleline(&mut self.forms.bulk_row_count).desired_width(60.0));
            if ui::secondary_button(ui, "적용") {
                intents.push(Intent::BulkSetCount(self.forms.bulk_row_count.clone()));
            }
            if ui::secondary_button(ui, "➕") {
                intents.push(Intent::BulkAddRow);
            }
            if ui::secondary_button(ui, "➖") {
                intents.push(Intent::BulkRemoveRow);
            }
            if ui::secondary_button(ui, "최대") {
                intents.push(Intent::BulkFill);
            }
        });

        egui::ScrollArea::vertical()
            .id_salt("bulk_rows")
            .max_height(240.0)
            .show(ui, |ui| {
                egui::Grid::new("bulk_grid").num_columns(3).show(ui, |ui| {
                    for (i, row) in self.rows.iter_mut().enumerate() {
                        ui.label(format!("{}", i + 1));
                        ui.add(
                            egui::TextEdit::singleline(&mut row.address)
                                .hint_text("0x...")
                                .desired_width(360.0)
                                .font(egui::TextStyle::Monospace),
                        );
                        ui.add(
                            egui::TextEdit::singleline(&mut row.amount)
                                .hint_text("0.0")
                                .desired_width(120.0),
                        );
                        ui.end_row();
                    }
                });
            });

        ui.horizontal(|ui| {
            if ui::secondary_button(ui, "👀 미리보기") {
                intents.push(Intent::BulkPreview);
            }
            if ui::action_button(ui, "📦 멀티 전송", view.connected) {
                intents.push(Intent::BulkExecute);
            }
        });
        ui::result_panel(ui, view.field(DisplayField::MultiTransferPreview));
    }

    fn render_lookups(&mut self, ui: &mut egui::Ui, view: &UiSnapshot, intents: &mut Vec<Intent>) {
        ui::section_header(ui, "조회");
        let rows = [
            (Lookup::Lockup, "락업 정보", DisplayField::LockupInfoResult),
            (Lookup::Unlocked, "사용 가능 잔액", DisplayField::UnlockedBalanceResult),
            (Lookup::Balance, "전체 잔액", DisplayField::BalanceResult),
        ];
        for (kind, label, field) in rows {
            let input = match kind {
                Lookup::Lockup => &mut self.forms.lookup_lockup,
                Lookup::Unlocked => &mut self.forms.lookup_unlocked,
                Lookup::Balance => &mut self.forms.lookup_balance,
            };
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(input)
                        .hint_text("0x...")
                        .desired_width(360.0)
                        .font(egui::TextStyle::Monospace),
                );
                if ui::secondary_button(ui, label) {
                    intents.push(Intent::Lookup(kind, input.clone()));
                }
            });
            ui::result_panel(ui, view.field(field));
        }
    }
}

fn render_bulk_confirm_window(ctx: &egui::Context, prompt: &str, intents: &mut Vec<Intent>) {
    egui::Window::new("멀티 전송 확인")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.label(prompt);
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui::action_button(ui, "실행", true) {
                    intents.push(Intent::BulkConfirmed);
                }
                if ui::secondary_button(ui, "취소") {
                    intents.push(Intent::BulkCancelled);
                }
            });
        });
}

fn render_notice_window(ctx: &egui::Context, view: &UiSnapshot, intents: &mut Vec<Intent>) {
    let Some(notice) = &view.open_notice else {
        return;
    };
    egui::Window::new("알림")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(&notice.body).color(ui::notice_color(notice.kind)));
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if let Some(url) = notice.body.lines().find(|l| l.starts_with("https://")) {
                    if ui::secondary_button(ui, "🔍 탐색기") {
                        ui::open_url(url);
                    }
                }
                if ui::action_button(ui, "확인", true) {
                    intents.push(Intent::DismissNotice);
                }
            });
        });
}
