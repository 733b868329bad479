//! UI helper components

use eframe::egui;

use token_admin_core::domain::NoticeKind;

pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(0, 212, 170);
const DANGER: egui::Color32 = egui::Color32::from_rgb(220, 80, 80);

pub fn open_url(url: &str) {
    if let Err(e) = open::that(url) {
        tracing::warn!(url, error = %e, "failed to open browser");
    }
}

pub fn copy_to_clipboard(text: &str) {
    if let Ok(mut clipboard) = arboard::Clipboard::new() {
        let _ = clipboard.set_text(text);
    }
}

/// Styled heading with accent color
pub fn styled_heading(ui: &mut egui::Ui, text: &str) {
    ui.heading(egui::RichText::new(text).color(ACCENT));
}

/// Section header with separator
pub fn section_header(ui: &mut egui::Ui, text: &str) {
    ui.add_space(10.0);
    ui.label(egui::RichText::new(text).strong().size(14.0));
    ui.separator();
}

pub fn labeled_input(ui: &mut egui::Ui, label: &str, value: &mut String, hint: &str) {
    ui.horizontal(|ui| {
        ui.add_sized([110.0, 20.0], egui::Label::new(label));
        ui.add(
            egui::TextEdit::singleline(value)
                .hint_text(hint)
                .desired_width(360.0)
                .font(egui::TextStyle::Monospace),
        );
    });
}

/// Read-only `label: value` row with a copy button.
pub fn value_row(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(format!("{label}:")).strong());
        ui.label(egui::RichText::new(value).monospace());
        if ui
            .small_button("📋")
            .on_hover_text("클립보드에 복사")
            .clicked()
        {
            copy_to_clipboard(value);
        }
    });
}

/// Multi-line result panel; empty panels are not drawn.
pub fn result_panel(ui: &mut egui::Ui, text: &str) {
    if text.is_empty() || text == "-" {
        return;
    }
    card(ui, |ui| {
        ui.label(egui::RichText::new(text).monospace());
    });
}

pub fn explorer_link(ui: &mut egui::Ui, label: &str, url: &str) {
    let enabled = url.starts_with("http");
    let response = ui.add_enabled(enabled, egui::Link::new(label));
    if response.on_hover_text(url).clicked() {
        open_url(url);
    }
}

/// Primary action button, disabled when `enabled` is false.
pub fn action_button(ui: &mut egui::Ui, text: &str, enabled: bool) -> bool {
    let btn = egui::Button::new(egui::RichText::new(text).size(14.0).color(egui::Color32::WHITE))
        .min_size(egui::vec2(130.0, 30.0))
        .fill(egui::Color32::from_rgb(0, 180, 150));
    ui.add_enabled(enabled, btn).clicked()
}

pub fn secondary_button(ui: &mut egui::Ui, text: &str) -> bool {
    ui.add(egui::Button::new(egui::RichText::new(text).size(14.0)).min_size(egui::vec2(90.0, 30.0)))
        .clicked()
}

/// Render content in a subtle card/frame
pub fn card(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::none()
        .fill(ui.visuals().faint_bg_color)
        .rounding(6.0)
        .inner_margin(12.0)
        .show(ui, add_contents);
}

pub fn notice_color(kind: NoticeKind) -> egui::Color32 {
    match kind {
        NoticeKind::Success => egui::Color32::from_rgb(80, 200, 120),
        NoticeKind::Submitted | NoticeKind::Warning => egui::Color32::from_rgb(220, 180, 50),
        NoticeKind::Failure => DANGER,
        NoticeKind::Info => egui::Color32::LIGHT_GRAY,
    }
}
