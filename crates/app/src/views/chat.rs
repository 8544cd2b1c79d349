use eframe::egui;
use shared::transcript::{Role, TranscriptEntry};

use crate::state::AppState;

pub fn show(ctx: &egui::Context, state: &mut AppState) {
    let dark = ctx.style().visuals.dark_mode;

    egui::TopBottomPanel::top("header").show(ctx, |ui| {
        ui.add_space(6.0);
        ui.label(egui::RichText::new("HR Assistant").size(18.0).strong());
        ui.add_space(6.0);
    });

    egui::TopBottomPanel::bottom("composer").show(ctx, |ui| {
        ui.add_space(8.0);
        composer(ui, state);
        ui.add_space(8.0);
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for entry in state.chat.transcript.entries() {
                    ui.add_space(6.0);
                    bubble(ui, entry, dark);
                }
            });
    });
}

fn composer(ui: &mut egui::Ui, state: &mut AppState) {
    let enabled = state.chat.composer.is_enabled();

    ui.horizontal(|ui| {
        if ui.add_enabled(enabled, egui::Button::new("📎 Attach")).clicked() {
            let picked = state.file_picker.pick_file();
            state.chat.composer.select_file(picked.as_deref());
        }

        let label = state.chat.composer.file_label();
        if !label.is_empty() {
            ui.label(egui::RichText::new(label).weak());
            if ui.add_enabled(enabled, egui::Button::new("✕").small()).clicked() {
                state.chat.composer.clear_attachment();
            }
        }
    });

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        let mut send = false;
        let width = (ui.available_width() - 80.0).max(120.0);

        let response = ui.add_enabled(
            enabled,
            egui::TextEdit::singleline(&mut state.chat.composer.draft)
                .hint_text("Ask about policies, candidates or documents...")
                .desired_width(width)
                .font(egui::FontId::new(15.0, egui::FontFamily::Proportional)),
        );
        if state.chat.composer.take_focus_request() {
            response.request_focus();
        }
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            send = true;
        }

        let btn = egui::Button::new("Send").fill(egui::Color32::from_rgb(70, 130, 180));
        if ui.add_enabled(enabled, btn).clicked() {
            send = true;
        }
        if !enabled {
            ui.spinner();
        }

        if send {
            state.send_message();
        }
    });
}

fn bubble(ui: &mut egui::Ui, entry: &TranscriptEntry, dark: bool) {
    let fill = match (entry.role, dark) {
        (Role::User, true) => egui::Color32::from_rgb(45, 70, 100),
        (Role::User, false) => egui::Color32::from_rgb(210, 228, 245),
        (Role::Assistant, true) => egui::Color32::from_rgb(50, 50, 58),
        (Role::Assistant, false) => egui::Color32::from_rgb(230, 230, 235),
        (Role::System, true) => egui::Color32::from_rgb(90, 45, 45),
        (Role::System, false) => egui::Color32::from_rgb(248, 220, 220),
    };

    let layout = if entry.role == Role::User {
        egui::Layout::right_to_left(egui::Align::TOP)
    } else {
        egui::Layout::left_to_right(egui::Align::TOP)
    };

    ui.with_layout(layout, |ui| {
        egui::Frame::none()
            .fill(fill)
            .rounding(egui::Rounding::same(12.0))
            .inner_margin(egui::Margin::same(10.0))
            .show(ui, |ui| {
                ui.set_max_width(ui.available_width() * 0.75);
                ui.vertical(|ui| {
                    let text = egui::RichText::new(&entry.content);
                    let text = if entry.pending { text.italics().weak() } else { text };
                    ui.add(egui::Label::new(text).wrap(true));
                    ui.label(egui::RichText::new(&entry.timestamp).size(10.0).weak());
                });
            });
    });
}
