use eframe::egui;

use crate::state::AppState;

pub fn show(ctx: &egui::Context, state: &mut AppState) {
    egui::CentralPanel::default().show(ctx, |_ui| {});

    egui::Window::new("Sign in")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            let busy = state.login.is_busy();
            let mut submit = false;

            ui.add_space(4.0);
            egui::Grid::new("login_form")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Username");
                    ui.add_enabled(
                        !busy,
                        egui::TextEdit::singleline(&mut state.login.username).desired_width(220.0),
                    );
                    ui.end_row();

                    ui.label("Password");
                    let response = ui.add_enabled(
                        !busy,
                        egui::TextEdit::singleline(&mut *state.login.password)
                            .password(true)
                            .desired_width(220.0),
                    );
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        submit = true;
                    }
                    ui.end_row();
                });

            if let Some(error) = state.login.error() {
                ui.add_space(6.0);
                ui.label(egui::RichText::new(error).color(egui::Color32::from_rgb(220, 80, 80)));
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let label = if busy { "Signing in..." } else { "Sign in" };
                let btn = egui::Button::new(label).fill(egui::Color32::from_rgb(70, 130, 180));
                if ui.add_enabled(!busy, btn).clicked() {
                    submit = true;
                }
                if busy {
                    ui.spinner();
                }
            });

            if submit {
                state.submit_login();
            }
        });
}
