use eframe::egui;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod config;
mod state;
mod views;
mod widgets;

use chat::View;
use state::AppState;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = config::load_settings_or_default();
    tracing::info!("backend at {}", settings.base_url);
    let state = AppState::new(settings, config::session_store())?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([480.0, 400.0]),
        vsync: true,
        ..Default::default()
    };
    eframe::run_native(
        "HR Assistant",
        options,
        Box::new(|_cc| Box::new(HrAssistantApp { state })),
    )
    .map_err(|e| anyhow::anyhow!("ui error: {}", e))
}

struct HrAssistantApp {
    state: AppState,
}

impl eframe::App for HrAssistantApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Non-blocking: results of background login/send
        self.state.poll();

        if self.state.is_waiting() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        match self.state.view {
            View::Login => views::login::show(ctx, &mut self.state),
            View::Chat => views::chat::show(ctx, &mut self.state),
        }
    }
}
