//! Top bar UI: app title, record count, and status.

use super::colors;
use crate::state::{AppState, LoadStatus};
use eframe::egui::{self, Color32, RichText};

pub fn render_top_bar(ctx: &egui::Context, state: &AppState) {
    egui::TopBottomPanel::top("top_bar")
        .exact_height(36.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                // App title
                ui.label(
                    RichText::new("Nuclear Detonations")
                        .strong()
                        .size(16.0)
                        .color(Color32::WHITE),
                );

                ui.separator();

                ui.label(RichText::new("Records:").size(12.0).color(colors::ui::LABEL));
                ui.label(
                    RichText::new(state.records.len().to_string())
                        .monospace()
                        .size(12.0)
                        .color(colors::ui::VALUE),
                );

                ui.separator();

                // Status text
                let status_color = match state.load_status {
                    LoadStatus::Pending => Color32::GRAY,
                    LoadStatus::Loaded { .. } => colors::ui::SUCCESS,
                    LoadStatus::Failed(_) => colors::ui::ERROR,
                };
                if matches!(state.load_status, LoadStatus::Pending) {
                    ui.spinner();
                }
                let status = ui.label(
                    RichText::new(&state.status_message)
                        .size(13.0)
                        .color(status_color),
                );
                match &state.load_status {
                    LoadStatus::Loaded { count, elapsed_ms } => {
                        status.on_hover_text(format!("{} records in {:.0} ms", count, elapsed_ms));
                    }
                    LoadStatus::Failed(message) => {
                        status.on_hover_text(message.as_str());
                    }
                    LoadStatus::Pending => {}
                }
            });
        });
}
