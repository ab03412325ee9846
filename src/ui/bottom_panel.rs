//! Bottom panel UI: paging controls and the detonation table.

use super::table::{render_table, table_rows};
use crate::state::AppState;
use eframe::egui::{self, RichText};
use egui_phosphor::regular as icons;

pub fn render_bottom_panel(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::bottom("bottom_panel")
        .resizable(true)
        .default_height(260.0)
        .min_height(120.0)
        .show(ctx, |ui| {
            ui.vertical(|ui| {
                ui.add_space(4.0);

                // Paging controls row
                ui.horizontal(|ui| {
                    render_pager_controls(ui, state);
                });

                ui.separator();

                let range = state.visible_range();
                let slice = state.pager.visible_slice(state.records.as_slice());
                let rows = table_rows(slice, range.start);
                render_table(ui, &rows, &mut state.selection);
            });
        });
}

fn render_pager_controls(ui: &mut egui::Ui, state: &mut AppState) {
    let total = state.records.len();

    let previous = ui.add_enabled(
        state.pager.has_previous(),
        egui::Button::new(RichText::new(format!("{} Previous", icons::CARET_LEFT)).size(13.0)),
    );
    if previous.clicked() {
        state.pager.previous();
        log::debug!("Paged back to {}", state.page_label());
    }

    ui.label(RichText::new(state.page_label()).monospace().size(13.0));

    let next = ui.add_enabled(
        state.pager.has_next(total),
        egui::Button::new(RichText::new(format!("Next {}", icons::CARET_RIGHT)).size(13.0)),
    );
    if next.clicked() {
        state.pager.next(total);
        log::debug!("Paged forward to {}", state.page_label());
    }

    ui.separator();

    let range = state.visible_range();
    let summary = if range.is_empty() {
        "No records".to_string()
    } else {
        format!("Rows {}-{} of {}", range.start + 1, range.end, total)
    };
    ui.label(RichText::new(summary).size(11.0).color(super::colors::ui::LABEL));
}
