//! Detonation table: one row per record on the current page.

use super::colors;
use crate::data::{DetonationRecord, RecordId};
use crate::map::Selection;
use eframe::egui::{self, RichText};

/// Column headers, left to right.
pub const COLUMNS: [&str; 4] = ["Country", "Year", "Coordinates", "Yield"];

/// Display text for one table row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: RecordId,
    pub country: String,
    pub year: String,
    pub coordinates: String,
    /// Upper yield bound, blank when unknown
    pub yield_kt: String,
}

impl TableRow {
    fn from_record(id: RecordId, record: &DetonationRecord) -> Self {
        Self {
            id,
            country: record.detonated_by.clone(),
            year: record.detonation_year.to_string(),
            coordinates: format!("({}, {})", record.latitude, record.longitude),
            yield_kt: record
                .upper_yield
                .map(|value| value.to_string())
                .unwrap_or_default(),
        }
    }

    fn cells(&self) -> [&str; 4] {
        [&self.country, &self.year, &self.coordinates, &self.yield_kt]
    }
}

/// Rows for a visible slice whose first record sits at index `offset`.
pub fn table_rows(slice: &[DetonationRecord], offset: usize) -> Vec<TableRow> {
    slice
        .iter()
        .enumerate()
        .map(|(i, record)| TableRow::from_record(RecordId(offset + i), record))
        .collect()
}

/// Renders the rows as a striped grid. Clicking a row selects its record.
pub fn render_table(ui: &mut egui::Ui, rows: &[TableRow], selection: &mut Selection) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            egui::Grid::new("detonation_table")
                .striped(true)
                .num_columns(COLUMNS.len())
                .min_col_width(80.0)
                .show(ui, |ui| {
                    for header in COLUMNS {
                        ui.label(RichText::new(header).strong().color(colors::table::HEADER));
                    }
                    ui.end_row();

                    for row in rows {
                        let selected = selection.is_selected(row.id);
                        for cell in row.cells() {
                            let mut text = RichText::new(cell).monospace().size(12.0);
                            if selected {
                                text = text.color(colors::table::SELECTED);
                            }
                            let response =
                                ui.add(egui::Label::new(text).sense(egui::Sense::click()));
                            if response.clicked() {
                                selection.select(row.id);
                            }
                        }
                        ui.end_row();
                    }
                });

            if rows.is_empty() {
                ui.add_space(8.0);
                ui.label(RichText::new("No records").italics().color(colors::ui::LABEL));
            }
        });
}
