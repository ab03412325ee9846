//! Selected detonation and the contents of its detail popup.

use super::markers::MarkerRegistry;
use crate::data::{DetonationRecord, RecordId};

/// At most one selected record.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Selection(Option<RecordId>);

impl Selection {
    pub fn selected(&self) -> Option<RecordId> {
        self.0
    }

    pub fn is_selected(&self, id: RecordId) -> bool {
        self.0 == Some(id)
    }

    /// Selects `id`, replacing any previous selection. Returns the replaced id.
    pub fn select(&mut self, id: RecordId) -> Option<RecordId> {
        self.0.replace(id).filter(|previous| *previous != id)
    }

    pub fn clear(&mut self) -> Option<RecordId> {
        self.0.take()
    }

    /// Drops the selection when its marker is no longer on the map.
    pub fn retain_visible(&mut self, registry: &MarkerRegistry) -> Option<RecordId> {
        match self.0 {
            Some(id) if !registry.contains(id) => self.0.take(),
            _ => None,
        }
    }
}

/// Title and labelled rows shown in the detail popup.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    pub title: String,
    pub rows: Vec<(&'static str, String)>,
}

impl PopupContent {
    /// Builds the popup for a record. Rows without a value are omitted.
    pub fn from_record(record: &DetonationRecord) -> Self {
        let mut rows = vec![
            ("Country", record.detonated_by.clone()),
            ("Year", record.detonation_year.to_string()),
            (
                "Coordinates",
                format!("{}, {}", record.latitude.round(), record.longitude.round()),
            ),
        ];

        if let Some(yield_label) = record.yield_label() {
            rows.push(("Yield", yield_label));
        }

        for (label, value) in [
            ("Date", record.date_label()),
            ("Location", record.detonated_in.clone()),
            ("Purpose", record.purpose.clone()),
            ("Type", record.device_type.clone()),
        ] {
            if !value.trim().is_empty() {
                rows.push((label, value));
            }
        }

        if let Some(depth) = record.depth {
            rows.push(("Depth", format!("{} km", depth)));
        }
        if let Some(magnitude) = record.magnitude_label() {
            rows.push(("Magnitude", magnitude));
        }
        if !record.data_source.trim().is_empty() {
            rows.push(("Source", record.data_source.clone()));
        }

        Self {
            title: record.display_name().to_string(),
            rows,
        }
    }

    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(row_label, _)| *row_label == label)
            .map(|(_, value)| value.as_str())
    }
}
