//! Application state management.
//!
//! This module contains all state structures used throughout the application.
//! The record collection is published once by the loader and never mutated;
//! everything else here is per-session UI state.

mod pager;
pub mod url_state;

pub use pager::PagerState;

use crate::config::AppConfig;
use crate::data::{DetonationRecord, LoadError, RecordSet};
use crate::geo::MapProjection;
use crate::map::Selection;
use geo_types::Coord;
use std::ops::Range;

/// Progress of the one-shot dataset load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Pending,
    Loaded { count: usize, elapsed_ms: f64 },
    Failed(String),
}

/// Root application state containing all sub-states.
pub struct AppState {
    /// Full detonation collection (empty until the load completes)
    pub records: RecordSet,

    /// Table paging position
    pub pager: PagerState,

    /// Map view (center, zoom, canvas rect)
    pub view: MapProjection,

    /// Zoom restored by a view reset
    pub initial_zoom: f32,

    /// Record whose detail popup is open
    pub selection: Selection,

    pub load_status: LoadStatus,

    /// Blocking error notification waiting to be acknowledged
    pub load_error: Option<String>,

    /// Application status message displayed in top bar
    pub status_message: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            records: RecordSet::default(),
            pager: PagerState::new(config.page_size),
            view: MapProjection::new(Coord { x: 0.0, y: 0.0 }, config.initial_zoom),
            initial_zoom: config.initial_zoom,
            selection: Selection::default(),
            load_status: LoadStatus::Pending,
            load_error: None,
            status_message: "Loading detonation data...".to_string(),
        }
    }

    /// Replaces the collection with freshly loaded records.
    pub fn publish_records(&mut self, records: Vec<DetonationRecord>, elapsed_ms: f64) {
        self.records = RecordSet::new(records);
        self.pager.clamp(self.records.len());

        let invalid = self.records.invalid_position_count();
        if invalid > 0 {
            log::warn!("{} record(s) have coordinates outside the valid range", invalid);
        }

        let count = self.records.len();
        self.load_status = LoadStatus::Loaded { count, elapsed_ms };
        self.status_message = format!("Loaded {} records in {:.0} ms", count, elapsed_ms);
    }

    /// Leaves the collection empty and raises the blocking error notification.
    pub fn record_load_failure(&mut self, error: &LoadError) {
        let message = error.to_string();
        self.records = RecordSet::default();
        self.pager.clamp(0);
        self.load_status = LoadStatus::Failed(message.clone());
        self.status_message = format!("Load failed: {}", message);
        self.load_error = Some(message);
    }

    /// Index range of the current page.
    pub fn visible_range(&self) -> Range<usize> {
        self.pager.visible_range(self.records.len())
    }

    /// Page label for the paging controls.
    pub fn page_label(&self) -> String {
        self.pager.label(self.records.len())
    }

    /// Recenters the map on (0, 0) at the initial zoom.
    pub fn reset_view(&mut self) {
        self.view
            .zoom_to(Coord { x: 0.0, y: 0.0 }, self.initial_zoom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::test_record;

    fn config_with_page_size(page_size: usize) -> AppConfig {
        AppConfig {
            page_size,
            ..Default::default()
        }
    }

    #[test]
    fn test_initial_state() {
        let state = AppState::new(&config_with_page_size(10));
        assert_eq!(state.load_status, LoadStatus::Pending);
        assert!(state.records.is_empty());
        assert_eq!(state.page_label(), "Page 1 of 0");
        assert_eq!(state.view.center, Coord { x: 0.0, y: 0.0 });
        assert_eq!(state.view.zoom, 2.0);
    }

    #[test]
    fn test_publish_records() {
        let mut state = AppState::new(&config_with_page_size(10));
        let records = (0..25).map(|i| test_record(i as f64, 0.0)).collect();
        state.publish_records(records, 12.0);

        assert_eq!(state.page_label(), "Page 1 of 3");
        assert_eq!(state.visible_range(), 0..10);
        assert!(matches!(state.load_status, LoadStatus::Loaded { count: 25, .. }));
        assert!(state.load_error.is_none());
    }

    #[test]
    fn test_load_failure_leaves_empty_state() {
        let mut state = AppState::new(&config_with_page_size(10));
        state.record_load_failure(&LoadError::Network("connection refused".to_string()));

        assert!(state.records.is_empty());
        assert_eq!(state.page_label(), "Page 1 of 0");
        assert!(state.visible_range().is_empty());
        assert_eq!(
            state.load_error.as_deref(),
            Some("network error: connection refused")
        );
        assert!(matches!(state.load_status, LoadStatus::Failed(_)));
    }

    #[test]
    fn test_reset_view() {
        let mut state = AppState::default();
        state.view.zoom_to(Coord { x: 40.0, y: 10.0 }, 9.0);
        state.reset_view();
        assert_eq!(state.view.center, Coord { x: 0.0, y: 0.0 });
        assert_eq!(state.view.zoom, state.initial_zoom);
    }
}
