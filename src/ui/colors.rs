//! Centralized color constants for the UI.
//!
//! This module provides consistent colors across all UI panels.

use eframe::egui::Color32;

/// General UI colors for labels and values.
pub mod ui {
    use super::Color32;

    /// Muted gray for stat labels.
    pub const LABEL: Color32 = Color32::from_rgb(100, 100, 100);
    /// Slightly brighter for stat values.
    pub const VALUE: Color32 = Color32::from_rgb(160, 160, 160);
    /// Error text.
    pub const ERROR: Color32 = Color32::from_rgb(255, 80, 80);
    /// Success/positive indicator.
    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
}

/// Colors for the detonation table.
pub mod table {
    use super::Color32;

    /// Column header text.
    pub const HEADER: Color32 = Color32::from_rgb(200, 200, 220);
    /// Highlight for the row of the selected record.
    pub const SELECTED: Color32 = Color32::from_rgb(124, 252, 0);
}

/// Colors for the map canvas.
pub mod canvas {
    use super::Color32;

    /// Background (ocean) color.
    pub const BACKGROUND: Color32 = Color32::from_rgb(20, 20, 35);
    /// Overlay info text.
    pub const OVERLAY_TEXT: Color32 = Color32::from_rgb(200, 200, 220);
}

/// Colors for detonation markers and cluster badges.
pub mod markers {
    use super::Color32;

    /// Single detonation pin.
    pub const PIN: Color32 = Color32::from_rgb(255, 140, 60);
    /// Pin outline.
    pub const PIN_STROKE: Color32 = Color32::from_rgb(120, 50, 20);
    /// Pin of the selected record.
    pub const PIN_SELECTED: Color32 = Color32::from_rgb(255, 230, 90);
    /// Cluster badge fill (nuclear green).
    pub const CLUSTER: Color32 = Color32::from_rgb(124, 252, 0);
    /// Cluster count text.
    pub const CLUSTER_TEXT: Color32 = Color32::from_rgb(10, 30, 0);

    /// Cluster halo - requires alpha, use function.
    pub fn cluster_halo() -> Color32 {
        Color32::from_rgba_unmultiplied(124, 252, 0, 60)
    }
}
