//! Geographic layer rendering.
//!
//! Renders vector outlines to the egui canvas.

use super::{GeoLayer, GeoLayerSet, MapProjection};
use eframe::egui::{Painter, Pos2, Stroke};
use geo_types::Coord;

/// Renders all visible geographic layers to the canvas.
pub fn render_geo_layers(painter: &Painter, layers: &GeoLayerSet, projection: &MapProjection) {
    // Render layers in order (back to front)
    for layer in layers.iter() {
        if projection.zoom >= layer.layer_type.min_zoom() {
            render_layer(painter, layer, projection);
        }
    }
}

/// Renders a single geographic layer.
fn render_layer(painter: &Painter, layer: &GeoLayer, projection: &MapProjection) {
    let stroke = Stroke::new(
        layer.layer_type.default_line_width(),
        layer.layer_type.default_color(),
    );

    for feature in &layer.features {
        for line in feature.lines() {
            render_line_string(painter, line, projection, stroke);
        }
    }
}

/// Renders a line string (coastline, border).
fn render_line_string(
    painter: &Painter,
    coords: &[Coord<f64>],
    projection: &MapProjection,
    stroke: Stroke,
) {
    if coords.len() < 2 {
        return;
    }

    // Quick bounding box check for visibility
    let (min_lon, max_lon, min_lat, max_lat) = coords.iter().fold(
        (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
        |(min_x, max_x, min_y, max_y), c| {
            (
                min_x.min(c.x),
                max_x.max(c.x),
                min_y.min(c.y),
                max_y.max(c.y),
            )
        },
    );

    if !projection.bbox_visible(min_lon, min_lat, max_lon, max_lat) {
        return;
    }

    let screen_points: Vec<Pos2> = coords
        .iter()
        .map(|c| projection.geo_to_screen(*c))
        .collect();

    // Segments jumping more than half the canvas cross the wrap seam; skip them
    let max_jump = projection.screen_rect.width().max(1.0) / 2.0;

    for window in screen_points.windows(2) {
        if let [p1, p2] = window {
            // Skip very short segments (sub-pixel)
            let dist_sq = (p2.x - p1.x).powi(2) + (p2.y - p1.y).powi(2);
            if dist_sq > 0.5 && (p2.x - p1.x).abs() < max_jump {
                painter.line_segment([*p1, *p2], stroke);
            }
        }
    }
}
