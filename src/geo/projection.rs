//! Map projection and coordinate transformation.
//!
//! Handles converting between geographic coordinates (lat/lon) and
//! screen coordinates using the Web Mercator (slippy map) projection.

use eframe::egui::{Pos2, Rect, Vec2};
use geo_types::Coord;
use std::f64::consts::PI;

/// Width of the whole world in pixels at zoom 0.
pub const TILE_SIZE: f64 = 256.0;
/// Latitude limit of the Web Mercator square.
pub const MAX_LATITUDE: f64 = 85.051_128_78;
pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 18.0;

/// World width in pixels at `zoom`.
pub fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * 2f64.powf(zoom)
}

/// Projects a (lon, lat) coordinate to world pixels at `zoom`.
pub fn world_px(coord: Coord<f64>, zoom: f64) -> (f64, f64) {
    let size = world_size(zoom);
    let lat = coord.y.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let sin = lat.to_radians().sin();

    let x = (coord.x + 180.0) / 360.0 * size;
    let y = (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * size;
    (x, y)
}

/// Inverse of [`world_px`].
pub fn from_world_px(x: f64, y: f64, zoom: f64) -> Coord<f64> {
    let size = world_size(zoom);
    let lon = x / size * 360.0 - 180.0;
    let n = PI - 2.0 * PI * y / size;
    let lat = n.sinh().atan().to_degrees();
    Coord { x: lon, y: lat }
}

/// Wraps a longitude into [-180, 180).
pub fn normalize_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Map projection for converting geographic to screen coordinates.
#[derive(Debug, Clone)]
pub struct MapProjection {
    /// Geographic point shown at the center of the canvas
    pub center: Coord<f64>,
    /// Fractional zoom level
    pub zoom: f32,
    /// Screen rectangle for the canvas
    pub screen_rect: Rect,
}

impl Default for MapProjection {
    fn default() -> Self {
        Self {
            center: Coord { x: 0.0, y: 0.0 },
            zoom: crate::config::DEFAULT_ZOOM,
            screen_rect: Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)),
        }
    }
}

impl MapProjection {
    /// Creates a projection centered on `center` at `zoom`.
    pub fn new(center: Coord<f64>, zoom: f32) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            ..Default::default()
        }
    }

    /// Updates the canvas rectangle.
    pub fn update(&mut self, screen_rect: Rect) {
        self.screen_rect = screen_rect;
    }

    fn center_px(&self) -> (f64, f64) {
        world_px(self.center, self.zoom as f64)
    }

    /// Converts geographic coordinates (lon, lat) to screen position.
    ///
    /// Longitudes are wrapped to the copy of the world nearest the view center.
    pub fn geo_to_screen(&self, coord: Coord<f64>) -> Pos2 {
        let zoom = self.zoom as f64;
        let size = world_size(zoom);
        let (cx, cy) = self.center_px();
        let (x, y) = world_px(coord, zoom);

        let mut dx = x - cx;
        if dx > size / 2.0 {
            dx -= size;
        } else if dx < -size / 2.0 {
            dx += size;
        }

        let center = self.screen_rect.center();
        Pos2::new(center.x + dx as f32, center.y + (y - cy) as f32)
    }

    /// Converts screen position to geographic coordinates (lon, lat).
    pub fn screen_to_geo(&self, pos: Pos2) -> Coord<f64> {
        let (cx, cy) = self.center_px();
        let offset = pos - self.screen_rect.center();
        let coord = from_world_px(cx + offset.x as f64, cy + offset.y as f64, self.zoom as f64);
        Coord {
            x: normalize_lon(coord.x),
            y: coord.y.clamp(-MAX_LATITUDE, MAX_LATITUDE),
        }
    }

    /// Moves the view by a screen-space drag delta.
    pub fn pan_by(&mut self, delta: Vec2) {
        let (cx, cy) = self.center_px();
        let coord = from_world_px(cx - delta.x as f64, cy - delta.y as f64, self.zoom as f64);
        self.center = Coord {
            x: normalize_lon(coord.x),
            y: coord.y.clamp(-MAX_LATITUDE, MAX_LATITUDE),
        };
    }

    /// Zooms by `zoom_delta` levels while keeping the point under `cursor` fixed.
    pub fn zoom_at(&mut self, cursor: Pos2, zoom_delta: f32) {
        let anchor = self.screen_to_geo(cursor);
        self.zoom = (self.zoom + zoom_delta).clamp(MIN_ZOOM, MAX_ZOOM);

        let (ax, ay) = world_px(anchor, self.zoom as f64);
        let offset = cursor - self.screen_rect.center();
        let center = from_world_px(ax - offset.x as f64, ay - offset.y as f64, self.zoom as f64);
        self.center = Coord {
            x: normalize_lon(center.x),
            y: center.y.clamp(-MAX_LATITUDE, MAX_LATITUDE),
        };
    }

    /// Centers the view on `coord` at `zoom`.
    pub fn zoom_to(&mut self, coord: Coord<f64>, zoom: f32) {
        self.center = coord;
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Zoom at which the box between `min` (south-west) and `max` (north-east)
    /// fills most of the canvas.
    pub fn fit_zoom(&self, min: Coord<f64>, max: Coord<f64>) -> f32 {
        let (x0, y0) = world_px(Coord { x: min.x, y: max.y }, 0.0);
        let (x1, y1) = world_px(Coord { x: max.x, y: min.y }, 0.0);
        let width = (x1 - x0).abs().max(1e-9);
        let height = (y1 - y0).abs().max(1e-9);

        let target = self.screen_rect.size() * 0.8;
        let scale = (target.x as f64 / width).min(target.y as f64 / height);
        (scale.log2() as f32).clamp(MIN_ZOOM, MAX_ZOOM)
    }

    /// Returns the visible geographic bounds as (min_lon, min_lat, max_lon, max_lat).
    ///
    /// Longitudes are not wrapped, so they may extend past ±180 when the
    /// canvas is wider than the world.
    pub fn visible_bounds(&self) -> (f64, f64, f64, f64) {
        let zoom = self.zoom as f64;
        let (cx, cy) = self.center_px();
        let half = self.screen_rect.size() / 2.0;

        let top_left = from_world_px(cx - half.x as f64, cy - half.y as f64, zoom);
        let bottom_right = from_world_px(cx + half.x as f64, cy + half.y as f64, zoom);

        (
            top_left.x,
            bottom_right.y.max(-MAX_LATITUDE),
            bottom_right.x,
            top_left.y.min(MAX_LATITUDE),
        )
    }

    /// Checks if a coordinate lands on the canvas (with a pixel margin).
    pub fn is_visible(&self, coord: Coord<f64>, margin_px: f32) -> bool {
        self.screen_rect
            .expand(margin_px)
            .contains(self.geo_to_screen(coord))
    }

    /// Checks if a bounding box intersects with the visible bounds.
    pub fn bbox_visible(&self, min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> bool {
        let (vis_min_lon, vis_min_lat, vis_max_lon, vis_max_lat) = self.visible_bounds();

        // Whole world visible horizontally: only latitude matters
        if vis_max_lon - vis_min_lon >= 360.0 {
            return !(max_lat < vis_min_lat || min_lat > vis_max_lat);
        }

        let margin = 1.0;
        !(max_lon < vis_min_lon - margin
            || min_lon > vis_max_lon + margin
            || max_lat < vis_min_lat - margin
            || min_lat > vis_max_lat + margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_world_px_origin() {
        let (x, y) = world_px(Coord { x: 0.0, y: 0.0 }, 0.0);
        assert!(approx(x, 128.0));
        assert!(approx(y, 128.0));

        let (x, _) = world_px(Coord { x: -180.0, y: 0.0 }, 1.0);
        assert!(approx(x, 0.0));
    }

    #[test]
    fn test_world_px_round_trip() {
        let coord = Coord { x: 77.8, y: 50.4 };
        let (x, y) = world_px(coord, 5.0);
        let back = from_world_px(x, y, 5.0);
        assert!(approx(back.x, coord.x));
        assert!(approx(back.y, coord.y));
    }

    #[test]
    fn test_center_maps_to_screen_center() {
        let mut projection = MapProjection::new(Coord { x: 10.0, y: 20.0 }, 4.0);
        projection.update(Rect::from_min_size(Pos2::new(50.0, 50.0), Vec2::new(400.0, 300.0)));

        let pos = projection.geo_to_screen(Coord { x: 10.0, y: 20.0 });
        assert!((pos - projection.screen_rect.center()).length() < 1e-3);
    }

    #[test]
    fn test_screen_round_trip() {
        let projection = MapProjection::new(Coord { x: -100.0, y: 35.0 }, 6.0);
        let coord = Coord { x: -101.5, y: 36.25 };
        let back = projection.screen_to_geo(projection.geo_to_screen(coord));
        assert!((back.x - coord.x).abs() < 1e-3);
        assert!((back.y - coord.y).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_at_keeps_cursor_anchor() {
        let mut projection = MapProjection::new(Coord { x: 0.0, y: 0.0 }, 3.0);
        let cursor = Pos2::new(600.0, 200.0);
        let before = projection.screen_to_geo(cursor);

        projection.zoom_at(cursor, 1.5);

        let after = projection.screen_to_geo(cursor);
        assert!((projection.zoom - 4.5).abs() < f32::EPSILON);
        assert!((before.x - after.x).abs() < 1e-2);
        assert!((before.y - after.y).abs() < 1e-2);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut projection = MapProjection::default();
        projection.zoom_at(projection.screen_rect.center(), 100.0);
        assert_eq!(projection.zoom, MAX_ZOOM);
        projection.zoom_at(projection.screen_rect.center(), -100.0);
        assert_eq!(projection.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_dateline_wraps_to_nearest_copy() {
        let projection = MapProjection::new(Coord { x: 179.0, y: 0.0 }, 4.0);
        let east = projection.geo_to_screen(Coord { x: 179.5, y: 0.0 });
        let west = projection.geo_to_screen(Coord { x: -179.5, y: 0.0 });
        assert!(west.x > east.x);
        assert!(projection.is_visible(Coord { x: -179.5, y: 0.0 }, 0.0));
    }

    #[test]
    fn test_pan_by_moves_center() {
        let mut projection = MapProjection::new(Coord { x: 0.0, y: 0.0 }, 2.0);
        projection.pan_by(Vec2::new(-256.0, 0.0));
        // One quarter of the 1024 px world eastward
        assert!((projection.center.x - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_fit_zoom() {
        // 90 degrees is 64 px at zoom 0; 80% of the 800 px canvas is 640 px
        let projection = MapProjection::default();
        let zoom = projection.fit_zoom(Coord { x: 0.0, y: -1.0 }, Coord { x: 90.0, y: 1.0 });
        assert!((zoom - 10f32.log2()).abs() < 1e-3);

        let point = Coord { x: 5.0, y: 5.0 };
        assert_eq!(projection.fit_zoom(point, point), MAX_ZOOM);
    }

    #[test]
    fn test_normalize_lon() {
        assert!(approx(normalize_lon(190.0), -170.0));
        assert!(approx(normalize_lon(-190.0), 170.0));
        assert!(approx(normalize_lon(45.0), 45.0));
    }
}
