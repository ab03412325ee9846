//! Basemap backends.
//!
//! The map view draws markers on top of whatever a `MapBackend` paints.
//! Backends are interchangeable; none of them needs credentials.

use super::projection::world_size;
use super::{render_geo_layers, GeoLayerSet, MapProjection};
use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Stroke};
use geo_types::Coord;

/// Something that can paint the map substrate beneath the markers.
pub trait MapBackend {
    /// Short name shown in the map overlay.
    fn name(&self) -> &'static str;

    /// Paints the basemap for the current view.
    fn paint(&self, painter: &Painter, projection: &MapProjection);
}

const OCEAN: Color32 = Color32::from_rgb(18, 28, 42);
const GRID: Color32 = Color32::from_rgba_premultiplied(50, 65, 80, 160);
const GRID_MAJOR: Color32 = Color32::from_rgba_premultiplied(80, 100, 115, 200);
const GRID_LABEL: Color32 = Color32::from_rgb(110, 125, 140);

/// Grid spacing in degrees for a zoom level.
pub fn graticule_spacing(zoom: f32) -> f64 {
    match zoom.floor() as i32 {
        i32::MIN..=2 => 30.0,
        3 => 15.0,
        4 => 10.0,
        5 => 5.0,
        6..=7 => 2.0,
        8..=9 => 1.0,
        10..=11 => 0.5,
        _ => 0.1,
    }
}

/// Latitude/longitude grid on a plain background.
#[derive(Debug, Default, Clone)]
pub struct GraticuleBackend;

impl MapBackend for GraticuleBackend {
    fn name(&self) -> &'static str {
        "Graticule"
    }

    fn paint(&self, painter: &Painter, projection: &MapProjection) {
        let rect = projection.screen_rect;
        painter.rect_filled(rect, 0.0, OCEAN);

        let spacing = graticule_spacing(projection.zoom);
        let (min_lon, min_lat, max_lon, max_lat) = projection.visible_bounds();
        let font = FontId::proportional(10.0);

        // Parallels
        let mut lat = (min_lat / spacing).floor() * spacing;
        while lat <= max_lat {
            let y = projection
                .geo_to_screen(Coord {
                    x: projection.center.x,
                    y: lat,
                })
                .y;
            let color = if lat.abs() < f64::EPSILON { GRID_MAJOR } else { GRID };
            painter.line_segment(
                [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
                Stroke::new(1.0, color),
            );
            painter.text(
                Pos2::new(rect.left() + 4.0, y - 2.0),
                Align2::LEFT_BOTTOM,
                format_degrees(lat, 'N', 'S'),
                font.clone(),
                GRID_LABEL,
            );
            lat += spacing;
        }

        // Meridians, unwrapped so every copy of the world gets its grid
        let px_per_degree = world_size(projection.zoom as f64) / 360.0;
        let mut lon = (min_lon / spacing).floor() * spacing;
        while lon <= max_lon {
            let x = rect.center().x + ((lon - projection.center.x) * px_per_degree) as f32;
            let wrapped = super::projection::normalize_lon(lon);
            let color = if wrapped.abs() < f64::EPSILON { GRID_MAJOR } else { GRID };
            painter.line_segment(
                [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
                Stroke::new(1.0, color),
            );
            painter.text(
                Pos2::new(x + 3.0, rect.bottom() - 4.0),
                Align2::LEFT_BOTTOM,
                format_degrees(wrapped, 'E', 'W'),
                font.clone(),
                GRID_LABEL,
            );
            lon += spacing;
        }
    }
}

fn format_degrees(value: f64, positive: char, negative: char) -> String {
    if value.abs() < 1e-9 {
        return "0°".to_string();
    }
    let hemisphere = if value > 0.0 { positive } else { negative };
    format!("{}°{}", value.abs(), hemisphere)
}

/// Graticule plus vector outlines loaded from GeoJSON.
#[derive(Debug, Clone)]
pub struct VectorBackend {
    graticule: GraticuleBackend,
    layers: GeoLayerSet,
}

impl VectorBackend {
    /// Builds the backend from a GeoJSON outline document.
    pub fn from_geojson(geojson_str: &str) -> Result<Self, String> {
        Ok(Self {
            graticule: GraticuleBackend,
            layers: GeoLayerSet::from_geojson(geojson_str)?,
        })
    }

    pub fn feature_count(&self) -> usize {
        self.layers.feature_count()
    }
}

impl MapBackend for VectorBackend {
    fn name(&self) -> &'static str {
        "Vector"
    }

    fn paint(&self, painter: &Painter, projection: &MapProjection) {
        self.graticule.paint(painter, projection);
        render_geo_layers(painter, &self.layers, projection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graticule_spacing_shrinks_with_zoom() {
        let mut previous = f64::MAX;
        for zoom in 1..=18 {
            let spacing = graticule_spacing(zoom as f32);
            assert!(spacing <= previous);
            previous = spacing;
        }
        assert_eq!(graticule_spacing(2.0), 30.0);
        assert_eq!(graticule_spacing(2.9), 30.0);
        assert_eq!(graticule_spacing(5.5), 5.0);
    }

    #[test]
    fn test_format_degrees() {
        assert_eq!(format_degrees(30.0, 'N', 'S'), "30°N");
        assert_eq!(format_degrees(-15.0, 'E', 'W'), "15°W");
        assert_eq!(format_degrees(0.0, 'E', 'W'), "0°");
    }

    #[test]
    fn test_vector_backend_from_geojson() {
        let geojson = r#"{"type": "LineString", "coordinates": [[0,0],[10,10]]}"#;
        let backend = VectorBackend::from_geojson(geojson).unwrap();
        assert_eq!(backend.name(), "Vector");
        assert_eq!(backend.feature_count(), 1);

        assert!(VectorBackend::from_geojson("{").is_err());
    }
}
