//! Vector outline layers for the basemap.

use eframe::egui::Color32;
use geo_types::Coord;
use geojson::{Feature, GeoJson, Geometry, PolygonType, Position, Value};

/// Type of geographic layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoLayerType {
    /// Land/sea boundary
    Coastline,
    /// Country borders
    Borders,
}

impl GeoLayerType {
    /// Returns the default color for this layer type.
    pub fn default_color(&self) -> Color32 {
        match self {
            GeoLayerType::Coastline => Color32::from_rgb(110, 130, 120),
            GeoLayerType::Borders => Color32::from_rgb(80, 90, 100),
        }
    }

    /// Returns the default line width for this layer type.
    pub fn default_line_width(&self) -> f32 {
        match self {
            GeoLayerType::Coastline => 1.2,
            GeoLayerType::Borders => 0.8,
        }
    }

    /// Minimum zoom level at which this layer becomes visible.
    pub fn min_zoom(&self) -> f32 {
        match self {
            GeoLayerType::Coastline => 0.0,
            GeoLayerType::Borders => 3.0,
        }
    }
}

/// A geographic feature that can be rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoFeature {
    /// A series of connected line segments
    LineString(Vec<Coord<f64>>),
    /// Closed rings (exterior first, then holes)
    Polygon(Vec<Vec<Coord<f64>>>),
}

impl GeoFeature {
    /// All line strings making up this feature.
    pub fn lines(&self) -> Vec<&[Coord<f64>]> {
        match self {
            GeoFeature::LineString(coords) => vec![coords.as_slice()],
            GeoFeature::Polygon(rings) => rings.iter().map(Vec::as_slice).collect(),
        }
    }
}

/// A geographic layer containing multiple features.
#[derive(Debug, Clone)]
pub struct GeoLayer {
    /// Type of this layer
    pub layer_type: GeoLayerType,
    /// Features in this layer
    pub features: Vec<GeoFeature>,
}

impl GeoLayer {
    /// Creates a new empty layer of the specified type.
    pub fn new(layer_type: GeoLayerType) -> Self {
        Self {
            layer_type,
            features: Vec::new(),
        }
    }

    /// Loads features from GeoJSON data.
    pub fn load_from_geojson(&mut self, geojson_str: &str) -> Result<(), String> {
        let geojson: GeoJson = geojson_str
            .parse()
            .map_err(|e| format!("Failed to parse GeoJSON: {}", e))?;

        match geojson {
            GeoJson::FeatureCollection(fc) => {
                for feature in &fc.features {
                    self.push_feature(feature);
                }
            }
            GeoJson::Feature(f) => self.push_feature(&f),
            GeoJson::Geometry(g) => self.push_geometry(&g),
        }

        Ok(())
    }

    fn push_feature(&mut self, feature: &Feature) {
        if let Some(geometry) = feature.geometry.as_ref() {
            self.push_geometry(geometry);
        }
    }

    fn push_geometry(&mut self, geometry: &Geometry) {
        match &geometry.value {
            Value::LineString(coords) => {
                self.features.push(GeoFeature::LineString(to_coords(coords)));
            }
            Value::MultiLineString(lines) => {
                for line in lines {
                    self.features.push(GeoFeature::LineString(to_coords(line)));
                }
            }
            Value::Polygon(rings) => self.push_polygon(rings),
            Value::MultiPolygon(polygons) => {
                for rings in polygons {
                    self.push_polygon(rings);
                }
            }
            Value::GeometryCollection(geometries) => {
                for g in geometries {
                    self.push_geometry(g);
                }
            }
            // Points carry no outline information
            Value::Point(_) | Value::MultiPoint(_) => {}
        }
    }

    fn push_polygon(&mut self, rings: &PolygonType) {
        if rings.is_empty() {
            return;
        }
        self.features
            .push(GeoFeature::Polygon(rings.iter().map(|r| to_coords(r)).collect()));
    }
}

fn to_coords(positions: &[Position]) -> Vec<Coord<f64>> {
    positions
        .iter()
        .filter(|p| p.len() >= 2)
        .map(|p| Coord { x: p[0], y: p[1] })
        .collect()
}

/// Collection of all geographic layers.
#[derive(Debug, Clone, Default)]
pub struct GeoLayerSet {
    pub coastline: Option<GeoLayer>,
    pub borders: Option<GeoLayer>,
}

impl GeoLayerSet {
    /// Returns an iterator over all loaded layers (back to front).
    pub fn iter(&self) -> impl Iterator<Item = &GeoLayer> {
        [self.coastline.as_ref(), self.borders.as_ref()]
            .into_iter()
            .flatten()
    }

    /// Builds the layers from one GeoJSON document.
    ///
    /// Polygon features become the coastline layer; line features become borders.
    pub fn from_geojson(geojson_str: &str) -> Result<Self, String> {
        let mut parsed = GeoLayer::new(GeoLayerType::Coastline);
        parsed.load_from_geojson(geojson_str)?;

        let (polygons, lines): (Vec<_>, Vec<_>) = parsed
            .features
            .into_iter()
            .partition(|feature| matches!(feature, GeoFeature::Polygon(_)));

        let layer = |layer_type, features: Vec<GeoFeature>| {
            (!features.is_empty()).then_some(GeoLayer {
                layer_type,
                features,
            })
        };

        Ok(Self {
            coastline: layer(GeoLayerType::Coastline, polygons),
            borders: layer(GeoLayerType::Borders, lines),
        })
    }

    /// Total number of features across layers.
    pub fn feature_count(&self) -> usize {
        self.iter().map(|layer| layer.features.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_feature_collection() {
        let geojson = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"name": "A"},
                 "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}},
                {"type": "Feature", "properties": null,
                 "geometry": {"type": "MultiLineString", "coordinates": [[[0,0],[2,2]], [[3,3],[4,4]]]}},
                {"type": "Feature", "properties": null,
                 "geometry": {"type": "Point", "coordinates": [5,5]}}
            ]
        }"#;

        let layers = GeoLayerSet::from_geojson(geojson).unwrap();

        let coastline = layers.coastline.as_ref().unwrap();
        assert_eq!(coastline.features.len(), 1);
        assert_eq!(coastline.features[0].lines()[0].len(), 4);

        assert_eq!(coastline.layer_type, GeoLayerType::Coastline);

        let borders = layers.borders.as_ref().unwrap();
        assert_eq!(borders.layer_type, GeoLayerType::Borders);
        assert!(borders.layer_type.min_zoom() > coastline.layer_type.min_zoom());
        assert_eq!(borders.features.len(), 2);
        assert_eq!(layers.feature_count(), 3);
    }

    #[test]
    fn test_invalid_geojson() {
        assert!(GeoLayerSet::from_geojson("not geojson").is_err());

        let layers = GeoLayerSet::from_geojson(r#"{"type": "Point", "coordinates": [1, 2]}"#).unwrap();
        assert!(layers.coastline.is_none());
        assert!(layers.borders.is_none());
    }
}
