//! Map substrate: projection, basemap backends, and vector outline layers.

mod backend;
mod layer;
pub mod projection;
mod renderer;

pub use backend::{GraticuleBackend, MapBackend, VectorBackend};
pub use layer::{GeoLayer, GeoLayerSet};
pub use projection::MapProjection;
pub use renderer::render_geo_layers;
