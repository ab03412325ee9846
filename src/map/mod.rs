//! Marker lifecycle, clustering, and selection for the map view.
//!
//! The record arena (`RecordSet`) stays the single owner of record data;
//! everything here refers to records by `RecordId`.

mod cluster;
mod markers;
mod selection;

pub use cluster::{ClusterCache, ClusterConfig, ClusterItem};
pub use markers::MarkerRegistry;
pub use selection::{PopupContent, Selection};
