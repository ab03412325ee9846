//! UI modules for the Detonation Atlas application.
//!
//! The UI is split into distinct panels:
//! - Top bar: Title, record count, and load status
//! - Central canvas: Detonation map with clustered markers
//! - Bottom panel: Paging controls and the record table

mod bottom_panel;
mod colors;
mod map_view;
mod table;
mod top_bar;

pub use bottom_panel::render_bottom_panel;
pub use map_view::MapView;
pub use top_bar::render_top_bar;
