//! Detonation dataset: record types and the one-shot loader.
//!
//! ## Key Types
//! - `DetonationRecord`: one historical detonation, deserialized from JSON
//! - `RecordSet`: the immutable, positionally indexed collection
//! - `RecordId`: synthetic positional id used for UI keying
//! - `LoadChannel`: bridges the async fetch into the egui update loop
//!
//! ### Data Flow
//! ```text
//! DataSource ──fetch──▶ parse_records ──▶ LoadChannel ──▶ AppState::records
//! ```

pub mod loader;
pub mod record;
pub mod source;

pub use loader::{LoadChannel, LoadResult};
pub use record::{DetonationRecord, RecordId, RecordSet};
pub use source::{load_records, DataSource, LoadError};
