//! Live map markers keyed by record id.
//!
//! The registry mirrors the visible slice: one entry per record that can be
//! placed on the map. Each `sync` reports which entries were added and removed,
//! and bumps the generation so dependent clustering knows to recompute.

use crate::data::{DetonationRecord, RecordId};
use geo_types::Coord;
use std::collections::{BTreeMap, BTreeSet};

/// A marker bound to one record.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerEntry {
    pub id: RecordId,
    pub position: Coord<f64>,
    /// Hover text
    pub title: String,
}

impl MarkerEntry {
    fn from_record(id: RecordId, record: &DetonationRecord) -> Self {
        Self {
            id,
            position: record.position(),
            title: record.overview_label(),
        }
    }
}

/// Changes produced by a registry sync.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MarkerDelta {
    pub added: Vec<RecordId>,
    pub removed: Vec<RecordId>,
}

impl MarkerDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Index from record id to live marker.
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    markers: BTreeMap<RecordId, MarkerEntry>,
    generation: u64,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter that changes whenever the marker set changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn get(&self, id: RecordId) -> Option<&MarkerEntry> {
        self.markers.get(&id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.markers.contains_key(&id)
    }

    /// Markers in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &MarkerEntry> {
        self.markers.values()
    }

    /// Makes the registry match the visible records.
    ///
    /// Records without a valid position get no marker.
    pub fn sync<'a>(
        &mut self,
        visible: impl IntoIterator<Item = (RecordId, &'a DetonationRecord)>,
    ) -> MarkerDelta {
        let mut delta = MarkerDelta::default();
        let mut keep = BTreeSet::new();

        for (id, record) in visible {
            if !record.has_valid_position() {
                continue;
            }
            keep.insert(id);
            if !self.markers.contains_key(&id) {
                self.markers.insert(id, MarkerEntry::from_record(id, record));
                delta.added.push(id);
            }
        }

        self.markers.retain(|id, _| {
            let retained = keep.contains(id);
            if !retained {
                delta.removed.push(*id);
            }
            retained
        });

        if !delta.is_empty() {
            self.generation += 1;
        }
        delta
    }
}
