//! Detonation record type and the positional record arena.
//!
//! Field names follow the camelCase keys of the published dataset so the
//! document deserializes without any intermediate representation.

use chrono::NaiveDate;
use geo_types::Coord;
use serde::Deserialize;
use std::ops::Range;

/// Fallback label for detonations without a device name.
pub const UNNAMED_LABEL: &str = "Unnamed";

/// Synthetic identifier for a record: its position in the loaded sequence.
///
/// Only used to key UI state (markers, selection). It carries no meaning
/// outside a single session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(pub usize);

/// One historical nuclear detonation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetonationRecord {
    /// Responsible party (country)
    #[serde(default)]
    pub detonated_by: String,
    /// Location name
    #[serde(default)]
    pub detonated_in: String,
    #[serde(default)]
    pub data_source: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Body-wave magnitude
    #[serde(default)]
    pub magnitude_body: Option<f64>,
    /// Surface-wave magnitude
    #[serde(default)]
    pub magnitude_surface: Option<f64>,
    #[serde(default)]
    pub depth: Option<f64>,
    /// Lower yield bound in kilotons
    #[serde(default)]
    pub lower_yield: Option<f64>,
    /// Upper yield bound in kilotons
    #[serde(default)]
    pub upper_yield: Option<f64>,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub device_type: String,
    #[serde(default)]
    pub detonation_day: u32,
    #[serde(default)]
    pub detonation_month: u32,
    #[serde(default)]
    pub detonation_year: i32,
}

impl DetonationRecord {
    /// Geographic position as a (lon, lat) coordinate.
    pub fn position(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }

    /// Whether the coordinates are finite and inside the valid lat/lon ranges.
    pub fn has_valid_position(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Device name, treating blank names as missing.
    pub fn device_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Device name or the "Unnamed" fallback.
    pub fn display_name(&self) -> &str {
        self.device_name().unwrap_or(UNNAMED_LABEL)
    }

    /// Short hover text: `"<name> - <party> - <year>"`.
    pub fn overview_label(&self) -> String {
        format!(
            "{} - {} - {}",
            self.display_name(),
            self.detonated_by,
            self.detonation_year
        )
    }

    /// Full date when day and month form a valid calendar date, otherwise the year.
    pub fn date_label(&self) -> String {
        NaiveDate::from_ymd_opt(
            self.detonation_year,
            self.detonation_month,
            self.detonation_day,
        )
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| self.detonation_year.to_string())
    }

    /// Seismic magnitudes, e.g. `"mb 5.3, Ms 4.1"`. `None` when neither is recorded.
    pub fn magnitude_label(&self) -> Option<String> {
        let parts: Vec<String> = [("mb", self.magnitude_body), ("Ms", self.magnitude_surface)]
            .into_iter()
            .filter_map(|(scale, value)| value.filter(|v| *v != 0.0).map(|v| format!("{} {}", scale, v)))
            .collect();
        (!parts.is_empty()).then(|| parts.join(", "))
    }

    /// Yield in kilotons, or `None` when no upper bound is recorded.
    /// An upper bound of 0 counts as unrecorded.
    ///
    /// Shows a range when both bounds are present and differ.
    pub fn yield_label(&self) -> Option<String> {
        let upper = self.upper_yield.filter(|upper| *upper != 0.0)?;
        match self.lower_yield {
            Some(lower) if lower != upper => Some(format!("{}–{} kt", lower, upper)),
            _ => Some(format!("{} kt", upper)),
        }
    }
}

/// Immutable, positionally indexed collection of loaded records.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<DetonationRecord>,
}

impl RecordSet {
    pub fn new(records: Vec<DetonationRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&DetonationRecord> {
        self.records.get(id.0)
    }

    pub fn as_slice(&self) -> &[DetonationRecord] {
        &self.records
    }

    /// Iterates the records in `range` together with their ids.
    ///
    /// Out-of-bounds ranges are truncated to the collection length.
    pub fn iter_range(
        &self,
        range: Range<usize>,
    ) -> impl Iterator<Item = (RecordId, &DetonationRecord)> + '_ {
        let end = range.end.min(self.records.len());
        let start = range.start.min(end);
        self.records[start..end]
            .iter()
            .enumerate()
            .map(move |(offset, record)| (RecordId(start + offset), record))
    }

    /// Number of records whose coordinates cannot be placed on the map.
    pub fn invalid_position_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| !record.has_valid_position())
            .count()
    }
}

#[cfg(test)]
pub(crate) fn test_record(lat: f64, lon: f64) -> DetonationRecord {
    DetonationRecord {
        detonated_by: "USA".to_string(),
        detonated_in: "Nevada".to_string(),
        data_source: "DOE".to_string(),
        latitude: lat,
        longitude: lon,
        magnitude_body: None,
        magnitude_surface: None,
        depth: None,
        lower_yield: None,
        upper_yield: None,
        purpose: "Wr".to_string(),
        name: None,
        device_type: "Shaft".to_string(),
        detonation_day: 16,
        detonation_month: 7,
        detonation_year: 1945,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_record() {
        let json = r#"{
            "detonatedBy": "USA",
            "detonatedIn": "Alamogordo",
            "dataSource": "DOE",
            "latitude": 32.54,
            "longitude": -105.57,
            "magnitudeBody": 0,
            "magnitudeSurface": 0,
            "depth": -0.1,
            "lowerYield": 21,
            "upperYield": 21,
            "purpose": "Wr",
            "name": "Trinity",
            "type": "Tower",
            "detonationDay": 16,
            "detonationMonth": 7,
            "detonationYear": 1945
        }"#;

        let record: DetonationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.detonated_by, "USA");
        assert_eq!(record.device_type, "Tower");
        assert_eq!(record.device_name(), Some("Trinity"));
        assert_eq!(record.upper_yield, Some(21.0));
        assert_eq!(record.date_label(), "1945-07-16");
    }

    #[test]
    fn test_optional_fields_absent_or_null() {
        let json = r#"{
            "detonatedBy": "USSR",
            "latitude": 50.4,
            "longitude": 77.8,
            "upperYield": null,
            "name": null,
            "detonationYear": 1949
        }"#;

        let record: DetonationRecord = serde_json::from_str(json).unwrap();
        assert!(record.upper_yield.is_none());
        assert!(record.depth.is_none());
        assert_eq!(record.display_name(), "Unnamed");
        assert!(record.yield_label().is_none());
        assert_eq!(record.purpose, "");
    }

    #[test]
    fn test_blank_name_is_unnamed() {
        let mut record = test_record(0.0, 0.0);
        record.name = Some("   ".to_string());
        assert_eq!(record.display_name(), UNNAMED_LABEL);
        assert_eq!(record.overview_label(), "Unnamed - USA - 1945");
    }

    #[test]
    fn test_yield_label_range() {
        let mut record = test_record(0.0, 0.0);
        record.upper_yield = Some(150.0);
        assert_eq!(record.yield_label().as_deref(), Some("150 kt"));

        record.lower_yield = Some(20.0);
        assert_eq!(record.yield_label().as_deref(), Some("20–150 kt"));

        record.upper_yield = Some(0.0);
        assert_eq!(record.yield_label(), None);
    }

    #[test]
    fn test_magnitude_label() {
        let mut record = test_record(0.0, 0.0);
        assert_eq!(record.magnitude_label(), None);

        record.magnitude_body = Some(5.3);
        assert_eq!(record.magnitude_label().as_deref(), Some("mb 5.3"));

        record.magnitude_surface = Some(4.1);
        assert_eq!(record.magnitude_label().as_deref(), Some("mb 5.3, Ms 4.1"));

        record.magnitude_body = Some(0.0);
        assert_eq!(record.magnitude_label().as_deref(), Some("Ms 4.1"));
    }

    #[test]
    fn test_invalid_date_falls_back_to_year() {
        let mut record = test_record(0.0, 0.0);
        record.detonation_day = 0;
        record.detonation_month = 0;
        assert_eq!(record.date_label(), "1945");
    }

    #[test]
    fn test_position_validity() {
        assert!(test_record(90.0, -180.0).has_valid_position());
        assert!(!test_record(91.0, 0.0).has_valid_position());
        assert!(!test_record(0.0, 180.5).has_valid_position());
        assert!(!test_record(f64::NAN, 0.0).has_valid_position());
    }

    #[test]
    fn test_iter_range_assigns_positional_ids() {
        let set = RecordSet::new((0..5).map(|i| test_record(i as f64, 0.0)).collect());
        let ids: Vec<RecordId> = set.iter_range(2..10).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![RecordId(2), RecordId(3), RecordId(4)]);
        assert_eq!(set.iter_range(7..9).count(), 0);
    }
}
