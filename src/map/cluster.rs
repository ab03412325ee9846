//! Zoom-aware marker clustering.
//!
//! Markers are projected to Web Mercator world pixels at the integer zoom
//! level and grouped greedily: in ascending id order, each unclaimed marker
//! claims every unclaimed marker within `radius_px`. Neighbor lookup goes
//! through a uniform grid whose cells are one radius wide.
//!
//! Grouping is always recomputed over the full marker set. A single added or
//! removed marker can change membership anywhere, so there is no incremental
//! path.

use super::markers::{MarkerEntry, MarkerRegistry};
use crate::data::RecordId;
use crate::geo::projection::{from_world_px, normalize_lon, world_px};
use geo_types::Coord;
use serde::Deserialize;
use std::collections::HashMap;

/// Tunable clustering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Grouping radius in screen pixels
    pub radius_px: f64,
    /// Above this zoom level every marker is shown individually
    pub max_zoom: u8,
    /// Minimum number of markers that form a cluster
    pub min_points: usize,
    /// When false every marker is shown individually
    pub enabled: bool,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            radius_px: 60.0,
            max_zoom: 15,
            min_points: 1,
            enabled: true,
        }
    }
}

/// A group of nearby markers shown as one badge.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Centroid of the members (in projected space)
    pub position: Coord<f64>,
    /// Member ids in ascending order
    pub members: Vec<RecordId>,
    /// South-west corner of the member bounding box
    pub min: Coord<f64>,
    /// North-east corner of the member bounding box
    pub max: Coord<f64>,
}

impl Cluster {
    pub fn count(&self) -> usize {
        self.members.len()
    }
}

/// One drawable item of a clustering pass.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterItem {
    Single { id: RecordId, position: Coord<f64> },
    Group(Cluster),
}

impl ClusterItem {
    pub fn position(&self) -> Coord<f64> {
        match self {
            ClusterItem::Single { position, .. } => *position,
            ClusterItem::Group(cluster) => cluster.position,
        }
    }
}

struct Projected {
    id: RecordId,
    position: Coord<f64>,
    x: f64,
    y: f64,
}

/// Integer zoom level used for grouping.
pub fn cluster_level(zoom: f32) -> u8 {
    zoom.floor().clamp(0.0, u8::MAX as f32) as u8
}

/// Groups markers for display at `zoom`.
///
/// Pure and deterministic: the same markers, zoom level, and config always
/// produce the same items in the same order (by lowest member id).
pub fn cluster_markers<'a>(
    markers: impl IntoIterator<Item = &'a MarkerEntry>,
    zoom: f32,
    config: &ClusterConfig,
) -> Vec<ClusterItem> {
    let level = cluster_level(zoom);
    let world_zoom = level as f64;

    let mut points: Vec<Projected> = markers
        .into_iter()
        .map(|marker| {
            let (x, y) = world_px(marker.position, world_zoom);
            Projected {
                id: marker.id,
                position: marker.position,
                x,
                y,
            }
        })
        .collect();
    points.sort_by_key(|p| p.id);

    if !config.enabled || level > config.max_zoom {
        return points
            .iter()
            .map(|p| ClusterItem::Single {
                id: p.id,
                position: p.position,
            })
            .collect();
    }

    let radius = config.radius_px.max(1.0);
    let radius_sq = radius * radius;
    let cell_of = |x: f64, y: f64| ((x / radius).floor() as i64, (y / radius).floor() as i64);

    let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (index, p) in points.iter().enumerate() {
        grid.entry(cell_of(p.x, p.y)).or_default().push(index);
    }

    let mut claimed = vec![false; points.len()];
    let mut items = Vec::new();

    for index in 0..points.len() {
        if claimed[index] {
            continue;
        }
        claimed[index] = true;
        let origin = &points[index];

        let (cx, cy) = cell_of(origin.x, origin.y);
        let mut neighbors: Vec<usize> = Vec::new();
        for gx in cx - 1..=cx + 1 {
            for gy in cy - 1..=cy + 1 {
                let Some(cell) = grid.get(&(gx, gy)) else {
                    continue;
                };
                neighbors.extend(cell.iter().copied().filter(|&other| {
                    if claimed[other] {
                        return false;
                    }
                    let dx = points[other].x - origin.x;
                    let dy = points[other].y - origin.y;
                    dx * dx + dy * dy <= radius_sq
                }));
            }
        }
        neighbors.sort_unstable();

        let count = neighbors.len() + 1;
        if neighbors.is_empty() || count < config.min_points {
            items.push(ClusterItem::Single {
                id: origin.id,
                position: origin.position,
            });
            continue;
        }

        for &other in &neighbors {
            claimed[other] = true;
        }

        let members: Vec<&Projected> = std::iter::once(origin)
            .chain(neighbors.iter().map(|&other| &points[other]))
            .collect();
        items.push(ClusterItem::Group(build_cluster(&members, world_zoom)));
    }

    items
}

fn build_cluster(members: &[&Projected], world_zoom: f64) -> Cluster {
    let count = members.len() as f64;
    let (sum_x, sum_y) = members
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    let centroid = from_world_px(sum_x / count, sum_y / count, world_zoom);

    let (min, max) = members.iter().fold(
        (
            Coord {
                x: f64::MAX,
                y: f64::MAX,
            },
            Coord {
                x: f64::MIN,
                y: f64::MIN,
            },
        ),
        |(min, max), p| {
            (
                Coord {
                    x: min.x.min(p.position.x),
                    y: min.y.min(p.position.y),
                },
                Coord {
                    x: max.x.max(p.position.x),
                    y: max.y.max(p.position.y),
                },
            )
        },
    );

    let mut ids: Vec<RecordId> = members.iter().map(|p| p.id).collect();
    ids.sort_unstable();

    Cluster {
        position: Coord {
            x: normalize_lon(centroid.x),
            y: centroid.y,
        },
        members: ids,
        min,
        max,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CacheKey {
    generation: u64,
    level: u8,
    config: ClusterConfig,
}

/// Last clustering result, recomputed in full whenever its inputs change.
#[derive(Debug, Default)]
pub struct ClusterCache {
    key: Option<CacheKey>,
    items: Vec<ClusterItem>,
}

impl ClusterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the groups if the marker set, zoom level, or config changed.
    ///
    /// Returns true when a recomputation happened.
    pub fn refresh(&mut self, registry: &MarkerRegistry, zoom: f32, config: &ClusterConfig) -> bool {
        let key = CacheKey {
            generation: registry.generation(),
            level: cluster_level(zoom),
            config: *config,
        };
        if self.key == Some(key) {
            return false;
        }

        self.items = cluster_markers(registry.iter(), zoom, config);
        self.key = Some(key);
        log::debug!(
            "Reclustered {} marker(s) at zoom {} into {} item(s)",
            registry.len(),
            key.level,
            self.items.len()
        );
        true
    }

    pub fn items(&self) -> &[ClusterItem] {
        &self.items
    }

    /// Number of multi-marker groups.
    pub fn group_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, ClusterItem::Group(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(id: usize, lon: f64, lat: f64) -> MarkerEntry {
        MarkerEntry {
            id: RecordId(id),
            position: Coord { x: lon, y: lat },
            title: format!("marker {}", id),
        }
    }

    fn group_sizes(items: &[ClusterItem]) -> Vec<usize> {
        items
            .iter()
            .map(|item| match item {
                ClusterItem::Single { .. } => 1,
                ClusterItem::Group(cluster) => cluster.count(),
            })
            .collect()
    }

    #[test]
    fn test_nearby_markers_group_at_low_zoom() {
        let markers = vec![marker(0, 0.0, 0.0), marker(1, 1.0, 1.0), marker(2, 60.0, 0.0)];
        let items = cluster_markers(&markers, 2.0, &ClusterConfig::default());

        assert_eq!(group_sizes(&items), vec![2, 1]);
        let ClusterItem::Group(cluster) = &items[0] else {
            panic!("expected a group");
        };
        assert_eq!(cluster.members, vec![RecordId(0), RecordId(1)]);
        assert!(cluster.position.x > 0.0 && cluster.position.x < 1.0);
        assert_eq!(cluster.min, Coord { x: 0.0, y: 0.0 });
        assert_eq!(cluster.max, Coord { x: 1.0, y: 1.0 });
    }

    #[test]
    fn test_markers_split_when_zoomed_in() {
        let markers = vec![marker(0, 0.0, 0.0), marker(1, 1.0, 1.0)];
        let items = cluster_markers(&markers, 9.0, &ClusterConfig::default());
        assert_eq!(group_sizes(&items), vec![1, 1]);
    }

    #[test]
    fn test_no_grouping_above_max_zoom() {
        let markers = vec![marker(0, 0.0, 0.0), marker(1, 0.00001, 0.0)];
        let config = ClusterConfig::default();

        assert_eq!(group_sizes(&cluster_markers(&markers, 15.0, &config)), vec![2]);
        assert_eq!(
            group_sizes(&cluster_markers(&markers, 16.0, &config)),
            vec![1, 1]
        );
    }

    #[test]
    fn test_disabled_clustering() {
        let markers = vec![marker(0, 0.0, 0.0), marker(1, 0.5, 0.5)];
        let config = ClusterConfig {
            enabled: false,
            ..Default::default()
        };
        assert_eq!(group_sizes(&cluster_markers(&markers, 2.0, &config)), vec![1, 1]);
    }

    #[test]
    fn test_min_points_threshold() {
        let markers = vec![marker(0, 0.0, 0.0), marker(1, 0.5, 0.5)];
        let config = ClusterConfig {
            min_points: 3,
            ..Default::default()
        };
        assert_eq!(group_sizes(&cluster_markers(&markers, 2.0, &config)), vec![1, 1]);
    }

    #[test]
    fn test_greedy_chain_claims_from_lowest_id() {
        // Roughly 14 degrees apart at zoom 2 is ~40 px: A-B and B-C are in range, A-C is not.
        let markers = vec![marker(0, 0.0, 0.0), marker(1, 14.0, 0.0), marker(2, 28.0, 0.0)];
        let items = cluster_markers(&markers, 2.0, &ClusterConfig::default());
        assert_eq!(group_sizes(&items), vec![2, 1]);
        assert!(matches!(items[1], ClusterItem::Single { id: RecordId(2), .. }));
    }

    #[test]
    fn test_recluster_is_idempotent() {
        let markers: Vec<MarkerEntry> = (0..200)
            .map(|i| marker(i, (i as f64 * 7.3) % 360.0 - 180.0, (i as f64 * 3.1) % 160.0 - 80.0))
            .collect();
        let config = ClusterConfig::default();

        let first = cluster_markers(&markers, 3.0, &config);
        let second = cluster_markers(&markers, 3.0, &config);
        assert_eq!(first, second);
        assert_eq!(group_sizes(&first).iter().sum::<usize>(), 200);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let forward = vec![marker(0, 0.0, 0.0), marker(1, 2.0, 2.0), marker(2, 40.0, 10.0)];
        let mut reversed = forward.clone();
        reversed.reverse();

        let config = ClusterConfig::default();
        assert_eq!(
            cluster_markers(&forward, 2.0, &config),
            cluster_markers(&reversed, 2.0, &config)
        );
    }

    #[test]
    fn test_cache_recomputes_only_on_change() {
        use crate::data::record::test_record;
        use crate::data::RecordSet;

        let records = RecordSet::new(vec![
            test_record(0.0, 0.0),
            test_record(1.0, 1.0),
            test_record(40.0, 40.0),
        ]);
        let mut registry = MarkerRegistry::new();
        registry.sync(records.iter_range(0..2));

        let config = ClusterConfig::default();
        let mut cache = ClusterCache::new();
        assert!(cache.refresh(&registry, 2.0, &config));
        assert!(!cache.refresh(&registry, 2.0, &config));
        assert!(!cache.refresh(&registry, 2.7, &config));
        assert_eq!(cache.group_count(), 1);

        assert!(cache.refresh(&registry, 3.0, &config));

        registry.sync(records.iter_range(0..3));
        assert!(cache.refresh(&registry, 3.0, &config));
        assert_eq!(cache.items().len(), 2);

        let unclustered = ClusterConfig {
            enabled: false,
            ..config
        };
        assert!(cache.refresh(&registry, 3.0, &unclustered));
        assert_eq!(cache.group_count(), 0);
        assert_eq!(cache.items().len(), 3);
    }
}
