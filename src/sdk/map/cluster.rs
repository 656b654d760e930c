//! Grid clustering of campsite points in web-mercator pixel space,
//! mirroring the provider-side clustering the map source is configured
//! with: 50 px radius, clustered up to zoom 14, individual points beyond.

use crate::sdk::geo::LngLat;

pub const CLUSTER_MAX_ZOOM: u8 = 14;
pub const CLUSTER_RADIUS_PX: f64 = 50.0;

const TILE_SIZE: f64 = 512.0;

/// A group of point indices aggregated into a single symbol at some zoom.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub center: LngLat,
    pub members: Vec<usize>,
}

/// What sits under a click at a given zoom.
#[derive(Debug, Clone, PartialEq)]
pub enum MapFeature {
    Cluster {
        zoom: u8,
        index: usize,
        center: LngLat,
        count: usize,
    },
    Site {
        index: usize,
        coord: LngLat,
    },
}

struct Level {
    clusters: Vec<Cluster>,
    // point index -> cluster index at this zoom
    assignment: Vec<usize>,
}

pub struct ClusterIndex {
    points: Vec<LngLat>,
    levels: Vec<Level>,
    max_zoom: u8,
    radius_px: f64,
}

// Unit-square web-mercator projection; multiply by TILE_SIZE * 2^zoom for
// pixel coordinates at a zoom.
fn project(c: &LngLat) -> (f64, f64) {
    let x = c.lon / 360.0 + 0.5;
    let sin = c.lat.to_radians().sin().clamp(-0.9999, 0.9999);
    let y = 0.5 - 0.25 * ((1.0 + sin) / (1.0 - sin)).ln() / std::f64::consts::PI;
    (x, y)
}

fn pixel_distance(a: &LngLat, b: &LngLat, zoom: u8) -> f64 {
    let (ax, ay) = project(a);
    let (bx, by) = project(b);
    let scale = TILE_SIZE * f64::powi(2.0, zoom as i32);
    ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt() * scale
}

impl ClusterIndex {
    pub fn new(points: Vec<LngLat>) -> Self {
        Self::with_options(points, CLUSTER_RADIUS_PX, CLUSTER_MAX_ZOOM)
    }

    pub fn with_options(points: Vec<LngLat>, radius_px: f64, max_zoom: u8) -> Self {
        let levels = (0..=max_zoom)
            .map(|zoom| build_level(&points, zoom, radius_px))
            .collect();
        Self {
            points,
            levels,
            max_zoom,
            radius_px,
        }
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Features rendered at a zoom: clusters where points group, bare sites
    /// where they do not. Beyond the max cluster zoom everything is a site.
    pub fn features_at(&self, zoom: u8) -> Vec<MapFeature> {
        if zoom > self.max_zoom {
            return self
                .points
                .iter()
                .enumerate()
                .map(|(index, coord)| MapFeature::Site {
                    index,
                    coord: *coord,
                })
                .collect();
        }
        self.levels[zoom as usize]
            .clusters
            .iter()
            .enumerate()
            .map(|(index, cluster)| {
                if cluster.members.len() == 1 {
                    let point = cluster.members[0];
                    MapFeature::Site {
                        index: point,
                        coord: self.points[point],
                    }
                } else {
                    MapFeature::Cluster {
                        zoom,
                        index,
                        center: cluster.center,
                        count: cluster.members.len(),
                    }
                }
            })
            .collect()
    }

    /// The zoom at which a cluster first splits apart, i.e. where zooming in
    /// on it shows more than one symbol. Clusters that never split resolve
    /// at one past the max cluster zoom, where leaves are drawn.
    pub fn expansion_zoom(&self, zoom: u8, index: usize) -> Option<u8> {
        let level = self.levels.get(zoom as usize)?;
        let cluster = level.clusters.get(index)?;
        for deeper in (zoom + 1)..=self.max_zoom {
            let assignment = &self.levels[deeper as usize].assignment;
            let first = assignment[cluster.members[0]];
            if cluster.members.iter().any(|&m| assignment[m] != first) {
                return Some(deeper);
            }
        }
        Some(self.max_zoom + 1)
    }

    /// The feature under a click, if any: nearest rendered feature within
    /// the cluster radius. An empty hit is a no-op for the caller.
    pub fn hit_test(&self, zoom: u8, at: &LngLat) -> Option<MapFeature> {
        let mut best: Option<(f64, MapFeature)> = None;
        for feature in self.features_at(zoom) {
            let center = match &feature {
                MapFeature::Cluster { center, .. } => *center,
                MapFeature::Site { coord, .. } => *coord,
            };
            let dist = pixel_distance(&center, at, zoom);
            if dist <= self.radius_px && best.as_ref().map_or(true, |(d, _)| dist < *d) {
                best = Some((dist, feature));
            }
        }
        best.map(|(_, f)| f)
    }
}

fn build_level(points: &[LngLat], zoom: u8, radius_px: f64) -> Level {
    let mut clusters: Vec<Cluster> = Vec::new();
    let mut assignment = vec![usize::MAX; points.len()];

    for (i, point) in points.iter().enumerate() {
        let joined = clusters
            .iter()
            .position(|c| pixel_distance(&c.center, point, zoom) <= radius_px);
        match joined {
            Some(idx) => {
                let cluster = &mut clusters[idx];
                // running mean keeps the symbol over the mass of the group
                let n = cluster.members.len() as f64;
                cluster.center.lon = (cluster.center.lon * n + point.lon) / (n + 1.0);
                cluster.center.lat = (cluster.center.lat * n + point.lat) / (n + 1.0);
                cluster.members.push(i);
                assignment[i] = idx;
            }
            None => {
                assignment[i] = clusters.len();
                clusters.push(Cluster {
                    center: *point,
                    members: vec![i],
                });
            }
        }
    }

    Level {
        clusters,
        assignment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_groups() -> Vec<LngLat> {
        vec![
            // tight group near Tulsa
            LngLat::new(-95.99, 36.15),
            LngLat::new(-95.98, 36.16),
            LngLat::new(-95.97, 36.14),
            // far away, near Denver
            LngLat::new(-104.99, 39.74),
        ]
    }

    #[test]
    fn cluster_counts_always_sum_to_point_count() {
        let index = ClusterIndex::new(two_groups());
        for zoom in 0..=CLUSTER_MAX_ZOOM + 1 {
            let total: usize = index
                .features_at(zoom)
                .iter()
                .map(|f| match f {
                    MapFeature::Cluster { count, .. } => *count,
                    MapFeature::Site { .. } => 1,
                })
                .sum();
            assert_eq!(total, index.point_count(), "zoom {}", zoom);
        }
    }

    #[test]
    fn distant_groups_split_at_low_zoom() {
        let index = ClusterIndex::new(two_groups());
        // at zoom 0 the whole world is 512 px, so everything clusters
        assert_eq!(index.features_at(0).len(), 1);
        // by zoom 8 Tulsa and Denver are far more than 50 px apart
        assert!(index.features_at(8).len() >= 2);
    }

    #[test]
    fn expansion_zoom_is_where_the_cluster_breaks_up() {
        let index = ClusterIndex::new(two_groups());
        let features = index.features_at(0);
        let (zoom, idx) = match &features[0] {
            MapFeature::Cluster { zoom, index, .. } => (*zoom, *index),
            MapFeature::Site { .. } => panic!("expected a cluster at zoom 0"),
        };
        let expansion = index.expansion_zoom(zoom, idx).unwrap();
        assert!(expansion > zoom);
        // zooming to the expansion zoom must show more than one feature
        assert!(index.features_at(expansion).len() > 1);
    }

    #[test]
    fn hit_test_misses_when_nothing_is_near() {
        let index = ClusterIndex::new(two_groups());
        // middle of the Pacific, far from any cluster at high zoom
        assert!(index.hit_test(12, &LngLat::new(-150.0, 20.0)).is_none());
    }

    #[test]
    fn hit_test_finds_the_cluster_under_the_cursor() {
        let index = ClusterIndex::new(two_groups());
        let hit = index.hit_test(8, &LngLat::new(-95.98, 36.15));
        match hit {
            Some(MapFeature::Cluster { count, .. }) => assert_eq!(count, 3),
            other => panic!("expected the Tulsa cluster, got {:?}", other),
        }
    }

    #[test]
    fn beyond_max_zoom_everything_is_a_leaf() {
        let index = ClusterIndex::new(two_groups());
        let features = index.features_at(CLUSTER_MAX_ZOOM + 1);
        assert_eq!(features.len(), 4);
        assert!(features
            .iter()
            .all(|f| matches!(f, MapFeature::Site { .. })));
    }
}
