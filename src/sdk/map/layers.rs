//! Source and layer identifiers plus the registry that models what is
//! currently added to the map style. A style swap wipes the registry, so
//! registration has to be idempotent and re-runnable on every style load.

pub const CAMPSITES_SOURCE: &str = "campSites";
pub const ROUTE_SOURCE: &str = "route";

pub const CLUSTERS_LAYER: &str = "clusters";
pub const CLUSTER_COUNT_LAYER: &str = "cluster-count";
pub const UNCLUSTERED_LAYER: &str = "unclustered-point";
pub const ROUTE_LAYER: &str = "route";

/// The three layers backed by the campsite source; hidden together while a
/// route is displayed.
pub const CAMPSITE_LAYERS: [&str; 3] = [CLUSTERS_LAYER, CLUSTER_COUNT_LAYER, UNCLUSTERED_LAYER];

/// Step thresholds for cluster circle styling, by point count.
const CLUSTER_COLOR_STEPS: [(usize, &str); 3] =
    [(0, "#d9f99d"), (100, "#B9F8C1"), (750, "#99f6e4")];
const CLUSTER_RADIUS_STEPS: [(usize, f64); 3] = [(0, 20.0), (100, 30.0), (750, 40.0)];

pub fn cluster_circle_color(count: usize) -> &'static str {
    step_value(&CLUSTER_COLOR_STEPS, count)
}

pub fn cluster_circle_radius(count: usize) -> f64 {
    step_value(&CLUSTER_RADIUS_STEPS, count)
}

fn step_value<T: Copy>(steps: &[(usize, T)], count: usize) -> T {
    let mut value = steps[0].1;
    for &(threshold, v) in steps {
        if count >= threshold {
            value = v;
        }
    }
    value
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    None,
}

impl Visibility {
    pub fn toggled(self) -> Self {
        match self {
            Visibility::Visible => Visibility::None,
            Visibility::None => Visibility::Visible,
        }
    }

    pub fn from_flag(visible: bool) -> Self {
        if visible {
            Visibility::Visible
        } else {
            Visibility::None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: String,
    pub source: String,
    pub visibility: Visibility,
}

/// What the current style knows about. Mirrors `addSource`/`addLayer`/
/// `setLayoutProperty` bookkeeping on the real map object.
#[derive(Default)]
pub struct StyleRegistry {
    sources: Vec<String>,
    layers: Vec<Layer>,
}

impl StyleRegistry {
    /// Adds a source unless it already exists. Returns whether it was added.
    pub fn add_source(&mut self, id: &str) -> bool {
        if self.has_source(id) {
            return false;
        }
        self.sources.push(id.to_string());
        true
    }

    pub fn has_source(&self, id: &str) -> bool {
        self.sources.iter().any(|s| s == id)
    }

    /// Adds a layer unless it already exists. Returns whether it was added.
    pub fn add_layer(&mut self, id: &str, source: &str, visibility: Visibility) -> bool {
        if self.has_layer(id) {
            return false;
        }
        self.layers.push(Layer {
            id: id.to_string(),
            source: source.to_string(),
            visibility,
        });
        true
    }

    pub fn has_layer(&self, id: &str) -> bool {
        self.layers.iter().any(|l| l.id == id)
    }

    pub fn visibility(&self, id: &str) -> Option<Visibility> {
        self.layers.iter().find(|l| l.id == id).map(|l| l.visibility)
    }

    pub fn set_visibility(&mut self, id: &str, visibility: Visibility) -> bool {
        match self.layers.iter_mut().find(|l| l.id == id) {
            Some(layer) => {
                layer.visibility = visibility;
                true
            }
            None => false,
        }
    }

    /// A full style replace drops every source and layer.
    pub fn clear(&mut self) {
        self.sources.clear();
        self.layers.clear();
    }
}
