pub mod basemap;
pub mod cluster;
pub mod layers;
pub mod view;

pub use basemap::Basemap;
pub use cluster::{ClusterIndex, MapFeature};
pub use layers::{StyleRegistry, Visibility};
pub use view::{Camera, ClickOutcome, MapView, Marker, MarkerColor, ViewState};
