pub mod sdk;

pub use sdk::campsites::{load_campsites, CampSite};
pub use sdk::config::Config;
pub use sdk::geo::{Bounds, LngLat};
pub use sdk::map::{Basemap, MapView};
pub use sdk::panel::{DirectionsPanel, SearchPanel};
pub use sdk::routing::{GeoCache, Place, RemoteProvider, Route, RoutingProvider};
