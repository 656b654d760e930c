use super::error::RoutingError;
use super::route::{Place, Route};
use crate::sdk::geo::LngLat;

pub trait RoutingProvider: Send + Sync {
    /// Geocodes a free-text query to a list of candidate places.
    fn forward_geocode(&self, query: &str) -> Result<Vec<Place>, RoutingError>;

    /// Gets driving directions between two points.
    fn directions(&self, start: LngLat, end: LngLat) -> Result<Route, RoutingError>;
}
