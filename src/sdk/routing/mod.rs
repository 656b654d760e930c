pub mod cache;
pub mod error;
pub mod remote;
pub mod route;
pub mod service;
pub mod types;

pub use cache::{GeoCache, TripKey};
pub use error::RoutingError;
pub use remote::RemoteProvider;
pub use route::{Place, Route, RouteStep};
pub use service::RoutingProvider;
