pub mod campsites;
pub mod config;
pub mod geo;
pub mod map;
pub mod panel;
pub mod relay;
pub mod routing;
pub mod util;
