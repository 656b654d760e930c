use serde::{Deserialize, Serialize};

use super::types::RouteBody;
use crate::sdk::geo::{Bounds, LngLat};

/// A geocoded place: a human-readable label plus its coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub label: String,
    pub coord: LngLat,
}

/// One maneuver-level segment of a driving route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub instruction: String,
    pub distance_m: f64,
}

/// A complete driving route. A new route always replaces the previous one
/// wholesale; no history is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub coords: Vec<LngLat>,
    pub distance_m: f64,
    pub duration_s: f64,
    pub steps: Vec<RouteStep>,
}

impl Route {
    /// Bounding box over every coordinate of the route geometry.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_coords(&self.coords)
    }
}

impl From<RouteBody> for Route {
    fn from(body: RouteBody) -> Self {
        let steps = body
            .legs
            .into_iter()
            .flat_map(|leg| leg.steps)
            .map(|s| RouteStep {
                instruction: s.maneuver.instruction,
                distance_m: s.distance,
            })
            .collect();
        Route {
            coords: body
                .geometry
                .coordinates
                .into_iter()
                .map(LngLat::from_pair)
                .collect(),
            distance_m: body.distance,
            duration_s: body.duration,
            steps,
        }
    }
}
