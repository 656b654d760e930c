use serde::Deserialize;

// --- Data structures for parsing the geocoding and directions responses ---

#[derive(Deserialize)]
pub struct GeocodeResponse {
    pub features: Vec<PlaceFeature>,
}

#[derive(Deserialize)]
pub struct PlaceFeature {
    pub place_name: String,
    pub geometry: PointGeometry,
}

#[derive(Deserialize)]
pub struct PointGeometry {
    pub coordinates: [f64; 2],
}

#[derive(Deserialize)]
pub struct DirectionsResponse {
    pub routes: Vec<RouteBody>,
}

#[derive(Deserialize)]
pub struct RouteBody {
    pub geometry: LineGeometry,
    pub distance: f64,
    pub duration: f64,
    pub legs: Vec<Leg>,
}

#[derive(Deserialize)]
pub struct LineGeometry {
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Deserialize)]
pub struct Leg {
    pub steps: Vec<Step>,
}

#[derive(Deserialize)]
pub struct Step {
    pub maneuver: Maneuver,
    pub distance: f64,
}

#[derive(Deserialize)]
pub struct Maneuver {
    pub instruction: String,
}
