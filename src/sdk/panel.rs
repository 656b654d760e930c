//! Search and directions panel state. Both panels tag each outbound request
//! with a monotonic sequence number and discard any response that arrives
//! for an older request, so only the most recently issued lookup can land.

use crate::sdk::geo::{self, LngLat};
use crate::sdk::routing::{Place, Route, RoutingError};

/// How many geocode results the panel shows from the last response.
pub const SHOWN_RESULTS: usize = 3;

#[derive(Default)]
pub struct SearchPanel {
    input: String,
    results: Vec<Place>,
    issued_seq: u64,
    applied_seq: u64,
}

impl SearchPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a keystroke and returns the sequence tag for the lookup it
    /// triggers. An emptied input issues no lookup and clears the list.
    pub fn set_input(&mut self, text: &str) -> Option<u64> {
        self.input = text.to_string();
        if text.is_empty() {
            self.results.clear();
            return None;
        }
        self.issued_seq += 1;
        Some(self.issued_seq)
    }

    /// Applies a lookup response. Responses tagged older than one already
    /// applied are stale and are dropped; returns whether it was applied.
    pub fn apply_results(&mut self, seq: u64, places: Vec<Place>) -> bool {
        if seq <= self.applied_seq || seq > self.issued_seq {
            log::debug!("Dropping stale geocode response (seq {})", seq);
            return false;
        }
        self.applied_seq = seq;
        self.results = places;
        true
    }

    /// The visible slice of the last response: its first few entries.
    pub fn shown_results(&self) -> &[Place] {
        &self.results[..self.results.len().min(SHOWN_RESULTS)]
    }

    /// Picks one of the shown results: the input shows the place label, the
    /// list clears, and the place is handed back for the caller to use as
    /// the route start.
    pub fn select(&mut self, index: usize) -> Option<Place> {
        if index >= self.shown_results().len() {
            return None;
        }
        let place = self.results[index].clone();
        self.input = place.label.clone();
        self.results.clear();
        Some(place)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.results.clear();
    }
}

/// A directions request the caller should hand to a provider, tagged so the
/// response can be checked for staleness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionsRequest {
    pub seq: u64,
    pub start: LngLat,
    pub end: LngLat,
}

#[derive(Default)]
pub struct DirectionsPanel {
    issued_seq: u64,
    applied_seq: u64,
    route: Option<Route>,
}

impl DirectionsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the endpoints and issues a tagged request. Unset endpoints
    /// are an explicit error, never a deferred crash.
    pub fn begin_request(
        &mut self,
        start: Option<LngLat>,
        end: Option<LngLat>,
    ) -> Result<DirectionsRequest, RoutingError> {
        let start = start.ok_or(RoutingError::MissingEndpoint("start"))?;
        let end = end.ok_or(RoutingError::MissingEndpoint("end"))?;
        self.issued_seq += 1;
        Ok(DirectionsRequest {
            seq: self.issued_seq,
            start,
            end,
        })
    }

    /// Applies a directions response, replacing any prior route wholesale.
    /// Stale responses are dropped; returns whether it was applied.
    pub fn apply_route(&mut self, seq: u64, route: Route) -> bool {
        if seq <= self.applied_seq || seq > self.issued_seq {
            log::debug!("Dropping stale directions response (seq {})", seq);
            return false;
        }
        self.applied_seq = seq;
        self.route = Some(route);
        true
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    /// Turn-by-turn lines: instruction plus a unit-converted distance where
    /// the step covers any ground.
    pub fn step_lines(&self) -> Vec<String> {
        let Some(route) = &self.route else {
            return Vec::new();
        };
        route
            .steps
            .iter()
            .map(|step| match geo::format_step_distance(step.distance_m) {
                Some(distance) => format!("{}  {}", step.instruction, distance),
                None => step.instruction.clone(),
            })
            .collect()
    }

    /// Trip totals, formatted: "Time: … hrs", "Distance: … mi".
    pub fn summary(&self) -> Option<(String, String)> {
        let route = self.route.as_ref()?;
        Some((
            format!("Time: {}", geo::format_trip_duration(route.duration_s)),
            format!("Distance: {}", geo::format_trip_distance(route.distance_m)),
        ))
    }

    pub fn clear(&mut self) {
        self.route = None;
    }
}
