use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Factors used by the directions display. These match the UI contract:
/// distances come back from the API in meters, durations in seconds.
pub const MILES_PER_METER: f64 = 0.00062137;
pub const FEET_PER_METER: f64 = 3.28084;

const EARTH_RADIUS_KM: f64 = 6_371.0;

/// A coordinate in [longitude, latitude] order, matching the wire format of
/// both the geocoding and directions APIs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lon: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn from_pair(pair: [f64; 2]) -> Self {
        Self {
            lon: pair[0],
            lat: pair[1],
        }
    }

    /// Great-circle distance to another point, in kilometers.
    pub fn haversine_km(&self, other: &LngLat) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();

        let sin_dlat = (dlat / 2.0).sin();
        let sin_dlon = (dlon / 2.0).sin();

        let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
        2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
    }
}

impl fmt::Display for LngLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lon, self.lat)
    }
}

impl FromStr for LngLat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 2 {
            return Err(format!("expected \"lon,lat\", got \"{}\"", s));
        }
        let lon: f64 = parts[0]
            .parse()
            .map_err(|_| format!("invalid longitude: {}", parts[0]))?;
        let lat: f64 = parts[1]
            .parse()
            .map_err(|_| format!("invalid latitude: {}", parts[1]))?;
        Ok(Self { lon, lat })
    }
}

/// Axis-aligned bounding box over [lon, lat] coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Bounds {
    /// Folds a coordinate sequence into its bounding box. Empty input has no
    /// bounding box.
    pub fn from_coords<'a, I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a LngLat>,
    {
        let mut iter = coords.into_iter();
        let first = iter.next()?;
        let mut bounds = Self {
            min_lon: first.lon,
            min_lat: first.lat,
            max_lon: first.lon,
            max_lat: first.lat,
        };
        for c in iter {
            bounds.extend(c);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, c: &LngLat) {
        self.min_lon = self.min_lon.min(c.lon);
        self.min_lat = self.min_lat.min(c.lat);
        self.max_lon = self.max_lon.max(c.lon);
        self.max_lat = self.max_lat.max(c.lat);
    }

    /// Midpoint of the box, the point the camera recenters on after a route
    /// is drawn.
    pub fn center(&self) -> LngLat {
        LngLat {
            lon: (self.min_lon + self.max_lon) / 2.0,
            lat: (self.min_lat + self.max_lat) / 2.0,
        }
    }

    pub fn contains(&self, c: &LngLat) -> bool {
        c.lon >= self.min_lon
            && c.lon <= self.max_lon
            && c.lat >= self.min_lat
            && c.lat <= self.max_lat
    }
}

pub fn meters_to_miles(meters: f64) -> f64 {
    meters * MILES_PER_METER
}

pub fn meters_to_feet(meters: f64) -> f64 {
    meters * FEET_PER_METER
}

pub fn seconds_to_hours(seconds: f64) -> f64 {
    seconds / 3600.0
}

/// Per-step distance label. Steps shorter than a hundredth of a foot are
/// suppressed; short hops show feet, anything over 0.75 mi shows miles.
pub fn format_step_distance(meters: f64) -> Option<String> {
    let feet = meters_to_feet(meters);
    if format!("{:.2}", feet) == "0.00" {
        return None;
    }
    let miles = meters_to_miles(meters);
    if miles > 0.75 {
        Some(format!("{:.2} mi", miles))
    } else {
        Some(format!("{:.0} ft", feet))
    }
}

pub fn format_trip_distance(meters: f64) -> String {
    format!("{:.2} mi", meters_to_miles(meters))
}

pub fn format_trip_duration(seconds: f64) -> String {
    format!("{:.2} hrs", seconds_to_hours(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_center_stays_inside_the_box() {
        let coords = [
            LngLat::new(-95.0, 37.0),
            LngLat::new(-94.2, 36.4),
            LngLat::new(-94.8, 36.9),
            LngLat::new(-94.0, 36.5),
        ];
        let bounds = Bounds::from_coords(&coords).unwrap();
        let center = bounds.center();
        assert!(center.lon >= bounds.min_lon && center.lon <= bounds.max_lon);
        assert!(center.lat >= bounds.min_lat && center.lat <= bounds.max_lat);
        assert!(bounds.contains(&center));
    }

    #[test]
    fn bounds_of_empty_input_is_none() {
        let empty: [LngLat; 0] = [];
        assert!(Bounds::from_coords(&empty).is_none());
    }

    #[test]
    fn bounds_of_single_point_centers_on_it() {
        let p = LngLat::new(-94.0, 36.5);
        let bounds = Bounds::from_coords(&[p]).unwrap();
        assert_eq!(bounds.center(), p);
    }

    #[test]
    fn trip_summary_formatting_matches_the_ui_contract() {
        assert_eq!(format_trip_distance(16093.0), "10.00 mi");
        assert_eq!(format_trip_duration(1200.0), "0.33 hrs");
    }

    #[test]
    fn step_distance_picks_feet_below_three_quarter_mile() {
        assert_eq!(format_step_distance(100.0).unwrap(), "328 ft");
        assert_eq!(format_step_distance(2000.0).unwrap(), "1.24 mi");
    }

    #[test]
    fn near_zero_step_distance_is_suppressed() {
        assert!(format_step_distance(0.0).is_none());
        assert!(format_step_distance(0.001).is_none());
    }

    #[test]
    fn lnglat_parses_from_cli_form() {
        let c: LngLat = "-95.7129, 37.0902".parse().unwrap();
        assert_eq!(c, LngLat::new(-95.7129, 37.0902));
        assert!("37.0902".parse::<LngLat>().is_err());
        assert!("a,b".parse::<LngLat>().is_err());
    }
}
