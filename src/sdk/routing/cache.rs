use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, fs, io::Result as IoResult, path::Path, str::FromStr};

use super::route::Route;
use crate::sdk::geo::LngLat;

/// Cache key for one origin/destination trip. Coordinates are stored in
/// their "lon,lat" display form so the key round-trips through JSON.
#[derive(Serialize, Deserialize, Eq, PartialEq, Hash, Clone, Debug)]
pub struct TripKey {
    pub origin: String,
    pub destination: String,
}

impl TripKey {
    pub fn new(start: &LngLat, end: &LngLat) -> Self {
        Self {
            origin: start.to_string(),
            destination: end.to_string(),
        }
    }
}

impl fmt::Display for TripKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.origin, self.destination)
    }
}

impl FromStr for TripKey {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split("::").collect();
        if parts.len() == 2 {
            Ok(TripKey {
                origin: parts[0].to_string(),
                destination: parts[1].to_string(),
            })
        } else {
            Err("Invalid TripKey format")
        }
    }
}

// --- Serde helper for the complex key ---
mod trip_map {
    use super::{Route, TripKey};
    use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};
    use std::{collections::HashMap, str::FromStr};

    pub fn serialize<S: Serializer>(
        map: &HashMap<TripKey, Route>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let string_map: HashMap<String, &Route> =
            map.iter().map(|(k, v)| (k.to_string(), v)).collect();
        string_map.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<TripKey, Route>, D::Error> {
        let string_map = HashMap::<String, Route>::deserialize(deserializer)?;
        string_map
            .into_iter()
            .map(|(k, v)| Ok((TripKey::from_str(&k).map_err(Error::custom)?, v)))
            .collect()
    }
}

/// File-backed cache of geocode lookups and computed routes, keyed the way
/// the CLI asks for them.
#[derive(Serialize, Deserialize, Default)]
pub struct GeoCache {
    geocodes: HashMap<String, LngLat>,
    #[serde(with = "trip_map")]
    routes: HashMap<TripKey, Route>,
}

impl GeoCache {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        if path.as_ref().exists() {
            let data = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> IoResult<()> {
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)
    }

    pub fn get_geocode(&self, query: &str) -> Option<LngLat> {
        self.geocodes.get(query).copied()
    }

    pub fn insert_geocode(&mut self, query: &str, coord: LngLat) {
        self.geocodes.insert(query.to_string(), coord);
    }

    pub fn get_route(&self, key: &TripKey) -> Option<&Route> {
        self.routes.get(key)
    }

    pub fn insert_route(&mut self, key: TripKey, route: Route) {
        self.routes.insert(key, route);
    }
}
