use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_BIND: &str = "127.0.0.1:8000";
const DEFAULT_DATA: &str = "data/tourismCampSites.geojson";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("MAPBOX_ACCESS_TOKEN is not set")]
    MissingToken,

    #[error("Invalid CAMPFINDER_BIND address: {0}")]
    InvalidBind(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub access_token: String,
    pub bind: SocketAddr,
    pub campsites_path: PathBuf,
}

impl Config {
    /// Reads configuration from the environment. An absent or empty access
    /// token is refused here rather than surfacing later as a failed call
    /// to the mapping API.
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_token = env::var("MAPBOX_ACCESS_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let bind_raw = env::var("CAMPFINDER_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind_raw))?;

        let campsites_path = env::var("CAMPFINDER_DATA")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA));

        Ok(Self {
            access_token,
            bind,
            campsites_path,
        })
    }
}
