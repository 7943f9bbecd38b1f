use std::{env, fmt::Display, str::FromStr};

use atlas::geometry::DEFAULT_GEO_BASE;
use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub events_url: String,
    pub geo_base_url: String,
    pub events_refresh_secs: u64,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "1111"),
            events_url: try_load("EVENTS_URL", "http://127.0.0.1:8000/api/marathons/"),
            geo_base_url: try_load("GEO_BASE_URL", DEFAULT_GEO_BASE),
            events_refresh_secs: try_load("EVENTS_REFRESH_SECS", "300"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
