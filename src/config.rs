use std::env;
use std::fs;
use std::net::SocketAddr;

use crate::entities::{builtin_presets, Coordinates, GeocodingScope, PresetRoute, TrackerOptions};
use crate::error::{config_error, Error};

#[derive(Clone, Debug)]
pub struct Config {
    pub access_token: String,
    pub api_base: String,
    pub scope: GeocodingScope,
    pub fallback_location: Coordinates,
    pub voice_language: String,
    pub tracker: TrackerOptions,
    pub presets: Vec<PresetRoute>,
    pub listen_addr: SocketAddr,
}

impl Config {
    /// Reads configuration from the process environment. Call
    /// `dotenv::dotenv()` first to pick up a `.env` file.
    #[tracing::instrument(name = "Config::from_env")]
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token = lookup("MAPBOX_ACCESS_TOKEN")
            .filter(|token| !token.is_empty())
            .ok_or_else(|| config_error("MAPBOX_ACCESS_TOKEN is not set"))?;

        let api_base = lookup("MAPBOX_API_BASE").unwrap_or_else(|| "api.mapbox.com".into());

        let country = lookup("GEOCODING_COUNTRY").unwrap_or_else(|| "SE".into());
        let proximity = match lookup("GEOCODING_PROXIMITY") {
            Some(value) => value.parse()?,
            None => Coordinates::STOCKHOLM,
        };
        let fallback_location = match lookup("FALLBACK_LOCATION") {
            Some(value) => value.parse()?,
            None => Coordinates::STOCKHOLM,
        };

        let voice_language = lookup("VOICE_LANGUAGE").unwrap_or_else(|| "sv-SE".into());

        let presets = match lookup("PRESET_ROUTES_PATH") {
            Some(path) => load_presets(&path)?,
            None => builtin_presets(),
        };

        let listen_addr = lookup("LISTEN_ADDR")
            .unwrap_or_else(|| "127.0.0.1:3000".into())
            .parse()
            .map_err(config_error)?;

        Ok(Self {
            access_token,
            api_base,
            scope: GeocodingScope { country, proximity },
            fallback_location,
            voice_language,
            tracker: TrackerOptions::default(),
            presets,
            listen_addr,
        })
    }
}

#[tracing::instrument]
fn load_presets(path: &str) -> Result<Vec<PresetRoute>, Error> {
    let raw = fs::read_to_string(path)?;
    let presets: Vec<PresetRoute> = serde_json::from_str(&raw).map_err(config_error)?;

    tracing::info!("loaded {} preset routes from {}", presets.len(), path);

    Ok(presets)
}

#[cfg(test)]
fn lookup_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    move |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    }
}

#[test]
fn defaults_target_stockholm() {
    let config = Config::from_lookup(lookup_from(&[("MAPBOX_ACCESS_TOKEN", "pk.test")])).unwrap();

    assert_eq!(config.api_base, "api.mapbox.com");
    assert_eq!(config.scope, GeocodingScope::default());
    assert_eq!(config.fallback_location, Coordinates::STOCKHOLM);
    assert_eq!(config.voice_language, "sv-SE");
    assert_eq!(config.presets, builtin_presets());
    assert_eq!(config.listen_addr.port(), 3000);
}

#[test]
fn access_token_is_required() {
    let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
    assert_eq!(err.code, 6);
}

#[test]
fn overrides_are_parsed() {
    let config = Config::from_lookup(lookup_from(&[
        ("MAPBOX_ACCESS_TOKEN", "pk.test"),
        ("GEOCODING_COUNTRY", "NO"),
        ("GEOCODING_PROXIMITY", "10.7522,59.9139"),
        ("LISTEN_ADDR", "0.0.0.0:8080"),
    ]))
    .unwrap();

    assert_eq!(config.scope.country, "NO");
    assert_eq!(config.scope.proximity, Coordinates::new(10.7522, 59.9139));
    assert_eq!(config.listen_addr.port(), 8080);
}

#[test]
fn bad_proximity_is_rejected() {
    let result = Config::from_lookup(lookup_from(&[
        ("MAPBOX_ACCESS_TOKEN", "pk.test"),
        ("GEOCODING_PROXIMITY", "stockholm"),
    ]));

    assert!(result.is_err());
}

#[test]
fn presets_load_from_json_file() {
    let path = env::temp_dir().join(format!("wayfinder-presets-{}.json", uuid::Uuid::new_v4()));
    fs::write(&path, r#"[{"name":"Bil3","places":["Odenplan, Stockholm"]}]"#).unwrap();

    let presets = load_presets(path.to_str().unwrap()).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(presets, vec![PresetRoute::new("Bil3", &["Odenplan, Stockholm"])]);
}
