use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use geo_types::Point;
use serde::Deserialize;

use crate::{
    api::{Directions, Geocoder},
    entities::{Coordinates, PlaceQuery, RoutePlan},
    error::{
        config_error, incomplete_route_error, invalid_input_error, upstream_error, Error,
    },
};

/// Client for the Mapbox geocoding and directions endpoints.
#[derive(Clone)]
pub struct MapboxClient {
    http: reqwest::Client,
    api_base: String,
    access_token: String,
}

impl std::fmt::Debug for MapboxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapboxClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Clone, Debug, Deserialize)]
struct Feature {
    /// GeoJSON position, `[lng, lat]`.
    center: [f64; 2],
}

#[derive(Clone, Debug, Deserialize)]
struct DirectionsResponse {
    code: String,
    routes: Option<serde_json::Value>,
}

impl MapboxClient {
    pub fn new(api_base: String, access_token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base,
            access_token,
        }
    }

    fn base_url(&self) -> String {
        if self.api_base.contains("://") {
            self.api_base.trim_end_matches('/').into()
        } else {
            format!("https://{}", self.api_base.trim_end_matches('/'))
        }
    }

    fn geocoding_url(&self, query: &PlaceQuery) -> Result<Url, Error> {
        let mut url = Url::parse(&format!("{}/geocoding/v5/mapbox.places", self.base_url()))
            .map_err(config_error)?;

        url.path_segments_mut()
            .map_err(|_| config_error("MAPBOX_API_BASE cannot be a base"))?
            .push(&format!("{}.json", query.text));

        let proximity: String = query.proximity.into();
        url.query_pairs_mut()
            .append_pair("country", &query.country)
            .append_pair("proximity", &proximity)
            .append_pair("access_token", &self.access_token);

        Ok(url)
    }

    fn directions_url(&self, plan: &RoutePlan) -> Result<Url, Error> {
        let stops = plan.stops().ok_or_else(incomplete_route_error)?;
        let stops: Vec<String> = stops.into_iter().map(String::from).collect();

        let mut url = Url::parse(&format!(
            "{}/directions/v5/{}/{}",
            self.base_url(),
            plan.profile.profile,
            stops.join(";")
        ))
        .map_err(config_error)?;

        url.query_pairs_mut()
            .append_pair("alternatives", &plan.profile.alternatives.to_string())
            .append_pair("geometries", "geojson")
            .append_pair("overview", "full")
            .append_pair("access_token", &self.access_token);

        if plan.profile.congestion {
            url.query_pairs_mut().append_pair("annotations", "congestion");
        }

        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<String, Error> {
        let res = self.http.get(url).send().await?;

        let status_code = res.status();

        if status_code.is_client_error() {
            return Err(invalid_input_error());
        } else if status_code != StatusCode::OK {
            return Err(upstream_error());
        }

        Ok(res.text().await?)
    }
}

fn parse_candidates(body: &str) -> Result<Vec<Coordinates>, Error> {
    let data: FeatureCollection = serde_json::from_str(body)?;

    Ok(data
        .features
        .into_iter()
        .map(|feature| Point::from(feature.center).into())
        .collect())
}

fn parse_routes(body: &str) -> Result<serde_json::Value, Error> {
    let data: DirectionsResponse = serde_json::from_str(body)?;

    if data.code != "Ok" {
        tracing::warn!("directions returned code {}", data.code);
        return Err(upstream_error());
    }

    data.routes.ok_or_else(upstream_error)
}

#[async_trait]
impl Geocoder for MapboxClient {
    #[tracing::instrument(skip(self), fields(text = %query.text))]
    async fn forward(&self, query: &PlaceQuery) -> Result<Vec<Coordinates>, Error> {
        let url = self.geocoding_url(query)?;
        let body = self.get(url).await?;

        parse_candidates(&body)
    }
}

#[async_trait]
impl Directions for MapboxClient {
    #[tracing::instrument(skip_all)]
    async fn directions(&self, plan: &RoutePlan) -> Result<serde_json::Value, Error> {
        let url = self.directions_url(plan)?;
        let body = self.get(url).await?;

        parse_routes(&body)
    }
}

#[cfg(test)]
fn test_client() -> MapboxClient {
    MapboxClient::new("api.mapbox.com".into(), "pk.test".into())
}

#[test]
fn geocoding_url_encodes_place_and_scope() {
    use crate::entities::GeocodingScope;

    let query = PlaceQuery::new("bälstavägen 36, Stockholm", &GeocodingScope::default()).unwrap();
    let url = test_client().geocoding_url(&query).unwrap();

    assert_eq!(url.host_str(), Some("api.mapbox.com"));
    assert_eq!(
        url.path(),
        "/geocoding/v5/mapbox.places/b%C3%A4lstav%C3%A4gen%2036,%20Stockholm.json"
    );

    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(
        pairs,
        vec![
            ("country".into(), "SE".into()),
            ("proximity".into(), "18.0686,59.3293".into()),
            ("access_token".into(), "pk.test".into()),
        ]
    );
}

#[test]
fn geocoding_url_escapes_slashes() {
    use crate::entities::GeocodingScope;

    let query = PlaceQuery::new("a/b", &GeocodingScope::default()).unwrap();
    let url = test_client().geocoding_url(&query).unwrap();

    assert!(url.path().ends_with("/a%2Fb.json"));
}

#[test]
fn directions_url_lists_stops_in_driving_order() {
    let mut plan = RoutePlan::default();
    plan.set_origin(Coordinates::new(18.0, 59.0));
    plan.set_destination(Some(Coordinates::new(18.2, 59.2)));
    plan.add_waypoint(0, Coordinates::new(18.1, 59.1));

    let url = test_client().directions_url(&plan).unwrap();

    assert_eq!(
        url.path(),
        "/directions/v5/mapbox/driving/18,59;18.1,59.1;18.2,59.2"
    );
    assert!(url
        .query_pairs()
        .any(|(k, v)| k == "annotations" && v == "congestion"));
}

#[test]
fn directions_url_needs_origin() {
    let mut plan = RoutePlan::default();
    plan.set_destination(Some(Coordinates::new(18.2, 59.2)));

    let err = test_client().directions_url(&plan).unwrap_err();
    assert_eq!(err.code, 103);
}

#[test]
fn candidates_keep_feature_order() {
    let body = r#"{
        "type": "FeatureCollection",
        "features": [
            {"place_name": "Sturegatan 21", "center": [18.07, 59.34]},
            {"place_name": "Sturegatan 21, Sundbyberg", "center": [17.97, 59.36]}
        ]
    }"#;

    let candidates = parse_candidates(body).unwrap();
    assert_eq!(
        candidates,
        vec![Coordinates::new(18.07, 59.34), Coordinates::new(17.97, 59.36)]
    );
}

#[test]
fn empty_feature_list_is_not_an_error() {
    let candidates = parse_candidates(r#"{"features": []}"#).unwrap();
    assert!(candidates.is_empty());
}

#[test]
fn missing_features_is_malformed() {
    let err = parse_candidates(r#"{"message": "Not Found"}"#).unwrap_err();
    assert_eq!(err.code, 7);
}

#[test]
fn routes_require_ok_code() {
    let routes = parse_routes(r#"{"code": "Ok", "routes": [{"distance": 1200.5}]}"#).unwrap();
    assert_eq!(routes[0]["distance"], 1200.5);

    let err = parse_routes(r#"{"code": "NoRoute"}"#).unwrap_err();
    assert_eq!(err.code, 4);
}
