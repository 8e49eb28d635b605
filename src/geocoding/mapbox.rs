use crate::config::Settings;
use crate::error::GeocodeError;
use crate::geocoding::{Geocoder, Place, PlaceKind, ReverseAddress};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, warn};

const BASE_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";

/// Mapbox Geocoding v5 client restricted to a fixed country set
pub struct MapboxGeocoder {
    client: Client,
    token: String,
    countries: Vec<String>,
    limit: usize,
}

impl MapboxGeocoder {
    pub fn from_settings(settings: &Settings) -> Result<Self, GeocodeError> {
        let token = settings
            .mapbox_token
            .clone()
            .ok_or(GeocodeError::ConfigMissing("MAPBOX_TOKEN"))?;
        let client = Client::builder().timeout(settings.http_timeout()).build()?;
        Ok(Self::with_client(client, token))
    }

    pub fn with_client(client: Client, token: String) -> Self {
        Self {
            client,
            token,
            countries: vec!["pt".to_string(), "es".to_string()],
            limit: 10,
        }
    }

    pub fn with_countries(mut self, countries: Vec<String>) -> Self {
        self.countries = countries;
        self
    }

    fn forward_url(&self, query: &str) -> Result<Url, GeocodeError> {
        place_url(query.trim())
    }

    fn reverse_url(&self, lng: f64, lat: f64) -> Result<Url, GeocodeError> {
        place_url(&format!("{},{}", lng, lat))
    }
}

#[async_trait]
impl Geocoder for MapboxGeocoder {
    async fn forward(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
        debug!("Geocoding '{}'", query);

        let limit = self.limit.to_string();
        let countries = self.countries.join(",");
        let response = self
            .client
            .get(self.forward_url(query)?)
            .query(&[
                ("access_token", self.token.as_str()),
                ("country", countries.as_str()),
                ("types", "place,locality,neighborhood,poi,address"),
                ("autocomplete", "true"),
                ("language", "pt,es,en"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("Mapbox returned status: {}", response.status());
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let body: FeatureCollection = response.json().await?;
        Ok(parse_places(body))
    }

    async fn reverse(&self, lng: f64, lat: f64) -> Result<Option<ReverseAddress>, GeocodeError> {
        debug!("Reverse geocoding [{}, {}]", lng, lat);

        let response = self
            .client
            .get(self.reverse_url(lng, lat)?)
            .query(&[
                ("access_token", self.token.as_str()),
                ("types", "address,poi,place,postcode"),
                ("limit", "1"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("Mapbox returned status: {}", response.status());
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let body: FeatureCollection = response.json().await?;
        Ok(parse_reverse(body))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    id: String,
    text: String,
    place_name: String,
    #[serde(default)]
    place_type: Vec<String>,
    #[serde(default)]
    relevance: f64,
    center: [f64; 2],
    #[serde(default)]
    properties: FeatureProperties,
    #[serde(default)]
    context: Vec<ContextEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct FeatureProperties {
    short_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContextEntry {
    id: String,
    text: String,
    short_code: Option<String>,
}

impl Feature {
    fn context_text(&self, prefix: &str) -> Option<String> {
        self.context
            .iter()
            .find(|c| c.id.starts_with(prefix))
            .map(|c| c.text.clone())
    }

    fn country_code(&self) -> String {
        let code = if self.id.starts_with("country.") {
            self.properties.short_code.clone()
        } else {
            self.context
                .iter()
                .find(|c| c.id.starts_with("country."))
                .and_then(|c| c.short_code.clone())
        };
        code.unwrap_or_default().to_lowercase()
    }
}

fn parse_places(body: FeatureCollection) -> Vec<Place> {
    body.features
        .into_iter()
        .filter_map(|f| {
            let kind = f.place_type.first().and_then(|t| PlaceKind::parse(t))?;
            Some(Place {
                country_code: f.country_code(),
                name: f.text,
                full_name: f.place_name,
                kind,
                relevance: f.relevance,
                center: f.center,
            })
        })
        .collect()
}

fn parse_reverse(body: FeatureCollection) -> Option<ReverseAddress> {
    let feature = body.features.into_iter().next()?;
    let is = |kind: &str| feature.place_type.iter().any(|t| t == kind);

    let city = if is("place") {
        Some(feature.text.clone())
    } else {
        feature.context_text("place.")
    };
    let postal_code = if is("postcode") {
        Some(feature.text.clone())
    } else {
        feature.context_text("postcode.")
    };

    Some(ReverseAddress {
        formatted: feature.place_name.clone(),
        city,
        postal_code,
    })
}

/// `{BASE_URL}/{search}.json` with the search text percent-encoded as one segment.
fn place_url(search: &str) -> Result<Url, GeocodeError> {
    let mut url = Url::parse(BASE_URL).map_err(|e| GeocodeError::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| GeocodeError::InvalidUrl(BASE_URL.to_string()))?
        .push(&format!("{}.json", search));
    Ok(url)
}
