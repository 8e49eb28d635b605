pub mod mapbox;
pub mod picker;

pub use mapbox::MapboxGeocoder;
pub use picker::LocationPicker;

use crate::error::GeocodeError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result category reported by the geocoding provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlaceKind {
    Country,
    Region,
    Postcode,
    District,
    Place,
    Locality,
    Neighborhood,
    Address,
    Poi,
}

impl PlaceKind {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "country" => PlaceKind::Country,
            "region" => PlaceKind::Region,
            "postcode" => PlaceKind::Postcode,
            "district" => PlaceKind::District,
            "place" => PlaceKind::Place,
            "locality" => PlaceKind::Locality,
            "neighborhood" => PlaceKind::Neighborhood,
            "address" => PlaceKind::Address,
            "poi" => PlaceKind::Poi,
            _ => return None,
        })
    }

    /// Kinds worth offering as a city suggestion.
    pub fn is_city_like(&self) -> bool {
        matches!(
            self,
            PlaceKind::Place | PlaceKind::Locality | PlaceKind::Neighborhood | PlaceKind::Poi
        )
    }
}

/// One forward-geocoding hit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Place {
    pub name: String,
    pub full_name: String,
    pub country_code: String,
    pub kind: PlaceKind,
    pub relevance: f64,
    /// `[lng, lat]`
    pub center: [f64; 2],
}

/// What reverse geocoding knows about a coordinate
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReverseAddress {
    pub formatted: String,
    pub city: Option<String>,
    pub postal_code: Option<String>,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn forward(&self, query: &str) -> Result<Vec<Place>, GeocodeError>;

    async fn reverse(&self, lng: f64, lat: f64) -> Result<Option<ReverseAddress>, GeocodeError>;
}
