pub mod snap;

use crate::models::{ListingType, Property, PropertyType};
use serde::{Deserialize, Serialize};

/// Top of the price slider. A thumb resting here means "no maximum".
pub const DEFAULT_MAX_PRICE: f64 = 10_000_000.0;
/// Top of the area slider, in m².
pub const DEFAULT_MAX_AREA: f64 = 1_000.0;

/// Inclusive numeric range; `max: None` leaves the top open.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Range {
    #[serde(default)]
    pub min: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    pub const fn at_least(min: f64) -> Self {
        Self { min, max: None }
    }

    /// Upper edge, infinite when open.
    pub fn upper(&self) -> f64 {
        self.max.unwrap_or(f64::INFINITY)
    }

    /// An inverted range contains nothing.
    pub fn contains(&self, value: f64) -> bool {
        let upper = self.upper();
        self.min <= upper && value >= self.min && value <= upper
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum TypeFilter {
    #[default]
    All,
    Only(PropertyType),
}

/// Bedroom / bathroom constraint.
///
/// Every number is a threshold: `AtLeast(3)` is "3 or more", and `AnyOf`
/// passes when the field reaches any listed threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum RoomFilter {
    #[default]
    All,
    AtLeast(u32),
    AnyOf(Vec<u32>),
}

impl RoomFilter {
    pub fn matches(&self, count: u32) -> bool {
        match self {
            RoomFilter::All => true,
            RoomFilter::AtLeast(n) => count >= *n,
            RoomFilter::AnyOf(list) => list.is_empty() || list.iter().any(|n| count >= *n),
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            RoomFilter::All => false,
            RoomFilter::AtLeast(_) => true,
            RoomFilter::AnyOf(list) => !list.is_empty(),
        }
    }

    /// Flip one chip in a multi-select. An emptied selection collapses back to `All`.
    pub fn toggle(&self, value: u32) -> RoomFilter {
        let mut list = match self {
            RoomFilter::All => Vec::new(),
            RoomFilter::AtLeast(n) => vec![*n],
            RoomFilter::AnyOf(list) => list.clone(),
        };
        if let Some(pos) = list.iter().position(|n| *n == value) {
            list.remove(pos);
        } else {
            list.push(value);
            list.sort_unstable();
        }
        if list.is_empty() {
            RoomFilter::All
        } else {
            RoomFilter::AnyOf(list)
        }
    }
}

/// Amenity toggles. Collected by the panel, not evaluated against listings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Features {
    pub pool: bool,
    pub garage: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Pool,
    Garage,
}

/// The active query of a browse page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterState {
    pub city: String,
    pub price: Range,
    pub property_type: TypeFilter,
    pub bedrooms: RoomFilter,
    pub bathrooms: RoomFilter,
    pub area: Range,
    pub features: Features,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            city: String::new(),
            price: Range::at_least(0.0),
            property_type: TypeFilter::All,
            bedrooms: RoomFilter::All,
            bathrooms: RoomFilter::All,
            area: Range::at_least(0.0),
            features: Features::default(),
        }
    }
}

impl FilterState {
    pub fn matches(&self, property: &Property) -> bool {
        let city = self.city.trim();
        if !city.is_empty()
            && !property
                .city
                .to_lowercase()
                .contains(&city.to_lowercase())
        {
            return false;
        }

        if !self.price.contains(property.price) {
            return false;
        }

        if let TypeFilter::Only(wanted) = self.property_type {
            if property.property_type != wanted {
                return false;
            }
        }

        self.bedrooms.matches(property.bedrooms)
            && self.bathrooms.matches(property.bathrooms)
            && self.area.contains(property.area)
    }

    pub fn is_default(&self) -> bool {
        *self == FilterState::default()
    }

    /// How many filter categories differ from their default.
    pub fn active_count(&self) -> usize {
        let defaults = FilterState::default();
        [
            !self.city.trim().is_empty(),
            self.price != defaults.price,
            self.property_type != TypeFilter::All,
            self.bedrooms.is_active(),
            self.bathrooms.is_active(),
            self.area != defaults.area,
            self.features.pool || self.features.garage,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }
}

/// Keep the listings that satisfy every active predicate, in input order.
pub fn apply(properties: &[Property], state: &FilterState) -> Vec<Property> {
    properties
        .iter()
        .filter(|p| state.matches(p))
        .cloned()
        .collect()
}

/// [`apply`] restricted to the page's fixed listing type.
pub fn apply_listing(
    properties: &[Property],
    listing_type: ListingType,
    state: &FilterState,
) -> Vec<Property> {
    properties
        .iter()
        .filter(|p| p.listing_type == listing_type && state.matches(p))
        .cloned()
        .collect()
}
