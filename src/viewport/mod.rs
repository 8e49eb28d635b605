pub mod debounced;

pub use debounced::DebouncedViewport;

use crate::models::Property;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Visible map rectangle. Axis-aligned; does not wrap the antimeridian.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bounds {
    pub sw: LatLng,
    pub ne: LatLng,
}

impl Bounds {
    /// Corners in map-provider order, `[lng, lat]`.
    pub fn from_corners(sw: [f64; 2], ne: [f64; 2]) -> Self {
        Self {
            sw: LatLng {
                lng: sw[0],
                lat: sw[1],
            },
            ne: LatLng {
                lng: ne[0],
                lat: ne[1],
            },
        }
    }

    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        self.sw.lat <= lat && lat <= self.ne.lat && self.sw.lng <= lng && lng <= self.ne.lng
    }

    pub fn contains_property(&self, property: &Property) -> bool {
        property.has_location() && self.contains(property.latitude, property.longitude)
    }
}

impl std::str::FromStr for Bounds {
    type Err = anyhow::Error;

    /// `sw_lng,sw_lat,ne_lng,ne_lat`
    fn from_str(s: &str) -> anyhow::Result<Self> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()?;
        match parts.as_slice() {
            [sw_lng, sw_lat, ne_lng, ne_lat] => {
                Ok(Bounds::from_corners([*sw_lng, *sw_lat], [*ne_lng, *ne_lat]))
            }
            _ => anyhow::bail!("expected sw_lng,sw_lat,ne_lng,ne_lat, got '{s}'"),
        }
    }
}

/// Listings whose pin falls inside `bounds`, in input order.
pub fn visible(properties: &[Property], bounds: &Bounds) -> Vec<Property> {
    properties
        .iter()
        .filter(|p| bounds.contains_property(p))
        .cloned()
        .collect()
}

/// Keeps the list in step with the map.
///
/// Until the map reports bounds the whole filtered set is shown.
#[derive(Debug, Default)]
pub struct ViewportSync {
    filtered: Vec<Property>,
    bounds: Option<Bounds>,
    visible: Vec<Property>,
}

impl ViewportSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_filtered(&mut self, filtered: Vec<Property>) {
        self.filtered = filtered;
        self.recompute();
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = Some(bounds);
        self.recompute();
    }

    pub fn visible(&self) -> &[Property] {
        &self.visible
    }

    fn recompute(&mut self) {
        self.visible = match &self.bounds {
            Some(bounds) => visible(&self.filtered, bounds),
            None => self.filtered.clone(),
        };
    }
}
