use crate::geocoding::Geocoder;
use crate::models::NewProperty;
use std::sync::Arc;
use tracing::warn;

/// Backs the map pin on the admin listing form.
///
/// Dropping the pin sets the coordinates immediately; address fields are
/// filled from reverse geocoding when it answers and left alone when it doesn't.
pub struct LocationPicker {
    geocoder: Arc<dyn Geocoder>,
}

impl LocationPicker {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    pub async fn pick(&self, draft: &mut NewProperty, lng: f64, lat: f64) {
        draft.longitude = lng;
        draft.latitude = lat;

        match self.geocoder.reverse(lng, lat).await {
            Ok(Some(found)) => {
                draft.address = found.formatted;
                if let Some(city) = found.city {
                    draft.city = city;
                }
                if let Some(postal_code) = found.postal_code {
                    draft.postal_code = postal_code;
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Reverse geocoding failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeocodeError;
    use crate::geocoding::{Place, ReverseAddress};
    use async_trait::async_trait;

    struct Fixed(Option<ReverseAddress>);

    #[async_trait]
    impl Geocoder for Fixed {
        async fn forward(&self, _query: &str) -> Result<Vec<Place>, GeocodeError> {
            Ok(vec![])
        }

        async fn reverse(
            &self,
            _lng: f64,
            _lat: f64,
        ) -> Result<Option<ReverseAddress>, GeocodeError> {
            match &self.0 {
                Some(a) => Ok(Some(a.clone())),
                None => Err(GeocodeError::Status(503)),
            }
        }
    }

    #[tokio::test]
    async fn pick_fills_address_fields() {
        let picker = LocationPicker::new(Arc::new(Fixed(Some(ReverseAddress {
            formatted: "Rua do Carmo 5, 1200-093 Lisboa".into(),
            city: Some("Lisboa".into()),
            postal_code: Some("1200-093".into()),
        }))));
        let mut draft = NewProperty::default();
        picker.pick(&mut draft, -9.14, 38.71).await;

        assert_eq!(draft.longitude, -9.14);
        assert_eq!(draft.latitude, 38.71);
        assert_eq!(draft.city, "Lisboa");
        assert_eq!(draft.postal_code, "1200-093");
    }

    #[tokio::test]
    async fn failed_lookup_keeps_typed_fields() {
        let picker = LocationPicker::new(Arc::new(Fixed(None)));
        let mut draft = NewProperty {
            city: "Faro".into(),
            ..NewProperty::default()
        };
        picker.pick(&mut draft, -7.93, 37.02).await;

        assert_eq!(draft.city, "Faro");
        assert_eq!(draft.latitude, 37.02);
    }
}
