pub mod memory;
pub mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

use crate::error::StoreError;
use crate::models::{has_location, ListingType, NewProperty, Property, PropertyUpdate};
use async_trait::async_trait;
use uuid::Uuid;

/// Listing persistence as seen by the browse pages and the admin forms.
///
/// Every operation is fail-soft: errors are logged and come back as the
/// empty value, never as a panic or an `Err`.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    async fn list(&self, listing_type: Option<ListingType>) -> Vec<Property>;

    async fn get(&self, id: &str) -> Option<Property>;

    async fn create(&self, fields: NewProperty) -> Option<Property>;

    async fn update(&self, id: &str, fields: PropertyUpdate) -> Option<Property>;

    async fn delete(&self, id: &str) -> bool;

    /// Which backend answers, for logs and status banners.
    fn source_name(&self) -> &'static str;
}

/// Persisted rows carry a hyphenated 36-character UUID.
pub fn is_persisted_id(id: &str) -> bool {
    id.len() == 36 && Uuid::try_parse(id).is_ok()
}

pub fn ensure_persisted(id: &str) -> Result<(), StoreError> {
    if is_persisted_id(id) {
        Ok(())
    } else {
        Err(StoreError::NotPersisted(id.to_string()))
    }
}

pub fn validate_new(fields: &NewProperty) -> Result<(), StoreError> {
    require("Title", &fields.title)?;
    require("Address", &fields.address)?;
    require("City", &fields.city)?;
    non_negative("Price", fields.price)?;
    non_negative("Area", fields.area)?;
    if !fields.latitude.is_finite()
        || !fields.longitude.is_finite()
        || !has_location(fields.latitude, fields.longitude)
    {
        return Err(StoreError::Validation(
            "Please pick the property location on the map".into(),
        ));
    }
    Ok(())
}

pub fn validate_update(fields: &PropertyUpdate) -> Result<(), StoreError> {
    if let Some(title) = &fields.title {
        require("Title", title)?;
    }
    if let Some(address) = &fields.address {
        require("Address", address)?;
    }
    if let Some(city) = &fields.city {
        require("City", city)?;
    }
    if let Some(price) = fields.price {
        non_negative("Price", price)?;
    }
    if let Some(area) = fields.area {
        non_negative("Area", area)?;
    }
    match (fields.latitude, fields.longitude) {
        (Some(lat), Some(lng)) if !has_location(lat, lng) => Err(StoreError::Validation(
            "Please pick the property location on the map".into(),
        )),
        (Some(_), None) | (None, Some(_)) => Err(StoreError::Validation(
            "Latitude and longitude must be updated together".into(),
        )),
        _ => Ok(()),
    }
}

fn require(field: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        Err(StoreError::Validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), StoreError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(StoreError::Validation(format!(
            "{field} must be zero or more"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewProperty {
        NewProperty {
            title: "T2 with river view".into(),
            address: "Rua das Flores 12".into(),
            city: "Porto".into(),
            price: 320_000.0,
            area: 75.0,
            latitude: 41.145,
            longitude: -8.611,
            ..NewProperty::default()
        }
    }

    #[test]
    fn canonical_uuid_only() {
        assert!(is_persisted_id("6f1c2a4e-8d3b-4c1e-9a7f-2b5d8e0c4f19"));
        assert!(!is_persisted_id("abc-123"));
        assert!(!is_persisted_id("mock-property-1"));
        // simple (unhyphenated) form is 32 chars
        assert!(!is_persisted_id("6f1c2a4e8d3b4c1e9a7f2b5d8e0c4f19"));
        assert!(matches!(
            ensure_persisted("abc-123"),
            Err(StoreError::NotPersisted(_))
        ));
    }

    #[test]
    fn complete_draft_passes() {
        assert!(validate_new(&draft()).is_ok());
    }

    #[test]
    fn unset_location_is_rejected() {
        let fields = NewProperty {
            latitude: 0.0,
            longitude: 0.0,
            ..draft()
        };
        let err = validate_new(&fields).unwrap_err();
        assert!(err.to_string().contains("location"));
    }

    #[test]
    fn missing_required_field_is_named() {
        let fields = NewProperty {
            city: "  ".into(),
            ..draft()
        };
        let err = validate_new(&fields).unwrap_err();
        assert_eq!(err.user_message(), "City is required");
    }

    #[test]
    fn negative_price_is_rejected() {
        let fields = NewProperty {
            price: -1.0,
            ..draft()
        };
        assert!(validate_new(&fields).is_err());
    }

    #[test]
    fn update_checks_only_present_fields() {
        assert!(validate_update(&PropertyUpdate::default()).is_ok());
        assert!(validate_update(&PropertyUpdate {
            price: Some(410_000.0),
            ..PropertyUpdate::default()
        })
        .is_ok());
        assert!(validate_update(&PropertyUpdate {
            latitude: Some(0.0),
            longitude: Some(0.0),
            ..PropertyUpdate::default()
        })
        .is_err());
        assert!(validate_update(&PropertyUpdate {
            latitude: Some(38.7),
            ..PropertyUpdate::default()
        })
        .is_err());
    }
}
