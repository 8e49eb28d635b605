use crate::error::StoreError;
use crate::models::{ListingType, NewProperty, Property, PropertyType, PropertyUpdate};
use crate::store::{ensure_persisted, validate_new, validate_update, PropertyStore};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

/// In-process store used when no database is configured.
///
/// Seeded listings have `mock-*` ids and behave like local sample data: they
/// can be listed and read but not updated or deleted. Listings created here
/// get real UUIDs and can be edited.
pub struct MemoryStore {
    rows: RwLock<Vec<Property>>,
}

impl MemoryStore {
    pub fn new(rows: Vec<Property>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    pub fn with_sample_data() -> Self {
        Self::new(sample_properties())
    }

    pub async fn try_update(
        &self,
        id: &str,
        fields: PropertyUpdate,
    ) -> Result<Property, StoreError> {
        ensure_persisted(id)?;
        validate_update(&fields)?;
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotPersisted(id.to_string()))?;
        fields.apply_to(row);
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    pub async fn try_delete(&self, id: &str) -> Result<(), StoreError> {
        ensure_persisted(id)?;
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|p| p.id != id);
        if rows.len() == before {
            return Err(StoreError::NotPersisted(id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PropertyStore for MemoryStore {
    async fn list(&self, listing_type: Option<ListingType>) -> Vec<Property> {
        let rows = self.rows.read().await;
        let mut out: Vec<Property> = rows
            .iter()
            .filter(|p| listing_type.map_or(true, |t| p.listing_type == t))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    async fn get(&self, id: &str) -> Option<Property> {
        self.rows.read().await.iter().find(|p| p.id == id).cloned()
    }

    async fn create(&self, fields: NewProperty) -> Option<Property> {
        if let Err(e) = validate_new(&fields) {
            warn!("Property create failed: {}", e);
            return None;
        }
        let now = Utc::now();
        let property = Property {
            id: Uuid::new_v4().to_string(),
            title: fields.title,
            description: fields.description,
            price: fields.price,
            property_type: fields.property_type,
            listing_type: fields.listing_type,
            bedrooms: fields.bedrooms,
            bathrooms: fields.bathrooms,
            area: fields.area,
            address: fields.address,
            city: fields.city,
            state: fields.state,
            postal_code: fields.postal_code,
            latitude: fields.latitude,
            longitude: fields.longitude,
            images: fields.images,
            created_at: now,
            updated_at: now,
        };
        info!("Created property {} in memory", property.id);
        self.rows.write().await.push(property.clone());
        Some(property)
    }

    async fn update(&self, id: &str, fields: PropertyUpdate) -> Option<Property> {
        match self.try_update(id, fields).await {
            Ok(p) => Some(p),
            Err(e) => {
                warn!("Property update failed: {}", e);
                None
            }
        }
    }

    async fn delete(&self, id: &str) -> bool {
        match self.try_delete(id).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Property delete failed: {}", e);
                false
            }
        }
    }

    fn source_name(&self) -> &'static str {
        "sample data"
    }
}

/// Sample Algarve / Lisbon listings shown when the database is not configured
pub fn sample_properties() -> Vec<Property> {
    info!("📋 Using sample listings");

    let now = Utc::now();
    let row = |n: u32,
               title: &str,
               price: f64,
               property_type: PropertyType,
               listing_type: ListingType,
               (bedrooms, bathrooms, area): (u32, u32, f64),
               (address, city, postal_code): (&str, &str, &str),
               (latitude, longitude): (f64, f64)| Property {
        id: format!("mock-{n}"),
        title: title.to_string(),
        description: format!("{title} in {city}. {bedrooms} bedrooms, {area} m²."),
        price,
        property_type,
        listing_type,
        bedrooms,
        bathrooms,
        area,
        address: address.to_string(),
        city: city.to_string(),
        state: (if city == "Lisboa" { "Lisboa" } else { "Faro" }).to_string(),
        postal_code: postal_code.to_string(),
        latitude,
        longitude,
        images: vec![format!("https://res.cloudinary.com/demo/image/upload/mock-{n}.jpg")],
        created_at: now - chrono::Duration::days(n as i64),
        updated_at: now - chrono::Duration::days(n as i64),
    };

    vec![
        row(
            1,
            "Villa with pool near the marina",
            1_450_000.0,
            PropertyType::Villa,
            ListingType::Buy,
            (4, 3, 260.0),
            ("Rua da Marina 8", "Vilamoura", "8125-409"),
            (37.0786, -8.1174),
        ),
        row(
            2,
            "Renovated apartment in the old town",
            325_000.0,
            PropertyType::Apartment,
            ListingType::Buy,
            (2, 1, 78.0),
            ("Rua Direita 22", "Faro", "8000-268"),
            (37.0163, -7.9351),
        ),
        row(
            3,
            "Townhouse by the river",
            410_000.0,
            PropertyType::Townhouse,
            ListingType::Buy,
            (3, 2, 140.0),
            ("Rua da Liberdade 3", "Tavira", "8800-399"),
            (37.1275, -7.6506),
        ),
        row(
            4,
            "Condo with sea view",
            2_100.0,
            PropertyType::Condo,
            ListingType::Rent,
            (2, 2, 95.0),
            ("Avenida dos Descobrimentos 40", "Lagos", "8600-645"),
            (37.1017, -8.6730),
        ),
        row(
            5,
            "Family house with garden",
            1_350.0,
            PropertyType::House,
            ListingType::Rent,
            (3, 2, 160.0),
            ("Rua do Poço 15", "Loulé", "8100-565"),
            (37.1377, -8.0197),
        ),
        row(
            6,
            "Studio next to Avenida da Liberdade",
            950.0,
            PropertyType::Apartment,
            ListingType::Rent,
            (1, 1, 42.0),
            ("Rua de Santa Marta 61", "Lisboa", "1150-296"),
            (38.7223, -9.1454),
        ),
    ]
}
