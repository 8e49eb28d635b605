use crate::config::Settings;
use crate::error::StoreError;
use crate::models::{ListingType, NewProperty, Property, PropertyUpdate};
use crate::store::{ensure_persisted, validate_new, validate_update, PropertyStore};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, info, warn};

const TABLE: &str = "properties";

/// Property store backed by a hosted PostgREST endpoint
pub struct RestStore {
    client: Client,
    base_url: String,
}

impl RestStore {
    pub fn from_settings(settings: &Settings) -> Result<Self, StoreError> {
        let url = settings
            .supabase_url
            .clone()
            .ok_or(StoreError::ConfigMissing("SUPABASE_URL"))?;
        let key = settings
            .supabase_key
            .clone()
            .ok_or(StoreError::ConfigMissing("SUPABASE_ANON_KEY"))?;

        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&key)
            .map_err(|_| StoreError::Validation("SUPABASE_ANON_KEY is not a valid header".into()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|_| StoreError::Validation("SUPABASE_ANON_KEY is not a valid header".into()))?;
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .timeout(settings.http_timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self::with_client(client, &url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, TABLE)
    }

    fn list_request(&self, listing_type: Option<ListingType>) -> RequestBuilder {
        let mut query = vec![
            ("select", "*".to_string()),
            ("order", "created_at.desc".to_string()),
        ];
        if let Some(listing_type) = listing_type {
            query.push(("listing_type", format!("eq.{listing_type}")));
        }
        self.client.get(self.table_url()).query(&query)
    }

    fn by_id(&self, builder: RequestBuilder, id: &str) -> RequestBuilder {
        builder.query(&[("id", format!("eq.{id}"))])
    }

    pub async fn try_list(
        &self,
        listing_type: Option<ListingType>,
    ) -> Result<Vec<Property>, StoreError> {
        let response = checked(self.list_request(listing_type).send().await?).await?;
        let rows: Vec<Property> = response.json().await?;
        debug!("Fetched {} properties", rows.len());
        Ok(rows)
    }

    pub async fn try_get(&self, id: &str) -> Result<Option<Property>, StoreError> {
        ensure_persisted(id)?;
        let request = self.by_id(self.client.get(self.table_url()), id);
        let response = checked(request.query(&[("select", "*")]).send().await?).await?;
        let rows: Vec<Property> = response.json().await?;
        Ok(rows.into_iter().next())
    }

    pub async fn try_create(&self, fields: NewProperty) -> Result<Property, StoreError> {
        validate_new(&fields)?;
        let request = self
            .client
            .post(self.table_url())
            .header("Prefer", "return=representation")
            .json(&fields);
        let response = checked(request.send().await?).await?;
        let rows: Vec<Property> = response.json().await?;
        let created = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no row".into()))?;
        info!("Created property {}", created.id);
        Ok(created)
    }

    pub async fn try_update(
        &self,
        id: &str,
        fields: PropertyUpdate,
    ) -> Result<Property, StoreError> {
        ensure_persisted(id)?;
        validate_update(&fields)?;
        let request = self
            .by_id(self.client.patch(self.table_url()), id)
            .header("Prefer", "return=representation")
            .json(&fields);
        let response = checked(request.send().await?).await?;
        let rows: Vec<Property> = response.json().await?;
        let updated = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotPersisted(id.to_string()))?;
        info!("Updated property {}", updated.id);
        Ok(updated)
    }

    pub async fn try_delete(&self, id: &str) -> Result<(), StoreError> {
        ensure_persisted(id)?;
        let request = self.by_id(self.client.delete(self.table_url()), id);
        checked(request.send().await?).await?;
        info!("Deleted property {}", id);
        Ok(())
    }
}

async fn checked(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    warn!("Property store returned status {}: {}", status, body);
    Err(StoreError::Backend(format!("status {status}")))
}

fn soft<T>(operation: &str, result: Result<T, StoreError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Property {} failed: {}", operation, e);
            None
        }
    }
}

#[async_trait]
impl PropertyStore for RestStore {
    async fn list(&self, listing_type: Option<ListingType>) -> Vec<Property> {
        soft("list", self.try_list(listing_type).await).unwrap_or_default()
    }

    async fn get(&self, id: &str) -> Option<Property> {
        soft("get", self.try_get(id).await).flatten()
    }

    async fn create(&self, fields: NewProperty) -> Option<Property> {
        soft("create", self.try_create(fields).await)
    }

    async fn update(&self, id: &str, fields: PropertyUpdate) -> Option<Property> {
        soft("update", self.try_update(id, fields).await)
    }

    async fn delete(&self, id: &str) -> bool {
        soft("delete", self.try_delete(id).await).is_some()
    }

    fn source_name(&self) -> &'static str {
        "Supabase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    // nothing listens here, so any request that does go out fails as Backend
    fn store() -> RestStore {
        RestStore::with_client(Client::new(), "http://127.0.0.1:9/")
    }

    #[tokio::test]
    async fn malformed_id_is_rejected_before_any_request() {
        let store = store();
        let err = store
            .try_update("abc-123", PropertyUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotPersisted(ref id) if id == "abc-123"));

        let err = store.try_delete("mock-7").await.unwrap_err();
        assert!(matches!(err, StoreError::NotPersisted(_)));

        assert!(store.update("abc-123", PropertyUpdate::default()).await.is_none());
        assert!(!store.delete("abc-123").await);
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_the_network() {
        let err = store().try_create(NewProperty::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn list_request_filters_by_listing_type() {
        let request = store().list_request(Some(ListingType::Rent)).build().unwrap();
        assert_eq!(request.url().path(), "/rest/v1/properties");
        let query: HashMap<_, _> = request.url().query_pairs().into_owned().collect();
        assert_eq!(query["listing_type"], "eq.rent");
        assert_eq!(query["order"], "created_at.desc");
    }

    #[test]
    fn missing_credentials_are_reported() {
        let err = RestStore::from_settings(&Settings::default()).err().unwrap();
        assert!(matches!(err, StoreError::ConfigMissing("SUPABASE_URL")));

        let settings = Settings {
            supabase_url: Some("https://db.example.co".into()),
            ..Settings::default()
        };
        let err = RestStore::from_settings(&settings).err().unwrap();
        assert!(matches!(err, StoreError::ConfigMissing("SUPABASE_ANON_KEY")));
    }

    #[test]
    fn rows_decode_from_table_json() {
        let row = serde_json::json!({
            "id": "6f1c2a4e-8d3b-4c1e-9a7f-2b5d8e0c4f19",
            "title": "Moradia V3",
            "description": "Com piscina",
            "price": 450000,
            "property_type": "villa",
            "listing_type": "buy",
            "bedrooms": 3,
            "bathrooms": 2,
            "area": 180.5,
            "address": "Rua do Sol 4",
            "city": "Lagoa",
            "state": "Faro",
            "postal_code": "8400-001",
            "latitude": 37.13,
            "longitude": -8.45,
            "images": ["https://res.cloudinary.com/demo/a.jpg"],
            "created_at": "2024-05-01T10:00:00+00:00",
            "updated_at": "2024-05-02T10:00:00+00:00"
        });
        let property: Property = serde_json::from_value(row).unwrap();
        assert_eq!(property.price, 450_000.0);
        assert_eq!(property.primary_image(), Some("https://res.cloudinary.com/demo/a.jpg"));
    }
}
