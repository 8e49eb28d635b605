use anyhow::Context;
use estate_finder::config::ServiceStatus;
use estate_finder::listing::{summarize, PropertyCard};
use estate_finder::{
    filters, viewport, Bounds, FilterState, ListingType, MemoryStore, PropertyStore, RestStore,
    Settings,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "estate_finder=info".into()),
        )
        .init();

    info!("🏠 Estate Finder");
    info!("================");

    let settings = Settings::from_env();
    let status = settings.status();
    for (name, service) in [
        ("Property database", &status.store),
        ("Geocoding", &status.geocoding),
        ("Image upload", &status.media),
    ] {
        if let ServiceStatus::NotConfigured(var) = service {
            warn!("{} not configured ({} is not set)", name, var);
        }
    }

    let store: Box<dyn PropertyStore> = if status.store.is_configured() {
        Box::new(RestStore::from_settings(&settings).context("Failed to create property store")?)
    } else {
        Box::new(MemoryStore::with_sample_data())
    };

    let listing_type: ListingType = std::env::var("LISTING_TYPE")
        .unwrap_or_else(|_| "buy".into())
        .parse()?;

    let filter_state = match std::env::var("FILTERS_FILE") {
        Ok(path) => {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path))?;
            serde_json::from_str::<FilterState>(&raw)
                .with_context(|| format!("Invalid filters in {}", path))?
        }
        Err(_) => FilterState::default(),
    };

    let bounds: Option<Bounds> = match std::env::var("VIEWPORT") {
        Ok(raw) => Some(raw.parse().context("Invalid VIEWPORT")?),
        Err(_) => None,
    };

    info!(
        "Loading {} listings from {}...",
        listing_type,
        store.source_name()
    );
    let all = store.list(Some(listing_type)).await;
    let filtered = filters::apply_listing(&all, listing_type, &filter_state);
    let visible = match &bounds {
        Some(b) => viewport::visible(&filtered, b),
        None => filtered,
    };

    info!("{}\n", summarize(visible.len(), all.len()));

    for (i, property) in visible.iter().enumerate() {
        println!("{}. {}", i + 1, PropertyCard::from(property));
        println!("   ID: {}", property.id);
        println!();
    }

    let json = serde_json::to_string_pretty(&visible)?;
    tokio::fs::write("filtered_properties.json", json).await?;
    info!("💾 Saved {} properties to filtered_properties.json", visible.len());

    Ok(())
}
