use crate::filters::{apply_listing, FilterState};
use crate::models::{ListingType, Property};
use crate::panel::FilterListener;
use crate::store::PropertyStore;
use crate::viewport::{Bounds, DebouncedViewport};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

/// One buy or rent page: the fetched listings, the filtered subset and the
/// part of it inside the map.
///
/// Register it as the panel's [`FilterListener`]; the map feeds it bounds
/// through [`BrowseSession::map_moved`].
pub struct BrowseSession {
    listing_type: ListingType,
    all: Vec<Property>,
    filtered: Mutex<Vec<Property>>,
    viewport: DebouncedViewport,
    recenter: watch::Sender<Option<String>>,
}

impl BrowseSession {
    pub async fn load(
        store: &dyn PropertyStore,
        listing_type: ListingType,
        viewport_delay: Duration,
    ) -> Arc<Self> {
        let all = store.list(Some(listing_type)).await;
        info!(
            "Loaded {} {} listings from {}",
            all.len(),
            listing_type,
            store.source_name()
        );
        Arc::new(Self::new(listing_type, all, viewport_delay))
    }

    pub fn new(listing_type: ListingType, all: Vec<Property>, viewport_delay: Duration) -> Self {
        let (recenter, _rx) = watch::channel(None);
        let session = Self {
            listing_type,
            filtered: Mutex::new(Vec::new()),
            viewport: DebouncedViewport::new(viewport_delay),
            recenter,
            all,
        };
        session.apply(&FilterState::default());
        session
    }

    pub fn listing_type(&self) -> ListingType {
        self.listing_type
    }

    pub fn total(&self) -> usize {
        self.all.len()
    }

    pub fn filtered(&self) -> Vec<Property> {
        self.filtered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn visible(&self) -> Vec<Property> {
        self.viewport.visible()
    }

    pub fn subscribe_visible(&self) -> watch::Receiver<Vec<Property>> {
        self.viewport.subscribe()
    }

    /// City names the map should fly to.
    pub fn subscribe_recenter(&self) -> watch::Receiver<Option<String>> {
        self.recenter.subscribe()
    }

    pub fn map_moved(&self, bounds: Bounds) {
        self.viewport.set_bounds(bounds);
    }

    fn apply(&self, filters: &FilterState) {
        let filtered = apply_listing(&self.all, self.listing_type, filters);
        debug!(
            "{} of {} listings pass {} active filters",
            filtered.len(),
            self.all.len(),
            filters.active_count()
        );
        *self.filtered.lock().unwrap_or_else(|e| e.into_inner()) = filtered.clone();
        self.viewport.set_filtered(filtered);
    }
}

impl FilterListener for BrowseSession {
    fn on_filters_change(&self, filters: &FilterState) {
        self.apply(filters);
    }

    fn on_city_search(&self, city: &str) {
        info!("Re-centering map on {}", city);
        self.recenter.send_replace(Some(city.to_string()));
    }
}
