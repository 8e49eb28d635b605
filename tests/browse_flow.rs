//! End-to-end browse flow: store → filter panel → filtered set → map viewport.

use estate_finder::filters::apply;
use estate_finder::panel::Suggestion;
use estate_finder::{
    BrowseSession, Bounds, FilterPanel, FilterState, ListingType, MemoryStore, PanelConfig,
    PropertyStore, PropertyUpdate, RestStore, RoomFilter,
};
use std::sync::Arc;
use std::time::Duration;

const VIEWPORT_DELAY: Duration = Duration::from_millis(200);

async fn buy_page() -> (Arc<BrowseSession>, FilterPanel) {
    let store = MemoryStore::with_sample_data();
    let session = BrowseSession::load(&store, ListingType::Buy, VIEWPORT_DELAY).await;
    let panel = FilterPanel::new(session.clone(), PanelConfig::default());
    (session, panel)
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(400)).await;
}

fn ids(list: &[estate_finder::Property]) -> Vec<String> {
    list.iter().map(|p| p.id.clone()).collect()
}

#[tokio::test(start_paused = true)]
async fn session_starts_with_every_listing_of_its_type() {
    let (session, _panel) = buy_page().await;
    assert_eq!(session.total(), 3);
    assert_eq!(session.filtered().len(), 3);
    assert_eq!(session.visible().len(), 3);
    assert!(session
        .filtered()
        .iter()
        .all(|p| p.listing_type == ListingType::Buy));
}

#[tokio::test(start_paused = true)]
async fn panel_changes_reach_list_and_map() {
    let (session, panel) = buy_page().await;

    panel.set_price_slider(300_000.0, 500_000.0);
    panel.set_bedrooms(RoomFilter::AtLeast(3));
    assert_eq!(session.filtered().len(), 3);

    settle().await;
    assert_eq!(ids(&session.filtered()), vec!["mock-3".to_string()]);
    assert_eq!(ids(&session.visible()), vec!["mock-3".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn map_pan_narrows_visible_set_only() {
    let (session, _panel) = buy_page().await;

    // Faro old town only
    session.map_moved(Bounds::from_corners([-7.96, 37.00], [-7.90, 37.03]));
    settle().await;

    assert_eq!(session.filtered().len(), 3);
    assert_eq!(ids(&session.visible()), vec!["mock-2".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn reset_restores_the_unfiltered_collection() {
    let (session, panel) = buy_page().await;
    let original = session.filtered();

    panel.set_city("Tavira");
    settle().await;
    assert_eq!(session.filtered().len(), 1);

    panel.reset();
    assert_eq!(session.filtered(), original);
    assert_eq!(apply(&original, &panel.state()), original);
}

#[tokio::test(start_paused = true)]
async fn picking_a_city_recenters_the_map() {
    let (session, panel) = buy_page().await;
    let mut recenter = session.subscribe_recenter();

    panel.select_city_suggestion(&Suggestion::manual(
        "Faro",
        "Faro, Portugal",
        "pt",
        [-7.93, 37.02],
    ));
    assert!(recenter.has_changed().unwrap());
    assert_eq!(recenter.borrow_and_update().as_deref(), Some("Faro"));

    settle().await;
    assert_eq!(ids(&session.filtered()), vec!["mock-2".to_string()]);
}

#[tokio::test]
async fn non_uuid_ids_never_reach_the_remote_store() {
    let remote = RestStore::with_client(reqwest::Client::new(), "http://127.0.0.1:9");
    assert!(remote.update("abc-123", PropertyUpdate::default()).await.is_none());
    let err = remote
        .try_update("abc-123", PropertyUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, estate_finder::error::StoreError::NotPersisted(_)));
}

#[test]
fn default_filters_are_identity() {
    let mut rows = estate_finder::store::memory::sample_properties();
    rows[0].price = 12_500_000.0;
    rows[1].area = 1_800.0;
    assert_eq!(apply(&rows, &FilterState::default()), rows);
}

#[tokio::test(start_paused = true)]
async fn reset_keeps_listings_above_the_slider_tops() {
    let mut rows = estate_finder::store::memory::sample_properties();
    rows[0].price = 12_500_000.0;
    rows[1].area = 1_800.0;
    let store = MemoryStore::new(rows);
    let session = BrowseSession::load(&store, ListingType::Buy, VIEWPORT_DELAY).await;
    let panel = FilterPanel::new(session.clone(), PanelConfig::default());
    let original = session.filtered();
    assert_eq!(original.len(), 3);

    panel.set_city("x");
    settle().await;
    assert!(session.filtered().is_empty());

    panel.reset();
    assert_eq!(session.filtered(), original);
}
