pub mod browse;
pub mod config;
pub mod debounce;
pub mod error;
pub mod filters;
pub mod geocoding;
pub mod layout;
pub mod listing;
pub mod media;
pub mod models;
pub mod panel;
pub mod store;
pub mod viewport;

pub use browse::BrowseSession;
pub use config::Settings;
pub use filters::{FilterState, Range, RoomFilter, TypeFilter};
pub use models::{ListingType, NewProperty, Property, PropertyType, PropertyUpdate};
pub use panel::{FilterListener, FilterPanel, PanelConfig};
pub use store::{MemoryStore, PropertyStore, RestStore};
pub use viewport::{Bounds, ViewportSync};
