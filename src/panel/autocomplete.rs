use crate::debounce::Debouncer;
use crate::geocoding::{Geocoder, Place, PlaceKind};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

/// A city the user can pick from the dropdown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Suggestion {
    pub name: String,
    pub full_name: String,
    pub country_code: String,
    pub kind: PlaceKind,
    pub relevance: f64,
    /// `[lng, lat]`
    pub center: [f64; 2],
}

impl Suggestion {
    /// Hand-maintained entry for a place the provider does not return.
    pub fn manual(name: &str, full_name: &str, country_code: &str, center: [f64; 2]) -> Self {
        Self {
            name: name.to_string(),
            full_name: full_name.to_string(),
            country_code: country_code.to_string(),
            kind: PlaceKind::Place,
            relevance: 1.0,
            center,
        }
    }
}

impl From<Place> for Suggestion {
    fn from(place: Place) -> Self {
        Self {
            name: place.name,
            full_name: place.full_name,
            country_code: place.country_code,
            kind: place.kind,
            relevance: place.relevance,
            center: place.center,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AutocompleteConfig {
    pub debounce: Duration,
    pub min_chars: usize,
    pub preferred_country: String,
    pub secondary_country: String,
    pub fallbacks: Vec<Suggestion>,
    pub limit: usize,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_chars: 2,
            preferred_country: "pt".to_string(),
            secondary_country: "es".to_string(),
            fallbacks: vec![Suggestion::manual(
                "Quinta do Lago",
                "Quinta do Lago, Faro, Portugal",
                "pt",
                [-8.0177, 37.0510],
            )],
            limit: 8,
        }
    }
}

/// Drop street-level hits, add missing fallbacks, put the preferred country
/// first and sort each country by relevance.
pub fn rank(query: &str, places: Vec<Place>, config: &AutocompleteConfig) -> Vec<Suggestion> {
    let needle = query.trim().to_lowercase();

    let mut out: Vec<Suggestion> = places
        .into_iter()
        .filter(|p| p.kind.is_city_like())
        .map(Suggestion::from)
        .collect();

    for fallback in &config.fallbacks {
        let name = fallback.name.to_lowercase();
        let already = out.iter().any(|s| s.name.to_lowercase() == name);
        if !already && name.contains(&needle) {
            out.push(fallback.clone());
        }
    }

    let country_rank = |code: &str| {
        if code.eq_ignore_ascii_case(&config.preferred_country) {
            0
        } else if code.eq_ignore_ascii_case(&config.secondary_country) {
            1
        } else {
            2
        }
    };

    out.sort_by(|a, b| {
        country_rank(&a.country_code)
            .cmp(&country_rank(&b.country_code))
            .then_with(|| {
                b.relevance
                    .partial_cmp(&a.relevance)
                    .unwrap_or(Ordering::Equal)
            })
    });
    out.truncate(config.limit);
    out
}

struct Shared {
    geocoder: Arc<dyn Geocoder>,
    config: AutocompleteConfig,
    latest: AtomicU64,
    tx: watch::Sender<Vec<Suggestion>>,
}

impl Shared {
    async fn lookup(&self, seq: u64, query: String) {
        let places = match self.geocoder.forward(&query).await {
            Ok(places) => places,
            Err(e) => {
                warn!("City lookup for '{}' failed: {}", query, e);
                Vec::new()
            }
        };

        // a newer keystroke owns the dropdown now
        if self.latest.load(AtomicOrdering::SeqCst) != seq {
            debug!("Discarding stale suggestions for '{}'", query);
            return;
        }

        let suggestions = rank(&query, places, &self.config);
        debug!("{} suggestions for '{}'", suggestions.len(), query);
        self.tx.send_replace(suggestions);
    }
}

/// Debounced city search feeding the panel's dropdown
pub struct CityAutocomplete {
    shared: Arc<Shared>,
    debouncer: Debouncer,
}

impl CityAutocomplete {
    pub fn new(geocoder: Arc<dyn Geocoder>, config: AutocompleteConfig) -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            debouncer: Debouncer::new(config.debounce),
            shared: Arc::new(Shared {
                geocoder,
                config,
                latest: AtomicU64::new(0),
                tx,
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Suggestion>> {
        self.shared.tx.subscribe()
    }

    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.shared.tx.borrow().clone()
    }

    pub fn query(&self, text: &str) {
        let seq = self.shared.latest.fetch_add(1, AtomicOrdering::SeqCst) + 1;
        let query = text.trim().to_string();

        if query.chars().count() < self.shared.config.min_chars {
            self.debouncer.cancel();
            self.shared.tx.send_replace(Vec::new());
            return;
        }

        let shared = self.shared.clone();
        self.debouncer
            .schedule(async move { shared.lookup(seq, query).await });
    }

    /// Close the dropdown, e.g. after a pick.
    pub fn clear(&self) {
        self.shared.latest.fetch_add(1, AtomicOrdering::SeqCst);
        self.debouncer.cancel();
        self.shared.tx.send_replace(Vec::new());
    }
}
