pub mod autocomplete;

pub use autocomplete::{AutocompleteConfig, CityAutocomplete, Suggestion};

use crate::debounce::Debouncer;
use crate::filters::snap::{clamp_area_input, clamp_price_input, parse_numeric_input};
use crate::filters::{
    Feature, FilterState, Range, RoomFilter, TypeFilter, DEFAULT_MAX_AREA, DEFAULT_MAX_PRICE,
};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

/// Receives the panel's committed changes
pub trait FilterListener: Send + Sync {
    /// Debounced; called only when the state differs from the last one sent.
    fn on_filters_change(&self, filters: &FilterState);

    /// Called right away when a city suggestion is picked, to re-center the map.
    fn on_city_search(&self, city: &str);
}

#[derive(Debug, Clone, Copy)]
pub struct PanelConfig {
    pub debounce: Duration,
    pub price_bounds: Range,
    pub area_bounds: Range,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            price_bounds: Range::new(0.0, DEFAULT_MAX_PRICE),
            area_bounds: Range::new(0.0, DEFAULT_MAX_AREA),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Min,
    Max,
}

/// Raw contents of the panel's text inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffers {
    pub city: String,
    pub min_price: String,
    pub max_price: String,
    pub min_area: String,
    pub max_area: String,
}

struct PanelState {
    filters: FilterState,
    last_emitted: FilterState,
    buffers: TextBuffers,
}

struct Shared {
    listener: Arc<dyn FilterListener>,
    state: Mutex<PanelState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Send the current state unless it equals what was sent last.
    fn commit(&self) {
        let snapshot = {
            let mut state = self.lock();
            if state.filters == state.last_emitted {
                debug!("Filters unchanged, skipping notification");
                return;
            }
            state.last_emitted = state.filters.clone();
            state.filters.clone()
        };
        self.listener.on_filters_change(&snapshot);
    }
}

/// Owns the filter state of one browse page.
///
/// Every mutation restarts the debounce window; when the window closes the
/// latest state is sent to the listener once. Needs a Tokio runtime.
pub struct FilterPanel {
    shared: Arc<Shared>,
    config: PanelConfig,
    debouncer: Debouncer,
}

impl FilterPanel {
    pub fn new(listener: Arc<dyn FilterListener>, config: PanelConfig) -> Self {
        let initial = FilterState::default();
        Self {
            shared: Arc::new(Shared {
                listener,
                state: Mutex::new(PanelState {
                    filters: initial.clone(),
                    last_emitted: initial,
                    buffers: TextBuffers::default(),
                }),
            }),
            debouncer: Debouncer::new(config.debounce),
            config,
        }
    }

    pub fn state(&self) -> FilterState {
        self.shared.lock().filters.clone()
    }

    pub fn text_buffers(&self) -> TextBuffers {
        self.shared.lock().buffers.clone()
    }

    fn update<F>(&self, change: F)
    where
        F: FnOnce(&mut PanelState, &PanelConfig),
    {
        {
            let mut state = self.shared.lock();
            change(&mut *state, &self.config);
        }
        let shared = self.shared.clone();
        self.debouncer.schedule(async move { shared.commit() });
    }

    pub fn set_city(&self, text: &str) {
        self.update(|s, _| {
            s.buffers.city = text.to_string();
            s.filters.city = text.trim().to_string();
        });
    }

    /// Picking a suggestion re-centers the map immediately; filtering still waits
    /// for the debounce window.
    pub fn select_city_suggestion(&self, suggestion: &Suggestion) {
        self.set_city(&suggestion.name);
        self.shared.listener.on_city_search(&suggestion.name);
    }

    /// Dual-thumb slider drag.
    pub fn set_price_slider(&self, min: f64, max: f64) {
        self.update(|s, cfg| {
            let (lo, hi) = ordered(
                clamp_price_input(min, cfg.price_bounds),
                clamp_price_input(max, cfg.price_bounds),
            );
            s.filters.price = Range {
                min: lo,
                max: open_top(hi, cfg.price_bounds),
            };
            s.buffers.min_price = format_number(lo);
            s.buffers.max_price = format_number(hi);
        });
    }

    /// Typed price. Unparseable text only updates the buffer.
    pub fn set_price_text(&self, bound: Bound, text: &str) {
        self.update(|s, cfg| {
            let value = parse_numeric_input(text);
            match bound {
                Bound::Min => {
                    s.buffers.min_price = text.to_string();
                    if let Some(v) = value {
                        let top = s.filters.price.max.unwrap_or(cfg.price_bounds.upper());
                        let limit = Range::new(cfg.price_bounds.min, top);
                        s.filters.price.min = clamp_price_input(v, limit);
                    }
                }
                Bound::Max => {
                    s.buffers.max_price = text.to_string();
                    if let Some(v) = value {
                        let limit = Range { min: s.filters.price.min, max: cfg.price_bounds.max };
                        let v = clamp_price_input(v, limit);
                        s.filters.price.max = open_top(v, cfg.price_bounds);
                    }
                }
            }
        });
    }

    pub fn set_area_slider(&self, min: f64, max: f64) {
        self.update(|s, cfg| {
            let (lo, hi) = ordered(
                clamp_area_input(min, cfg.area_bounds),
                clamp_area_input(max, cfg.area_bounds),
            );
            s.filters.area = Range {
                min: lo,
                max: open_top(hi, cfg.area_bounds),
            };
            s.buffers.min_area = format_number(lo);
            s.buffers.max_area = format_number(hi);
        });
    }

    pub fn set_area_text(&self, bound: Bound, text: &str) {
        self.update(|s, cfg| {
            let value = parse_numeric_input(text);
            match bound {
                Bound::Min => {
                    s.buffers.min_area = text.to_string();
                    if let Some(v) = value {
                        let top = s.filters.area.max.unwrap_or(cfg.area_bounds.upper());
                        let limit = Range::new(cfg.area_bounds.min, top);
                        s.filters.area.min = clamp_area_input(v, limit);
                    }
                }
                Bound::Max => {
                    s.buffers.max_area = text.to_string();
                    if let Some(v) = value {
                        let limit = Range { min: s.filters.area.min, max: cfg.area_bounds.max };
                        let v = clamp_area_input(v, limit);
                        s.filters.area.max = open_top(v, cfg.area_bounds);
                    }
                }
            }
        });
    }

    pub fn set_property_type(&self, filter: TypeFilter) {
        self.update(|s, _| s.filters.property_type = filter);
    }

    pub fn set_bedrooms(&self, filter: RoomFilter) {
        self.update(|s, _| s.filters.bedrooms = filter);
    }

    pub fn set_bathrooms(&self, filter: RoomFilter) {
        self.update(|s, _| s.filters.bathrooms = filter);
    }

    pub fn toggle_bedroom_chip(&self, value: u32) {
        self.update(|s, _| s.filters.bedrooms = s.filters.bedrooms.toggle(value));
    }

    pub fn toggle_bathroom_chip(&self, value: u32) {
        self.update(|s, _| s.filters.bathrooms = s.filters.bathrooms.toggle(value));
    }

    pub fn toggle_feature(&self, feature: Feature) {
        self.update(|s, _| match feature {
            Feature::Pool => s.filters.features.pool = !s.filters.features.pool,
            Feature::Garage => s.filters.features.garage = !s.filters.features.garage,
        });
    }

    /// Back to defaults with buffers and chips cleared; always notifies once.
    pub fn reset(&self) {
        self.debouncer.cancel();
        let snapshot = {
            let mut state = self.shared.lock();
            let defaults = FilterState::default();
            state.filters = defaults.clone();
            state.last_emitted = defaults.clone();
            state.buffers = TextBuffers::default();
            defaults
        };
        self.shared.listener.on_filters_change(&snapshot);
    }

    /// Commit whatever is waiting in the debounce window now.
    pub fn flush(&self) {
        self.debouncer.cancel();
        self.shared.commit();
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A maximum pushed to the top of the slider lifts the cap.
fn open_top(value: f64, slider: Range) -> Option<f64> {
    match slider.max {
        Some(top) if value >= top => None,
        _ => Some(value),
    }
}

fn format_number(value: f64) -> String {
    format!("{}", value.round() as i64)
}
