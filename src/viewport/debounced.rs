use crate::debounce::Debouncer;
use crate::models::Property;
use crate::viewport::{Bounds, ViewportSync};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

struct Shared {
    sync: Mutex<ViewportSync>,
    tx: watch::Sender<Vec<Property>>,
}

impl Shared {
    fn publish(&self) {
        let visible = {
            let sync = self.sync.lock().unwrap_or_else(|e| e.into_inner());
            sync.visible().to_vec()
        };
        debug!("{} properties in viewport", visible.len());
        self.tx.send_replace(visible);
    }
}

/// [`ViewportSync`] for live map gestures.
///
/// Bounds reported while the map is moving are held back until the gesture
/// has been quiet for the debounce window. A new filtered set is applied
/// immediately against the last settled bounds.
pub struct DebouncedViewport {
    shared: Arc<Shared>,
    pending_bounds: Arc<Mutex<Option<Bounds>>>,
    debouncer: Debouncer,
}

impl DebouncedViewport {
    pub fn new(delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            shared: Arc::new(Shared {
                sync: Mutex::new(ViewportSync::new()),
                tx,
            }),
            pending_bounds: Arc::new(Mutex::new(None)),
            debouncer: Debouncer::new(delay),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Property>> {
        self.shared.tx.subscribe()
    }

    pub fn visible(&self) -> Vec<Property> {
        self.shared.tx.borrow().clone()
    }

    pub fn set_filtered(&self, filtered: Vec<Property>) {
        {
            let mut sync = self.shared.sync.lock().unwrap_or_else(|e| e.into_inner());
            sync.set_filtered(filtered);
        }
        self.shared.publish();
    }

    pub fn set_bounds(&self, bounds: Bounds) {
        {
            let mut pending = self.pending_bounds.lock().unwrap_or_else(|e| e.into_inner());
            *pending = Some(bounds);
        }

        let shared = self.shared.clone();
        let pending = self.pending_bounds.clone();
        self.debouncer.schedule(async move {
            let settled = pending.lock().unwrap_or_else(|e| e.into_inner()).take();
            if let Some(bounds) = settled {
                {
                    let mut sync = shared.sync.lock().unwrap_or_else(|e| e.into_inner());
                    sync.set_bounds(bounds);
                }
                shared.publish();
            }
        });
    }
}

impl Default for DebouncedViewport {
    fn default() -> Self {
        Self::new(Duration::from_millis(200))
    }
}
