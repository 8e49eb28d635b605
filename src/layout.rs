use tokio::sync::watch;

/// Collapsed / expanded state of the dashboard sidebar, shared by every
/// component that lays itself out around it.
pub struct SidebarState {
    tx: watch::Sender<bool>,
}

impl SidebarState {
    pub fn new(collapsed: bool) -> Self {
        let (tx, _rx) = watch::channel(collapsed);
        Self { tx }
    }

    pub fn is_collapsed(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn set_collapsed(&self, collapsed: bool) {
        // no wake-up for observers when nothing changed
        self.tx.send_if_modified(|current| {
            if *current == collapsed {
                false
            } else {
                *current = collapsed;
                true
            }
        });
    }

    pub fn toggle(&self) -> bool {
        let next = !self.is_collapsed();
        self.set_collapsed(next);
        next
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for SidebarState {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn observers_see_toggles() {
        let sidebar = SidebarState::default();
        let mut rx = sidebar.subscribe();

        assert!(sidebar.toggle());
        rx.changed().await.unwrap();
        assert!(*rx.borrow_and_update());

        sidebar.set_collapsed(true);
        assert!(!rx.has_changed().unwrap());

        sidebar.set_collapsed(false);
        assert!(rx.has_changed().unwrap());
        assert!(!sidebar.is_collapsed());
    }
}
