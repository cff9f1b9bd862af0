use super::Tracker;
use crate::domain::extract_domain;
use crate::host::BrowserHost;
use crate::models::{BrowserEvent, Tab, TabStatus};
use crate::storage::KeyValueStore;
use log::{debug, error, info, warn};

impl<H: BrowserHost, S: KeyValueStore> Tracker<H, S> {
    /// Seed the session from whatever tab is active right now.
    pub async fn init(&mut self) {
        match self.host.active_tab().await {
            Ok(Some(tab)) => self.handle_tab_change(Some(tab)).await,
            Ok(None) => debug!("No active tab at startup"),
            Err(e) => warn!("Could not query the active tab at startup: {e}"),
        }
    }

    /// Route one host notification to the engine.
    pub async fn on_event(&mut self, event: BrowserEvent) {
        match event {
            BrowserEvent::TabActivated { tab_id } => match self.host.get_tab(tab_id).await {
                Ok(tab) => self.handle_tab_change(Some(tab)).await,
                Err(e) => {
                    if e.is_transient() {
                        warn!("Activated tab {tab_id} is unavailable: {e}");
                    } else {
                        error!("Failed to look up activated tab {tab_id}: {e}");
                    }
                    self.handle_tab_change(None).await;
                }
            },
            BrowserEvent::TabUpdated { tab, status } => {
                if tab.active && status == TabStatus::Complete {
                    self.handle_tab_change(Some(tab)).await;
                }
            }
            BrowserEvent::TabRemoved { tab_id } => {
                if self.session.active_tab_id() == Some(tab_id) {
                    info!("Active tab {tab_id} was closed");
                    self.handle_tab_change(None).await;
                }
            }
            BrowserEvent::WindowFocusChanged { window_id } => {
                debug!("Window focus changed to {window_id:?}");
                self.reevaluate().await;
            }
            BrowserEvent::IdleStateChanged { state } => {
                info!("Idle state changed to: {state}");
                self.reevaluate().await;
            }
            BrowserEvent::MediaPlayback { state } => {
                if self.media.apply(state) {
                    debug!("Media playback state changed: {state:?}");
                    self.reevaluate().await;
                }
            }
        }
    }

    async fn handle_tab_change(&mut self, tab: Option<Tab>) {
        match tab {
            Some(tab) => {
                let domain = extract_domain(tab.url.as_deref());
                self.set_active_domain(Some(domain), Some(tab.id)).await;
            }
            None => self.set_active_domain(None, None).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::TrackerConfig;
    use crate::constants::UNKNOWN_DOMAIN;
    use crate::ledger::ActivityLedger;
    use crate::models::{BrowserEvent, IdleState, MediaState, Tab, TabStatus};
    use crate::storage::MemoryStore;
    use crate::test_utils::FakeHost;
    use crate::tracker::Tracker;
    use std::time::Duration;
    use tokio::time::advance;

    fn setup(url: &str) -> (FakeHost, MemoryStore, Tracker<FakeHost, MemoryStore>) {
        let host = FakeHost::new();
        host.open_tab(Tab::new(1, url));
        let store = MemoryStore::new();
        let tracker = Tracker::new(host.clone(), store.clone(), TrackerConfig::default());
        (host, store, tracker)
    }

    async fn total(store: &MemoryStore, domain: &str) -> Option<u64> {
        ActivityLedger::new(store.clone()).load().await.unwrap().get(domain).copied()
    }

    #[tokio::test(start_paused = true)]
    async fn test_init_starts_tracking_current_tab() {
        let (_host, _store, mut tracker) = setup("https://www.example.com/page");
        tracker.init().await;

        assert!(tracker.session().is_tracking());
        assert_eq!(tracker.session().active_domain(), Some("example.com"));
        assert_eq!(tracker.session().active_tab_id(), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_init_without_tab_stays_off() {
        let host = FakeHost::new();
        let mut tracker = Tracker::new(host, MemoryStore::new(), TrackerConfig::default());
        tracker.init().await;

        assert!(!tracker.session().is_tracking());
        assert!(tracker.session().active_domain().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_vanished_tab_stops_tracking() {
        let (_host, store, mut tracker) = setup("https://a.example");
        tracker.init().await;
        advance(Duration::from_secs(4)).await;

        tracker.on_event(BrowserEvent::TabActivated { tab_id: 99 }).await;

        assert!(!tracker.session().is_tracking());
        assert!(tracker.session().active_domain().is_none());
        assert!(tracker.session().active_tab_id().is_none());
        assert_eq!(total(&store, "a.example").await, Some(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_closing_active_tab_stops_tracking() {
        let (_host, store, mut tracker) = setup("https://closed.example");
        tracker.init().await;
        advance(Duration::from_secs(3)).await;

        tracker.on_event(BrowserEvent::TabRemoved { tab_id: 7 }).await;
        assert!(tracker.session().is_tracking(), "closing a background tab changes nothing");

        tracker.on_event(BrowserEvent::TabRemoved { tab_id: 1 }).await;
        assert!(!tracker.session().is_tracking());
        assert!(tracker.session().active_domain().is_none());
        assert_eq!(total(&store, "closed.example").await, Some(3));

        advance(Duration::from_secs(60)).await;
        tracker.shutdown().await;
        assert_eq!(total(&store, "closed.example").await, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_updates_only_count_for_completed_active_tab() {
        let (_host, store, mut tracker) = setup("https://a.example");
        tracker.init().await;
        advance(Duration::from_secs(2)).await;

        let mut background = Tab::new(2, "https://b.example");
        background.active = false;
        tracker
            .on_event(BrowserEvent::TabUpdated { tab: background, status: TabStatus::Complete })
            .await;
        tracker
            .on_event(BrowserEvent::TabUpdated {
                tab: Tab::new(1, "https://c.example"),
                status: TabStatus::Loading,
            })
            .await;

        assert_eq!(tracker.session().active_domain(), Some("a.example"));
        assert_eq!(store.writes(), 0);

        tracker
            .on_event(BrowserEvent::TabUpdated {
                tab: Tab::new(1, "https://c.example"),
                status: TabStatus::Complete,
            })
            .await;
        assert_eq!(tracker.session().active_domain(), Some("c.example"));
        assert_eq!(total(&store, "a.example").await, Some(2));
        assert!(tracker.session().is_tracking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_domain_navigation_keeps_counting() {
        let (_host, store, mut tracker) = setup("https://a.example/one");
        tracker.init().await;
        advance(Duration::from_secs(3)).await;

        tracker
            .on_event(BrowserEvent::TabUpdated {
                tab: Tab::new(1, "https://a.example/two"),
                status: TabStatus::Complete,
            })
            .await;
        advance(Duration::from_secs(2)).await;
        tracker.shutdown().await;

        assert_eq!(total(&store, "a.example").await, Some(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tab_without_url_is_unknown() {
        let (host, store, mut tracker) = setup("https://a.example");
        host.open_tab(Tab { id: 5, url: None, active: true, window_id: None });
        tracker.on_event(BrowserEvent::TabActivated { tab_id: 5 }).await;
        assert_eq!(tracker.session().active_domain(), Some(UNKNOWN_DOMAIN));

        advance(Duration::from_secs(3)).await;
        tracker.shutdown().await;
        assert_eq!(total(&store, UNKNOWN_DOMAIN).await, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_loss_and_return() {
        let (host, store, mut tracker) = setup("https://a.example");
        tracker.init().await;
        advance(Duration::from_secs(3)).await;

        host.set_focused(false);
        tracker.on_event(BrowserEvent::WindowFocusChanged { window_id: None }).await;
        assert!(!tracker.session().is_tracking());
        assert_eq!(tracker.session().active_domain(), Some("a.example"));

        advance(Duration::from_secs(30)).await;
        host.set_focused(true);
        tracker.on_event(BrowserEvent::WindowFocusChanged { window_id: Some(1) }).await;
        assert!(tracker.session().is_tracking());

        advance(Duration::from_secs(2)).await;
        tracker.shutdown().await;
        assert_eq!(total(&store, "a.example").await, Some(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_stops_unless_media_plays() {
        let (host, store, mut tracker) = setup("https://video.example");
        tracker.init().await;

        host.set_idle(IdleState::Idle);
        tracker.on_event(BrowserEvent::IdleStateChanged { state: IdleState::Idle }).await;
        assert!(!tracker.session().is_tracking());

        tracker.on_event(BrowserEvent::MediaPlayback { state: MediaState::Playing }).await;
        assert!(tracker.session().is_tracking());

        host.set_idle(IdleState::Locked);
        tracker.on_event(BrowserEvent::IdleStateChanged { state: IdleState::Locked }).await;
        assert!(tracker.session().is_tracking(), "media keeps a locked session counting");

        advance(Duration::from_secs(8)).await;
        tracker.on_event(BrowserEvent::MediaPlayback { state: MediaState::Paused }).await;
        assert!(!tracker.session().is_tracking());
        assert_eq!(total(&store, "video.example").await, Some(8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_redundant_media_messages_do_not_reevaluate() {
        let (host, _store, mut tracker) = setup("https://a.example");
        tracker.init().await;
        let queries = host.idle_queries();

        tracker.on_event(BrowserEvent::MediaPlayback { state: MediaState::Paused }).await;
        assert_eq!(host.idle_queries(), queries);

        tracker.on_event(BrowserEvent::MediaPlayback { state: MediaState::Playing }).await;
        assert_eq!(host.idle_queries(), queries + 1);

        tracker.on_event(BrowserEvent::MediaPlayback { state: MediaState::Playing }).await;
        assert_eq!(host.idle_queries(), queries + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_host_query_failures_stop_tracking() {
        let (host, store, mut tracker) = setup("https://a.example");
        tracker.init().await;
        advance(Duration::from_secs(2)).await;

        host.set_fail_queries(true);
        tracker.on_event(BrowserEvent::IdleStateChanged { state: IdleState::Active }).await;

        assert!(!tracker.session().is_tracking());
        assert_eq!(total(&store, "a.example").await, Some(2));
    }
}
