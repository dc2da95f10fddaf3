//! Mounted recommendation pages.
//!
//! A page lives from the moment the search page hands over its payload until it is closed
//! or left idle. It owns the day pointer, the map binder with its markers, and the request
//! slot guarding save/retry.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::{Mutex, RwLock, watch};
use tripview_itinerary::{AxisOrder, ItineraryViewer, TripContext, TripPayload};
use tripview_map::{MapBinder, MarkerSpec};
use tripview_shorttrip::RequestSlot;
use ulid::Ulid;

use crate::map_script::KakaoSdk;

pub type PageBinder = MapBinder<KakaoSdk>;

pub struct Page {
    pub id: String,
    pub viewer: ItineraryViewer,
    pub context: TripContext,
    pub binder: PageBinder,
    pub slot: RequestSlot,
    closed: watch::Sender<bool>,
    last_seen: Instant,
}

impl Page {
    pub fn new(id: impl Into<String>, payload: TripPayload, map_level: u8) -> Self {
        let (closed, _) = watch::channel(false);

        Self {
            id: id.into(),
            viewer: ItineraryViewer::new(payload.recommendations),
            context: payload.context,
            binder: MapBinder::new(map_level),
            slot: RequestSlot::new(),
            closed,
            last_seen: Instant::now(),
        }
    }

    pub fn path(&self) -> String {
        format!("/recommendation/{}", self.id)
    }

    /// The payload this page was mounted with.
    pub fn payload(&self) -> TripPayload {
        TripPayload {
            recommendations: self.viewer.itinerary().clone(),
            context: self.context.clone(),
        }
    }

    pub fn markers(&self, order: AxisOrder) -> Vec<MarkerSpec> {
        self.viewer
            .itinerary()
            .get(self.viewer.current_day())
            .map(|day| day.marker_specs(order))
            .unwrap_or_default()
    }

    pub fn closed(&self) -> PageClosed {
        PageClosed(self.closed.subscribe())
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_seen.elapsed()
    }

    fn close(&mut self) {
        self.binder.release();
        self.closed.send_replace(true);
    }
}

/// Resolves once the page is closed or dropped.
pub struct PageClosed(watch::Receiver<bool>);

impl PageClosed {
    pub async fn wait(mut self) {
        let _ = self.0.wait_for(|closed| *closed).await;
    }
}

#[derive(Clone)]
pub struct PageStore {
    pages: Arc<RwLock<HashMap<String, Arc<Mutex<Page>>>>>,
    idle_timeout: Duration,
}

impl PageStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            pages: Default::default(),
            idle_timeout,
        }
    }

    pub async fn mount(&self, payload: TripPayload, map_level: u8) -> String {
        self.evict_idle().await;

        let id = Ulid::new().to_string();
        let page = Page::new(id.to_owned(), payload, map_level);

        self.pages
            .write()
            .await
            .insert(id.to_owned(), Arc::new(Mutex::new(page)));

        tracing::info!(page = id, "Page mounted");

        id
    }

    pub async fn get(&self, id: &str) -> Option<Arc<Mutex<Page>>> {
        self.pages.read().await.get(id).cloned()
    }

    /// Removes the page, detaching its markers and cancelling its in-flight request.
    pub async fn unmount(&self, id: &str) -> bool {
        let Some(page) = self.pages.write().await.remove(id) else {
            return false;
        };

        page.lock().await.close();
        tracing::info!(page = id, "Page unmounted");

        true
    }

    pub async fn len(&self) -> usize {
        self.pages.read().await.len()
    }

    async fn evict_idle(&self) {
        let mut pages = self.pages.write().await;

        pages.retain(|id, page| {
            // A locked page is in use
            let Ok(mut page) = page.try_lock() else {
                return true;
            };

            if page.idle_for() < self.idle_timeout {
                return true;
            }

            page.close();
            tracing::info!(page = id, "Idle page evicted");

            false
        });
    }
}
