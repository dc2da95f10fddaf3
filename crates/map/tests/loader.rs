use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use tripview_map::{
    Bounds, LatLng, LoadState, MapBinder, MapError, MapResult, MapSdk, ScriptSource, SdkLoader,
};

struct CountingSdk;

impl MapSdk for CountingSdk {
    type Map = ();
    type Overlay = ();

    fn create_map(&self, _center: LatLng, _level: u8) -> Self::Map {}

    fn create_overlay(&self, _map: &mut (), _position: LatLng, _label: &str) -> Self::Overlay {}

    fn detach_overlay(&self, _map: &mut (), _overlay: ()) {}

    fn fit_bounds(&self, _map: &mut (), _bounds: &Bounds) {}
}

#[derive(Clone, Default)]
struct CountingSource {
    calls: Arc<AtomicUsize>,
    failures_left: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl ScriptSource for CountingSource {
    type Sdk = CountingSdk;

    async fn load(&self) -> MapResult<CountingSdk> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;

        if self.failures_left.load(Ordering::SeqCst) > 0 {
            self.failures_left.fetch_sub(1, Ordering::SeqCst);
            return Err(MapError::Request("blocked".to_owned()));
        }

        Ok(CountingSdk)
    }
}

#[tokio::test]
async fn test_concurrent_mounts_share_one_load() -> anyhow::Result<()> {
    let source = CountingSource::default();
    let calls = source.calls.clone();
    let loader = Arc::new(SdkLoader::new(source));

    let handles = (0..8)
        .map(|_| {
            let loader = loader.clone();
            tokio::spawn(async move { loader.ensure_loaded().await.is_some() })
        })
        .collect::<Vec<_>>();

    for handle in handles {
        assert!(handle.await?);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(loader.state(), LoadState::Ready);

    Ok(())
}

#[tokio::test]
async fn test_failed_load_degrades_then_recovers() {
    let source = CountingSource::default();
    source.failures_left.store(1, Ordering::SeqCst);
    let calls = source.calls.clone();
    let loader = SdkLoader::new(source);

    assert!(loader.ensure_loaded().await.is_none());
    assert_eq!(loader.state(), LoadState::Uninitialized);

    assert!(loader.ensure_loaded().await.is_some());
    assert!(loader.ensure_loaded().await.is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_preloaded_sdk_never_loads() {
    let loader = SdkLoader::<CountingSource>::preloaded(CountingSdk);
    assert_eq!(loader.state(), LoadState::Ready);

    let mut binder = MapBinder::new(3);
    binder.mount(&loader, LatLng::new(37.5, 127.0)).await;

    assert!(binder.map().is_some());
}
