use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::{MapResult, MapSdk};

/// Fetches the map provider script and turns it into a usable SDK handle.
#[async_trait]
pub trait ScriptSource: Send + Sync {
    type Sdk: MapSdk;

    async fn load(&self) -> MapResult<Self::Sdk>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum LoadState {
    Uninitialized,
    Loading,
    Ready,
}

/// Process-wide, single-flight access to the map SDK.
///
/// Concurrent callers of [`SdkLoader::ensure_loaded`] share one in-flight load. A successful
/// load is kept for the lifetime of the loader. A failed load is not kept: the caller
/// renders without a map and the next caller starts a fresh attempt.
pub struct SdkLoader<S: ScriptSource> {
    source: Option<S>,
    sdk: OnceCell<Arc<S::Sdk>>,
    loading: AtomicBool,
}

impl<S: ScriptSource> SdkLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Some(source),
            sdk: OnceCell::new(),
            loading: AtomicBool::new(false),
        }
    }

    /// A loader whose SDK is already present in the environment.
    pub fn preloaded(sdk: S::Sdk) -> Self {
        Self {
            source: None,
            sdk: OnceCell::new_with(Some(Arc::new(sdk))),
            loading: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> LoadState {
        if self.sdk.initialized() {
            LoadState::Ready
        } else if self.loading.load(Ordering::Acquire) {
            LoadState::Loading
        } else {
            LoadState::Uninitialized
        }
    }

    pub async fn ensure_loaded(&self) -> Option<Arc<S::Sdk>> {
        if let Some(sdk) = self.sdk.get() {
            return Some(sdk.clone());
        }

        let source = self.source.as_ref()?;

        let result = self
            .sdk
            .get_or_try_init(|| async {
                let _loading = LoadingFlag::raise(&self.loading);
                tracing::info!("Loading map SDK script");

                source.load().await.map(Arc::new)
            })
            .await;

        match result {
            Ok(sdk) => Some(sdk.clone()),
            Err(err) => {
                tracing::warn!(err = %err, "Map SDK unavailable, page renders without a map");
                None
            }
        }
    }
}

struct LoadingFlag<'a>(&'a AtomicBool);

impl<'a> LoadingFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for LoadingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
