use std::sync::Arc;

use crate::{
    LatLng, LoadState, MapSdk, MarkerArena, MarkerOp, MarkerPlan, MarkerSpec, ScriptSource,
    SdkLoader,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum BinderState {
    Unloaded,
    ScriptLoading,
    ScriptReady,
    MapInitialized,
    MarkersSynced,
}

/// Owns one map instance and the overlays rendered on it.
pub struct MapBinder<M: MapSdk> {
    state: BinderState,
    level: u8,
    sdk: Option<Arc<M>>,
    map: Option<M::Map>,
    markers: MarkerArena<M::Overlay>,
}

impl<M: MapSdk> MapBinder<M> {
    pub fn new(level: u8) -> Self {
        Self {
            state: BinderState::Unloaded,
            level,
            sdk: None,
            map: None,
            markers: MarkerArena::default(),
        }
    }

    pub fn state(&self) -> BinderState {
        self.state
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn markers(&self) -> impl Iterator<Item = &MarkerSpec> {
        self.markers.specs()
    }

    pub fn map(&self) -> Option<&M::Map> {
        self.map.as_ref()
    }

    pub fn map_mut(&mut self) -> Option<&mut M::Map> {
        self.map.as_mut()
    }

    /// Acquires the SDK and creates the map centered on `center`.
    ///
    /// Stays [`BinderState::Unloaded`] when the script cannot be loaded. Mounting an already
    /// initialized binder is a no-op.
    pub async fn mount<S>(&mut self, loader: &SdkLoader<S>, center: LatLng) -> BinderState
    where
        S: ScriptSource<Sdk = M>,
    {
        if self.map.is_some() {
            return self.state;
        }

        if self.sdk.is_none() {
            if loader.state() != LoadState::Ready {
                self.state = BinderState::ScriptLoading;
            }

            match loader.ensure_loaded().await {
                Some(sdk) => {
                    self.sdk = Some(sdk);
                    self.state = BinderState::ScriptReady;
                }
                None => {
                    self.state = BinderState::Unloaded;
                    return self.state;
                }
            }
        }

        self.initialize(center);
        self.state
    }

    fn initialize(&mut self, center: LatLng) {
        let Some(sdk) = &self.sdk else {
            return;
        };

        tracing::debug!(lat = center.lat, lng = center.lng, level = self.level, "Map initialized");
        self.map = Some(sdk.create_map(center, self.level));
        self.state = BinderState::MapInitialized;
    }

    /// Replaces every rendered marker with one overlay per desired spec and fits the map to
    /// them. Returns `None` while no map is initialized.
    pub fn sync(&mut self, desired: &[MarkerSpec]) -> Option<MarkerPlan> {
        let (Some(sdk), Some(map)) = (&self.sdk, self.map.as_mut()) else {
            return None;
        };

        let plan = MarkerPlan::rebuild(self.markers.slots(), desired);

        for op in &plan.ops {
            match op {
                MarkerOp::Detach { slot } => {
                    if let Some(overlay) = self.markers.take(*slot) {
                        sdk.detach_overlay(map, overlay);
                    }
                    self.markers.compact();
                }
                MarkerOp::Attach { slot, spec } => {
                    let overlay = sdk.create_overlay(map, spec.position, &spec.label());
                    self.markers.place(*slot, spec.clone(), overlay);
                }
            }
        }

        if !plan.bounds.is_empty() {
            sdk.fit_bounds(map, &plan.bounds);
        }

        self.state = BinderState::MarkersSynced;
        tracing::debug!(
            detached = plan.detached(),
            attached = plan.attached(),
            "Markers synced"
        );

        Some(plan)
    }

    /// Detaches every marker and drops the map instance.
    pub fn release(&mut self) {
        if let (Some(sdk), Some(map)) = (&self.sdk, self.map.as_mut()) {
            for overlay in self.markers.drain() {
                sdk.detach_overlay(map, overlay);
            }
        }

        self.markers.drain();
        self.map = None;
        self.state = if self.sdk.is_some() {
            BinderState::ScriptReady
        } else {
            BinderState::Unloaded
        };
    }
}

impl<M: MapSdk> Drop for MapBinder<M> {
    fn drop(&mut self) {
        self.release();
    }
}
