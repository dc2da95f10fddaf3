use crate::{Bounds, LatLng};

/// Object API exposed by a loaded map provider script.
///
/// Handles are owned by the caller. An overlay handed back to [`MapSdk::detach_overlay`] is
/// removed from the map and must not be used again.
pub trait MapSdk: Send + Sync {
    type Map: Send;
    type Overlay: Send;

    fn create_map(&self, center: LatLng, level: u8) -> Self::Map;

    fn create_overlay(&self, map: &mut Self::Map, position: LatLng, label: &str)
    -> Self::Overlay;

    fn detach_overlay(&self, map: &mut Self::Map, overlay: Self::Overlay);

    fn fit_bounds(&self, map: &mut Self::Map, bounds: &Bounds);
}
