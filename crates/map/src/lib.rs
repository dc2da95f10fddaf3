//! Map binding for the itinerary page.
//!
//! The map provider is an opaque capability ([`MapSdk`]) obtained once per process through a
//! single-flight [`SdkLoader`]. A [`MapBinder`] owns one map instance and the marker overlays
//! rendered on it, and rebuilds that marker set wholesale on every sync.

mod binder;
mod error;
mod geo;
mod loader;
mod markers;
mod sdk;

pub use binder::*;
pub use error::*;
pub use geo::*;
pub use loader::*;
pub use markers::*;
pub use sdk::*;
