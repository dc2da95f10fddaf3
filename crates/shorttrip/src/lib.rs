//! Client side of the short-trip backend: persisting a chosen itinerary and asking for a new
//! recommendation, guarded so that a page never has two requests in flight.

mod client;
mod dispatcher;
mod error;
mod request;

pub use client::*;
pub use dispatcher::*;
pub use error::*;
pub use request::*;
