rust_i18n::i18n!("locales", fallback = "en");

pub mod auth;
pub mod config;
pub mod language;
pub mod map_script;
pub mod middleware;
pub mod observability;
pub mod page;
pub mod routes;
pub mod server;
pub mod template;

pub use routes::AppState;
