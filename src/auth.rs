use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use std::convert::Infallible;

use crate::config::Config;

/// Bearer credential stored by the login flow, if any.
///
/// The token is opaque here; the backend is the one validating it.
#[derive(Debug, Clone, Default)]
pub struct Credential(pub Option<String>);

impl Credential {
    pub fn token(&self) -> Option<&str> {
        self.0.as_deref().filter(|t| !t.is_empty())
    }
}

impl FromRequestParts<crate::routes::AppState> for Credential {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &crate::routes::AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state).await?;

        Ok(Credential(
            jar.get(&state.config.auth.cookie_name)
                .map(|cookie| cookie.value().to_owned()),
        ))
    }
}

/// Login view carrying `return_to` as the post-login target.
pub fn login_redirect(config: &Config, return_to: &str) -> String {
    format!(
        "{}?redirectUri={}",
        config.navigation.login_path,
        urlencoding::encode(return_to)
    )
}

/// Absolute URL of a page of this server.
pub fn page_url(config: &Config, path: &str) -> String {
    format!("{}{path}", config.server.base_url.trim_end_matches('/'))
}
