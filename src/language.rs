use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use std::convert::Infallible;

pub const SUPPORTED_LANGUAGES: [&str; 2] = ["ko", "en"];
pub const DEFAULT_LANGUAGE: &str = "ko";

/// Languages from the `Accept-Language` header, ordered by quality.
#[derive(Debug, Clone, Default)]
pub struct UserLanguage(Vec<String>);

impl UserLanguage {
    pub fn parse(header: &str) -> Self {
        let mut languages = header
            .split(',')
            .filter_map(|part| {
                let mut pieces = part.trim().split(';');
                let tag = pieces.next()?.trim();
                if tag.is_empty() || tag == "*" {
                    return None;
                }

                let quality = pieces
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .and_then(|q| q.parse::<f32>().ok())
                    .unwrap_or(1.0);

                Some((tag.to_owned(), quality))
            })
            .collect::<Vec<_>>();

        languages.sort_by(|a, b| b.1.total_cmp(&a.1));

        Self(languages.into_iter().map(|(tag, _)| tag).collect())
    }

    pub fn preferred_languages(&self) -> &[String] {
        &self.0
    }

    /// First requested language we have translations for.
    pub fn preferred_supported(&self) -> &'static str {
        self.0
            .iter()
            .find_map(|tag| {
                let primary = tag.split('-').next().unwrap_or(tag).to_ascii_lowercase();
                SUPPORTED_LANGUAGES.iter().find(|l| **l == primary).copied()
            })
            .unwrap_or(DEFAULT_LANGUAGE)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for UserLanguage {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .map(UserLanguage::parse)
            .unwrap_or_default())
    }
}
