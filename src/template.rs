use axum::{
    RequestPartsExt,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{Html, IntoResponse, Response},
};
use std::{collections::HashMap, convert::Infallible};
use time::Date;
use tripview_itinerary::Hashtag;

use crate::language::UserLanguage;

/// Localized `weekday / month / day` rendering of a calendar date.
pub fn format_day_date(date: Date, locale: &str) -> String {
    let month = rust_i18n::t!(format!("{}_long", date.month()), locale = locale);
    let weekday = rust_i18n::t!(format!("{}_short", date.weekday()), locale = locale);

    rust_i18n::t!(
        "day_date_format",
        locale = locale,
        month = month,
        weekday = weekday,
        day = date.day()
    )
    .to_string()
}

pub fn format_hashtag(tag: &Hashtag, locale: &str) -> String {
    let label = match tag {
        Hashtag::Companion(value) | Hashtag::Transport(value) => value.to_owned(),
        Hashtag::Nature => rust_i18n::t!("hashtag_nature", locale = locale).to_string(),
        Hashtag::City => rust_i18n::t!("hashtag_city", locale = locale).to_string(),
        Hashtag::NewArea => rust_i18n::t!("hashtag_new_area", locale = locale).to_string(),
        Hashtag::FamiliarArea => {
            rust_i18n::t!("hashtag_familiar_area", locale = locale).to_string()
        }
    };

    format!("#{label}")
}

pub(crate) mod filters {
    use time::Date;

    fn preferred_language(values: &dyn askama::Values) -> askama::Result<String> {
        askama::get_value::<String>(values, "preferred_language")
            .cloned()
            .map_err(|_| askama::Error::Custom("preferred_language is not set".into()))
    }

    #[askama::filter_fn]
    pub fn t(value: &str, values: &dyn askama::Values) -> askama::Result<String> {
        let preferred_language = preferred_language(values)?;

        Ok(rust_i18n::t!(value, locale = preferred_language).to_string())
    }

    #[askama::filter_fn]
    pub fn date(value: &Date, values: &dyn askama::Values) -> askama::Result<String> {
        let preferred_language = preferred_language(values)?;

        Ok(super::format_day_date(*value, &preferred_language))
    }
}

#[derive(Clone)]
pub struct Template {
    pub preferred_language: String,
    pub config: crate::config::Config,
}

impl Template {
    fn render_with_values<T: askama::Template>(
        &self,
        template: T,
    ) -> Result<String, askama::Error> {
        let mut values: HashMap<&str, Box<dyn std::any::Any>> = HashMap::new();
        values.insert(
            "preferred_language",
            Box::new(self.preferred_language.to_owned()),
        );
        values.insert("config", Box::new(self.config.clone()));

        template.render_with_values(&values)
    }

    pub fn render<T: askama::Template>(&self, template: T) -> Response {
        match self.render_with_values(template) {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template. Error: {err}"),
            )
                .into_response(),
        }
    }
}

impl FromRequestParts<crate::routes::AppState> for Template {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &crate::routes::AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_language = parts.extract::<UserLanguage>().await?;

        Ok(Template {
            preferred_language: user_language.preferred_supported().to_owned(),
            config: state.config.clone(),
        })
    }
}

#[derive(askama::Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate;

#[derive(askama::Template)]
#[template(path = "partials/toast-success.html")]
pub struct ToastSuccessTemplate<'a> {
    pub message: &'a str,
}

#[derive(askama::Template)]
#[template(path = "partials/toast-error.html")]
pub struct ToastErrorTemplate<'a> {
    pub message: &'a str,
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn test_day_date_is_localized() {
        assert_eq!(format_day_date(date!(2024 - 03 - 03), "ko"), "3월 3일 (일)");
        assert_eq!(format_day_date(date!(2024 - 03 - 03), "en"), "Sun, March 3");
    }

    #[test]
    fn test_hashtags_are_localized() {
        assert_eq!(format_hashtag(&Hashtag::Nature, "ko"), "#자연");
        assert_eq!(format_hashtag(&Hashtag::FamiliarArea, "ko"), "#익숙한 지역");
        assert_eq!(format_hashtag(&Hashtag::NewArea, "en"), "#New area");
        assert_eq!(
            format_hashtag(&Hashtag::Companion("가족".to_owned()), "en"),
            "#가족"
        );
    }
}
