use std::convert::Infallible;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::{header::ACCEPT_LANGUAGE, request::Parts},
};

use healthy_life_domain::i18n::Locale;

use crate::api::routes::AppState;
use crate::entities::common::LangQuery;

/// Locale of the request: `?lang=`, then `Accept-Language`, then the configured default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLocale(pub Locale);

#[async_trait]
impl FromRequestParts<AppState> for RequestLocale {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(RequestLocale(resolve_locale(parts, state.default_locale)))
    }
}

fn resolve_locale(parts: &Parts, default: Locale) -> Locale {
    let from_query = Query::<LangQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(query)| query.lang)
        .and_then(|lang| lang.parse::<Locale>().ok());

    from_query
        .or_else(|| {
            parts
                .headers
                .get(ACCEPT_LANGUAGE)
                .and_then(|value| value.to_str().ok())
                .and_then(Locale::from_accept_language)
        })
        .unwrap_or(default)
}
