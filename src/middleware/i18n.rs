// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::common::i18n::DEFAULT_LANG;

// Extrator de idioma a partir do Accept-Language
pub struct Locale(pub String);

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let lang = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .and_then(|header_str| {
                accept_language::parse(header_str)
                    .first()
                    // "pt-BR" -> "pt"
                    .map(|tag| tag.split('-').next().unwrap_or(tag).to_lowercase())
            })
            .unwrap_or_else(|| DEFAULT_LANG.to_string());

        Ok(Locale(lang))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn locale_of(header: Option<&str>) -> String {
        let mut builder = Request::builder();
        if let Some(value) = header {
            builder = builder.header(header::ACCEPT_LANGUAGE, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        let Ok(Locale(lang)) = Locale::from_request_parts(&mut parts, &()).await;
        lang
    }

    #[tokio::test]
    async fn picks_the_primary_language() {
        assert_eq!(locale_of(Some("en-US,en;q=0.9,pt;q=0.5")).await, "en");
        assert_eq!(locale_of(Some("pt-BR")).await, "pt");
        assert_eq!(locale_of(None).await, "pt");
    }
}
