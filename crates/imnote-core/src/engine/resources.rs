//! Locale and style downloads from the CSL repositories

use imnote_providers::{HttpRequest, HttpTransport};
use tracing::debug;

use super::EngineError;

pub const LOCALE_URL: &str =
    "https://raw.githubusercontent.com/citation-style-language/locales/master/locales-en-US.xml";

pub const STYLES_URL: &str = "https://raw.githubusercontent.com/citation-style-language/styles/master";

pub fn style_url(style: &str) -> String {
    format!("{}/{}.csl", STYLES_URL, style)
}

/// Fetch the en-US locale
pub async fn fetch_locale<T: HttpTransport>(http: &T) -> Result<String, EngineError> {
    fetch_text(http, LOCALE_URL).await
}

/// Fetch a style by name, e.g. `apa-6th-edition`
pub async fn fetch_style<T: HttpTransport>(http: &T, style: &str) -> Result<String, EngineError> {
    fetch_text(http, &style_url(style)).await
}

async fn fetch_text<T: HttpTransport>(http: &T, url: &str) -> Result<String, EngineError> {
    debug!(url, "Downloading");

    let response = http
        .get(&HttpRequest::get(url))
        .await
        .map_err(|e| EngineError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if !response.is_success() {
        return Err(EngineError::Fetch {
            url: url.to_string(),
            reason: format!("status {}", response.status),
        });
    }

    Ok(response.body)
}
