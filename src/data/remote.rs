//! Remote catalog retrieval.
//!
//! Spectral line catalogs are published as plain-text files keyed by a
//! numeric species tag (e.g. 18003 for water), so "fetch" is a single GET of
//! `c<tag>.cat` against a catalog mirror. The base URL can be overridden via
//! the environment for local mirrors.

use reqwest::blocking::Client;

use crate::error::AppError;

const DEFAULT_BASE_URL: &str = "https://spec.jpl.nasa.gov/ftp/pub/catalog";
const BASE_URL_ENV: &str = "SPECMATCH_CATALOG_BASE_URL";

pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    /// Client against the default mirror, honoring `SPECMATCH_CATALOG_BASE_URL`
    /// (also read from a `.env` file if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// URL of the catalog file for a species tag.
    pub fn catalog_url(&self, tag: u32) -> String {
        format!("{}/c{tag:06}.cat", self.base_url.trim_end_matches('/'))
    }

    /// Download the catalog text for a species tag.
    pub fn fetch_catalog(&self, tag: u32) -> Result<String, AppError> {
        let url = self.catalog_url(tag);
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| AppError::new(4, format!("Catalog request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Catalog request for {url} failed with status {}.", resp.status()),
            ));
        }

        resp.text()
            .map_err(|e| AppError::new(4, format!("Failed to read catalog body: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_url_is_zero_padded_and_slash_safe() {
        let client = CatalogClient::with_base_url("http://mirror.local/catalog/");
        assert_eq!(client.catalog_url(18003), "http://mirror.local/catalog/c018003.cat");
        assert_eq!(client.catalog_url(32003), "http://mirror.local/catalog/c032003.cat");
    }
}
