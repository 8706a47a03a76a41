//! Access to the pre-generated JSON data files.
//!
//! The files are produced by an external scraper and published either as a
//! directory on disk or under a static web root. Both are exposed through the
//! same `DataSource` trait so controllers never care where bytes come from.

use std::fs;
use std::path::PathBuf;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use crate::error::AppError;

pub const SUMMARY_FILE: &str = "resumen.json";
pub const PRODUCTS_FILE: &str = "productos.json";
pub const SERIES_INDEX_FILE: &str = "historicos_index.json";
pub const SERIES_DIR: &str = "historicos";

/// Relative path of one product's series file.
pub fn series_path(file: &str) -> String {
    format!("{SERIES_DIR}/{file}")
}

/// Read-only access to the data files, addressed by relative path.
pub trait DataSource {
    /// Fetch the raw bytes at `path` (relative to the data root).
    fn fetch(&self, path: &str) -> Result<Vec<u8>, AppError>;

    /// Human-readable location, for status lines and logs.
    fn describe(&self) -> String;
}

/// Fetch `path` and parse it as JSON.
pub fn fetch_json<T: DeserializeOwned>(source: &dyn DataSource, path: &str) -> Result<T, AppError> {
    let bytes = source.fetch(path)?;
    let value = serde_json::from_slice(&bytes)
        .map_err(|e| AppError::data_load(format!("Failed to parse {path}: {e}")))?;
    tracing::debug!(path, bytes = bytes.len(), "loaded data file");
    Ok(value)
}

/// Data files in a local directory.
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DataSource for LocalSource {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, AppError> {
        let full = self.root.join(path);
        fs::read(&full)
            .map_err(|e| AppError::data_load(format!("Failed to read '{}': {e}", full.display())))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Data files under an HTTP(S) base URL.
///
/// No timeout is configured: a hung request blocks until the server gives up.
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(None::<std::time::Duration>)
            .build()
            .map_err(|e| AppError::data_load(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl DataSource for HttpSource {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, AppError> {
        let url = self.url_for(path);
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| AppError::data_load(format!("Request for {url} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::data_load(format!(
                "Request for {url} failed with status {}.",
                resp.status()
            )));
        }

        let body = resp
            .bytes()
            .map_err(|e| AppError::data_load(format!("Failed to read response from {url}: {e}")))?;
        Ok(body.to_vec())
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn http_urls_join_cleanly() {
        let src = HttpSource::new("https://example.org/precios/data/").unwrap();
        assert_eq!(
            src.url_for("productos.json"),
            "https://example.org/precios/data/productos.json"
        );
        assert_eq!(
            src.url_for(&series_path("arroz.json")),
            "https://example.org/precios/data/historicos/arroz.json"
        );
    }

    #[test]
    fn missing_local_file_is_data_load_failure() {
        let src = LocalSource::new("/nonexistent/precios-data");
        let err = src.fetch(PRODUCTS_FILE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataLoad);
        assert!(err.message().contains("productos.json"));
    }
}
