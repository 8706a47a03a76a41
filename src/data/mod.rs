//! Data access: where the JSON files live and how to read them.

use std::path::{Path, PathBuf};

use crate::error::AppError;

pub mod source;

pub use source::{DataSource, HttpSource, LocalSource, fetch_json, series_path};

/// Environment variable naming the data directory or base URL.
pub const DATA_ENV: &str = "PRECIOS_DATA";

/// Directory tried when nothing else is configured.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Where the data files are published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataLocation {
    Dir(PathBuf),
    Url(String),
}

impl DataLocation {
    /// `http://` and `https://` prefixes select a URL, anything else is a path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataLocation::Url(trimmed.to_string())
        } else {
            DataLocation::Dir(PathBuf::from(trimmed))
        }
    }

    pub fn open(&self) -> Result<Box<dyn DataSource>, AppError> {
        match self {
            DataLocation::Dir(path) => {
                if !path.is_dir() {
                    return Err(AppError::usage(format!(
                        "Data directory not found: {}",
                        path.display()
                    )));
                }
                Ok(Box::new(LocalSource::new(path.clone())))
            }
            DataLocation::Url(url) => Ok(Box::new(HttpSource::new(url.clone())?)),
        }
    }
}

/// Resolve the data location: explicit argument, then `PRECIOS_DATA`
/// (including a `.env` file), then `./data`, then an interactive picker.
pub fn resolve_location(arg: Option<&str>) -> Result<DataLocation, AppError> {
    dotenvy::dotenv().ok();
    let env_value = std::env::var(DATA_ENV).ok();

    if let Some(location) = resolve_configured(arg, env_value.as_deref(), Path::new(DEFAULT_DATA_DIR)) {
        tracing::debug!(?location, "resolved data location");
        return Ok(location);
    }

    let dir = crate::cli::picker::prompt_for_data_dir()?;
    Ok(DataLocation::Dir(dir))
}

/// Non-interactive part of [`resolve_location`].
pub fn resolve_configured(
    arg: Option<&str>,
    env_value: Option<&str>,
    default_dir: &Path,
) -> Option<DataLocation> {
    if let Some(raw) = arg.filter(|s| !s.trim().is_empty()) {
        return Some(DataLocation::parse(raw));
    }
    if let Some(raw) = env_value.filter(|s| !s.trim().is_empty()) {
        return Some(DataLocation::parse(raw));
    }
    if default_dir.join(source::PRODUCTS_FILE).is_file() {
        return Some(DataLocation::Dir(default_dir.to_path_buf()));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_distinguishes_urls_from_paths() {
        assert_eq!(
            DataLocation::parse("https://precios.example/data"),
            DataLocation::Url("https://precios.example/data".to_string())
        );
        assert_eq!(
            DataLocation::parse("./docs/data"),
            DataLocation::Dir(PathBuf::from("./docs/data"))
        );
    }

    #[test]
    fn argument_wins_over_environment() {
        let got = resolve_configured(Some("a"), Some("b"), Path::new("/nonexistent"));
        assert_eq!(got, Some(DataLocation::Dir(PathBuf::from("a"))));

        let got = resolve_configured(None, Some("http://b"), Path::new("/nonexistent"));
        assert_eq!(got, Some(DataLocation::Url("http://b".to_string())));
    }

    #[test]
    fn default_dir_needs_products_file() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(resolve_configured(None, None, tmp.path()), None);

        std::fs::write(tmp.path().join("productos.json"), "[]").unwrap();
        assert_eq!(
            resolve_configured(None, Some("  "), tmp.path()),
            Some(DataLocation::Dir(tmp.path().to_path_buf()))
        );
    }
}
