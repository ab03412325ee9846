//! Resolution and retrieval of the static detonation dataset.

use super::record::DetonationRecord;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;
use thiserror::Error;

/// Failure while fetching or parsing a static resource.
///
/// All variants are surfaced to the user the same way; the distinction
/// only matters for logging.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with HTTP {0}")]
    Status(u16),
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("failed to start loader: {0}")]
    Runtime(String),
}

/// Where a static resource lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Absolute http(s) URL
    Url(String),
    /// Local file (native builds only)
    #[cfg(not(target_arch = "wasm32"))]
    File(PathBuf),
}

impl DataSource {
    /// Resolves a configured location string.
    ///
    /// Absolute URLs are used as-is. Other locations are treated as paths
    /// relative to the page origin on the web, and as filesystem paths natively.
    pub fn resolve(location: &str) -> Self {
        if is_absolute_url(location) {
            return DataSource::Url(location.to_string());
        }

        #[cfg(target_arch = "wasm32")]
        {
            let origin = web_sys::window()
                .and_then(|w| w.location().origin().ok())
                .unwrap_or_default();
            DataSource::Url(join_origin(&origin, location))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            DataSource::File(PathBuf::from(location))
        }
    }

    /// Human-readable location for logs and status text.
    pub fn describe(&self) -> String {
        match self {
            DataSource::Url(url) => url.clone(),
            #[cfg(not(target_arch = "wasm32"))]
            DataSource::File(path) => path.display().to_string(),
        }
    }

    /// Reads the raw bytes of the resource.
    pub async fn fetch_bytes(&self) -> Result<Vec<u8>, LoadError> {
        match self {
            DataSource::Url(url) => {
                let response = reqwest::get(url.as_str())
                    .await
                    .map_err(|e| LoadError::Network(e.to_string()))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::Status(status.as_u16()));
                }

                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| LoadError::Network(e.to_string()))?;
                Ok(bytes.to_vec())
            }
            #[cfg(not(target_arch = "wasm32"))]
            DataSource::File(path) => std::fs::read(path).map_err(|e| LoadError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Reads the resource as text (lossy UTF-8).
    pub async fn fetch_text(&self) -> Result<String, LoadError> {
        let bytes = self.fetch_bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn is_absolute_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Joins a page origin (e.g. `https://host:8080`) with a relative path.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub fn join_origin(origin: &str, location: &str) -> String {
    format!(
        "{}/{}",
        origin.trim_end_matches('/'),
        location.trim_start_matches("./").trim_start_matches('/')
    )
}

/// Parses the dataset document: a JSON array of detonation records.
///
/// Only structural validation is performed.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<DetonationRecord>, LoadError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Fetches and parses the dataset.
pub async fn load_records(source: DataSource) -> Result<Vec<DetonationRecord>, LoadError> {
    log::info!("Fetching detonation data from {}", source.describe());
    let bytes = source.fetch_bytes().await?;
    log::debug!("Received {} bytes of detonation data", bytes.len());
    parse_records(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(future)
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "detonation-atlas-{}-{}.json",
            name,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_parse_records_array() {
        let json = br#"[
            {"detonatedBy": "USA", "latitude": 32.5, "longitude": -105.5, "detonationYear": 1945},
            {"detonatedBy": "UK", "latitude": -20.4, "longitude": 115.5, "upperYield": 25, "detonationYear": 1952}
        ]"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].upper_yield, Some(25.0));
    }

    #[test]
    fn test_parse_records_malformed() {
        let err = parse_records(b"{not json").unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));

        let err = parse_records(br#"{"detonatedBy": "USA"}"#).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[test]
    fn test_resolve_locations() {
        assert_eq!(
            DataSource::resolve("https://example.org/data.json"),
            DataSource::Url("https://example.org/data.json".to_string())
        );
        assert_eq!(
            DataSource::resolve("detonation-data.json"),
            DataSource::File(PathBuf::from("detonation-data.json"))
        );
    }

    #[test]
    fn test_join_origin() {
        assert_eq!(
            join_origin("http://localhost:8080", "/detonation-data.json"),
            "http://localhost:8080/detonation-data.json"
        );
        assert_eq!(
            join_origin("http://localhost:8080/", "./data/x.json"),
            "http://localhost:8080/data/x.json"
        );
    }

    #[test]
    fn test_load_records_from_file() {
        let path = temp_file(
            "ok",
            r#"[{"detonatedBy": "France", "latitude": -21.8, "longitude": -138.9, "detonationYear": 1966}]"#,
        );
        let records = block_on(load_records(DataSource::File(path.clone()))).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].detonated_by, "France");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_load_records_missing_file() {
        let source = DataSource::File(PathBuf::from("/nonexistent/detonation-data.json"));
        let err = block_on(load_records(source)).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_load_records_malformed_file() {
        let path = temp_file("malformed", "[{\"detonatedBy\": ");
        let err = block_on(load_records(DataSource::File(path.clone()))).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
        let _ = std::fs::remove_file(path);
    }
}
