//! JSON document sources.
//!
//! The shared document lives at a fixed relative path
//! (`<dir>/common.json`), per-page documents at a path templated from the
//! page identifier (`<dir>/<id>.json`). Both can be fetched over HTTP(S)
//! or read from a local directory; hydration does not care which.
//!
//! No caching, no retries, no timeout beyond the client defaults: every
//! page hydration fetches its documents fresh.

use crate::config::SellaConfig;
use crate::content::CommonContent;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Name of the shared document (without extension).
const COMMON_DOC: &str = "common";

/// Fetch-related errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for `{0}` failed")]
    Http(String, #[source] reqwest::Error),

    #[error("request for `{0}` returned status {1}")]
    Status(String, u16),

    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid JSON in `{0}`")]
    Json(String, #[source] serde_json::Error),
}

/// Where content documents come from.
pub enum DataSource {
    /// Plain HTTP(S) GET against `<base_url>/<dir>/<name>.json`.
    Remote {
        base_url: String,
        dir: String,
        client: reqwest::blocking::Client,
    },
    /// Read `<dir>/<name>.json` from disk.
    Local { dir: PathBuf },
}

impl DataSource {
    /// Build the source selected by `[data]` in the config.
    pub fn from_config(config: &SellaConfig) -> Result<Self> {
        match config.data.source.as_str() {
            "remote" => {
                let base_url = config
                    .data
                    .base_url
                    .clone()
                    .context("[data.base_url] is required when [data.source] is \"remote\"")?;
                Ok(Self::Remote {
                    base_url: base_url.trim_end_matches('/').to_string(),
                    dir: config.data.dir.clone(),
                    client: reqwest::blocking::Client::new(),
                })
            }
            "local" => Ok(Self::Local {
                dir: config.local_data_dir(),
            }),
            other => bail!("unknown [data.source] `{other}`"),
        }
    }

    /// Fetch one raw document by name (no extension).
    pub fn fetch_document(&self, name: &str) -> Result<String, FetchError> {
        match self {
            Self::Remote { base_url, dir, client } => {
                let url = format!("{base_url}/{dir}/{name}.json");
                let response = client
                    .get(&url)
                    .send()
                    .map_err(|err| FetchError::Http(url.clone(), err))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::Status(url, status.as_u16()));
                }
                response.text().map_err(|err| FetchError::Http(url, err))
            }
            Self::Local { dir } => {
                let path = dir.join(format!("{name}.json"));
                fs::read_to_string(&path).map_err(|err| FetchError::Io(path, err))
            }
        }
    }

    /// Fetch and parse the shared document.
    pub fn fetch_common(&self) -> Result<CommonContent, FetchError> {
        let raw = self.fetch_document(COMMON_DOC)?;
        serde_json::from_str(&raw).map_err(|err| FetchError::Json(COMMON_DOC.to_string(), err))
    }

    /// Fetch the raw per-page document for `page_id`.
    ///
    /// The fetch happens for any identifier, recognized or not; typed
    /// parsing is the caller's concern.
    pub fn fetch_page(&self, page_id: &str) -> Result<String, FetchError> {
        self.fetch_document(page_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn local_source(dir: &TempDir) -> DataSource {
        DataSource::Local {
            dir: dir.path().to_path_buf(),
        }
    }

    #[test]
    fn test_local_fetch_common() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("common.json"),
            r#"{ "siteName": "X", "footerText": "Y", "nav": [] }"#,
        )
        .unwrap();

        let common = local_source(&dir).fetch_common().unwrap();
        assert_eq!(common.site_name, "X");
        assert!(common.nav.is_empty());
    }

    #[test]
    fn test_local_fetch_missing_document() {
        let dir = TempDir::new().unwrap();
        let err = local_source(&dir).fetch_page("home").unwrap_err();
        assert!(matches!(err, FetchError::Io(..)));
    }

    #[test]
    fn test_local_fetch_invalid_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("common.json"), "not json").unwrap();

        let err = local_source(&dir).fetch_common().unwrap_err();
        assert!(matches!(err, FetchError::Json(..)));
    }

    #[test]
    fn test_page_path_templated_from_identifier() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("eventi.json"), r#"{"ok":true}"#).unwrap();

        let raw = local_source(&dir).fetch_page("eventi").unwrap();
        assert_eq!(raw, r#"{"ok":true}"#);
    }
}
