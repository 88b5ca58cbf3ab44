//! Entity snapshot sources.
//!
//! The repository is queried once per session for a full snapshot of
//! non-hidden entities. The snapshot is a JSON array of records; rows the
//! engine cannot interpret are skipped with a warning so one bad row never
//! takes the catalog down.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;
use log::warn;
use passatlas_core::{Entity, Kind, Level, Status, parse_countries};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

/// Default user agent for snapshot requests.
pub const DEFAULT_USER_AGENT: &str = "passatlas-data/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while loading an entity snapshot.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DataSourceError {
    /// The server returned an HTTP error status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Fully qualified request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Short error description supplied by the server.
        message: String,
    },
    /// The request exceeded the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Fully qualified request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The request failed below the HTTP layer.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// Reading a snapshot file failed.
    #[error("failed to read snapshot file {path:?}: {source}")]
    Io {
        /// Location of the snapshot file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The snapshot payload was not a JSON array of entity records.
    #[error("failed to decode entity snapshot: {source}")]
    Decode {
        /// JSON decoding failure.
        #[from]
        source: serde_json::Error,
    },
}

/// Read access to the full set of entities visible at the source.
///
/// A snapshot is a single blocking query, not a stream; it is fetched once
/// per session and treated as immutable afterwards. Loads are not cancelable
/// but are idempotent to retry.
#[async_trait]
pub trait EntitySource: Send + Sync {
    /// Fetch every entity not marked hidden at the source.
    async fn load_visible_entities(&self) -> Result<Vec<Entity>, DataSourceError>;
}

/// Raw snapshot row as served by the repository.
///
/// `coords` pairs are `[latitude, longitude]` in source order; `countries`
/// is a comma-delimited code string.
#[derive(Debug, Deserialize)]
struct RawEntityRecord {
    id: u64,
    name: String,
    status: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coords: Vec<[f64; 2]>,
    #[serde(default)]
    countries: Option<String>,
    #[serde(default)]
    canton: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    level: Option<u8>,
    #[serde(default)]
    opens: Option<String>,
    #[serde(default)]
    closes: Option<String>,
    #[serde(default)]
    hidden: bool,
}

impl RawEntityRecord {
    fn into_entity(self) -> Option<Entity> {
        let status = match self.status.parse::<Status>() {
            Ok(status) => status,
            Err(err) => {
                warn!("Skipped entity {}: {err}", self.id);
                return None;
            }
        };
        let kind = match self.kind.parse::<Kind>() {
            Ok(kind) => kind,
            Err(err) => {
                warn!("Skipped entity {}: {err}", self.id);
                return None;
            }
        };
        let level = self.level.and_then(|value| match Level::new(value) {
            Ok(level) => Some(level),
            Err(err) => {
                warn!("Entity {}: {err}; level dropped", self.id);
                None
            }
        });
        let track = self
            .coords
            .into_iter()
            .map(|[lat, lon]| Coord { x: lon, y: lat })
            .collect();
        Some(Entity {
            id: self.id,
            name: self.name,
            status,
            kind,
            track,
            countries: parse_countries(self.countries.as_deref().unwrap_or_default()),
            canton: self.canton,
            region: self.region,
            level,
            opens: self.opens,
            closes: self.closes,
        })
    }
}

fn decode_snapshot(payload: &str) -> Result<Vec<Entity>, DataSourceError> {
    let records: Vec<RawEntityRecord> = serde_json::from_str(payload)?;
    Ok(records
        .into_iter()
        .filter(|record| !record.hidden)
        .filter_map(RawEntityRecord::into_entity)
        .collect())
}

/// Errors raised while constructing an HTTP source.
#[derive(Debug, Error)]
pub enum SourceBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration for [`HttpEntitySource`].
#[derive(Debug, Clone)]
pub struct HttpEntitySourceConfig {
    /// Fully qualified URL serving the JSON snapshot.
    pub snapshot_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl HttpEntitySourceConfig {
    /// Create a configuration for the given snapshot URL.
    pub fn new(snapshot_url: impl Into<String>) -> Self {
        Self {
            snapshot_url: snapshot_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// HTTP-backed [`EntitySource`] fetching one JSON snapshot per load.
#[derive(Debug)]
pub struct HttpEntitySource {
    client: Client,
    config: HttpEntitySourceConfig,
}

impl HttpEntitySource {
    /// Create a source with default configuration for the given URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(snapshot_url: impl Into<String>) -> Result<Self, SourceBuildError> {
        Self::with_config(HttpEntitySourceConfig::new(snapshot_url))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(config: HttpEntitySourceConfig) -> Result<Self, SourceBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl EntitySource for HttpEntitySource {
    async fn load_visible_entities(&self) -> Result<Vec<Entity>, DataSourceError> {
        let url = self.config.snapshot_url.as_str();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, url, self.config.timeout))?
            .error_for_status()
            .map_err(|err| convert_reqwest_error(&err, url, self.config.timeout))?;
        let payload = response
            .text()
            .await
            .map_err(|err| convert_reqwest_error(&err, url, self.config.timeout))?;
        decode_snapshot(&payload)
    }
}

/// File-backed [`EntitySource`] reading a local snapshot.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Create a source backed by the given snapshot file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl EntitySource for JsonFileSource {
    async fn load_visible_entities(&self) -> Result<Vec<Entity>, DataSourceError> {
        // Snapshot files are small and read once per session; a single
        // blocking read keeps the source dependency-free.
        let payload =
            std::fs::read_to_string(&self.path).map_err(|source| DataSourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        decode_snapshot(&payload)
    }
}

fn convert_reqwest_error(
    error: &reqwest::Error,
    url: &str,
    timeout: Duration,
) -> DataSourceError {
    if error.is_timeout() {
        return DataSourceError::Timeout {
            url: url.to_owned(),
            timeout_secs: timeout.as_secs(),
        };
    }
    if let Some(status) = error.status() {
        return DataSourceError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }
    DataSourceError::Network {
        url: url.to_owned(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SNAPSHOT: &str = r#"[
        {
            "id": 1,
            "name": "Stelvio",
            "status": "open",
            "type": "pass",
            "coords": [[46.528, 10.453], [46.532, 10.462]],
            "countries": "IT, CH",
            "level": 3
        },
        {
            "id": 2,
            "name": "Hidden pass",
            "status": "open",
            "type": "pass",
            "hidden": true
        },
        {
            "id": 3,
            "name": "Mystery",
            "status": "ajar",
            "type": "pass"
        },
        {
            "id": 4,
            "name": "Axenstrasse",
            "status": "open",
            "type": "road",
            "canton": "UR",
            "level": 9
        }
    ]"#;

    #[test]
    fn decode_filters_hidden_and_unparsable_rows() {
        let entities = decode_snapshot(SNAPSHOT).expect("snapshot should decode");
        let ids: Vec<u64> = entities.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn decode_normalises_coordinates_to_lon_lat() {
        let entities = decode_snapshot(SNAPSHOT).expect("snapshot should decode");
        let stelvio = entities.iter().find(|e| e.id == 1).expect("stelvio present");
        assert_eq!(stelvio.track[0], Coord { x: 10.453, y: 46.528 });
    }

    #[test]
    fn decode_normalises_country_strings() {
        let entities = decode_snapshot(SNAPSHOT).expect("snapshot should decode");
        let stelvio = entities.iter().find(|e| e.id == 1).expect("stelvio present");
        let countries: Vec<&str> = stelvio.countries.iter().map(String::as_str).collect();
        assert_eq!(countries, ["CH", "IT"]);
    }

    #[test]
    fn decode_drops_out_of_range_levels() {
        let entities = decode_snapshot(SNAPSHOT).expect("snapshot should decode");
        let road = entities.iter().find(|e| e.id == 4).expect("road present");
        assert_eq!(road.level, None);
        let stelvio = entities.iter().find(|e| e.id == 1).expect("stelvio present");
        assert_eq!(stelvio.level, Level::new(3).ok());
    }

    #[test]
    fn decode_rejects_non_array_payloads() {
        assert!(matches!(
            decode_snapshot("{}"),
            Err(DataSourceError::Decode { .. })
        ));
    }

    #[rstest]
    #[case("[]", 0)]
    #[case(r#"[{"id": 5, "name": "Furka", "status": "closed", "type": "pass"}]"#, 1)]
    fn decode_handles_minimal_payloads(#[case] payload: &str, #[case] expected: usize) {
        let entities = decode_snapshot(payload).expect("payload should decode");
        assert_eq!(entities.len(), expected);
    }

    #[tokio::test]
    async fn file_source_reports_missing_files() {
        let source = JsonFileSource::new("/nonexistent/snapshot.json");
        let err = source
            .load_visible_entities()
            .await
            .expect_err("missing file should fail");
        assert!(matches!(err, DataSourceError::Io { .. }));
    }

    #[tokio::test]
    async fn file_source_loads_a_snapshot() {
        let dir = tempfile::TempDir::new().expect("create temp dir");
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, SNAPSHOT).expect("write snapshot");
        let source = JsonFileSource::new(&path);
        let entities = source
            .load_visible_entities()
            .await
            .expect("snapshot should load");
        assert_eq!(entities.len(), 2);
    }

    #[test]
    fn config_builder_pattern() {
        let config = HttpEntitySourceConfig::new("http://example.com/entities")
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("test-agent/1.0");
        assert_eq!(config.snapshot_url, "http://example.com/entities");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }

    #[test]
    fn http_source_builds_with_defaults() {
        let source = HttpEntitySource::new("http://example.com/entities");
        assert!(source.is_ok());
    }
}
