//! Free-text place lookup against an external geocoding service.
//!
//! The wire shape follows the Nominatim search API: one GET with the query,
//! an address-detail flag, and a result-count limit, answered by an array of
//! candidates whose coordinates arrive as strings.

use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;
use log::warn;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::source::SourceBuildError;

/// Public Nominatim endpoint used when no override is configured.
pub const DEFAULT_GEOCODER_ENDPOINT: &str = "https://nominatim.openstreetmap.org";

/// Default user agent for geocoding requests.
const DEFAULT_USER_AGENT: &str = "passatlas-data/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// A formatted place returned by the geocoder.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceCandidate {
    /// Stable identifier, suitable as a list key.
    pub place_id: u64,
    /// Full formatted display name.
    pub display_name: String,
    /// WGS84 location, `x = longitude`, `y = latitude`.
    pub location: Coord<f64>,
}

impl PlaceCandidate {
    /// Compact form of the display name for dense result lists.
    pub fn compact_display_name(&self) -> String {
        compact_display_name(&self.display_name)
    }
}

/// Drop the second and fourth comma-separated components of a display name.
///
/// Nominatim display names repeat the house-number and postcode groups
/// there; the compact form reads better in a result list.
///
/// # Examples
/// ```
/// use passatlas_data::compact_display_name;
///
/// let full = "Andermatt, 12, Gotthardstrasse, 6490, Uri, Schweiz";
/// assert_eq!(
///     compact_display_name(full),
///     "Andermatt, Gotthardstrasse, Uri, Schweiz"
/// );
/// ```
pub fn compact_display_name(display_name: &str) -> String {
    display_name
        .split(',')
        .enumerate()
        .filter(|(index, _)| *index != 1 && *index != 3)
        .map(|(_, part)| part)
        .collect::<Vec<_>>()
        .join(",")
}

/// Errors raised by a geocoding lookup.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GeocodeError {
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
    /// The response payload was not a candidate array.
    #[error("failed to decode geocoder response: {source}")]
    Decode {
        /// JSON decoding failure.
        #[from]
        source: serde_json::Error,
    },
    /// The request was aborted before completion.
    ///
    /// Not a failure: the search controller discards superseded requests
    /// silently instead of reporting them.
    #[error("request was cancelled before completion")]
    Cancelled,
}

impl GeocodeError {
    /// Whether this error came from cancellation rather than a real failure.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Free-text place lookup.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve up to `limit` candidates for `query`.
    async fn search(&self, query: &str, limit: usize)
    -> Result<Vec<PlaceCandidate>, GeocodeError>;
}

/// Raw candidate row as served by the geocoder.
///
/// Coordinates arrive as decimal strings.
#[derive(Debug, Deserialize)]
struct RawPlace {
    place_id: u64,
    display_name: String,
    lat: String,
    lon: String,
}

impl RawPlace {
    fn into_candidate(self) -> Option<PlaceCandidate> {
        let lat = self.lat.parse::<f64>().ok().filter(|v| v.is_finite());
        let lon = self.lon.parse::<f64>().ok().filter(|v| v.is_finite());
        let (Some(lat), Some(lon)) = (lat, lon) else {
            warn!(
                "Skipped place candidate {}: unparsable coordinates ({}, {})",
                self.place_id, self.lat, self.lon
            );
            return None;
        };
        Some(PlaceCandidate {
            place_id: self.place_id,
            display_name: self.display_name,
            location: Coord { x: lon, y: lat },
        })
    }
}

/// Configuration for [`NominatimGeocoder`].
#[derive(Debug, Clone)]
pub struct NominatimGeocoderConfig {
    /// Base URL of the geocoding service.
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for NominatimGeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEOCODER_ENDPOINT.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl NominatimGeocoderConfig {
    /// Create a configuration with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
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

/// HTTP [`Geocoder`] speaking the Nominatim search protocol.
#[derive(Debug)]
pub struct NominatimGeocoder {
    client: Client,
    config: NominatimGeocoderConfig,
}

impl NominatimGeocoder {
    /// Create a geocoder against the public endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new() -> Result<Self, SourceBuildError> {
        Self::with_config(NominatimGeocoderConfig::default())
    }

    /// Create a geocoder with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(config: NominatimGeocoderConfig) -> Result<Self, SourceBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Build the search URL for the given query and limit.
    fn build_search_url(&self, query: &str, limit: usize) -> Result<Url, GeocodeError> {
        let base = self.config.base_url.trim_end_matches('/');
        let mut url =
            Url::parse(&format!("{base}/search")).map_err(|err| GeocodeError::Network {
                url: self.config.base_url.clone(),
                message: err.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", query)
            .append_pair("addressdetails", "1")
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> GeocodeError {
        if error.is_timeout() {
            return GeocodeError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }
        if let Some(status) = error.status() {
            return GeocodeError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }
        GeocodeError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<PlaceCandidate>, GeocodeError> {
        let url = self.build_search_url(query, limit)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url.as_str()))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url.as_str()))?;
        let payload = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url.as_str()))?;
        let raw: Vec<RawPlace> = serde_json::from_str(&payload)?;
        Ok(raw
            .into_iter()
            .filter_map(RawPlace::into_candidate)
            .take(limit)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn geocoder(base_url: &str) -> NominatimGeocoder {
        NominatimGeocoder::with_config(NominatimGeocoderConfig::new(base_url))
            .expect("geocoder should build")
    }

    #[test]
    fn build_search_url_includes_the_protocol_parameters() {
        let url = geocoder("https://nominatim.example.org")
            .build_search_url("andermatt", 5)
            .expect("url should build");
        assert_eq!(
            url.as_str(),
            "https://nominatim.example.org/search?format=json&q=andermatt&addressdetails=1&limit=5"
        );
    }

    #[test]
    fn build_search_url_percent_encodes_the_query() {
        let url = geocoder("https://nominatim.example.org")
            .build_search_url("col du grand st-bernard", 5)
            .expect("url should build");
        assert!(url.as_str().contains("q=col+du+grand+st-bernard"));
    }

    #[test]
    fn build_search_url_strips_trailing_slashes() {
        let url = geocoder("https://nominatim.example.org/")
            .build_search_url("andermatt", 5)
            .expect("url should build");
        assert!(!url.as_str().contains("//search"));
    }

    #[test]
    fn raw_place_parses_string_coordinates() {
        let raw = RawPlace {
            place_id: 42,
            display_name: "Andermatt, Uri".into(),
            lat: "46.6356".into(),
            lon: "8.5939".into(),
        };
        let candidate = raw.into_candidate().expect("coordinates should parse");
        assert_eq!(candidate.location, Coord { x: 8.5939, y: 46.6356 });
    }

    #[rstest]
    #[case("not-a-number", "8.5939")]
    #[case("46.6356", "")]
    #[case("NaN", "8.5939")]
    fn raw_place_skips_unparsable_coordinates(#[case] lat: &str, #[case] lon: &str) {
        let raw = RawPlace {
            place_id: 42,
            display_name: "Broken".into(),
            lat: lat.into(),
            lon: lon.into(),
        };
        assert_eq!(raw.into_candidate(), None);
    }

    #[rstest]
    #[case(
        "Andermatt, 12, Gotthardstrasse, 6490, Uri, Schweiz",
        "Andermatt, Gotthardstrasse, Uri, Schweiz"
    )]
    #[case("Andermatt", "Andermatt")]
    #[case("A, B", "A")]
    fn compact_display_name_drops_noise_components(#[case] full: &str, #[case] expected: &str) {
        assert_eq!(compact_display_name(full), expected);
    }

    #[test]
    fn cancellation_is_distinguished_from_failures() {
        assert!(GeocodeError::Cancelled.is_cancellation());
        let failure = GeocodeError::Network {
            url: "https://nominatim.example.org".into(),
            message: "connection refused".into(),
        };
        assert!(!failure.is_cancellation());
    }

    #[test]
    fn decode_errors_surface_as_decode() {
        let err = serde_json::from_str::<Vec<RawPlace>>("{}").expect_err("object is not an array");
        assert!(GeocodeError::from(err).to_string().contains("decode"));
    }
}
