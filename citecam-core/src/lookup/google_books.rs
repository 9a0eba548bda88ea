//! Google Books volumes API client
//!
//! API docs: https://developers.google.com/books/docs/v1/using
//!
//! Failure classification:
//! - transport errors (connect, DNS, TLS, timeout, body read): `NetworkUnavailable`
//! - HTTP 408, 429 and 5xx: `NetworkUnavailable`
//! - any other non-2xx status: `MalformedResponse`
//! - 2xx with a body that is not the expected JSON object: `MalformedResponse`
//! - 2xx JSON without `items`, or with an empty `items`: `NotFound`

use super::{BookLookup, BookMatch, Cover};
use crate::config::Config;
use crate::error::{CiteCamError, LookupError};
use crate::types::{extract_year, BibliographicRecord, Isbn};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Default volumes endpoint
pub const GOOGLE_BOOKS_VOLUMES_URL: &str = "https://www.googleapis.com/books/v1/volumes";

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Option<Vec<Volume>>,
}

#[derive(Debug, Deserialize)]
struct Volume {
    #[serde(rename = "volumeInfo", default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    publisher: Option<String>,
    published_date: Option<String>,
    image_links: Option<ImageLinks>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageLinks {
    small_thumbnail: Option<String>,
    thumbnail: Option<String>,
}

/// Parse a volumes search response into the record of its first match
pub fn parse_volumes_response(json: &str) -> Result<BibliographicRecord, LookupError> {
    let response: VolumesResponse = serde_json::from_str(json)
        .map_err(|e| LookupError::MalformedResponse(format!("Invalid volumes JSON: {}", e)))?;

    let volume = response
        .items
        .and_then(|items| items.into_iter().next())
        .ok_or(LookupError::NotFound)?;

    let info = volume.volume_info;
    let cover_image_ref = info
        .image_links
        .and_then(|links| links.small_thumbnail.or(links.thumbnail));

    Ok(BibliographicRecord {
        title: info.title,
        authors: info.authors,
        publisher: info.publisher,
        published_year: info
            .published_date
            .as_deref()
            .and_then(extract_year)
            .map(str::to_string),
        cover_image_ref,
    })
}

/// Lookup client backed by the Google Books volumes API
pub struct GoogleBooksClient {
    client: Client,
    endpoint: String,
    cover_timeout: Duration,
}

impl GoogleBooksClient {
    /// Create a client for `endpoint` with a per-request timeout
    ///
    /// The metadata query and the cover download are each bounded by
    /// `timeout`, so a whole lookup takes at most twice that.
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, CiteCamError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| CiteCamError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            cover_timeout: timeout,
        })
    }

    /// Create a client from runtime configuration
    pub fn from_config(config: &Config) -> Result<Self, CiteCamError> {
        Self::new(
            config.lookup_endpoint.clone(),
            config.lookup_timeout,
            &config.user_agent,
        )
    }

    /// Cover downloads are bounded separately and fall back to the placeholder
    async fn fetch_cover(&self, url: Option<&str>) -> Cover {
        let Some(url) = url else {
            return Cover::Placeholder;
        };

        match tokio::time::timeout(self.cover_timeout, self.download_cover(url)).await {
            Ok(cover) => cover,
            Err(_) => {
                tracing::warn!(%url, timeout = ?self.cover_timeout, "cover fetch timed out, using placeholder");
                Cover::Placeholder
            }
        }
    }

    async fn download_cover(&self, url: &str) -> Cover {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%url, error = %e, "cover fetch failed, using placeholder");
                return Cover::Placeholder;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(%url, status = %response.status(), "cover fetch failed, using placeholder");
            return Cover::Placeholder;
        }

        match response.bytes().await {
            Ok(bytes) if !bytes.is_empty() => Cover::Fetched(bytes.to_vec()),
            Ok(_) => {
                tracing::warn!(%url, "empty cover image, using placeholder");
                Cover::Placeholder
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "cover download interrupted, using placeholder");
                Cover::Placeholder
            }
        }
    }
}

fn classify_status(status: StatusCode) -> LookupError {
    if status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
    {
        LookupError::NetworkUnavailable(format!("HTTP {}", status))
    } else {
        LookupError::MalformedResponse(format!("unexpected HTTP status {}", status))
    }
}

#[async_trait]
impl BookLookup for GoogleBooksClient {
    async fn lookup(&self, isbn: &Isbn) -> Result<BookMatch, LookupError> {
        let query = format!("isbn:{}", isbn);
        tracing::debug!(%isbn, endpoint = %self.endpoint, "querying volumes");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query.as_str())])
            .send()
            .await
            .map_err(|e| LookupError::NetworkUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::NetworkUnavailable(e.to_string()))?;

        let record = parse_volumes_response(&body)?;
        let cover = self.fetch_cover(record.cover_image_ref.as_deref()).await;

        Ok(BookMatch::new(record, cover))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESPONSE: &str = r#"{
        "kind": "books#volumes",
        "totalItems": 1,
        "items": [{
            "volumeInfo": {
                "title": "Systems Design",
                "authors": ["Jane Q. Public", "John Smith"],
                "publisher": "Acme Press",
                "publishedDate": "2001-05-01",
                "imageLinks": {
                    "smallThumbnail": "http://books.example/small.jpg",
                    "thumbnail": "http://books.example/large.jpg"
                }
            }
        }]
    }"#;

    #[test]
    fn test_parse_first_match() {
        let record = parse_volumes_response(SAMPLE_RESPONSE).unwrap();
        assert_eq!(record.title.as_deref(), Some("Systems Design"));
        assert_eq!(record.authors, vec!["Jane Q. Public", "John Smith"]);
        assert_eq!(record.publisher.as_deref(), Some("Acme Press"));
        assert_eq!(record.published_year.as_deref(), Some("2001"));
        assert_eq!(
            record.cover_image_ref.as_deref(),
            Some("http://books.example/small.jpg")
        );
    }

    #[test]
    fn test_missing_fields_stay_empty() {
        let record =
            parse_volumes_response(r#"{"items": [{"volumeInfo": {"title": "Bare"}}, {}]}"#)
                .unwrap();
        assert_eq!(record.title.as_deref(), Some("Bare"));
        assert!(record.authors.is_empty());
        assert!(record.publisher.is_none());
        assert!(record.published_year.is_none());
        assert!(record.cover_image_ref.is_none());
    }

    #[test]
    fn test_thumbnail_fallback() {
        let record = parse_volumes_response(
            r#"{"items": [{"volumeInfo": {"imageLinks": {"thumbnail": "http://x/t.jpg"}}}]}"#,
        )
        .unwrap();
        assert_eq!(record.cover_image_ref.as_deref(), Some("http://x/t.jpg"));
    }

    #[test]
    fn test_no_items_is_not_found() {
        assert_eq!(
            parse_volumes_response(r#"{"kind": "books#volumes", "totalItems": 0}"#),
            Err(LookupError::NotFound)
        );
        assert_eq!(
            parse_volumes_response(r#"{"items": []}"#),
            Err(LookupError::NotFound)
        );
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(
            parse_volumes_response("<html>captive portal</html>"),
            Err(LookupError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_volumes_response(r#"[1, 2, 3]"#),
            Err(LookupError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_status_classification() {
        assert!(classify_status(StatusCode::SERVICE_UNAVAILABLE).is_recoverable());
        assert!(classify_status(StatusCode::TOO_MANY_REQUESTS).is_recoverable());
        assert!(classify_status(StatusCode::REQUEST_TIMEOUT).is_recoverable());
        assert!(matches!(
            classify_status(StatusCode::BAD_REQUEST),
            LookupError::MalformedResponse(_)
        ));
    }
}
