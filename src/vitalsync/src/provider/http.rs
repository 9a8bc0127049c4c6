use std::{collections::HashSet, time::Duration};

use anyhow::Context;
use reqwest::StatusCode;
use serde::{Deserialize, de::DeserializeOwned};
use vitalsync_types::{HeartRateRecord, RecordType, SleepSession, SyncWindow};

use crate::{ProviderError, RecordProvider};

const HEART_RATE_PAGE_SIZE: u32 = 1000;
const SLEEP_SESSION_PAGE_SIZE: u32 = 100;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct RecordPage<T> {
    records: Vec<T>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Health data REST API reached with a bearer token.
///
/// Records are read from `GET {base}/v1/records/{record_type}` one page at a
/// time until the server stops returning a `next_page_token`. A token handed
/// out twice fails the read.
pub struct HttpRecordProvider {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpRecordProvider {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn page_size(record_type: RecordType) -> u32 {
        match record_type {
            RecordType::HeartRate => HEART_RATE_PAGE_SIZE,
            RecordType::SleepSession => SLEEP_SESSION_PAGE_SIZE,
        }
    }

    async fn read_records<T>(
        &self,
        record_type: RecordType,
        window: SyncWindow,
    ) -> Result<Vec<T>, ProviderError>
    where
        T: DeserializeOwned + Send,
    {
        let url = format!("{}/v1/records/{}", self.base_url, record_type);
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();
        let mut pages = 0usize;

        loop {
            let mut request = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .query(&[
                    ("start", window.start.to_rfc3339()),
                    ("end", window.end.to_rfc3339()),
                    ("page_size", Self::page_size(record_type).to_string()),
                ]);
            if let Some(token) = &page_token {
                request = request.query(&[("page_token", token)]);
            }

            let resp = request
                .send()
                .await
                .map_err(|e| ProviderError::read(record_type, e))?;

            let status = resp.status();
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(ProviderError::PermissionDenied(record_type));
            }
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(ProviderError::read(record_type, format!("{status}: {body}")));
            }

            let page: RecordPage<T> = resp
                .json()
                .await
                .map_err(|e| ProviderError::read(record_type, e))?;
            records.extend(page.records);
            pages += 1;

            match page.next_page_token {
                Some(token) if !token.is_empty() => {
                    if !seen_tokens.insert(token.clone()) {
                        return Err(ProviderError::read(
                            record_type,
                            format!("server repeated page token {token:?} after {pages} pages"),
                        ));
                    }
                    page_token = Some(token);
                }
                _ => break,
            }
        }

        debug!(
            "Read {} {} records in {} pages",
            records.len(),
            record_type,
            pages
        );
        Ok(records)
    }
}

impl RecordProvider for HttpRecordProvider {
    async fn is_available(&self) -> bool {
        let resp = self
            .client
            .get(format!("{}/v1/status", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await;

        match resp {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!("Health data API status check returned {}", resp.status());
                false
            }
            Err(e) => {
                warn!("Health data API unreachable: {e}");
                false
            }
        }
    }

    async fn fetch_heart_rate(
        &self,
        window: SyncWindow,
    ) -> Result<Vec<HeartRateRecord>, ProviderError> {
        self.read_records(RecordType::HeartRate, window).await
    }

    async fn fetch_sleep_sessions(
        &self,
        window: SyncWindow,
    ) -> Result<Vec<SleepSession>, ProviderError> {
        self.read_records(RecordType::SleepSession, window).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};
    use mockito::Matcher;

    fn window() -> SyncWindow {
        let end = Utc.with_ymd_and_hms(2025, 1, 2, 12, 0, 0).unwrap();
        SyncWindow {
            start: end - TimeDelta::hours(24),
            end,
        }
    }

    #[tokio::test]
    async fn status_endpoint_decides_availability() {
        let mut server = mockito::Server::new_async().await;
        let status = server
            .mock("GET", "/v1/status")
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .create_async()
            .await;

        let provider = HttpRecordProvider::new(server.url(), "secret").unwrap();
        assert!(provider.is_available().await);
        status.assert_async().await;
    }

    #[tokio::test]
    async fn failing_status_is_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/status")
            .with_status(503)
            .create_async()
            .await;

        let provider = HttpRecordProvider::new(server.url(), "secret").unwrap();
        assert!(!provider.is_available().await);
    }

    #[tokio::test]
    async fn follows_page_tokens() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", "/v1/records/heart_rate")
            .match_query(Matcher::Regex("page_size=1000$".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"records":[{"start":"2025-01-02T08:00:00Z","end":"2025-01-02T08:01:00Z",
                    "samples":[{"time":"2025-01-02T08:00:00Z","bpm":61}]}],
                    "next_page_token":"p2"}"#,
            )
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("GET", "/v1/records/heart_rate")
            .match_query(Matcher::Regex("page_token=p2".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"records":[{"start":"2025-01-02T09:00:00Z","end":"2025-01-02T09:01:00Z",
                    "samples":[{"time":"2025-01-02T09:00:00Z","bpm":66},
                               {"time":"2025-01-02T09:00:30Z","bpm":67}]}]}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let provider = HttpRecordProvider::new(server.url(), "secret").unwrap();
        let records = provider.fetch_heart_rate(window()).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].samples.len(), 2);
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn sleep_sessions_use_smaller_pages() {
        let mut server = mockito::Server::new_async().await;
        let page = server
            .mock("GET", "/v1/records/sleep_session")
            .match_query(Matcher::Regex("page_size=100$".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"records":[]}"#)
            .expect(1)
            .create_async()
            .await;

        let provider = HttpRecordProvider::new(server.url(), "secret").unwrap();
        assert!(provider.fetch_sleep_sessions(window()).await.unwrap().is_empty());
        page.assert_async().await;
    }

    #[tokio::test]
    async fn repeated_page_token_stops_paging() {
        let mut server = mockito::Server::new_async().await;
        let pages = server
            .mock("GET", "/v1/records/heart_rate")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"records":[],"next_page_token":"same"}"#)
            .expect(2)
            .create_async()
            .await;

        let provider = HttpRecordProvider::new(server.url(), "secret").unwrap();
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            provider.fetch_heart_rate(window()),
        )
        .await
        .expect("paging should stop on a repeated token");

        let err = result.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Read {
                record_type: RecordType::HeartRate,
                ..
            }
        ));
        assert!(err.to_string().contains("repeated page token"));
        pages.assert_async().await;
    }

    #[tokio::test]
    async fn forbidden_is_permission_denied() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/records/sleep_session")
            .match_query(Matcher::Any)
            .with_status(403)
            .create_async()
            .await;

        let provider = HttpRecordProvider::new(server.url(), "secret").unwrap();
        let err = provider.fetch_sleep_sessions(window()).await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::PermissionDenied(RecordType::SleepSession)
        ));
    }

    #[tokio::test]
    async fn server_error_is_a_read_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/records/sleep_session")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let provider = HttpRecordProvider::new(server.url(), "secret").unwrap();
        let err = provider.fetch_sleep_sessions(window()).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
