// Firebase Realtime Database repository implementation
use crate::application::telemetry_repository::TelemetryRepository;
use crate::domain::telemetry::TelemetrySample;
use crate::error::RepositoryError;
use async_trait::async_trait;
use serde::de::Error as _;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct FirebaseRepository {
    client: reqwest::Client,
    url: String,
    path: String,
    auth_token: Option<String>,
}

impl FirebaseRepository {
    pub fn new(url: String, path: String, auth_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.trim_end_matches('/').to_string(),
            path: path.trim_matches('/').to_string(),
            auth_token,
        }
    }

    /// REST query ordered by the `timestamp` child, e.g.
    /// `{url}/solar_telemetry.json?orderBy="timestamp"&startAt=1700000000`
    fn build_query_url(&self, filter: &str) -> String {
        let mut url = format!(
            "{}/{}.json?orderBy={}&{}",
            self.url,
            self.path,
            urlencoding::encode("\"timestamp\""),
            filter
        );
        if let Some(token) = &self.auth_token {
            url.push_str("&auth=");
            url.push_str(&urlencoding::encode(token));
        }
        url
    }

    async fn execute_query(&self, filter: &str) -> Result<Vec<TelemetrySample>, RepositoryError> {
        let url = self.build_query_url(filter);
        tracing::debug!("Querying telemetry store: {}/{}.json?{}", self.url, self.path, filter);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::Upstream { status, body });
        }

        let body = response.text().await?;
        decode_snapshot(&body)
    }
}

/// Decode a snapshot body: an object keyed by push id, an array when the
/// store holds sequential integer keys, or `null` when empty.
///
/// Entries that are not objects are dropped with a warning rather than
/// failing the whole snapshot. Array holes (`null`) are skipped silently.
pub fn decode_snapshot(body: &str) -> Result<Vec<TelemetrySample>, RepositoryError> {
    let entries: Vec<(String, Value)> = match serde_json::from_str::<Value>(body)? {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map.into_iter().collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter(|(_, value)| !value.is_null())
            .map(|(index, value)| (index.to_string(), value))
            .collect(),
        other => {
            return Err(RepositoryError::Decode(serde_json::Error::custom(format!(
                "unexpected snapshot root: {}",
                other
            ))));
        }
    };

    let mut samples = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        match serde_json::from_value::<TelemetrySample>(value) {
            Ok(sample) => samples.push(sample),
            Err(e) => tracing::warn!("Dropping malformed telemetry record {}: {}", key, e),
        }
    }
    Ok(samples)
}

#[async_trait]
impl TelemetryRepository for FirebaseRepository {
    async fn fetch_since(&self, since: i64) -> Result<Vec<TelemetrySample>, RepositoryError> {
        let samples = self.execute_query(&format!("startAt={}", since)).await?;
        tracing::debug!("Fetched {} samples since {}", samples.len(), since);
        Ok(samples)
    }

    async fn fetch_latest(&self, limit: usize) -> Result<Vec<TelemetrySample>, RepositoryError> {
        self.execute_query(&format!("limitToLast={}", limit)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_url() {
        let repo = FirebaseRepository::new(
            "https://solar.example.firebaseio.com/".to_string(),
            "/solar_telemetry".to_string(),
            None,
        );
        assert_eq!(
            repo.build_query_url("startAt=100"),
            "https://solar.example.firebaseio.com/solar_telemetry.json?orderBy=%22timestamp%22&startAt=100"
        );
    }

    #[test]
    fn test_build_query_url_with_auth() {
        let repo = FirebaseRepository::new(
            "https://solar.example.firebaseio.com".to_string(),
            "solar_telemetry".to_string(),
            Some("a/b".to_string()),
        );
        assert!(repo.build_query_url("limitToLast=1").ends_with("&limitToLast=1&auth=a%2Fb"));
    }

    #[test]
    fn test_decode_null_snapshot() {
        assert!(decode_snapshot("null").unwrap().is_empty());
    }

    #[test]
    fn test_decode_snapshot_tolerates_dirty_records() {
        let body = r#"{
            "-Nx1": { "timestamp": 1700000000, "dc_power_w": 4.5, "panel_temp_c": null },
            "-Nx2": { "dc_power_w": "n/a" },
            "-Nx3": 42
        }"#;
        let mut samples = decode_snapshot(body).unwrap();
        samples.sort_by_key(|s| s.timestamp);

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].timestamp, None);
        assert_eq!(samples[0].dc_power_w, None);
        assert_eq!(samples[1].timestamp, Some(1_700_000_000));
        assert_eq!(samples[1].dc_power_w, Some(4.5));
    }

    #[test]
    fn test_decode_rejects_non_json() {
        assert!(matches!(decode_snapshot("<html>"), Err(RepositoryError::Decode(_))));
    }

    #[test]
    fn test_decode_array_snapshot() {
        let body = r#"[null, { "timestamp": 100, "dc_power_w": 2.0 }, null, { "timestamp": 200, "dc_power_w": "3.5" }, "junk"]"#;
        let samples = decode_snapshot(body).unwrap();

        let timestamps: Vec<Option<i64>> = samples.iter().map(|s| s.timestamp).collect();
        assert_eq!(timestamps, vec![Some(100), Some(200)]);
        assert_eq!(samples[1].dc_power_w, Some(3.5));
    }

    #[test]
    fn test_decode_rejects_scalar_root() {
        assert!(matches!(decode_snapshot("42"), Err(RepositoryError::Decode(_))));
    }
}
