use async_trait::async_trait;
use std::time::Duration;

use super::overpass_dto::parse_overpass_json;
use crate::common::{DomainError, DomainResult};
use crate::config::OverpassConfig;
use crate::domains::placement::{GeoPoint, MapDataSource, MapElement};

/// Map data source backed by an Overpass API endpoint.
///
/// One POST per fetch, bounded by the configured timeout. Errors are returned
/// to the caller; the placement engine decides how to degrade.
pub struct OverpassMapSource {
    client: reqwest::Client,
    url: String,
    timeout_secs: u64,
}

impl OverpassMapSource {
    pub fn new(config: &OverpassConfig) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| DomainError::InfrastructureError(format!("http client init failed: {}", e)))?;
        Ok(Self {
            client,
            url: config.url.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// All ways, relations and nodes in the box, then the nodes the ways need.
    pub fn build_query(&self, center: GeoPoint, radius_deg: f64) -> String {
        let (s, w, n, e) = (
            center.lat - radius_deg,
            center.lon - radius_deg,
            center.lat + radius_deg,
            center.lon + radius_deg,
        );
        format!(
            "[out:json][timeout:{t}];\n(\n  way({s},{w},{n},{e});\n  relation({s},{w},{n},{e});\n  node({s},{w},{n},{e});\n);\nout body;\n>;\nout skel qt;\n",
            t = self.timeout_secs,
            s = s,
            w = w,
            n = n,
            e = e,
        )
    }
}

#[async_trait]
impl MapDataSource for OverpassMapSource {
    async fn fetch_elements(&self, center: GeoPoint, radius_deg: f64) -> DomainResult<Vec<MapElement>> {
        let query = self.build_query(center, radius_deg);
        let response = self
            .client
            .post(&self.url)
            .form(&[("data", query)])
            .send()
            .await
            .map_err(|e| DomainError::DataSource(format!("{}: request failed: {}", self.url, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::DataSource(format!("{}: response read failed: {}", self.url, e)))?;
        if !status.is_success() {
            let snippet: String = body.chars().take(256).collect();
            return Err(DomainError::DataSource(format!(
                "{}: HTTP {}: {}",
                self.url, status, snippet
            )));
        }

        parse_overpass_json(&body)
    }
}
