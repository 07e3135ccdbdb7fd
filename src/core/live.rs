use crate::core::fallback::first_valid_rows;
use crate::core::normalize::{normalize_record, strip_city_suffix, strip_district_suffix};
use crate::domain::model::{LiveLookup, Property, RelayEndpoint};
use crate::domain::ports::{SourceAttempt, SourceConfig};
use crate::utils::error::{CompsError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// 透過公開 CORS 中繼依序抓取實價登錄成交資料。
/// 設定（資料集端點、中繼清單、逾時）建構時注入，測試可換成假清單。
pub struct LiveFetcher<C: SourceConfig> {
    config: C,
    client: Client,
}

impl<C: SourceConfig> LiveFetcher<C> {
    pub fn new(config: C) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// 上游資料集的正規查詢 URL，縣市與行政區先去尾再帶入 query
    fn canonical_url(&self, city: &str, district: &str) -> Result<String> {
        let url = Url::parse_with_params(
            self.config.dataset_endpoint(),
            &[
                ("city", strip_city_suffix(city)),
                ("district", strip_district_suffix(district)),
            ],
        )
        .map_err(|e| CompsError::ConfigError {
            message: format!("Invalid dataset endpoint: {}", e),
        })?;
        Ok(url.to_string())
    }

    /// 依序嘗試每個中繼，第一個回出結構有效 JSON 陣列的勝出（空陣列也算）。
    /// 全部失敗回 Unavailable，不向呼叫端拋錯——查無即時資料是預期的降級路徑。
    pub async fn fetch(&self, city: &str, district: &str) -> LiveLookup {
        let target = match self.canonical_url(city, district) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("📡 Cannot build dataset URL: {}", e);
                return LiveLookup::Unavailable;
            }
        };

        let timeout = self.config.request_timeout();
        let attempts: Vec<Box<dyn SourceAttempt + '_>> = self
            .config
            .relays()
            .iter()
            .map(|relay| {
                Box::new(RelayAttempt {
                    client: &self.client,
                    relay,
                    url: relay.wrap(&target),
                    timeout,
                }) as Box<dyn SourceAttempt + '_>
            })
            .collect();

        match first_valid_rows(&attempts).await {
            Some(rows) => {
                let raw_count = rows.len();
                let comparables: Vec<Property> = rows
                    .iter()
                    .enumerate()
                    .map(|(index, row)| normalize_record(city, index, row))
                    .filter(Property::is_valid_comparable)
                    .collect();
                tracing::info!(
                    "📡 Live lookup for {}{}: {} rows, {} valid comparables",
                    city,
                    district,
                    raw_count,
                    comparables.len()
                );
                LiveLookup::Fetched(comparables)
            }
            None => {
                tracing::warn!(
                    "📡 All {} relays failed for {}{}, no live data",
                    self.config.relays().len(),
                    city,
                    district
                );
                LiveLookup::Unavailable
            }
        }
    }
}

/// 單一中繼的一次請求。逾時只取消這一次嘗試，整體查詢照常前進。
struct RelayAttempt<'a> {
    client: &'a Client,
    relay: &'a RelayEndpoint,
    url: String,
    timeout: Duration,
}

#[async_trait]
impl SourceAttempt for RelayAttempt<'_> {
    fn label(&self) -> &str {
        &self.relay.name
    }

    async fn fetch_rows(&self) -> Result<Vec<Value>> {
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompsError::RelayError {
                relay: self.relay.name.clone(),
                message: format!("HTTP {}", status),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.contains("json") {
            return Err(CompsError::RelayError {
                relay: self.relay.name.clone(),
                message: format!("Unexpected content type '{}'", content_type),
            });
        }

        let body: Value = response.json().await?;
        match body {
            Value::Array(rows) => Ok(rows),
            other => Err(CompsError::RelayError {
                relay: self.relay.name.clone(),
                message: format!("Expected a JSON array, got {}", value_kind(&other)),
            }),
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
