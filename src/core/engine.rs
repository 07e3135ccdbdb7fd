use crate::core::live::LiveFetcher;
use crate::core::local::LocalProvider;
use crate::domain::model::{LiveLookup, Property};
use crate::domain::ports::SourceConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// 一次查詢最終採用的資料來源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompsOrigin {
    Bundled,
    Live,
}

/// 一次完整查詢的結果，交給報告層呈現或序列化
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gathered {
    pub city: String,
    pub district: String,
    pub comparables: Vec<Property>,
    pub origin: CompsOrigin,
    pub fetched_at: DateTime<Utc>,
}

/// 查詢流程的編排：先同步取內建資料，再跑即時抓取；
/// 即時結果只要結構有效（過濾後空集也算）就取代內建清單。
/// 引擎本身無跨查詢狀態，並行呼叫各自獨立跑完整條中繼鏈。
pub struct CompsEngine<C: SourceConfig> {
    local: LocalProvider,
    fetcher: Option<LiveFetcher<C>>,
}

impl<C: SourceConfig> CompsEngine<C> {
    pub fn new(local: LocalProvider, fetcher: LiveFetcher<C>) -> Self {
        Self {
            local,
            fetcher: Some(fetcher),
        }
    }

    /// 只用內建資料，完全不打即時查詢
    pub fn local_only(local: LocalProvider) -> Self {
        Self {
            local,
            fetcher: None,
        }
    }

    pub async fn gather(&self, city: &str, district: &str) -> Gathered {
        let bundled = self.local.lookup(city, district);
        tracing::info!(
            "📦 Bundled comparables for {}{}: {}",
            city,
            district,
            bundled.len()
        );

        let (comparables, origin) = match &self.fetcher {
            Some(fetcher) => match fetcher.fetch(city, district).await {
                LiveLookup::Fetched(live) => {
                    tracing::info!(
                        "✅ Live data supersedes bundled list ({} comparables)",
                        live.len()
                    );
                    (live, CompsOrigin::Live)
                }
                LiveLookup::Unavailable => {
                    tracing::info!("📦 No live data, keeping bundled comparables");
                    (bundled, CompsOrigin::Bundled)
                }
            },
            None => (bundled, CompsOrigin::Bundled),
        };

        Gathered {
            city: city.to_string(),
            district: district.to_string(),
            comparables,
            origin,
            fetched_at: Utc::now(),
        }
    }
}
