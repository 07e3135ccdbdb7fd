use crate::domain::model::RelayEndpoint;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// 即時抓取元件在建構時注入的設定來源，測試可替換成假的中繼清單
pub trait SourceConfig: Send + Sync {
    fn dataset_endpoint(&self) -> &str;
    fn relays(&self) -> &[RelayEndpoint];
    fn request_timeout(&self) -> Duration;
}

/// 依序嘗試的資料來源策略。回傳結構有效的 JSON 陣列（可為空）即視為成功，
/// 任何失敗以 Err 表達，由組合器決定是否前進到下一個策略。
#[async_trait]
pub trait SourceAttempt: Send + Sync {
    fn label(&self) -> &str;
    async fn fetch_rows(&self) -> Result<Vec<serde_json::Value>>;
}
