use crate::domain::ports::SourceAttempt;
use serde_json::Value;
use std::time::Instant;

/// 依序嘗試一串資料來源策略，回傳第一個產出結構有效 JSON 陣列的結果。
/// 「結構有效」指回應能解析成陣列，空陣列也算；一旦有策略成功就停止，
/// 不再嘗試後面的策略，也不跨來源合併。全部失敗回 None。
pub async fn first_valid_rows(attempts: &[Box<dyn SourceAttempt + '_>]) -> Option<Vec<Value>> {
    for (index, attempt) in attempts.iter().enumerate() {
        let started = Instant::now();
        tracing::debug!(
            "📡 Trying source {}/{}: {}",
            index + 1,
            attempts.len(),
            attempt.label()
        );

        match attempt.fetch_rows().await {
            Ok(rows) => {
                tracing::info!(
                    "📡 Source '{}' answered with {} rows in {:?}",
                    attempt.label(),
                    rows.len(),
                    started.elapsed()
                );
                return Some(rows);
            }
            Err(e) => {
                tracing::debug!(
                    "📡 Source '{}' failed after {:?}: {}",
                    attempt.label(),
                    started.elapsed(),
                    e
                );
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::{CompsError, Result};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedAttempt<'a> {
        label: String,
        outcome: std::result::Result<Vec<Value>, String>,
        calls: &'a AtomicUsize,
    }

    #[async_trait]
    impl SourceAttempt for ScriptedAttempt<'_> {
        fn label(&self) -> &str {
            &self.label
        }

        async fn fetch_rows(&self) -> Result<Vec<Value>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.outcome {
                Ok(rows) => Ok(rows.clone()),
                Err(message) => Err(CompsError::RelayError {
                    relay: self.label.clone(),
                    message: message.clone(),
                }),
            }
        }
    }

    fn attempt<'a>(
        label: &str,
        outcome: std::result::Result<Vec<Value>, &str>,
        calls: &'a AtomicUsize,
    ) -> Box<dyn SourceAttempt + 'a> {
        Box::new(ScriptedAttempt {
            label: label.to_string(),
            outcome: outcome.map_err(|m| m.to_string()),
            calls,
        })
    }

    #[test]
    fn test_first_success_wins_and_later_attempts_untouched() {
        let c1 = AtomicUsize::new(0);
        let c2 = AtomicUsize::new(0);
        let c3 = AtomicUsize::new(0);
        let attempts = vec![
            attempt("relay-1", Err("HTTP 502"), &c1),
            attempt("relay-2", Ok(vec![json!({"編號": "A"})]), &c2),
            attempt("relay-3", Ok(vec![]), &c3),
        ];

        let rows = tokio_test::block_on(first_valid_rows(&attempts)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(c1.load(Ordering::SeqCst), 1);
        assert_eq!(c2.load(Ordering::SeqCst), 1);
        // 第三個策略絕不能被碰到
        assert_eq!(c3.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_array_counts_as_valid() {
        let c1 = AtomicUsize::new(0);
        let c2 = AtomicUsize::new(0);
        let attempts = vec![
            attempt("relay-1", Ok(vec![]), &c1),
            attempt("relay-2", Ok(vec![json!({"編號": "B"})]), &c2),
        ];

        let rows = tokio_test::block_on(first_valid_rows(&attempts)).unwrap();
        assert!(rows.is_empty());
        assert_eq!(c2.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_all_failures_yield_none() {
        let c1 = AtomicUsize::new(0);
        let c2 = AtomicUsize::new(0);
        let attempts = vec![
            attempt("relay-1", Err("timeout"), &c1),
            attempt("relay-2", Err("not an array"), &c2),
        ];

        assert!(tokio_test::block_on(first_valid_rows(&attempts)).is_none());
        assert_eq!(c1.load(Ordering::SeqCst), 1);
        assert_eq!(c2.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_no_attempts_is_none() {
        let attempts: Vec<Box<dyn SourceAttempt>> = Vec::new();
        assert!(tokio_test::block_on(first_valid_rows(&attempts)).is_none());
    }
}
