use crate::domain::model::RelayEndpoint;
use crate::domain::ports::SourceConfig;
use crate::utils::error::{CompsError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: SourceSection,
    #[serde(default)]
    pub relays: Vec<RelayEndpoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CompsError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CompsError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LVR_ENDPOINT})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        // 使用正規表達式匹配 ${VAR_NAME} 格式
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("source.endpoint", &self.source.endpoint)?;

        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_range("source.timeout_seconds", timeout, 1, 300)?;
        }

        validation::validate_positive_number("relays", self.relays.len(), 1)?;
        for relay in &self.relays {
            validation::validate_non_empty_string("relays.name", &relay.name)?;
            validation::validate_relay_template("relays.template", &relay.template)?;
        }

        Ok(())
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }
}

impl Default for TomlConfig {
    /// 內建預設：實價登錄查詢端點與四個公開中繼，依可靠度排序
    fn default() -> Self {
        Self {
            source: SourceSection {
                endpoint: "https://lvr.land.moi.gov.tw/jsp/api/transactions".to_string(),
                timeout_seconds: Some(DEFAULT_TIMEOUT_SECONDS),
            },
            relays: vec![
                RelayEndpoint::new(
                    "allorigins",
                    "https://api.allorigins.win/raw?url={url}",
                    true,
                ),
                RelayEndpoint::new("corsproxy", "https://corsproxy.io/?url={url}", true),
                RelayEndpoint::new(
                    "codetabs",
                    "https://api.codetabs.com/v1/proxy?quest={url}",
                    false,
                ),
                RelayEndpoint::new(
                    "thingproxy",
                    "https://thingproxy.freeboard.io/fetch/{url}",
                    false,
                ),
            ],
        }
    }
}

impl SourceConfig for TomlConfig {
    fn dataset_endpoint(&self) -> &str {
        &self.source.endpoint
    }

    fn relays(&self) -> &[RelayEndpoint] {
        &self.relays
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
