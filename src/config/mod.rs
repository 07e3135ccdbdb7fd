pub mod toml_config;

pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
pub mod cli {
    use crate::core::refine::SortKey;
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use std::str::FromStr;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "lvr-comps")]
    #[command(about = "查詢指定行政區的不動產成交比較案例（內建資料 + 實價登錄即時查詢）")]
    pub struct CliConfig {
        /// 縣市，例如 台北市
        pub city: String,

        /// 行政區，例如 大安區
        pub district: String,

        #[arg(long, help = "TOML 設定檔路徑，未指定時使用內建端點與中繼")]
        pub config: Option<String>,

        #[arg(long, help = "只用內建資料，不打即時查詢")]
        pub local_only: bool,

        #[arg(long, help = "排序鍵: price | size | unit-price | date")]
        pub sort: Option<String>,

        #[arg(long, help = "降序排列")]
        pub desc: bool,

        #[arg(long, help = "最多輸出幾筆")]
        pub limit: Option<usize>,

        #[arg(long, help = "以 JSON 輸出完整結果")]
        pub json: bool,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_non_empty_string("city", &self.city)?;
            validation::validate_non_empty_string("district", &self.district)?;

            if let Some(sort) = &self.sort {
                SortKey::from_str(sort).map_err(|reason| {
                    crate::utils::error::CompsError::InvalidConfigValueError {
                        field: "sort".to_string(),
                        value: sort.clone(),
                        reason,
                    }
                })?;
            }

            if let Some(limit) = self.limit {
                validation::validate_positive_number("limit", limit, 1)?;
            }

            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn base_config() -> CliConfig {
            CliConfig {
                city: "台北市".to_string(),
                district: "大安區".to_string(),
                config: None,
                local_only: false,
                sort: None,
                desc: false,
                limit: None,
                json: false,
                verbose: false,
            }
        }

        #[test]
        fn test_valid_cli_config() {
            assert!(base_config().validate().is_ok());
        }

        #[test]
        fn test_blank_district_rejected() {
            let mut config = base_config();
            config.district = "  ".to_string();
            assert!(config.validate().is_err());
        }

        #[test]
        fn test_unknown_sort_key_rejected() {
            let mut config = base_config();
            config.sort = Some("rooms".to_string());
            assert!(config.validate().is_err());

            config.sort = Some("unit-price".to_string());
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_zero_limit_rejected() {
            let mut config = base_config();
            config.limit = Some(0);
            assert!(config.validate().is_err());
        }
    }
}
