use serde::{Deserialize, Serialize};

/// 建物型態的封閉分類，對應報告 UI 使用的五種類別。
/// 序列化使用中文標籤，與前端顯示及既有資料保持一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingType {
    #[serde(rename = "公寓")]
    Apartment,
    #[serde(rename = "套房")]
    Studio,
    #[serde(rename = "透天厝")]
    Townhouse,
    #[serde(rename = "華廈")]
    MidRise,
    #[serde(rename = "電梯大樓")]
    HighRise,
}

impl BuildingType {
    pub fn label(&self) -> &'static str {
        match self {
            BuildingType::Apartment => "公寓",
            BuildingType::Studio => "套房",
            BuildingType::Townhouse => "透天厝",
            BuildingType::MidRise => "華廈",
            BuildingType::HighRise => "電梯大樓",
        }
    }
}

impl std::fmt::Display for BuildingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 一筆成交紀錄（比較標的）或估價標的本身。
/// JSON 欄位名沿用報告層的 camelCase 形狀。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub district: String,
    #[serde(rename = "type")]
    pub kind: BuildingType,
    /// 總價（新台幣元）
    pub price: u64,
    /// 建物移轉面積（平方公尺）
    pub size: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub year_built: u16,
    /// 「移轉層次/總樓層數」自由文字，例如 "5/12"
    pub floor: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// 交易日期 "YYYY-MM-DD"；上游格式異常時原樣保留
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl Property {
    /// 價格與面積皆為正值才算有效比較標的
    pub fn is_valid_comparable(&self) -> bool {
        self.price > 0 && self.size > 0.0
    }

    /// 每平方公尺單價（元）；面積為零時無法計算
    pub fn unit_price(&self) -> Option<f64> {
        if self.size > 0.0 {
            Some(self.price as f64 / self.size)
        } else {
            None
        }
    }
}

/// 即時查詢的結果：取代原始實作的 null 慣例，讓「查無即時資料」成為
/// 明確可測的狀態。空陣列（結構有效但過濾後無資料）仍是 Fetched。
#[derive(Debug, Clone, PartialEq)]
pub enum LiveLookup {
    Fetched(Vec<Property>),
    Unavailable,
}

impl LiveLookup {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, LiveLookup::Unavailable)
    }

    /// 呼叫端若偏好 nullable 視角，可轉回 Option
    pub fn into_comparables(self) -> Option<Vec<Property>> {
        match self {
            LiveLookup::Fetched(list) => Some(list),
            LiveLookup::Unavailable => None,
        }
    }
}

/// 一個公開 CORS 中繼端點。template 內的 {url} 會被替換成
/// 上游資料集的完整 URL；encode_target 決定替換前是否先百分比編碼。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayEndpoint {
    pub name: String,
    pub template: String,
    #[serde(default)]
    pub encode_target: bool,
}

impl RelayEndpoint {
    pub fn new(name: &str, template: &str, encode_target: bool) -> Self {
        Self {
            name: name.to_string(),
            template: template.to_string(),
            encode_target,
        }
    }

    /// 將上游 URL 包進中繼端點的請求形式
    pub fn wrap(&self, target: &str) -> String {
        if self.encode_target {
            self.template
                .replace("{url}", &urlencoding::encode(target))
        } else {
            self.template.replace("{url}", target)
        }
    }
}
