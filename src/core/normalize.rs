use crate::domain::model::{BuildingType, Property};
use serde_json::Value;

/// 民國紀年與西元的固定差值
const ROC_YEAR_OFFSET: u16 = 1911;

/// 去掉縣市名結尾的行政單位字（台北市 → 台北）
pub fn strip_city_suffix(city: &str) -> &str {
    let trimmed = city.trim();
    trimmed
        .strip_suffix('市')
        .or_else(|| trimmed.strip_suffix('縣'))
        .unwrap_or(trimmed)
}

/// 去掉鄉鎮市區名結尾的行政單位字（大安區 → 大安、中壢市 → 中壢）
pub fn strip_district_suffix(district: &str) -> &str {
    let trimmed = district.trim();
    for suffix in ['區', '鄉', '鎮', '市'] {
        if let Some(stripped) = trimmed.strip_suffix(suffix) {
            return stripped;
        }
    }
    trimmed
}

/// 本地資料表與即時查詢共用的查找鍵："<縣市>-<行政區>"，兩側皆已去尾
pub fn district_key(city: &str, district: &str) -> String {
    format!(
        "{}-{}",
        strip_city_suffix(city),
        strip_district_suffix(district)
    )
}

/// 以子字串比對將上游「建物型態」自由文字歸入封閉分類。
/// 比對順序固定；沒有命中的一律視為華廈，不設未知類別。
pub fn classify_building_type(raw: &str) -> BuildingType {
    if raw.contains("公寓") {
        BuildingType::Apartment
    } else if raw.contains("套房") {
        BuildingType::Studio
    } else if raw.contains("透天") {
        BuildingType::Townhouse
    } else if raw.contains("華廈") {
        BuildingType::MidRise
    } else if raw.contains("大樓") {
        BuildingType::HighRise
    } else {
        BuildingType::MidRise
    }
}

/// 「建築完成年月」取前三位當民國年份加 1911，月日捨棄；解析失敗回 0
pub fn roc_year_to_gregorian(raw: &str) -> u16 {
    let year_part: String = raw.trim().chars().take(3).collect();
    year_part
        .parse::<u16>()
        .map(|y| y + ROC_YEAR_OFFSET)
        .unwrap_or(0)
}

/// 七位民國日期 YYYMMDD → "YYYY-MM-DD"。月日按位置照搬，不做曆法驗證；
/// 年份部分解析不了就原樣回傳（上游壞資料照樣流出去）。
pub fn roc_date_to_iso(raw: &str) -> String {
    let trimmed = raw.trim();
    let chars: Vec<char> = trimmed.chars().collect();
    let year_part: String = chars.iter().take(3).collect();

    match year_part.parse::<u16>() {
        Ok(roc_year) => {
            let month: String = chars.iter().skip(3).take(2).collect();
            let day: String = chars.iter().skip(5).take(2).collect();
            format!("{}-{}-{}", roc_year + ROC_YEAR_OFFSET, month, day)
        }
        Err(_) => trimmed.to_string(),
    }
}

/// 欄位取字串：字串取 trim 後的值，數字轉為十進位字串，其餘視為空
fn field_text(raw: &Value, key: &str) -> String {
    match raw.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn field_u64(raw: &Value, key: &str) -> u64 {
    field_text(raw, key).parse().unwrap_or(0)
}

fn field_f64(raw: &Value, key: &str) -> f64 {
    field_text(raw, key).parse().unwrap_or(0.0)
}

fn field_u32(raw: &Value, key: &str) -> u32 {
    field_text(raw, key).parse().unwrap_or(0)
}

/// 把一列實價登錄原始資料映射成 Property。
/// 欄位名是政府資料集的中文 schema；所有解析失敗都以預設值吸收，
/// 價格或面積因此變成 0 的紀錄交由呼叫端的正值過濾剔除，不另外報錯。
pub fn normalize_record(city: &str, index: usize, raw: &Value) -> Property {
    let serial = field_text(raw, "編號");
    let id = if serial.is_empty() {
        format!("live-{}", index)
    } else {
        format!("live-{}", serial)
    };

    let roc_date = field_text(raw, "交易年月日");
    let transaction_date = if roc_date.is_empty() {
        None
    } else {
        Some(roc_date_to_iso(&roc_date))
    };

    let level = field_text(raw, "移轉層次");
    let total_floors = field_text(raw, "總樓層數");
    let floor = if level.is_empty() && total_floors.is_empty() {
        String::new()
    } else {
        format!("{}/{}", level, total_floors)
    };

    let remarks = field_text(raw, "備註");
    let image_url = format!("https://picsum.photos/seed/{}/640/480", id);

    Property {
        id,
        address: field_text(raw, "土地位置建物門牌"),
        city: Some(city.to_string()),
        district: field_text(raw, "鄉鎮市區"),
        kind: classify_building_type(&field_text(raw, "建物型態")),
        price: field_u64(raw, "總價元"),
        size: field_f64(raw, "建物移轉總面積平方公尺"),
        bedrooms: field_u32(raw, "建物現況格局-房"),
        bathrooms: field_u32(raw, "建物現況格局-衛"),
        year_built: roc_year_to_gregorian(&field_text(raw, "建築完成年月")),
        floor,
        image_url,
        latitude: None,
        longitude: None,
        transaction_date,
        remarks: if remarks.is_empty() {
            None
        } else {
            Some(remarks)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_city_suffix() {
        assert_eq!(strip_city_suffix("台北市"), "台北");
        assert_eq!(strip_city_suffix("新竹縣"), "新竹");
        // 已是裸名就不動，重複套用結果相同
        assert_eq!(strip_city_suffix("台北"), "台北");
        assert_eq!(strip_city_suffix(strip_city_suffix("台北市")), "台北");
    }

    #[test]
    fn test_strip_district_suffix() {
        assert_eq!(strip_district_suffix("大安區"), "大安");
        assert_eq!(strip_district_suffix("竹北市"), "竹北");
        assert_eq!(strip_district_suffix("芎林鄉"), "芎林");
        assert_eq!(strip_district_suffix("竹南鎮"), "竹南");
        assert_eq!(strip_district_suffix("大安"), "大安");
    }

    #[test]
    fn test_district_key_suffixed_and_bare_forms_agree() {
        assert_eq!(district_key("台北市", "大安區"), "台北-大安");
        assert_eq!(district_key("台北", "大安"), "台北-大安");
        assert_eq!(
            district_key("台北市", "大安區"),
            district_key("台北", "大安")
        );
    }

    #[test]
    fn test_classify_building_type() {
        assert_eq!(
            classify_building_type("住宅大樓(11層含以上有電梯)"),
            BuildingType::HighRise
        );
        assert_eq!(
            classify_building_type("華廈(10層含以下有電梯)"),
            BuildingType::MidRise
        );
        assert_eq!(
            classify_building_type("公寓(5樓含以下無電梯)"),
            BuildingType::Apartment
        );
        assert_eq!(classify_building_type("透天厝"), BuildingType::Townhouse);
        assert_eq!(
            classify_building_type("套房(1房1廳1衛)"),
            BuildingType::Studio
        );
        // 未命中的型態一律落到華廈
        assert_eq!(classify_building_type("店面（店鋪)"), BuildingType::MidRise);
        assert_eq!(classify_building_type(""), BuildingType::MidRise);
    }

    #[test]
    fn test_roc_year_to_gregorian() {
        assert_eq!(roc_year_to_gregorian("1050301"), 2016);
        assert_eq!(roc_year_to_gregorian("0780523"), 1989);
        assert_eq!(roc_year_to_gregorian("112"), 2023);
        assert_eq!(roc_year_to_gregorian(""), 0);
        assert_eq!(roc_year_to_gregorian("年代不詳"), 0);
    }

    #[test]
    fn test_roc_date_to_iso() {
        assert_eq!(roc_date_to_iso("1120515"), "2023-05-15");
        assert_eq!(roc_date_to_iso("0991231"), "2010-12-31");
        // 不做曆法驗證：位數不足照位置輸出
        assert_eq!(roc_date_to_iso("112051"), "2023-05-1");
        // 年份解析不了就原樣回傳
        assert_eq!(roc_date_to_iso("民國112年"), "民國112年");
    }

    #[test]
    fn test_normalize_record_full_row() {
        let raw = json!({
            "編號": "RPQOMLPKNHPFFAA",
            "鄉鎮市區": "大安區",
            "土地位置建物門牌": "台北市大安區和平東路二段96巷",
            "建物型態": "住宅大樓(11層含以上有電梯)",
            "總價元": "36800000",
            "建物移轉總面積平方公尺": "98.53",
            "建物現況格局-房": "3",
            "建物現況格局-衛": "2",
            "建築完成年月": "1050301",
            "交易年月日": "1120515",
            "移轉層次": "七層",
            "總樓層數": "十四層",
            "備註": "含車位"
        });

        let prop = normalize_record("台北市", 0, &raw);
        assert_eq!(prop.id, "live-RPQOMLPKNHPFFAA");
        assert_eq!(prop.city.as_deref(), Some("台北市"));
        assert_eq!(prop.district, "大安區");
        assert_eq!(prop.kind, BuildingType::HighRise);
        assert_eq!(prop.price, 36_800_000);
        assert_eq!(prop.size, 98.53);
        assert_eq!(prop.bedrooms, 3);
        assert_eq!(prop.bathrooms, 2);
        assert_eq!(prop.year_built, 2016);
        assert_eq!(prop.transaction_date.as_deref(), Some("2023-05-15"));
        assert_eq!(prop.floor, "七層/十四層");
        assert_eq!(prop.remarks.as_deref(), Some("含車位"));
        assert!(prop.is_valid_comparable());
    }

    #[test]
    fn test_normalize_record_defaults() {
        let raw = json!({
            "鄉鎮市區": "板橋區",
            "總價元": "not-a-number"
        });

        let prop = normalize_record("新北市", 7, &raw);
        // 編號缺漏時以陣列索引補 id
        assert_eq!(prop.id, "live-7");
        assert_eq!(prop.price, 0);
        assert_eq!(prop.size, 0.0);
        assert_eq!(prop.bedrooms, 0);
        assert_eq!(prop.year_built, 0);
        assert_eq!(prop.floor, "");
        assert_eq!(prop.transaction_date, None);
        assert_eq!(prop.remarks, None);
        // 正值過濾會把它剔掉，而不是報錯
        assert!(!prop.is_valid_comparable());
    }

    #[test]
    fn test_normalize_record_numeric_json_fields() {
        // 有些中繼會把數字欄位轉成 JSON number，照樣接住
        let raw = json!({
            "編號": "A1",
            "總價元": 12500000,
            "建物移轉總面積平方公尺": 76.2,
            "建物現況格局-房": 2,
            "建物現況格局-衛": 1
        });

        let prop = normalize_record("台中市", 0, &raw);
        assert_eq!(prop.price, 12_500_000);
        assert_eq!(prop.size, 76.2);
        assert_eq!(prop.bedrooms, 2);
        assert_eq!(prop.bathrooms, 1);
    }

    #[test]
    fn test_remarks_blank_is_omitted() {
        let raw = json!({ "編號": "B2", "備註": "   " });
        let prop = normalize_record("高雄市", 0, &raw);
        assert_eq!(prop.remarks, None);
    }
}
