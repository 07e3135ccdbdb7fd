use crate::core::normalize::district_key;
use crate::domain::model::{BuildingType, Property};
use std::collections::HashMap;

/// 內建的成交案例資料表。鍵是去尾後的「縣市-行政區」，值是該區的
/// 比較標的清單；表內不存縣市名，查詢時才蓋上呼叫端給的字串。
pub struct LocalProvider {
    table: HashMap<String, Vec<Property>>,
}

impl LocalProvider {
    pub fn new() -> Self {
        Self {
            table: bundled_table(),
        }
    }

    /// 同步查詢：查無該區就回空清單，絕不退回別的縣市的資料
    pub fn lookup(&self, city: &str, district: &str) -> Vec<Property> {
        let key = district_key(city, district);
        match self.table.get(&key) {
            Some(records) => records
                .iter()
                .cloned()
                .map(|mut prop| {
                    prop.city = Some(city.to_string());
                    prop
                })
                .collect(),
            None => {
                tracing::debug!("📦 No bundled comparables for key '{}'", key);
                Vec::new()
            }
        }
    }

    /// 已收錄的區域鍵（排序後），給 CLI 在查無資料時提示用
    pub fn coverage(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.table.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Default for LocalProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::too_many_arguments)]
fn comp(
    id: &str,
    address: &str,
    district: &str,
    kind: BuildingType,
    price: u64,
    size: f64,
    bedrooms: u32,
    bathrooms: u32,
    year_built: u16,
    floor: &str,
    coords: Option<(f64, f64)>,
    transaction_date: Option<&str>,
    remarks: Option<&str>,
) -> Property {
    Property {
        id: id.to_string(),
        address: address.to_string(),
        city: None,
        district: district.to_string(),
        kind,
        price,
        size,
        bedrooms,
        bathrooms,
        year_built,
        floor: floor.to_string(),
        image_url: format!("https://picsum.photos/seed/{}/640/480", id),
        latitude: coords.map(|(lat, _)| lat),
        longitude: coords.map(|(_, lng)| lng),
        transaction_date: transaction_date.map(str::to_string),
        remarks: remarks.map(str::to_string),
    }
}

fn bundled_table() -> HashMap<String, Vec<Property>> {
    use BuildingType::*;

    let mut table = HashMap::new();

    table.insert(
        "台北-大安".to_string(),
        vec![
            comp(
                "local-daan-1",
                "台北市大安區信義路三段52巷",
                "大安區",
                HighRise,
                58_800_000,
                112.4,
                3,
                2,
                2010,
                "8/15",
                Some((25.0333, 121.5436)),
                Some("2024-01-12"),
                None,
            ),
            comp(
                "local-daan-2",
                "台北市大安區和平東路二段118號",
                "大安區",
                Apartment,
                23_500_000,
                82.6,
                2,
                1,
                1983,
                "4/5",
                Some((25.0261, 121.5430)),
                Some("2023-11-03"),
                Some("無電梯公寓"),
            ),
            comp(
                "local-daan-3",
                "台北市大安區敦化南路二段71巷",
                "大安區",
                MidRise,
                36_200_000,
                95.1,
                3,
                2,
                1995,
                "6/10",
                None,
                Some("2023-12-21"),
                None,
            ),
        ],
    );

    table.insert(
        "台北-信義".to_string(),
        vec![
            comp(
                "local-xinyi-1",
                "台北市信義區松仁路89巷",
                "信義區",
                HighRise,
                62_500_000,
                121.8,
                3,
                2,
                2015,
                "12/24",
                Some((25.0360, 121.5674)),
                Some("2024-02-07"),
                None,
            ),
            comp(
                "local-xinyi-2",
                "台北市信義區虎林街120巷",
                "信義區",
                Apartment,
                21_800_000,
                76.3,
                2,
                1,
                1979,
                "3/4",
                None,
                Some("2023-10-15"),
                None,
            ),
            comp(
                "local-xinyi-3",
                "台北市信義區信義路五段150巷",
                "信義區",
                MidRise,
                41_000_000,
                102.5,
                3,
                2,
                1998,
                "7/9",
                Some((25.0310, 121.5700)),
                Some("2024-03-02"),
                Some("近台北101"),
            ),
        ],
    );

    table.insert(
        "台北-中山".to_string(),
        vec![
            comp(
                "local-zhongshan-1",
                "台北市中山區南京東路二段97號",
                "中山區",
                HighRise,
                44_600_000,
                98.7,
                3,
                2,
                2008,
                "10/14",
                Some((25.0521, 121.5312)),
                Some("2023-12-08"),
                None,
            ),
            comp(
                "local-zhongshan-2",
                "台北市中山區民生東路一段42巷",
                "中山區",
                Studio,
                12_800_000,
                33.1,
                1,
                1,
                2017,
                "5/12",
                None,
                Some("2024-01-26"),
                None,
            ),
        ],
    );

    table.insert(
        "台北-內湖".to_string(),
        vec![
            comp(
                "local-neihu-1",
                "台北市內湖區成功路四段182巷",
                "內湖區",
                HighRise,
                38_900_000,
                109.2,
                3,
                2,
                2012,
                "9/13",
                Some((25.0790, 121.5903)),
                Some("2024-02-19"),
                None,
            ),
            comp(
                "local-neihu-2",
                "台北市內湖區內湖路一段285巷",
                "內湖區",
                MidRise,
                26_700_000,
                88.4,
                3,
                1,
                1992,
                "2/7",
                None,
                Some("2023-09-30"),
                None,
            ),
        ],
    );

    table.insert(
        "新北-板橋".to_string(),
        vec![
            comp(
                "local-banqiao-1",
                "新北市板橋區文化路一段268號",
                "板橋區",
                HighRise,
                28_600_000,
                104.6,
                3,
                2,
                2014,
                "11/21",
                Some((25.0145, 121.4672)),
                Some("2024-01-05"),
                None,
            ),
            comp(
                "local-banqiao-2",
                "新北市板橋區縣民大道二段66號",
                "板橋區",
                HighRise,
                32_400_000,
                118.3,
                4,
                2,
                2016,
                "15/28",
                Some((25.0139, 121.4645)),
                Some("2023-12-17"),
                Some("捷運板橋站步行5分鐘"),
            ),
            comp(
                "local-banqiao-3",
                "新北市板橋區中山路一段50巷",
                "板橋區",
                Apartment,
                14_900_000,
                71.8,
                2,
                1,
                1986,
                "4/5",
                None,
                Some("2023-11-28"),
                None,
            ),
        ],
    );

    table.insert(
        "新北-中和".to_string(),
        vec![
            comp(
                "local-zhonghe-1",
                "新北市中和區景平路634巷",
                "中和區",
                MidRise,
                16_800_000,
                84.2,
                3,
                1,
                1996,
                "5/8",
                None,
                Some("2023-10-22"),
                None,
            ),
            comp(
                "local-zhonghe-2",
                "新北市中和區中安街85號",
                "中和區",
                Apartment,
                12_300_000,
                66.5,
                2,
                1,
                1981,
                "2/4",
                None,
                Some("2024-01-31"),
                None,
            ),
        ],
    );

    table.insert(
        "新北-新店".to_string(),
        vec![
            comp(
                "local-xindian-1",
                "新北市新店區北新路二段197號",
                "新店區",
                HighRise,
                24_500_000,
                96.8,
                3,
                2,
                2011,
                "7/16",
                Some((24.9679, 121.5413)),
                Some("2024-02-14"),
                None,
            ),
            comp(
                "local-xindian-2",
                "新北市新店區中興路三段18巷",
                "新店區",
                Townhouse,
                35_600_000,
                168.9,
                4,
                3,
                2003,
                "1/4",
                None,
                Some("2023-12-02"),
                Some("邊間透天含車庫"),
            ),
        ],
    );

    table.insert(
        "台中-西屯".to_string(),
        vec![
            comp(
                "local-xitun-1",
                "台中市西屯區台灣大道三段301號",
                "西屯區",
                HighRise,
                22_900_000,
                107.3,
                3,
                2,
                2013,
                "14/23",
                Some((24.1651, 120.6416)),
                Some("2024-01-20"),
                None,
            ),
            comp(
                "local-xitun-2",
                "台中市西屯區文心路二段561巷",
                "西屯區",
                MidRise,
                13_600_000,
                89.6,
                3,
                2,
                1999,
                "6/10",
                None,
                Some("2023-11-11"),
                None,
            ),
            comp(
                "local-xitun-3",
                "台中市西屯區河南路二段262號",
                "西屯區",
                Studio,
                6_800_000,
                29.4,
                1,
                1,
                2018,
                "9/15",
                None,
                Some("2024-03-08"),
                None,
            ),
        ],
    );

    table.insert(
        "台中-北屯".to_string(),
        vec![
            comp(
                "local-beitun-1",
                "台中市北屯區崇德路二段146號",
                "北屯區",
                HighRise,
                18_200_000,
                101.5,
                3,
                2,
                2015,
                "10/19",
                Some((24.1803, 120.6861)),
                Some("2023-12-29"),
                None,
            ),
            comp(
                "local-beitun-2",
                "台中市北屯區文心路四段83巷",
                "北屯區",
                Townhouse,
                26_400_000,
                152.7,
                4,
                3,
                2001,
                "1/3",
                None,
                Some("2024-02-03"),
                None,
            ),
        ],
    );

    table.insert(
        "高雄-左營".to_string(),
        vec![
            comp(
                "local-zuoying-1",
                "高雄市左營區博愛二路366號",
                "左營區",
                HighRise,
                17_500_000,
                110.8,
                3,
                2,
                2012,
                "13/25",
                Some((22.6605, 120.3029)),
                Some("2024-01-16"),
                None,
            ),
            comp(
                "local-zuoying-2",
                "高雄市左營區自由三路528巷",
                "左營區",
                MidRise,
                10_900_000,
                86.1,
                3,
                1,
                1997,
                "4/9",
                None,
                Some("2023-10-09"),
                None,
            ),
            comp(
                "local-zuoying-3",
                "高雄市左營區富國路286號",
                "左營區",
                Apartment,
                7_600_000,
                62.9,
                2,
                1,
                1988,
                "3/5",
                None,
                Some("2023-12-13"),
                Some("頂樓加蓋未計入面積"),
            ),
        ],
    );

    table.insert(
        "高雄-三民".to_string(),
        vec![
            comp(
                "local-sanmin-1",
                "高雄市三民區明誠一路326號",
                "三民區",
                MidRise,
                9_800_000,
                79.4,
                3,
                1,
                1994,
                "5/8",
                None,
                Some("2024-02-22"),
                None,
            ),
            comp(
                "local-sanmin-2",
                "高雄市三民區建工路415巷",
                "三民區",
                Townhouse,
                15_300_000,
                141.2,
                4,
                2,
                1990,
                "1/3",
                None,
                Some("2023-11-19"),
                None,
            ),
        ],
    );

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_pairs_return_comps_with_city_stamped_verbatim() {
        let provider = LocalProvider::new();

        for (city, district) in [
            ("台北市", "大安區"),
            ("台北市", "信義區"),
            ("台北市", "中山區"),
            ("台北市", "內湖區"),
            ("新北市", "板橋區"),
            ("新北市", "中和區"),
            ("新北市", "新店區"),
            ("台中市", "西屯區"),
            ("台中市", "北屯區"),
            ("高雄市", "左營區"),
            ("高雄市", "三民區"),
        ] {
            let comps = provider.lookup(city, district);
            assert!(!comps.is_empty(), "{}{} 應有內建資料", city, district);
            for comp in &comps {
                assert_eq!(comp.city.as_deref(), Some(city));
            }
        }
    }

    #[test]
    fn test_unknown_district_returns_empty_not_another_city() {
        let provider = LocalProvider::new();
        assert!(provider.lookup("台北市", "士林區").is_empty());
        assert!(provider.lookup("桃園市", "中壢區").is_empty());
        assert!(provider.lookup("花蓮縣", "花蓮市").is_empty());
    }

    #[test]
    fn test_bare_and_suffixed_forms_hit_the_same_entry() {
        let provider = LocalProvider::new();
        let suffixed = provider.lookup("台北市", "大安區");
        let bare = provider.lookup("台北", "大安");

        assert_eq!(suffixed.len(), bare.len());
        assert!(!suffixed.is_empty());
        // 蓋上的 city 跟著呼叫端的寫法走
        assert_eq!(suffixed[0].city.as_deref(), Some("台北市"));
        assert_eq!(bare[0].city.as_deref(), Some("台北"));
    }

    #[test]
    fn test_lookup_clones_fresh_records() {
        let provider = LocalProvider::new();
        let mut first = provider.lookup("台北市", "大安區");
        first[0].price = 1;

        let second = provider.lookup("台北市", "大安區");
        assert_ne!(second[0].price, 1);
    }

    #[test]
    fn test_ids_unique_within_each_result_set() {
        let provider = LocalProvider::new();
        for key in provider.coverage() {
            let (city, district) = key.split_once('-').unwrap();
            let comps = provider.lookup(city, district);
            let mut ids: Vec<&str> = comps.iter().map(|c| c.id.as_str()).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), comps.len());
        }
    }

    #[test]
    fn test_bundled_records_are_valid_comparables() {
        let provider = LocalProvider::new();
        for key in provider.coverage() {
            let (city, district) = key.split_once('-').unwrap();
            for comp in provider.lookup(city, district) {
                assert!(comp.is_valid_comparable(), "{} 的內建資料不合法", comp.id);
            }
        }
    }
}
