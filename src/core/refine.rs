use crate::domain::model::{BuildingType, Property};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::str::FromStr;

/// 報告層套在比較案例上的篩選條件，所有上下界都是選填
#[derive(Debug, Clone, Default)]
pub struct CompsFilter {
    pub kinds: Option<Vec<BuildingType>>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub min_size: Option<f64>,
    pub max_size: Option<f64>,
    pub min_year_built: Option<u16>,
}

impl CompsFilter {
    pub fn matches(&self, prop: &Property) -> bool {
        if let Some(kinds) = &self.kinds {
            if !kinds.contains(&prop.kind) {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if prop.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if prop.price > max {
                return false;
            }
        }
        if let Some(min) = self.min_size {
            if prop.size < min {
                return false;
            }
        }
        if let Some(max) = self.max_size {
            if prop.size > max {
                return false;
            }
        }
        if let Some(min) = self.min_year_built {
            if prop.year_built < min {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Price,
    Size,
    UnitPrice,
    TransactionDate,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price" => Ok(SortKey::Price),
            "size" => Ok(SortKey::Size),
            "unit-price" => Ok(SortKey::UnitPrice),
            "date" => Ok(SortKey::TransactionDate),
            other => Err(format!(
                "Unknown sort key '{}' (expected price, size, unit-price or date)",
                other
            )),
        }
    }
}

fn parse_date(prop: &Property) -> Option<NaiveDate> {
    prop.transaction_date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

/// Option 鍵的比較：缺漏或格式異常的一律排最後，不受升降序影響
fn compare_optional<T: PartialOrd>(a: Option<T>, b: Option<T>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ordering = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// 先篩選再穩定排序；不給排序鍵就保留原順序
pub fn refine(
    comps: Vec<Property>,
    filter: &CompsFilter,
    sort: Option<SortKey>,
    descending: bool,
) -> Vec<Property> {
    let mut refined: Vec<Property> = comps.into_iter().filter(|p| filter.matches(p)).collect();

    if let Some(key) = sort {
        refined.sort_by(|a, b| match key {
            SortKey::Price => {
                let ordering = a.price.cmp(&b.price);
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            }
            SortKey::Size => compare_optional(Some(a.size), Some(b.size), descending),
            SortKey::UnitPrice => compare_optional(a.unit_price(), b.unit_price(), descending),
            SortKey::TransactionDate => compare_optional(parse_date(a), parse_date(b), descending),
        });
    }

    refined
}
