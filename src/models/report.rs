use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 汇总粒度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Yearly,
    Monthly,
    Weekly,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Yearly, Tier::Monthly, Tier::Weekly];

    /// 日期列段宽度: 年 / 年+月 / 年+月+周
    pub fn date_span(self) -> usize {
        match self {
            Tier::Yearly => 1,
            Tier::Monthly => 2,
            Tier::Weekly => 3,
        }
    }

    pub fn has_month(self) -> bool {
        self != Tier::Yearly
    }
}

/// 收入汇总行 (聚合查询结果, 每次运行重新计算)
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct AggregatedRow {
    pub year: i32,
    pub month: Option<i32>,
    pub week: Option<i32>,
    pub units_sold: i64,
    pub unit_price: i64,
    pub revenue: i64,
}

impl AggregatedRow {
    /// 由 month / week 是否存在决定粒度
    pub fn tier(&self) -> Tier {
        match (self.month, self.week) {
            (None, _) => Tier::Yearly,
            (Some(_), None) => Tier::Monthly,
            (Some(_), Some(_)) => Tier::Weekly,
        }
    }

    /// 日期列段的取值, 长度与 `tier().date_span()` 一致
    pub fn date_band(&self) -> Vec<i32> {
        [Some(self.year), self.month, self.week]
            .into_iter()
            .take(self.tier().date_span())
            .map(|v| v.unwrap_or_default())
            .collect()
    }

    pub fn details(&self) -> [i64; 3] {
        [self.units_sold, self.unit_price, self.revenue]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(month: Option<i32>, week: Option<i32>) -> AggregatedRow {
        AggregatedRow { year: 2024, month, week, units_sold: 10, unit_price: 2, revenue: 20 }
    }

    #[test]
    fn tier_from_present_keys() {
        assert_eq!(row(None, None).tier(), Tier::Yearly);
        assert_eq!(row(Some(3), None).tier(), Tier::Monthly);
        assert_eq!(row(Some(3), Some(2)).tier(), Tier::Weekly);
    }

    #[test]
    fn date_band_width_matches_tier() {
        assert_eq!(row(None, None).date_band(), vec![2024]);
        assert_eq!(row(Some(3), None).date_band(), vec![2024, 3]);
        assert_eq!(row(Some(3), Some(2)).date_band(), vec![2024, 3, 2]);
    }
}
