use chrono::{Datelike, Duration, NaiveDate};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::{AggregatedRow, PriceReference, SalesRecord};

/// 月内第几周: 以周一为一周开始,
/// `(本周周一 - 当月1日所在周周一) / 7 + 1`
pub fn week_of_month(date: NaiveDate) -> i32 {
    let week_start = |d: NaiveDate| d - Duration::days(d.weekday().num_days_from_monday() as i64);
    let month_start = date.with_day(1).unwrap_or(date);
    ((week_start(date) - week_start(month_start)).num_days() / 7 + 1) as i32
}

/// 三级收入汇总 (年 / 月 / 周)
///
/// 销量按各自分组求和后乘以单价得到收入, 结果按
/// 年降序、月降序 (空值在后)、周降序 (空值在后) 排列
pub fn aggregate(records: &[SalesRecord], price: PriceReference) -> Vec<AggregatedRow> {
    let mut yearly: BTreeMap<i32, i64> = BTreeMap::new();
    let mut monthly: BTreeMap<(i32, i32), i64> = BTreeMap::new();
    let mut weekly: BTreeMap<(i32, i32, i32), i64> = BTreeMap::new();

    for record in records.iter().filter(|r| r.product == price.product) {
        let year = record.entry_date.year();
        let month = record.entry_date.month() as i32;
        let week = week_of_month(record.entry_date);

        *yearly.entry(year).or_insert(0) += record.sales_count;
        *monthly.entry((year, month)).or_insert(0) += record.sales_count;
        *weekly.entry((year, month, week)).or_insert(0) += record.sales_count;
    }

    let row = |year, month, week, units_sold: i64| AggregatedRow {
        year,
        month,
        week,
        units_sold,
        unit_price: price.unit_price,
        revenue: price.unit_price * units_sold,
    };

    let mut rows: Vec<AggregatedRow> = yearly
        .into_iter()
        .map(|(y, units)| row(y, None, None, units))
        .chain(monthly.into_iter().map(|((y, m), units)| row(y, Some(m), None, units)))
        .chain(weekly.into_iter().map(|((y, m, w), units)| row(y, Some(m), Some(w), units)))
        .collect();

    rows.sort_by(report_order);
    rows
}

/// 排序规则与 SQL 的 `ORDER BY year DESC, month DESC NULLS LAST, week DESC NULLS LAST` 一致
pub fn report_order(a: &AggregatedRow, b: &AggregatedRow) -> Ordering {
    b.year
        .cmp(&a.year)
        .then_with(|| desc_nulls_last(a.month, b.month))
        .then_with(|| desc_nulls_last(a.week, b.week))
}

fn desc_nulls_last(a: Option<i32>, b: Option<i32>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
