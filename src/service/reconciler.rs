use chrono::{Duration, NaiveDate};
use indexmap::IndexMap;

use crate::error::{ReportError, Result};
use crate::models::{Product, SalesRecord};

/// 对账结果: 日期 -> 销量, 按分配顺序 (最近的日期在前)
pub type Reconciliation = IndexMap<NaiveDate, i64>;

/// 对比文件行数与已入库记录数, 计算需要新增的记录并分配日期
///
/// 文件按时间顺序追加 (最旧的行在前), 最后一行对应昨天,
/// 往前每一行依次早一天。已入库的 `existing` 行保持不变
pub fn reconcile(lines: &[i64], existing: usize, today: NaiveDate) -> Result<Reconciliation> {
    if existing > lines.len() {
        return Err(ReportError::ReconciliationShrink {
            stored: existing,
            lines: lines.len(),
        });
    }

    let yesterday = today - Duration::days(1);
    Ok(lines[existing..]
        .iter()
        .rev()
        .enumerate()
        .map(|(offset, &count)| (yesterday - Duration::days(offset as i64), count))
        .collect())
}

/// 将对账结果转换为待插入的销售记录 (按日期升序)
pub fn to_records(product: Product, reconciliation: &Reconciliation) -> Vec<SalesRecord> {
    let mut records: Vec<SalesRecord> = reconciliation
        .iter()
        .map(|(&entry_date, &sales_count)| SalesRecord {
            entry_date,
            product,
            sales_count,
        })
        .collect();
    records.sort_by_key(|r| r.entry_date);
    records
}
