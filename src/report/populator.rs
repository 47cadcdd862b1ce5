use std::collections::HashMap;

use super::grid::Workbook;
use super::layout::{DetailField, ReportLayout};
use crate::error::Result;
use crate::models::{AggregatedRow, Product, Tier};

/// 每个工作表写入的行数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulateStats {
    pub yearly_rows: usize,
    pub monthly_rows: usize,
    pub weekly_rows: usize,
}

impl PopulateStats {
    fn bump(&mut self, tier: Tier) {
        match tier {
            Tier::Yearly => self.yearly_rows += 1,
            Tier::Monthly => self.monthly_rows += 1,
            Tier::Weekly => self.weekly_rows += 1,
        }
    }
}

/// 将某产品的汇总行写入对应工作表和该产品的列段
///
/// 每个工作表从数据起始行开始逐行写入; 同一行上其它产品的列段不受影响。
/// 单元格写入为覆盖写, 重复执行结果不变
pub fn populate(
    workbook: &mut Workbook,
    layout: &ReportLayout,
    rows: &[AggregatedRow],
    product: Product,
) -> Result<PopulateStats> {
    let mut cursors: HashMap<Tier, usize> = HashMap::new();
    let mut stats = PopulateStats::default();

    for record in rows {
        let tier = record.tier();
        let schema = layout.schema(tier);
        let sheet = workbook.sheet_mut(layout.sheet_name(tier))?;
        let cursor = cursors.entry(tier).or_insert(layout.start_row());
        let row = *cursor;

        for (col, value) in record.date_band().into_iter().enumerate() {
            sheet.set(row, col, value);
        }
        for (field, value) in DetailField::ALL.into_iter().zip(record.details()) {
            sheet.set(row, schema.product_column(product, field), value);
        }
        sheet.mark_written(row);

        tracing::debug!(
            "{} 第 {} 行: {:?} {:?}",
            sheet.name,
            row,
            record.date_band(),
            record.details()
        );

        *cursor += 1;
        stats.bump(tier);
    }

    Ok(stats)
}
