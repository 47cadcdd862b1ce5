use super::grid::Sheet;
use super::layout::{DetailField, SheetSchema};
use crate::error::Result;

/// 计算总计列: 每个数据行上, 对各产品列段的同一字段求和,
/// 写入末尾的总计列段。返回处理的行数
pub fn compute_grand_totals(sheet: &mut Sheet, schema: &SheetSchema, start_row: usize) -> Result<usize> {
    let end = sheet.data_end(start_row);

    for row in start_row..end {
        let mut totals = [0.0; SheetSchema::GRAND_TOTAL_SPAN];
        for field in DetailField::ALL {
            for band in 0..schema.product_bands {
                totals[field.offset()] += sheet.number(row, schema.band_column(band, field))?;
            }
        }
        for field in DetailField::ALL {
            sheet.set(row, schema.grand_total_column(field), totals[field.offset()]);
        }
    }

    Ok(end - start_row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tier;
    use crate::report::grid::CellValue;

    fn weekly_row(sheet: &mut Sheet, row: usize, basic: [i64; 3], deluxe: [i64; 3]) {
        for (col, v) in [2024, 5, 1].into_iter().chain(basic).chain(deluxe).enumerate() {
            sheet.set(row, col, v);
        }
    }

    #[test]
    fn sums_each_field_across_products() {
        let schema = SheetSchema::new(Tier::Weekly, 2);
        let mut sheet = Sheet::new("Weekly");
        weekly_row(&mut sheet, 2, [10, 2, 20], [5, 2, 10]);

        assert_eq!(compute_grand_totals(&mut sheet, &schema, 2).unwrap(), 1);
        assert_eq!(sheet.get(2, 9), &CellValue::Number(15.0));
        assert_eq!(sheet.get(2, 10), &CellValue::Number(4.0));
        assert_eq!(sheet.get(2, 11), &CellValue::Number(30.0));
    }

    #[test]
    fn missing_band_counts_as_zero_and_blank_tail_is_ignored() {
        let schema = SheetSchema::new(Tier::Yearly, 2);
        let mut sheet = Sheet::new("Yearly");
        sheet.set(0, 0, "Year");
        for (col, v) in [2024, 100, 2, 200].into_iter().enumerate() {
            sheet.set(2, col, v);
        }
        sheet.set(3, 0, " ");
        sheet.set(3, 1, 99i64);

        assert_eq!(compute_grand_totals(&mut sheet, &schema, 2).unwrap(), 1);
        assert_eq!(sheet.get(2, 7), &CellValue::Number(100.0));
        assert_eq!(sheet.get(2, 9), &CellValue::Number(200.0));
        assert_eq!(sheet.get(3, 7), &CellValue::Empty);
    }

    #[test]
    fn zero_product_bands_total_zero() {
        let schema = SheetSchema::new(Tier::Monthly, 0);
        let mut sheet = Sheet::new("Monthly");
        sheet.set(2, 0, 2024i64);
        sheet.set(2, 1, 4i64);

        compute_grand_totals(&mut sheet, &schema, 2).unwrap();
        assert_eq!(sheet.get(2, 2), &CellValue::Number(0.0));
        assert_eq!(sheet.get(2, 4), &CellValue::Number(0.0));
    }

    #[test]
    fn running_twice_gives_the_same_totals() {
        let schema = SheetSchema::new(Tier::Weekly, 2);
        let mut sheet = Sheet::new("Weekly");
        weekly_row(&mut sheet, 2, [1, 2, 2], [3, 4, 12]);
        compute_grand_totals(&mut sheet, &schema, 2).unwrap();
        let once = sheet.clone();
        compute_grand_totals(&mut sheet, &schema, 2).unwrap();
        assert_eq!(sheet, once);
    }
}
