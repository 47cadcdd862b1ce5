use chrono::Month;

use super::grid::{CellValue, Sheet};
use crate::error::{ReportError, Result};

/// 将月份列的数字替换为英文月份名 (January ...)
///
/// 已经是月份名的单元格保持不变, 重复执行不会破坏数据。返回替换的单元格数
pub fn normalize_months(sheet: &mut Sheet, month_column: usize, start_row: usize) -> Result<usize> {
    let end = sheet.data_end(start_row);
    let mut replaced = 0;

    for row in start_row..end {
        let invalid = |value: &CellValue| ReportError::InvalidMonth {
            sheet: sheet.name.clone(),
            row,
            value: value.display(),
        };

        let name = match sheet.get(row, month_column) {
            CellValue::Number(n) if n.fract() == 0.0 && (1.0..=12.0).contains(n) => {
                month_name(*n as u8).ok_or_else(|| invalid(sheet.get(row, month_column)))?
            }
            CellValue::Text(s) if s.trim().parse::<Month>().is_ok() => continue,
            other => return Err(invalid(other)),
        };

        sheet.set(row, month_column, name);
        replaced += 1;
    }

    Ok(replaced)
}

fn month_name(number: u8) -> Option<&'static str> {
    Month::try_from(number).ok().map(|m| m.name())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly(months: &[CellValue]) -> Sheet {
        let mut sheet = Sheet::new("Monthly");
        for (i, m) in months.iter().enumerate() {
            sheet.set(2 + i, 0, 2024i64);
            sheet.set(2 + i, 1, m.clone());
        }
        sheet
    }

    #[test]
    fn numbers_become_month_names() {
        let mut sheet = monthly(&[CellValue::Number(12.0), CellValue::Number(1.0)]);
        assert_eq!(normalize_months(&mut sheet, 1, 2).unwrap(), 2);
        assert_eq!(sheet.get(2, 1), &CellValue::Text("December".into()));
        assert_eq!(sheet.get(3, 1), &CellValue::Text("January".into()));
    }

    #[test]
    fn second_run_leaves_names_alone() {
        let mut sheet = monthly(&[CellValue::Number(3.0)]);
        normalize_months(&mut sheet, 1, 2).unwrap();
        let once = sheet.clone();
        assert_eq!(normalize_months(&mut sheet, 1, 2).unwrap(), 0);
        assert_eq!(sheet, once);
    }

    #[test]
    fn out_of_range_or_garbage_fails_loudly() {
        let mut sheet = monthly(&[CellValue::Number(13.0)]);
        assert!(matches!(normalize_months(&mut sheet, 1, 2), Err(ReportError::InvalidMonth { row: 2, .. })));

        let mut sheet = monthly(&[CellValue::Text("Smarch".into())]);
        assert!(normalize_months(&mut sheet, 1, 2).is_err());
    }

    #[test]
    fn header_rows_are_not_touched() {
        let mut sheet = monthly(&[CellValue::Number(6.0)]);
        sheet.set(1, 1, "Month");
        normalize_months(&mut sheet, 1, 2).unwrap();
        assert_eq!(sheet.get(1, 1), &CellValue::Text("Month".into()));
    }
}
