use calamine::{open_workbook_auto, Data, Reader, Sheets};
use rust_xlsxwriter::Workbook as XlsxWorkbook;
use std::path::Path;

use super::grid::{CellValue, Sheet, Workbook};
use crate::error::Result;

/// 读取报表 (xlsx, xls, ods), 只保留单元格取值
pub fn load_workbook(path: &Path) -> Result<Workbook> {
    let mut source: Sheets<_> = open_workbook_auto(path)?;
    let sheet_names: Vec<String> = source.sheet_names().to_vec();
    let mut workbook = Workbook::new();

    for sheet_name in &sheet_names {
        let range = source.worksheet_range(sheet_name)?;
        let mut sheet = Sheet::new(sheet_name);

        // 数据区可能不从 A1 开始
        let (start_row, start_col) = range.start().unwrap_or((0, 0));

        for (row_idx, row) in range.rows().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                let value = match cell {
                    Data::Empty | Data::Error(_) => continue,
                    Data::String(s) if s.is_empty() => continue,
                    Data::String(s) => CellValue::Text(s.clone()),
                    Data::Float(n) => CellValue::Number(*n),
                    Data::Int(n) => CellValue::Number(*n as f64),
                    Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
                    Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
                    Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
                };
                sheet.set(
                    start_row as usize + row_idx,
                    start_col as usize + col_idx,
                    value,
                );
            }
        }

        workbook.add_sheet(sheet);
    }

    tracing::debug!("读取报表 {}: {} 个工作表", path.display(), sheet_names.len());
    Ok(workbook)
}

/// 保存报表为 xlsx (覆盖写)
pub fn save_workbook(workbook: &Workbook, path: &Path) -> Result<()> {
    let mut xlsx_workbook = XlsxWorkbook::new();

    for sheet in workbook.sheets() {
        let worksheet = xlsx_workbook.add_worksheet().set_name(&sheet.name)?;

        for (row, col, value) in sheet.cells() {
            let (row32, col16) = (row as u32, col as u16);
            match value {
                CellValue::Empty => {}
                CellValue::Number(n) => {
                    worksheet.write_number(row32, col16, *n)?;
                }
                CellValue::Text(s) => {
                    worksheet.write_string(row32, col16, s)?;
                }
            }
        }
    }

    xlsx_workbook.save(path)?;
    tracing::debug!("保存报表 {}", path.display());
    Ok(())
}
