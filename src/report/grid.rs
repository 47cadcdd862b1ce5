use crate::error::{ReportError, Result};

/// 单元格取值
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// 空值、空串、纯空白均视为空
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Number(_) => false,
            CellValue::Text(s) => s.trim().is_empty(),
        }
    }

    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

/// 工作表: 行 -> 单元格, 按需扩展
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    rows: Vec<Vec<CellValue>>,
    /// 本次运行中写入过的最后一行
    last_written: Option<usize>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            last_written: None,
        }
    }

    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// 写入单元格, 不存在则创建, 已存在则覆盖
    pub fn set(&mut self, row: usize, col: usize, value: impl Into<CellValue>) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize_with(col + 1, CellValue::default);
        }
        cells[col] = value.into();
    }

    /// 读取数值单元格, 空单元格按 0 处理
    pub fn number(&self, row: usize, col: usize) -> Result<f64> {
        match self.get(row, col) {
            CellValue::Number(n) => Ok(*n),
            CellValue::Text(s) if s.trim().is_empty() => Ok(0.0),
            CellValue::Empty => Ok(0.0),
            CellValue::Text(s) => s.trim().parse().map_err(|_| ReportError::NonNumericCell {
                sheet: self.name.clone(),
                row,
                col,
                value: s.clone(),
            }),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row_width(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, Vec::len)
    }

    pub fn is_blank_row(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .map_or(true, |cells| cells.iter().all(CellValue::is_blank))
    }

    /// 记录填充器写入的行
    pub fn mark_written(&mut self, row: usize) {
        self.last_written = Some(self.last_written.map_or(row, |last| last.max(row)));
    }

    /// 数据区结束位置 (不含)
    ///
    /// 本次运行写入过则直接使用记录的最后一行;
    /// 否则从末行向上找第一个首列非空的行, 其后的行视为残留空行
    pub fn data_end(&self, start_row: usize) -> usize {
        let end = match self.last_written {
            Some(last) => last + 1,
            None => (0..self.rows.len())
                .rev()
                .find(|&row| !self.get(row, 0).is_blank())
                .map_or(0, |row| row + 1),
        };
        end.max(start_row)
    }

    /// (行号, 行内单元格) 迭代, 跳过空行
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &CellValue)> {
        self.rows.iter().enumerate().flat_map(|(r, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, v)| !matches!(v, CellValue::Empty))
                .map(move |(c, v)| (r, c, v))
        })
    }
}

/// 报表工作簿
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Result<&Sheet> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ReportError::MissingSheet { name: name.to_string() })
    }

    pub fn sheet_mut(&mut self, name: &str) -> Result<&mut Sheet> {
        self.sheets
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| ReportError::MissingSheet { name: name.to_string() })
    }
}
