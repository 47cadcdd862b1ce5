use super::grid::Workbook;
use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::models::{Product, Tier};

/// 产品明细列段中的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailField {
    UnitsSold,
    UnitPrice,
    Revenue,
}

impl DetailField {
    pub const ALL: [DetailField; 3] = [DetailField::UnitsSold, DetailField::UnitPrice, DetailField::Revenue];

    pub fn offset(self) -> usize {
        match self {
            DetailField::UnitsSold => 0,
            DetailField::UnitPrice => 1,
            DetailField::Revenue => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DetailField::UnitsSold => "Units Sold",
            DetailField::UnitPrice => "Unit Price",
            DetailField::Revenue => "Revenue",
        }
    }
}

/// 单个工作表的列布局:
/// 日期列段 | 产品列段 x N (每段3列) | 总计列段 (3列)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetSchema {
    pub tier: Tier,
    pub product_bands: usize,
}

impl SheetSchema {
    pub const DETAIL_SPAN: usize = 3;
    pub const GRAND_TOTAL_SPAN: usize = 3;

    pub fn new(tier: Tier, product_bands: usize) -> Self {
        Self { tier, product_bands }
    }

    pub fn date_span(&self) -> usize {
        self.tier.date_span()
    }

    pub fn band_column(&self, band: usize, field: DetailField) -> usize {
        self.date_span() + Self::DETAIL_SPAN * band + field.offset()
    }

    pub fn product_column(&self, product: Product, field: DetailField) -> usize {
        self.band_column(product.band_index(), field)
    }

    pub fn grand_total_start(&self) -> usize {
        self.date_span() + Self::DETAIL_SPAN * self.product_bands
    }

    pub fn grand_total_column(&self, field: DetailField) -> usize {
        self.grand_total_start() + field.offset()
    }

    pub fn width(&self) -> usize {
        self.grand_total_start() + Self::GRAND_TOTAL_SPAN
    }
}

/// 整个报表的布局: 三个工作表名称、数据起始行、月份列
#[derive(Debug, Clone)]
pub struct ReportLayout {
    config: ReportConfig,
    product_bands: usize,
}

impl ReportLayout {
    pub fn new(config: &ReportConfig) -> Self {
        Self::with_product_bands(config, Product::band_count())
    }

    pub fn with_product_bands(config: &ReportConfig, product_bands: usize) -> Self {
        Self {
            config: config.clone(),
            product_bands,
        }
    }

    pub fn schema(&self, tier: Tier) -> SheetSchema {
        SheetSchema::new(tier, self.product_bands)
    }

    pub fn sheet_name(&self, tier: Tier) -> &str {
        self.config.sheet_name(tier)
    }

    pub fn start_row(&self) -> usize {
        self.config.start_row
    }

    pub fn month_column(&self) -> usize {
        self.config.month_column
    }

    /// 校验模板结构: 三个工作表都存在, 且数据起始行之前有表头
    ///
    /// 所有列偏移计算都依赖固定布局, 结构不符时不能写入任何数据
    pub fn validate(&self, workbook: &Workbook) -> Result<()> {
        for tier in Tier::ALL {
            let sheet = workbook.sheet(self.sheet_name(tier))?;
            let header_row = self.start_row().saturating_sub(1);
            if self.start_row() == 0 || sheet.is_blank_row(header_row) {
                return Err(ReportError::MissingHeaderRow {
                    sheet: sheet.name.clone(),
                    row: header_row,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::grid::Sheet;

    #[test]
    fn weekly_columns_for_two_products() {
        let schema = SheetSchema::new(Tier::Weekly, 2);
        let basic: Vec<_> = DetailField::ALL.iter().map(|f| schema.product_column(Product::Basic, *f)).collect();
        let deluxe: Vec<_> = DetailField::ALL.iter().map(|f| schema.product_column(Product::Deluxe, *f)).collect();
        let totals: Vec<_> = DetailField::ALL.iter().map(|f| schema.grand_total_column(*f)).collect();

        assert_eq!(basic, vec![3, 4, 5]);
        assert_eq!(deluxe, vec![6, 7, 8]);
        assert_eq!(totals, vec![9, 10, 11]);
        assert_eq!(schema.width(), 12);
    }

    #[test]
    fn date_span_shifts_bands() {
        assert_eq!(SheetSchema::new(Tier::Yearly, 2).product_column(Product::Basic, DetailField::UnitsSold), 1);
        assert_eq!(SheetSchema::new(Tier::Monthly, 2).product_column(Product::Deluxe, DetailField::Revenue), 7);
        assert_eq!(SheetSchema::new(Tier::Yearly, 0).grand_total_start(), 1);
    }

    #[test]
    fn validate_requires_sheets_and_headers() {
        let layout = ReportLayout::new(&ReportConfig::default());
        let mut workbook = Workbook::new();
        assert!(matches!(layout.validate(&workbook), Err(ReportError::MissingSheet { .. })));

        for tier in Tier::ALL {
            workbook.add_sheet(Sheet::new(layout.sheet_name(tier)));
        }
        assert!(matches!(layout.validate(&workbook), Err(ReportError::MissingHeaderRow { row: 1, .. })));

        for tier in Tier::ALL {
            workbook.sheet_mut(layout.sheet_name(tier)).unwrap().set(1, 0, "Year");
        }
        assert!(layout.validate(&workbook).is_ok());
    }
}
