use super::grid::{Sheet, Workbook};
use super::layout::{DetailField, ReportLayout};
use crate::models::{Product, Tier};

/// 生成空白报表模板: 每个工作表两行表头 (产品名 / 字段名)
pub fn default_template(layout: &ReportLayout) -> Workbook {
    let header_row = layout.start_row().saturating_sub(1);
    let title_row = header_row.saturating_sub(1);
    let mut workbook = Workbook::new();

    for tier in Tier::ALL {
        let schema = layout.schema(tier);
        let mut sheet = Sheet::new(layout.sheet_name(tier));

        for (col, label) in ["Year", "Month", "Week"].into_iter().take(schema.date_span()).enumerate() {
            sheet.set(header_row, col, label);
        }
        for product in Product::ALL.into_iter().filter(|p| p.band_index() < schema.product_bands) {
            sheet.set(title_row, schema.product_column(product, DetailField::UnitsSold), product.name());
            for field in DetailField::ALL {
                sheet.set(header_row, schema.product_column(product, field), field.label());
            }
        }
        sheet.set(title_row, schema.grand_total_start(), "Grand Total");
        for field in DetailField::ALL {
            sheet.set(header_row, schema.grand_total_column(field), field.label());
        }

        workbook.add_sheet(sheet);
    }

    workbook
}
