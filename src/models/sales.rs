use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Product;

/// 每日销售记录 (product_sales)
///
/// 同一 (日期, 产品) 最多一条, 由对账增量保证, 写入后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub entry_date: NaiveDate,
    pub product: Product,
    pub sales_count: i64,
}

/// 产品单价 (product_price), 外部维护, 只读
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceReference {
    pub product: Product,
    pub unit_price: i64,
}
