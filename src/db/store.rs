use sqlx::PgPool;

use super::queries;
use crate::error::{ReportError, Result};
use crate::models::{AggregatedRow, PriceReference, Product, SalesRecord};
use crate::service::aggregator;

/// 销售数据存储接口
#[allow(async_fn_in_trait)]
pub trait SalesStore {
    async fn count_sales(&self, product: Product) -> Result<usize>;

    /// 插入新记录, 全部成功或全部失败
    async fn insert_sales(&self, records: &[SalesRecord]) -> Result<u64>;

    async fn list_sales(&self, product: Product) -> Result<Vec<SalesRecord>>;

    async fn unit_price(&self, product: Product) -> Result<Option<i64>>;

    /// 三级收入汇总, 缺少单价时返回 MissingPriceReference
    async fn revenue_report(&self, product: Product) -> Result<Vec<AggregatedRow>> {
        let unit_price = self
            .unit_price(product)
            .await?
            .ok_or(ReportError::MissingPriceReference { product })?;
        let records = self.list_sales(product).await?;
        Ok(aggregator::aggregate(
            &records,
            PriceReference { product, unit_price },
        ))
    }
}

/// PostgreSQL 存储
pub struct PgSalesStore {
    pool: PgPool,
}

impl PgSalesStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn init_schema(&self) -> Result<()> {
        queries::create_schema(&self.pool).await?;
        Ok(())
    }
}

impl SalesStore for PgSalesStore {
    async fn count_sales(&self, product: Product) -> Result<usize> {
        let count = queries::count_sales(&self.pool, product).await?;
        Ok(count.max(0) as usize)
    }

    async fn insert_sales(&self, records: &[SalesRecord]) -> Result<u64> {
        Ok(queries::insert_sales(&self.pool, records).await?)
    }

    async fn list_sales(&self, product: Product) -> Result<Vec<SalesRecord>> {
        Ok(queries::list_sales(&self.pool, product).await?)
    }

    async fn unit_price(&self, product: Product) -> Result<Option<i64>> {
        Ok(queries::unit_price(&self.pool, product).await?)
    }

    /// 汇总在数据库中完成, 单价缺失时返回 MissingPriceReference
    async fn revenue_report(&self, product: Product) -> Result<Vec<AggregatedRow>> {
        queries::revenue_report(&self.pool, product)
            .await?
            .ok_or(ReportError::MissingPriceReference { product })
    }
}
