use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};

use crate::models::{AggregatedRow, Product, SalesRecord};

/// 建表 (若不存在), 单价表只建不写
pub async fn create_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS product_sales (
            entry_date  date NOT NULL,
            product_id  int4 NOT NULL,
            sales_count int4 NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS product_price (
            product_id    int4 PRIMARY KEY,
            product_price int4 NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// 统计某产品已入库的销售记录数
pub async fn count_sales(pool: &PgPool, product: Product) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT count(*)
        FROM product_sales
        WHERE product_id = $1
        "#,
    )
    .bind(product.id())
    .fetch_one(pool)
    .await
}

/// 查询某产品全部销售记录 (按日期升序)
pub async fn list_sales(pool: &PgPool, product: Product) -> Result<Vec<SalesRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (NaiveDate, i64)>(
        r#"
        SELECT entry_date, sales_count::int8
        FROM product_sales
        WHERE product_id = $1
        ORDER BY entry_date
        "#,
    )
    .bind(product.id())
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(entry_date, sales_count)| SalesRecord {
            entry_date,
            product,
            sales_count,
        })
        .collect())
}

/// 查询产品单价
pub async fn unit_price(pool: &PgPool, product: Product) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT product_price::int8
        FROM product_price
        WHERE product_id = $1
        "#,
    )
    .bind(product.id())
    .fetch_optional(pool)
    .await
}

/// sales_count 列为 int4, 超出范围的销量直接报错而不是截断
fn int4_counts(records: &[SalesRecord]) -> Result<Vec<i32>, sqlx::Error> {
    records
        .iter()
        .map(|r| i32::try_from(r.sales_count).map_err(|e| sqlx::Error::Encode(Box::new(e))))
        .collect()
}

/// 批量插入销售记录 (单事务, 每1000条分块), 要么全部成功要么全部回滚
pub async fn insert_sales(pool: &PgPool, records: &[SalesRecord]) -> Result<u64, sqlx::Error> {
    if records.is_empty() {
        return Ok(0);
    }

    let counts = int4_counts(records)?;
    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for (chunk, counts) in records.chunks(1000).zip(counts.chunks(1000)) {
        let mut query_builder =
            sqlx::QueryBuilder::new("INSERT INTO product_sales (entry_date, product_id, sales_count) ");

        query_builder.push_values(chunk.iter().zip(counts), |mut b, (record, count)| {
            b.push_bind(record.entry_date)
                .push_bind(record.product.id())
                .push_bind(*count);
        });

        let result = query_builder.build().execute(&mut *tx).await?;
        inserted += result.rows_affected();
    }

    tx.commit().await?;
    tracing::debug!("插入 {} 条销售记录", inserted);
    Ok(inserted)
}

/// 汇总查询的原始行: 单价缺失时 unit_price 为空, 无销售记录时 year 为空
#[derive(Debug, FromRow)]
struct ReportRow {
    year: Option<i32>,
    month: Option<i32>,
    week: Option<i32>,
    units_sold: Option<i64>,
    unit_price: Option<i64>,
    revenue: Option<i64>,
}

/// 周次按 ISO 星期 (周一为1) 用 date 运算, 不经过 timestamptz
const REVENUE_REPORT_SQL: &str = r#"
        WITH sales AS (
            SELECT entry_date,
                   sales_count,
                   entry_date - (EXTRACT(ISODOW FROM entry_date)::int4 - 1) AS week_start,
                   date_trunc('month', entry_date)::date AS month_start
            FROM product_sales
            WHERE product_id = $1
        ),
        totals AS (
            SELECT EXTRACT(YEAR FROM entry_date)::int4 AS year,
                   NULL::int4 AS month,
                   NULL::int4 AS week,
                   SUM(sales_count)::int8 AS units_sold
            FROM sales
            GROUP BY 1
          UNION ALL
            SELECT EXTRACT(YEAR FROM entry_date)::int4,
                   EXTRACT(MONTH FROM entry_date)::int4,
                   NULL::int4,
                   SUM(sales_count)::int8
            FROM sales
            GROUP BY 1, 2
          UNION ALL
            SELECT EXTRACT(YEAR FROM entry_date)::int4,
                   EXTRACT(MONTH FROM entry_date)::int4,
                   ((week_start - (month_start - (EXTRACT(ISODOW FROM month_start)::int4 - 1))) / 7 + 1)::int4,
                   SUM(sales_count)::int8
            FROM sales
            GROUP BY 1, 2, 3
        )
        SELECT t.year,
               t.month,
               t.week,
               t.units_sold,
               p.product_price::int8 AS unit_price,
               (p.product_price * t.units_sold)::int8 AS revenue
        FROM (SELECT $1::int4 AS product_id) k
        LEFT JOIN product_price p ON p.product_id = k.product_id
        LEFT JOIN totals t ON true
        ORDER BY t.year DESC NULLS LAST, t.month DESC NULLS LAST, t.week DESC NULLS LAST
        "#;

/// 三级收入汇总查询 (年 / 月 / 周), 关联单价表计算收入
///
/// 周次: 本周周一与当月1日所在周周一相差的天数 / 7 + 1。
/// 全部使用 date 运算, 结果与会话时区无关。
/// 单价在同一条语句中左连接, 返回 `None` 表示该产品没有单价
pub async fn revenue_report(pool: &PgPool, product: Product) -> Result<Option<Vec<AggregatedRow>>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ReportRow>(REVENUE_REPORT_SQL)
        .bind(product.id())
        .fetch_all(pool)
        .await?;

    if rows.first().map_or(true, |r| r.unit_price.is_none()) {
        return Ok(None);
    }

    Ok(Some(
        rows.into_iter()
            .filter_map(|r| {
                Some(AggregatedRow {
                    year: r.year?,
                    month: r.month,
                    week: r.week,
                    units_sold: r.units_sold?,
                    unit_price: r.unit_price?,
                    revenue: r.revenue?,
                })
            })
            .collect(),
    ))
}
