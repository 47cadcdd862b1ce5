//! PgSalesStore 集成测试, 需要 `DATABASE_URL`; 未设置时跳过
//!
//! 每个测试使用独立 schema, 会话时区固定为 America/New_York (含夏令时切换)

use chrono::{Duration, NaiveDate};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::str::FromStr;

use cupcake_revenue_report::models::{AggregatedRow, Product, SalesRecord};
use cupcake_revenue_report::{MemoryStore, PgSalesStore, ReportError, SalesStore};

async fn scoped_store(name: &str) -> Option<PgSalesStore> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL 未设置, 跳过 {name}");
        return None;
    };
    let schema = format!("report_test_{}_{}", name, std::process::id());

    let admin = PgPool::connect(&url).await.unwrap();
    sqlx::query(&format!("DROP SCHEMA IF EXISTS {schema} CASCADE"))
        .execute(&admin)
        .await
        .unwrap();
    sqlx::query(&format!("CREATE SCHEMA {schema}"))
        .execute(&admin)
        .await
        .unwrap();
    admin.close().await;

    let options = PgConnectOptions::from_str(&url)
        .unwrap()
        .options([("search_path", schema.as_str()), ("TimeZone", "America/New_York")]);
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect_with(options)
        .await
        .unwrap();

    let store = PgSalesStore::new(pool);
    store.init_schema().await.unwrap();
    Some(store)
}

async fn set_price(store: &PgSalesStore, product: Product, price: i32) {
    sqlx::query("INSERT INTO product_price (product_id, product_price) VALUES ($1, $2)")
        .bind(product.id())
        .bind(price)
        .execute(store.pool())
        .await
        .unwrap();
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn records(product: Product, dates: &[NaiveDate]) -> Vec<SalesRecord> {
    dates
        .iter()
        .enumerate()
        .map(|(i, &entry_date)| SalesRecord {
            entry_date,
            product,
            sales_count: i as i64 + 1,
        })
        .collect()
}

/// 同样的记录交给内存实现汇总, 作为对照
async fn expected_report(product: Product, price: i64, sales: &[SalesRecord]) -> Vec<AggregatedRow> {
    let memory = MemoryStore::new().with_price(product, price);
    memory.insert_sales(sales).await.unwrap();
    memory.revenue_report(product).await.unwrap()
}

#[tokio::test]
async fn weekly_buckets_ignore_session_time_zone() {
    let Some(store) = scoped_store("dst_weeks").await else { return };
    set_price(&store, Product::Basic, 2).await;

    // 2024-03-10 美东进入夏令时; 3月1日为周五
    let sales = records(
        Product::Basic,
        &[day(2024, 3, 1), day(2024, 3, 4), day(2024, 3, 11), day(2024, 3, 18)],
    );
    store.insert_sales(&sales).await.unwrap();

    let rows = store.revenue_report(Product::Basic).await.unwrap();
    let weeks: Vec<_> = rows.iter().filter_map(|r| r.week).collect();
    assert_eq!(weeks, vec![4, 3, 2, 1]);
    assert_eq!(rows, expected_report(Product::Basic, 2, &sales).await);
}

#[tokio::test]
async fn report_order_matches_in_memory_aggregation() {
    let Some(store) = scoped_store("order").await else { return };
    set_price(&store, Product::Deluxe, 5).await;

    let sales = records(
        Product::Deluxe,
        &[
            day(2023, 11, 30),
            day(2023, 12, 31),
            day(2024, 1, 1),
            day(2024, 2, 29),
            day(2024, 3, 31),
        ],
    );
    store.insert_sales(&sales).await.unwrap();

    let rows = store.revenue_report(Product::Deluxe).await.unwrap();
    assert_eq!(rows, expected_report(Product::Deluxe, 5, &sales).await);
    // 年汇总行排在该年月/周行之后
    assert_eq!((rows[0].year, rows[0].month), (2024, Some(3)));
    assert!(rows.iter().any(|r| r.year == 2023 && r.month.is_none()));
}

#[tokio::test]
async fn missing_price_is_reported_not_empty() {
    let Some(store) = scoped_store("no_price").await else { return };
    store
        .insert_sales(&records(Product::Basic, &[day(2024, 3, 1)]))
        .await
        .unwrap();

    let err = store.revenue_report(Product::Basic).await.unwrap_err();
    assert!(matches!(err, ReportError::MissingPriceReference { product: Product::Basic }));

    // 有单价但无销量: 空结果
    set_price(&store, Product::Deluxe, 5).await;
    assert!(store.revenue_report(Product::Deluxe).await.unwrap().is_empty());
}

#[tokio::test]
async fn bulk_insert_spans_chunks_in_one_transaction() {
    let Some(store) = scoped_store("bulk").await else { return };
    let start = day(2020, 1, 1);
    let sales: Vec<_> = (0..2500)
        .map(|i| SalesRecord {
            entry_date: start + Duration::days(i),
            product: Product::Basic,
            sales_count: 1,
        })
        .collect();

    assert_eq!(store.insert_sales(&sales).await.unwrap(), 2500);
    assert_eq!(store.count_sales(Product::Basic).await.unwrap(), 2500);

    let mut oversized = records(Product::Deluxe, &[day(2024, 3, 1), day(2024, 3, 2)]);
    oversized[1].sales_count = 3_000_000_000;
    let err = store.insert_sales(&oversized).await.unwrap_err();
    assert!(matches!(err, ReportError::Database(_)));
    assert_eq!(store.count_sales(Product::Deluxe).await.unwrap(), 0);
}
