use chrono::Local;
use cupcake_revenue_report::{create_pool, AppConfig, PgSalesStore, ReportPipeline};
use tracing::{error, info};
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting report run with config: {:?}", config.report);

    // 创建数据库连接池
    let pool = create_pool(&config.database).await?;
    info!("Database pool created");

    let store = PgSalesStore::new(pool);
    if config.database.init_schema {
        store.init_schema().await?;
        info!("Database schema ready");
    }

    let pipeline = ReportPipeline::new(store, config);
    let summary = pipeline.run(Local::now().date_naive()).await?;

    info!(
        "新增 {} 条销售记录, 总计 {} 行, 月份转换 {} 个",
        summary.inserted(),
        summary.total_rows,
        summary.months_normalized
    );

    if !summary.is_success() {
        for failure in &summary.failures {
            error!("{}", failure);
        }
        return Err(format!("{} product(s) failed", summary.failures.len()).into());
    }

    Ok(())
}
