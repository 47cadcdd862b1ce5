use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::error::{ReportError, Result};

/// 创建数据库连接池
///
/// 连接失败一律视为 Connectivity 错误, 不允许带着空连接继续运行
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let mut connect_options = PgConnectOptions::from_str(&config.url)?;

    // 设置慢查询日志阈值为 5秒
    connect_options = connect_options.log_slow_statements(
        tracing::log::LevelFilter::Warn,
        Duration::from_secs(5),
    );

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(connect_options)
        .await
        .map_err(|e| match e {
            sqlx::Error::Configuration(_) => ReportError::Database(e),
            other => ReportError::Connectivity(other),
        })
}
