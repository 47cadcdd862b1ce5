use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::models::Tier;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub input: InputConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// 启动时创建 product_sales / product_price 表 (若不存在)
    pub init_schema: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// 每日销量文件目录, 每个产品一个文件: `<产品名>.txt`
    pub sales_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    pub yearly_sheet: String,
    pub monthly_sheet: String,
    pub weekly_sheet: String,
    /// 数据起始行 (从0开始), 之前的行为表头
    pub start_row: usize,
    /// 月份列 (Monthly / Weekly 表)
    pub month_column: usize,
}

impl ReportConfig {
    pub fn sheet_name(&self, tier: Tier) -> &str {
        match tier {
            Tier::Yearly => &self.yearly_sheet,
            Tier::Monthly => &self.monthly_sheet,
            Tier::Weekly => &self.weekly_sheet,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            input: InputConfig {
                sales_dir: PathBuf::from("sales"),
            },
            report: ReportConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/matildascupcakes".to_string(),
            max_connections: 5,
            init_schema: false,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("resources/template.xlsx"),
            output_path: PathBuf::from("Total_Revenue_Report.xlsx"),
            yearly_sheet: "Yearly".to_string(),
            monthly_sheet: "Monthly".to_string(),
            weekly_sheet: "Weekly".to_string(),
            start_row: 2,
            month_column: 1,
        }
    }
}

impl AppConfig {
    /// 加载配置: 默认值 -> report.toml (可选) -> 环境变量 REPORT__*
    ///
    /// `DATABASE_URL` 优先于其他来源的数据库地址
    pub fn load() -> Result<Self> {
        let file = std::env::var("REPORT_CONFIG").unwrap_or_else(|_| "report.toml".to_string());

        let mut config: AppConfig = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::with_name(&file).required(false))
            .add_source(Environment::with_prefix("REPORT").separator("__"))
            .build()?
            .try_deserialize()?;

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database.url = url;
        }

        Ok(config)
    }
}
