use chrono::NaiveDate;
use std::fmt;
use std::path::{Path, PathBuf};

use super::{reconciler, sales_file};
use crate::config::AppConfig;
use crate::db::SalesStore;
use crate::error::{ReportError, Result};
use crate::models::{Product, Tier};
use crate::report::{self, PopulateStats, ReportLayout, Workbook};

/// 单个产品处理流程中的阶段, 用于定位失败
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discover,
    Read,
    Reconcile,
    Persist,
    Aggregate,
    Populate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Discover => "discover",
            Stage::Read => "read",
            Stage::Reconcile => "reconcile",
            Stage::Persist => "persist",
            Stage::Aggregate => "aggregate",
            Stage::Populate => "populate",
        };
        f.write_str(name)
    }
}

/// 产品处理成功的统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductOutcome {
    pub product: Product,
    pub file: PathBuf,
    pub inserted: u64,
    pub rows: PopulateStats,
}

/// 产品处理失败: 哪个文件、哪个产品、哪个阶段
#[derive(Debug)]
pub struct ProductFailure {
    pub file: PathBuf,
    pub product: Option<Product>,
    pub stage: Stage,
    pub error: ReportError,
}

impl fmt::Display for ProductFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.product {
            Some(product) => write!(
                f,
                "{} ({}) failed at {}: {}",
                product,
                self.file.display(),
                self.stage,
                self.error
            ),
            None => write!(f, "{} failed at {}: {}", self.file.display(), self.stage, self.error),
        }
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub products: Vec<ProductOutcome>,
    pub failures: Vec<ProductFailure>,
    pub total_rows: usize,
    pub months_normalized: usize,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn inserted(&self) -> u64 {
        self.products.iter().map(|p| p.inserted).sum()
    }
}

/// 报表流水线: 对账入库 -> 汇总 -> 填表 (逐产品), 然后计算总计、转换月份名
///
/// 每个阶段结束都将报表保存到输出路径, 失败后可从上一个完成的阶段重跑
pub struct ReportPipeline<S: SalesStore> {
    store: S,
    config: AppConfig,
    layout: ReportLayout,
}

impl<S: SalesStore> ReportPipeline<S> {
    pub fn new(store: S, config: AppConfig) -> Self {
        let layout = ReportLayout::new(&config.report);
        Self {
            store,
            config,
            layout,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 执行一次完整运行, `today` 用于给新记录分配日期
    ///
    /// 模板或输出文件出错、数据库不可达时直接返回错误; 其他单个产品失败只记录, 继续处理下一个
    pub async fn run(&self, today: NaiveDate) -> Result<RunSummary> {
        let files = sales_file::list_sales_files(&self.config.input.sales_dir)?;
        tracing::info!(
            "发现 {} 个销量文件: {}",
            files.len(),
            self.config.input.sales_dir.display()
        );

        // 从模板创建新报表, 不修改模板本身
        let mut workbook = report::load_workbook(&self.config.report.template_path)?;
        self.layout.validate(&workbook)?;
        self.save(&workbook)?;

        let mut summary = RunSummary::default();

        for file in &files {
            match self.process_file(file, &mut workbook, today).await {
                Ok(outcome) => {
                    self.save(&workbook)?;
                    tracing::info!(
                        "产品 {} 处理完成: 新增 {} 条, 年/月/周 {}/{}/{} 行",
                        outcome.product,
                        outcome.inserted,
                        outcome.rows.yearly_rows,
                        outcome.rows.monthly_rows,
                        outcome.rows.weekly_rows
                    );
                    summary.products.push(outcome);
                }
                Err(failure) if matches!(failure.error, ReportError::Connectivity(_)) => {
                    tracing::error!("{}, 终止运行", failure);
                    return Err(failure.error);
                }
                Err(failure) => {
                    tracing::error!("{}", failure);
                    summary.failures.push(failure);
                }
            }
        }

        summary.total_rows = self.update_grand_totals(&mut workbook)?;
        self.save(&workbook)?;

        summary.months_normalized = self.update_month_names(&mut workbook)?;
        self.save(&workbook)?;

        tracing::info!(
            "报表已生成 {}: 成功 {} 个产品, 失败 {} 个",
            self.config.report.output_path.display(),
            summary.products.len(),
            summary.failures.len()
        );
        Ok(summary)
    }

    async fn process_file(
        &self,
        file: &Path,
        workbook: &mut Workbook,
        today: NaiveDate,
    ) -> std::result::Result<ProductOutcome, ProductFailure> {
        let fail = |product: Option<Product>, stage: Stage| {
            move |error: ReportError| ProductFailure {
                file: file.to_path_buf(),
                product,
                stage,
                error,
            }
        };

        let product = sales_file::product_for(file).map_err(fail(None, Stage::Discover))?;
        let counts = sales_file::read_sales_counts(file).map_err(fail(Some(product), Stage::Read))?;

        // 1. 对账: 文件行数 vs 已入库记录数
        let existing = self
            .store
            .count_sales(product)
            .await
            .map_err(fail(Some(product), Stage::Reconcile))?;
        let reconciliation = reconciler::reconcile(&counts, existing, today)
            .map_err(fail(Some(product), Stage::Reconcile))?;

        // 2. 入库
        let inserted = if reconciliation.is_empty() {
            tracing::info!("产品 {}: No new records to insert in database.", product);
            0
        } else {
            let records = reconciler::to_records(product, &reconciliation);
            let inserted = self
                .store
                .insert_sales(&records)
                .await
                .map_err(fail(Some(product), Stage::Persist))?;
            tracing::info!("产品 {}: Successfully inserted {} new records.", product, inserted);
            inserted
        };

        // 3. 汇总
        let rows = self
            .store
            .revenue_report(product)
            .await
            .map_err(fail(Some(product), Stage::Aggregate))?;
        tracing::debug!("产品 {} 汇总 {} 行", product, rows.len());

        // 4. 填表
        let stats = report::populate(workbook, &self.layout, &rows, product)
            .map_err(fail(Some(product), Stage::Populate))?;

        Ok(ProductOutcome {
            product,
            file: file.to_path_buf(),
            inserted,
            rows: stats,
        })
    }

    fn update_grand_totals(&self, workbook: &mut Workbook) -> Result<usize> {
        let mut total_rows = 0;
        for tier in Tier::ALL {
            let schema = self.layout.schema(tier);
            let sheet = workbook.sheet_mut(self.layout.sheet_name(tier))?;
            let rows = report::compute_grand_totals(sheet, &schema, self.layout.start_row())?;
            tracing::info!("{}: 计算总计 {} 行", sheet.name, rows);
            total_rows += rows;
        }
        Ok(total_rows)
    }

    fn update_month_names(&self, workbook: &mut Workbook) -> Result<usize> {
        let mut replaced = 0;
        for tier in Tier::ALL.into_iter().filter(|t| t.has_month()) {
            let sheet = workbook.sheet_mut(self.layout.sheet_name(tier))?;
            replaced += report::normalize_months(sheet, self.layout.month_column(), self.layout.start_row())?;
        }
        Ok(replaced)
    }

    fn save(&self, workbook: &Workbook) -> Result<()> {
        report::save_workbook(workbook, &self.config.report.output_path)
    }
}
