use std::path::PathBuf;

use thiserror::Error;

use crate::models::Product;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Debug, Error)]
pub enum ReportError {
    /// 数据库不可达 (连接/TLS/连接池超时), 必须立即失败
    #[error("database unreachable: {0}")]
    Connectivity(#[source] sqlx::Error),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("no price reference for product {product} (id {})", product.id())]
    MissingPriceReference { product: Product },

    #[error("{}:{line}: sales count must be a non-negative integer, got '{content}'", path.display())]
    MalformedLine {
        path: PathBuf,
        line: usize,
        content: String,
    },

    /// 数据库记录数多于文件行数 (文件被截断或损坏)
    #[error("stored record count {stored} exceeds sales file line count {lines}")]
    ReconciliationShrink { stored: usize, lines: usize },

    #[error("{}: file name '{name}' does not match any product", path.display())]
    UnknownProduct { path: PathBuf, name: String },

    #[error("report sheet '{name}' not found")]
    MissingSheet { name: String },

    #[error("report sheet '{sheet}' has no header at row {row}")]
    MissingHeaderRow { sheet: String, row: usize },

    #[error("sheet '{sheet}' cell ({row}, {col}) is not numeric: '{value}'")]
    NonNumericCell {
        sheet: String,
        row: usize,
        col: usize,
        value: String,
    },

    #[error("sheet '{sheet}' row {row}: '{value}' is not a month")]
    InvalidMonth {
        sheet: String,
        row: usize,
        value: String,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
}

impl ReportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<sqlx::Error> for ReportError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => Self::Connectivity(e),
            other => Self::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_is_connectivity() {
        let err: ReportError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, ReportError::Connectivity(_)));

        let err: ReportError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ReportError::Database(_)));
    }

    #[test]
    fn missing_price_names_product() {
        let err = ReportError::MissingPriceReference { product: Product::Deluxe };
        assert_eq!(err.to_string(), "no price reference for product Deluxe (id 200)");
    }
}
