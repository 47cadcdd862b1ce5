pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod report;
pub mod service;

pub use config::AppConfig;
pub use db::{create_pool, MemoryStore, PgSalesStore, SalesStore};
pub use error::{ReportError, Result};
pub use service::ReportPipeline;
