use std::collections::HashMap;
use std::sync::Mutex;

use super::SalesStore;
use crate::error::Result;
use crate::models::{Product, SalesRecord};

/// 内存存储, 用于测试与本地试跑
#[derive(Debug, Default)]
pub struct MemoryStore {
    sales: Mutex<Vec<SalesRecord>>,
    prices: HashMap<Product, i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, product: Product, unit_price: i64) -> Self {
        self.prices.insert(product, unit_price);
        self
    }

    pub fn records(&self) -> Vec<SalesRecord> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SalesRecord>> {
        self.sales.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SalesStore for MemoryStore {
    async fn count_sales(&self, product: Product) -> Result<usize> {
        Ok(self.lock().iter().filter(|r| r.product == product).count())
    }

    async fn insert_sales(&self, records: &[SalesRecord]) -> Result<u64> {
        self.lock().extend_from_slice(records);
        Ok(records.len() as u64)
    }

    async fn list_sales(&self, product: Product) -> Result<Vec<SalesRecord>> {
        let mut records: Vec<_> = self
            .lock()
            .iter()
            .filter(|r| r.product == product)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.entry_date);
        Ok(records)
    }

    async fn unit_price(&self, product: Product) -> Result<Option<i64>> {
        Ok(self.prices.get(&product).copied())
    }
}
