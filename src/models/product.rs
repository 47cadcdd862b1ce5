use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 产品 (纸杯蛋糕类型)
///
/// 编号同时是数据库主键和报表列偏移的倍数: `编号 / 100 - 1` 即产品列段序号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Product {
    Basic,
    Deluxe,
}

impl Product {
    pub const ALL: [Product; 2] = [Product::Basic, Product::Deluxe];

    pub fn id(self) -> i32 {
        match self {
            Product::Basic => 100,
            Product::Deluxe => 200,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Product::Basic => "Basic",
            Product::Deluxe => "Deluxe",
        }
    }

    /// 报表中的产品列段序号 (从0开始)
    pub fn band_index(self) -> usize {
        (self.id() / 100 - 1) as usize
    }

    /// 报表需要预留的产品列段数量
    pub fn band_count() -> usize {
        Self::ALL
            .iter()
            .map(|p| p.band_index() + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Product {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown product '{}'", s))
    }
}
