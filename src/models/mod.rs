pub mod product;
pub mod report;
pub mod sales;

pub use product::Product;
pub use report::{AggregatedRow, Tier};
pub use sales::{PriceReference, SalesRecord};
