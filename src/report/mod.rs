pub mod grid;
pub mod layout;
pub mod months;
pub mod populator;
pub mod template;
pub mod totals;
pub mod xlsx;

pub use grid::{CellValue, Sheet, Workbook};
pub use layout::{DetailField, ReportLayout, SheetSchema};
pub use months::normalize_months;
pub use populator::{populate, PopulateStats};
pub use template::default_template;
pub use totals::compute_grand_totals;
pub use xlsx::{load_workbook, save_workbook};
