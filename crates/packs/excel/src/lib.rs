//! Excel content pack.
//!
//! Actions that create workbooks, add rows, modify, delete and read cells,
//! and find rows matching a condition. Workbooks are read with `calamine`
//! and written with `rust_xlsxwriter`.

pub mod actions;
pub mod condition;
pub mod error;
pub mod format;
pub mod index;
pub mod operations;
pub mod workbook;

use std::sync::Arc;

use actionpack_action::DynAction;

pub use actions::{
    AddExcelData, DeleteCell, GetCell, GetRowIndexByCondition, ModifyCell, NewExcelDocument,
};
pub use error::ExcelError;
pub use workbook::{Cell, CellValue, FileFormat, MergedRange, Workbook, Worksheet};

/// Every action of the pack, ready to register.
pub fn actions() -> Vec<Arc<dyn DynAction>> {
    vec![
        Arc::new(NewExcelDocument::new()),
        Arc::new(AddExcelData::new()),
        Arc::new(ModifyCell::new()),
        Arc::new(DeleteCell::new()),
        Arc::new(GetCell::new()),
        Arc::new(GetRowIndexByCondition::new()),
    ]
}
