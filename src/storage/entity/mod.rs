pub mod sheet;
pub mod sheet_row;
