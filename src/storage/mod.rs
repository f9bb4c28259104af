pub mod connection;
pub mod entity;
pub mod import;
#[cfg(test)]
pub mod memory;
pub mod repository;
pub mod sheet;
pub mod sqlite;

pub use connection::{ensure_workbook, establish_connection};
#[cfg(test)]
pub use memory::MemoryWorkbook;
pub use sheet::{find_by_key, Workbook};
pub use sqlite::SqliteWorkbook;
