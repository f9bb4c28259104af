use crate::error::EntryError;
use crate::storage::sheet::{Row, Sheet, Workbook};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// 内存表，测试用
pub struct MemorySheet {
    name: String,
    rows: tokio::sync::RwLock<Vec<Row>>,
}

impl MemorySheet {
    pub fn new(name: &str, rows: Vec<Row>) -> Self {
        Self {
            name: name.to_string(),
            rows: tokio::sync::RwLock::new(rows),
        }
    }
}

#[async_trait]
impl Sheet for MemorySheet {
    async fn scan(&self) -> Result<Vec<Row>, EntryError> {
        Ok(self.rows.read().await.clone())
    }

    async fn write_row(&self, index: usize, row: Row) -> Result<(), EntryError> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(index) {
            Some(slot) => {
                *slot = row;
                Ok(())
            }
            None => Err(EntryError::Storage(format!(
                "row {} out of range in sheet '{}'",
                index, self.name
            ))),
        }
    }

    async fn append_row(&self, row: Row) -> Result<(), EntryError> {
        self.rows.write().await.push(row);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryWorkbook {
    sheets: RwLock<HashMap<String, Arc<MemorySheet>>>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(self, name: &str, rows: Vec<Row>) -> Self {
        self.add_sheet(name, rows);
        self
    }

    pub fn add_sheet(&self, name: &str, rows: Vec<Row>) {
        let sheet = Arc::new(MemorySheet::new(name, rows));
        if let Ok(mut sheets) = self.sheets.write() {
            sheets.insert(name.to_string(), sheet);
        }
    }
}

#[async_trait]
impl Workbook for MemoryWorkbook {
    async fn sheet(&self, name: &str) -> Result<Option<Arc<dyn Sheet>>, EntryError> {
        let sheets = self
            .sheets
            .read()
            .map_err(|_| EntryError::Storage("workbook lock poisoned".to_string()))?;
        Ok(sheets.get(name).map(|s| s.clone() as Arc<dyn Sheet>))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn write_and_append_keep_row_order() {
        let wb = MemoryWorkbook::new().with_sheet("T", vec![row(&["h"]), row(&["a"])]);
        let sheet = wb.require_sheet("T").await.unwrap();
        sheet.append_row(row(&["b"])).await.unwrap();
        sheet.write_row(1, row(&["a2"])).await.unwrap();
        assert_eq!(
            sheet.scan().await.unwrap(),
            vec![row(&["h"]), row(&["a2"]), row(&["b"])]
        );
    }

    #[tokio::test]
    async fn out_of_range_write_fails() {
        let wb = MemoryWorkbook::new().with_sheet("T", vec![row(&["h"])]);
        let sheet = wb.require_sheet("T").await.unwrap();
        assert!(sheet.write_row(3, row(&["x"])).await.is_err());
    }

    #[tokio::test]
    async fn missing_sheet_is_none() {
        let wb = MemoryWorkbook::new();
        assert!(wb.sheet("Status").await.unwrap().is_none());
        assert!(matches!(
            wb.require_sheet("Status").await,
            Err(EntryError::Storage(_))
        ));
    }
}
