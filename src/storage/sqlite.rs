use crate::error::EntryError;
use crate::storage::repository::SheetRepository;
use crate::storage::sheet::{Row, Sheet, Workbook};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// 以 SQLite 为后端的工作簿
#[derive(Clone)]
pub struct SqliteWorkbook {
    db: Arc<DatabaseConnection>,
}

impl SqliteWorkbook {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Workbook for SqliteWorkbook {
    async fn sheet(&self, name: &str) -> Result<Option<Arc<dyn Sheet>>, EntryError> {
        if !SheetRepository::exists(&self.db, name).await? {
            return Ok(None);
        }
        Ok(Some(Arc::new(SqliteSheet {
            db: self.db.clone(),
            name: name.to_string(),
        })))
    }
}

pub struct SqliteSheet {
    db: Arc<DatabaseConnection>,
    name: String,
}

#[async_trait]
impl Sheet for SqliteSheet {
    async fn scan(&self) -> Result<Vec<Row>, EntryError> {
        Ok(SheetRepository::load_rows(&self.db, &self.name).await?)
    }

    async fn write_row(&self, index: usize, row: Row) -> Result<(), EntryError> {
        Ok(SheetRepository::write_row(&self.db, &self.name, index, &row).await?)
    }

    async fn append_row(&self, row: Row) -> Result<(), EntryError> {
        Ok(SheetRepository::append_row(&self.db, &self.name, &row).await?)
    }
}
