use crate::error::EntryError;
use async_trait::async_trait;
use std::sync::Arc;

/// 一行单元格，第 0 行是表头
pub type Row = Vec<String>;

/// 按行号寻址的表格
///
/// 只暴露三种原语：整表读取、按行号覆盖、追加到末尾。
#[async_trait]
pub trait Sheet: Send + Sync {
    /// 按行号顺序返回所有行（含表头）
    async fn scan(&self) -> Result<Vec<Row>, EntryError>;

    async fn write_row(&self, index: usize, row: Row) -> Result<(), EntryError>;

    async fn append_row(&self, row: Row) -> Result<(), EntryError>;
}

/// 一组按名称查找的表
#[async_trait]
pub trait Workbook: Send + Sync {
    async fn sheet(&self, name: &str) -> Result<Option<Arc<dyn Sheet>>, EntryError>;

    async fn require_sheet(&self, name: &str) -> Result<Arc<dyn Sheet>, EntryError> {
        self.sheet(name)
            .await?
            .ok_or_else(|| EntryError::Storage(format!("sheet '{}' not found", name)))
    }
}

/// 跳过表头，找第一列（去掉首尾空白后）等于 `key` 的第一行
pub fn find_by_key(rows: &[Row], key: &str) -> Option<usize> {
    rows.iter()
        .enumerate()
        .skip(1)
        .find(|(_, row)| row.first().map(|c| c.trim()) == Some(key))
        .map(|(idx, _)| idx)
}
