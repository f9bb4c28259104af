use crate::error::EntryError;
use crate::school::rows::{
    build_data_row, build_status_row, merge_status_row, timestamp_now, DATA_SHEET, STATUS_SHEET,
};
use crate::school::summary::compute_summary;
use crate::school::SubmitPayload;
use crate::storage::{find_by_key, Workbook};
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

impl UpsertOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            UpsertOutcome::Created => "Data saved successfully",
            UpsertOutcome::Updated => "Data updated successfully",
        }
    }
}

/// 写入 Data 表并刷新 Status 表
///
/// 所有提交共用一把锁，整个写入过程串行执行。
pub struct UpsertService {
    workbook: Arc<dyn Workbook>,
    write_lock: Arc<Mutex<()>>,
    lock_timeout: Duration,
}

impl UpsertService {
    pub fn new(workbook: Arc<dyn Workbook>, lock_timeout: Duration) -> Self {
        Self {
            workbook,
            write_lock: Arc::new(Mutex::new(())),
            lock_timeout,
        }
    }

    pub async fn submit(&self, payload: &SubmitPayload) -> Result<UpsertOutcome, EntryError> {
        let _guard = tokio::time::timeout(self.lock_timeout, self.write_lock.lock())
            .await
            .map_err(|_| {
                warn!("{}s 内未拿到写锁，提交被拒绝: {}", self.lock_timeout.as_secs(), payload.udise);
                EntryError::Contention
            })?;

        let outcome = self.upsert_data(payload).await?;

        // Status 表失败只记日志，不影响主数据的结果
        if let Err(e) = self.upsert_status(payload).await {
            error!("Error updating status sheet: {}", e);
        }

        info!("✓ {} {:?}", payload.udise.trim(), outcome);
        Ok(outcome)
    }

    async fn upsert_data(&self, payload: &SubmitPayload) -> Result<UpsertOutcome, EntryError> {
        let sheet = self.workbook.require_sheet(DATA_SHEET).await?;
        let rows = sheet.scan().await?;
        let row = build_data_row(payload, &timestamp_now());

        match find_by_key(&rows, payload.udise.trim()) {
            Some(idx) => {
                sheet.write_row(idx, row).await?;
                Ok(UpsertOutcome::Updated)
            }
            None => {
                sheet.append_row(row).await?;
                Ok(UpsertOutcome::Created)
            }
        }
    }

    async fn upsert_status(&self, payload: &SubmitPayload) -> Result<(), EntryError> {
        let sheet = self.workbook.require_sheet(STATUS_SHEET).await?;
        let rows = sheet.scan().await?;
        let summary = compute_summary(&payload.class_data);

        match find_by_key(&rows, payload.udise.trim()) {
            Some(idx) => sheet.write_row(idx, merge_status_row(&rows[idx], &summary)).await,
            None => sheet.append_row(build_status_row(payload, &summary)).await,
        }
    }

    #[cfg(test)]
    fn lock_handle(&self) -> Arc<Mutex<()>> {
        self.write_lock.clone()
    }
}
