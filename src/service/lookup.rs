use crate::error::EntryError;
use crate::school::rows::{decode_class_data, record_from_row, DATA_SHEET, SCHOOL_LIST_SHEET};
use crate::school::{FormDataMap, SchoolDetails, SchoolRecord};
use crate::storage::{find_by_key, Workbook};
use log::{info, warn};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupResult {
    pub record: SchoolRecord,
    pub existing: Option<FormDataMap>,
}

impl From<LookupResult> for SchoolDetails {
    fn from(r: LookupResult) -> Self {
        SchoolDetails::new(r.record, r.existing)
    }
}

/// 只读：按 UDISE 查学校，并带出已保存的数据
pub struct LookupService {
    workbook: Arc<dyn Workbook>,
}

impl LookupService {
    pub fn new(workbook: Arc<dyn Workbook>) -> Self {
        Self { workbook }
    }

    pub async fn lookup(&self, identifier: &str) -> Result<LookupResult, EntryError> {
        let udise = identifier.trim();

        let list = self.workbook.require_sheet(SCHOOL_LIST_SHEET).await?;
        let list_rows = list.scan().await?;
        let idx = find_by_key(&list_rows, udise).ok_or(EntryError::NotFound)?;
        let record = record_from_row(&list_rows[idx]);
        if !record.category().is_known() {
            warn!("⚠ {} 的学校类型无法识别: '{}'", udise, record.school_type);
        }

        let data = self.workbook.require_sheet(DATA_SHEET).await?;
        let data_rows = data.scan().await?;
        let existing = find_by_key(&data_rows, udise).map(|i| decode_class_data(&data_rows[i]));

        info!(
            "lookup {} -> {} ({})",
            udise,
            record.name,
            if existing.is_some() { "已有数据" } else { "新录入" }
        );
        Ok(LookupResult { record, existing })
    }
}
