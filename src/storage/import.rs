use crate::error::EntryError;
use crate::school::rows::SCHOOL_LIST_SHEET;
use crate::storage::sheet::{Row, Workbook};
use log::{info, warn};
use std::collections::HashSet;
use std::io::Read;

/// 从 CSV 导入学校名单（首行为表头）
///
/// 只追加表中还没有的 UDISE，重复导入不会产生重复行。返回新增行数。
pub async fn import_school_list<R: Read>(
    workbook: &dyn Workbook,
    source: R,
) -> Result<usize, EntryError> {
    let sheet = workbook.require_sheet(SCHOOL_LIST_SHEET).await?;
    let mut known: HashSet<String> = sheet
        .scan()
        .await?
        .iter()
        .skip(1)
        .filter_map(|r| r.first().map(|c| c.trim().to_string()))
        .collect();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut pending: Vec<Row> = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| EntryError::Storage(format!("csv: {}", e)))?;
        let udise = record.get(0).unwrap_or("").to_string();
        if udise.is_empty() {
            warn!("CSV 第 {} 行缺少 UDISE，已跳过", line + 2);
            continue;
        }
        if !known.insert(udise.clone()) {
            continue;
        }
        pending.push(vec![
            udise,
            record.get(1).unwrap_or("").to_string(),
            record.get(2).unwrap_or("").to_string(),
            record.get(3).unwrap_or("").to_string(),
        ]);
    }

    let added = pending.len();
    for row in pending {
        sheet.append_row(row).await?;
    }
    info!("学校名单导入完成: 新增 {} 行", added);
    Ok(added)
}

pub async fn import_school_list_file(
    workbook: &dyn Workbook,
    path: &str,
) -> Result<usize, EntryError> {
    let file = std::fs::File::open(path)
        .map_err(|e| EntryError::Config(format!("SCHOOL_LIST_CSV={}: {}", path, e)))?;
    import_school_list(workbook, file).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::school::rows::school_list_header;
    use crate::storage::memory::MemoryWorkbook;

    const CSV: &str = "udise,name,panchayat,type\n\
        9050300106,PS Rampur,Rampur,PS\n\
        9050300107, UPS Khera ,Khera,UPS\n\
        ,missing,x,PS\n\
        9050300106,Duplicate,Rampur,PS\n";

    #[tokio::test]
    async fn imports_new_rows_once() {
        let wb = MemoryWorkbook::new().with_sheet(SCHOOL_LIST_SHEET, vec![school_list_header()]);
        assert_eq!(import_school_list(&wb, CSV.as_bytes()).await.unwrap(), 2);
        assert_eq!(import_school_list(&wb, CSV.as_bytes()).await.unwrap(), 0);

        let rows = wb.require_sheet(SCHOOL_LIST_SHEET).await.unwrap().scan().await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][1], "PS Rampur");
        assert_eq!(rows[2][1], "UPS Khera");
    }

    #[tokio::test]
    async fn missing_sheet_is_an_error() {
        let wb = MemoryWorkbook::new();
        assert!(import_school_list(&wb, CSV.as_bytes()).await.is_err());
    }
}
