//! 三张表的列布局
//!
//! - SchoolList: UDISE, 名称, Panchayat, 类型
//! - Data: UDISE, 名称, Panchayat, 类型, (报名, 参考) x 8, 时间戳
//! - Status: UDISE, 名称, Panchayat, 百分比 x 8, 全校百分比

use crate::school::model::{ClassEntry, FormDataMap, SchoolRecord, SubmitPayload, MAX_CLASS};
use crate::school::summary::StatusSummary;
use chrono::Local;

pub const SCHOOL_LIST_SHEET: &str = "SchoolList";
pub const DATA_SHEET: &str = "Data";
pub const STATUS_SHEET: &str = "Status";

const DATA_FIRST_CLASS_COL: usize = 4;
pub const STATUS_PERCENT_OFFSET: usize = 3;
pub const STATUS_PERCENT_COLUMNS: usize = MAX_CLASS as usize + 1;

pub fn school_list_header() -> Vec<String> {
    ["UDISE Code", "School Name", "Nyay Panchayat", "School Type"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn data_header() -> Vec<String> {
    let mut row = school_list_header();
    for cls in 1..=MAX_CLASS {
        row.push(format!("Class {} Enrolled", cls));
        row.push(format!("Class {} Appeared", cls));
    }
    row.push("Timestamp".to_string());
    row
}

pub fn status_header() -> Vec<String> {
    let mut row: Vec<String> = school_list_header().into_iter().take(3).collect();
    for cls in 1..=MAX_CLASS {
        row.push(format!("Class {} %", cls));
    }
    row.push("Total %".to_string());
    row
}

fn cell(row: &[String], idx: usize) -> String {
    row.get(idx).cloned().unwrap_or_default()
}

pub fn record_from_row(row: &[String]) -> SchoolRecord {
    SchoolRecord {
        udise: cell(row, 0),
        name: cell(row, 1),
        panchayat: cell(row, 2),
        school_type: cell(row, 3),
    }
}

/// 第 `cls` 个年级报名数所在列
fn enrolled_col(cls: u8) -> usize {
    DATA_FIRST_CLASS_COL + (cls as usize - 1) * 2
}

/// Data 行 -> 已保存的录入值；超出行长度的年级直接跳过
pub fn decode_class_data(row: &[String]) -> FormDataMap {
    let mut data = FormDataMap::new();
    for cls in 1..=MAX_CLASS {
        let enr_idx = enrolled_col(cls);
        if enr_idx >= row.len() {
            continue;
        }
        data.insert(cls, ClassEntry::new(cell(row, enr_idx), cell(row, enr_idx + 1)));
    }
    data
}

pub fn build_data_row(payload: &SubmitPayload, timestamp: &str) -> Vec<String> {
    let mut row = vec![
        payload.udise.clone(),
        payload.name.clone(),
        payload.panchayat.clone(),
        payload.school_type.clone(),
    ];
    for cls in 1..=MAX_CLASS {
        match payload.class_data.get(&cls) {
            Some(entry) => {
                row.push(entry.enrolled.clone());
                row.push(entry.appeared.clone());
            }
            None => {
                row.push(String::new());
                row.push(String::new());
            }
        }
    }
    row.push(timestamp.to_string());
    row
}

pub fn build_status_row(payload: &SubmitPayload, summary: &StatusSummary) -> Vec<String> {
    let mut row = vec![
        payload.udise.clone(),
        payload.name.clone(),
        payload.panchayat.clone(),
    ];
    row.extend(summary.cells());
    row
}

/// 只替换已有 Status 行的百分比列，前三列和之后的列保持不变
pub fn merge_status_row(existing: &[String], summary: &StatusSummary) -> Vec<String> {
    let mut row = existing.to_vec();
    let needed = STATUS_PERCENT_OFFSET + STATUS_PERCENT_COLUMNS;
    if row.len() < needed {
        row.resize(needed, String::new());
    }
    for (i, value) in summary.cells().into_iter().enumerate() {
        row[STATUS_PERCENT_OFFSET + i] = value;
    }
    row
}

/// 形如 `10/19/2026, 3:04:05 PM` 的本地时间
pub fn timestamp_now() -> String {
    Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}
