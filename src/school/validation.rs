use crate::error::EntryError;
use crate::school::category::SchoolCategory;
use crate::school::model::{ClassEntry, FormDataMap};
use regex::Regex;
use std::sync::OnceLock;

fn digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // \d 在 regex crate 里包含 Unicode 数字，这里只要 ASCII
    RE.get_or_init(|| Regex::new(r"^[0-9]*$").expect("static regex"))
}

/// 输入框只接受数字（允许空串）
pub fn is_digit_input(value: &str) -> bool {
    digits_re().is_match(value)
}

/// 人数文本转数值；空串为 0，超出 u64 的纯数字串按最大值处理
pub fn parse_count(value: &str) -> u64 {
    let t = value.trim();
    if t.is_empty() {
        return 0;
    }
    match t.parse::<u64>() {
        Ok(v) => v,
        Err(_) if is_digit_input(t) => u64::MAX,
        Err(_) => 0,
    }
}

/// 参考人数大于报名人数
pub fn entry_is_invalid(entry: &ClassEntry) -> bool {
    parse_count(&entry.appeared) > parse_count(&entry.enrolled)
}

/// 提交前的本地校验，失败时不发出任何网络请求
pub fn validate_form(category: &SchoolCategory, form: &FormDataMap) -> Result<(), EntryError> {
    if let SchoolCategory::Unknown(raw) = category {
        return Err(EntryError::Validation(format!(
            "Unsupported school type '{}'.",
            raw
        )));
    }

    let blank = ClassEntry::default();
    for cls in category.classes() {
        let entry = form.get(cls).unwrap_or(&blank);
        if entry_is_invalid(entry) {
            return Err(EntryError::Validation(format!(
                "Class {}: Appeared cannot be greater than Enrolled.",
                cls
            )));
        }
    }
    Ok(())
}

/// 只保留当前学校类型相关的年级
pub fn relevant_class_data(category: &SchoolCategory, form: &FormDataMap) -> FormDataMap {
    category
        .classes()
        .iter()
        .filter_map(|cls| form.get(cls).map(|e| (*cls, e.clone())))
        .collect()
}
