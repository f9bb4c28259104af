use crate::school::category::SchoolCategory;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub type ClassNumber = u8;

/// 每所学校最多 8 个年级
pub const MAX_CLASS: ClassNumber = 8;

/// 单个年级的报名/参考人数，保持原始文本（空串表示未填）
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub enrolled: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub appeared: String,
}

impl ClassEntry {
    pub fn new(enrolled: impl Into<String>, appeared: impl Into<String>) -> Self {
        Self {
            enrolled: enrolled.into(),
            appeared: appeared.into(),
        }
    }
}

/// 年级号 -> 录入值。JSON 上的键是字符串形式的数字（"1".."8"）
pub type FormDataMap = BTreeMap<ClassNumber, ClassEntry>;

/// SchoolList 表中的一行
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub udise: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub panchayat: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub school_type: String,
}

impl SchoolRecord {
    pub fn category(&self) -> SchoolCategory {
        SchoolCategory::parse(&self.school_type)
    }
}

/// getSchoolDetails 的返回数据
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolDetails {
    #[serde(deserialize_with = "lenient_string")]
    pub udise: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub panchayat: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub school_type: String,
    #[serde(rename = "existingData", default)]
    pub existing_data: Option<FormDataMap>,
}

impl SchoolDetails {
    pub fn new(record: SchoolRecord, existing_data: Option<FormDataMap>) -> Self {
        Self {
            udise: record.udise,
            name: record.name,
            panchayat: record.panchayat,
            school_type: record.school_type,
            existing_data,
        }
    }

    pub fn category(&self) -> SchoolCategory {
        SchoolCategory::parse(&self.school_type)
    }
}

/// submitData 的载荷
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitPayload {
    #[serde(deserialize_with = "lenient_string")]
    pub udise: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub panchayat: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub school_type: String,
    #[serde(rename = "classData", default, deserialize_with = "lenient_class_data")]
    pub class_data: FormDataMap,
}

/// 表格里的编码经常被当成数字，统一转成字符串；null 视为空串
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(value_to_cell(&v))
}

/// classData 只取 1..=8 的年级；其他键、null 或格式不对的条目直接忽略
pub fn lenient_class_data<'de, D>(deserializer: D) -> Result<FormDataMap, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(map) = Value::deserialize(deserializer)? else {
        return Ok(FormDataMap::new());
    };

    let mut out = FormDataMap::new();
    for (key, entry) in map {
        let Some(cls) = key
            .trim()
            .parse::<ClassNumber>()
            .ok()
            .filter(|c| (1..=MAX_CLASS).contains(c))
        else {
            continue;
        };
        if entry.is_null() {
            continue;
        }
        if let Ok(parsed) = serde_json::from_value::<ClassEntry>(entry) {
            out.insert(cls, parsed);
        }
    }
    Ok(out)
}

pub fn value_to_cell(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
