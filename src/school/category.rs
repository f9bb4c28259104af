use crate::school::model::ClassNumber;

const PRIMARY_CLASSES: &[ClassNumber] = &[1, 2, 3, 4, 5];
const UPPER_PRIMARY_CLASSES: &[ClassNumber] = &[6, 7, 8];
const COMPOSITE_CLASSES: &[ClassNumber] = &[1, 2, 3, 4, 5, 6, 7, 8];

/// 学校类型决定需要录入哪些年级
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchoolCategory {
    /// PS
    Primary,
    /// UPS
    UpperPrimary,
    /// COMP / COMPOSITE
    Composite,
    Unknown(String),
}

impl SchoolCategory {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_uppercase().as_str() {
            "PS" => SchoolCategory::Primary,
            "UPS" => SchoolCategory::UpperPrimary,
            "COMP" | "COMPOSITE" => SchoolCategory::Composite,
            _ => SchoolCategory::Unknown(trimmed.to_string()),
        }
    }

    /// 按显示顺序返回年级号；未知类型为空
    pub fn classes(&self) -> &'static [ClassNumber] {
        match self {
            SchoolCategory::Primary => PRIMARY_CLASSES,
            SchoolCategory::UpperPrimary => UPPER_PRIMARY_CLASSES,
            SchoolCategory::Composite => COMPOSITE_CLASSES,
            SchoolCategory::Unknown(_) => &[],
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, SchoolCategory::Unknown(_))
    }

    pub fn label(&self) -> &str {
        match self {
            SchoolCategory::Primary => "PS",
            SchoolCategory::UpperPrimary => "UPS",
            SchoolCategory::Composite => "COMP",
            SchoolCategory::Unknown(raw) => raw.as_str(),
        }
    }
}
