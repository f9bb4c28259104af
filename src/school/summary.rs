use crate::school::model::{FormDataMap, MAX_CLASS};

/// Status 表中的 9 个百分比单元格（8 个年级 + 全校）
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusSummary {
    pub per_class: Vec<String>,
    pub overall: String,
}

impl StatusSummary {
    pub fn cells(&self) -> Vec<String> {
        let mut cells = self.per_class.clone();
        cells.push(self.overall.clone());
        cells
    }
}

/// 按年级计算参考率
///
/// 报名数和参考数都已填写且报名数 > 0 的年级才计入合计，其余单元格留空。
pub fn compute_summary(class_data: &FormDataMap) -> StatusSummary {
    let mut total_enrolled = 0.0_f64;
    let mut total_appeared = 0.0_f64;
    let mut per_class = Vec::with_capacity(MAX_CLASS as usize);

    for cls in 1..=MAX_CLASS {
        let mut cell = String::new();
        if let Some(entry) = class_data.get(&cls) {
            if !entry.enrolled.is_empty() && !entry.appeared.is_empty() {
                let enr = leading_number(&entry.enrolled);
                let app = leading_number(&entry.appeared);
                if enr > 0.0 {
                    cell = format_percent(app, enr);
                    total_enrolled += enr;
                    total_appeared += app;
                }
            }
        }
        per_class.push(cell);
    }

    let overall = if total_enrolled > 0.0 {
        format_percent(total_appeared, total_enrolled)
    } else {
        String::new()
    };

    StatusSummary { per_class, overall }
}

pub fn format_percent(part: f64, whole: f64) -> String {
    format!("{:.2}%", (part / whole) * 100.0)
}

/// 取字符串开头的数字部分，解析不出来按 0 处理
///
/// 只认普通小数（可带正负号），不处理指数写法：`"1e2"` 得到 1。
fn leading_number(raw: &str) -> f64 {
    let t = raw.trim_start();
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in t.char_indices() {
        let ok = c.is_ascii_digit()
            || (c == '.' && !seen_dot)
            || (i == 0 && (c == '+' || c == '-'));
        if !ok {
            break;
        }
        if c == '.' {
            seen_dot = true;
        }
        end = i + c.len_utf8();
    }
    t[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
