/// 录入流程中所有可见错误
///
/// 服务端在边界处统一转成 `{ success: false, message }`，客户端直接展示 `to_string()`。
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EntryError {
    #[error("School not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Network(String),
    #[error("{0}")]
    Backend(String),
    #[error("Another submission is in progress, please try again")]
    Contention,
    #[error("configuration error: {0}")]
    Config(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl EntryError {
    /// 用户重新提交即可恢复的错误
    pub fn is_retryable(&self) -> bool {
        matches!(self, EntryError::Network(_) | EntryError::Contention)
    }
}

impl From<sea_orm::DbErr> for EntryError {
    fn from(e: sea_orm::DbErr) -> Self {
        EntryError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for EntryError {
    fn from(e: serde_json::Error) -> Self {
        EntryError::Storage(e.to_string())
    }
}
