use super::dto::{ApiRequest, ApiResponse};
use crate::config::ClientConfig;
use crate::error::EntryError;
use crate::school::{SchoolDetails, SubmitPayload};
use log::{info, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

const LOOKUP_NETWORK_ERROR: &str = "Network error or Invalid API URL.";
const SUBMIT_NETWORK_ERROR: &str = "Failed to submit data.";

/// 录入端点的客户端会话
///
/// 两个动作都是对同一个地址 POST 一个 JSON，返回 `{ success, data?, message? }`。
pub struct EntrySession {
    client: Client,
    config: ClientConfig,
}

impl EntrySession {
    pub fn new(config: ClientConfig) -> Result<Self, EntryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("school-entry/0.1")
            .build()
            .map_err(|e| EntryError::Config(e.to_string()))?;
        Ok(Self { client, config })
    }

    async fn post<T: DeserializeOwned>(
        &self,
        body: &ApiRequest<'_>,
        network_error: &str,
    ) -> Result<ApiResponse<T>, EntryError> {
        // 占位地址直接报配置错误，不发请求
        let url = self.config.ensure_configured()?;

        let resp = self.client.post(url).json(body).send().await.map_err(|e| {
            warn!("{} 请求失败: {}", self, e);
            EntryError::Network(network_error.to_string())
        })?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| {
            warn!("{} 读取响应失败: {}", self, e);
            EntryError::Network(network_error.to_string())
        })?;

        serde_json::from_str::<ApiResponse<T>>(&text).map_err(|e| {
            warn!("{} 响应不是 JSON (HTTP {}): {}", self, status, e);
            EntryError::Network(network_error.to_string())
        })
    }

    /// getSchoolDetails
    pub async fn fetch_school_details(&self, udise: &str) -> Result<SchoolDetails, EntryError> {
        let resp: ApiResponse<SchoolDetails> = self
            .post(&ApiRequest::GetSchoolDetails { udise }, LOOKUP_NETWORK_ERROR)
            .await?;
        info!("{} fetch_school_details({}) [success={}]", self, udise, resp.success);

        match (resp.success, resp.data) {
            (true, Some(details)) => Ok(details),
            (_, _) => Err(failure_from_message(resp.message, "School not found.")),
        }
    }

    /// submitData，成功时返回服务端的提示语
    pub async fn submit_school_data(&self, payload: &SubmitPayload) -> Result<String, EntryError> {
        let resp: ApiResponse<serde_json::Value> = self
            .post(&ApiRequest::SubmitData { payload }, SUBMIT_NETWORK_ERROR)
            .await?;
        info!(
            "{} submit_school_data({}) [success={}]",
            self, payload.udise, resp.success
        );

        if resp.success {
            Ok(resp
                .message
                .unwrap_or_else(|| "Data saved successfully!".to_string()))
        } else {
            Err(failure_from_message(resp.message, "Submission failed."))
        }
    }
}

/// 把服务端的失败消息还原成错误类型
fn failure_from_message(message: Option<String>, fallback: &str) -> EntryError {
    let msg = message.filter(|m| !m.is_empty());
    match msg {
        Some(m) if m == EntryError::NotFound.to_string() => EntryError::NotFound,
        Some(m) if m == EntryError::Contention.to_string() => EntryError::Contention,
        Some(m) => EntryError::Backend(m),
        None => EntryError::Backend(fallback.to_string()),
    }
}

impl std::fmt::Display for EntrySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<EntrySession [{}]>", self.config.endpoint_url)
    }
}

impl std::fmt::Debug for EntrySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<EntrySession [{}]>", self.config.endpoint_url)
    }
}
