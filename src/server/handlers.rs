use super::AppState;
use crate::school::model::value_to_cell;
use crate::school::{SchoolDetails, SubmitPayload};
use crate::session::dto::{ApiResponse, ACTION_GET_SCHOOL_DETAILS, ACTION_SUBMIT_DATA};
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use log::{error, warn};
use serde_json::Value;

/// GET / 只提示使用 POST
pub async fn get_entry() -> Json<ApiResponse> {
    Json(ApiResponse::failure("Use POST method"))
}

/// POST / 按 action 分发；任何失败都转成 `success: false`
///
/// 请求体按原始字节接收，非 UTF-8 的内容也走 JSON 解析失败的分支。
pub async fn post_entry(State(state): State<AppState>, body: Bytes) -> Json<ApiResponse> {
    Json(dispatch(&state, &body).await)
}

pub async fn dispatch(state: &AppState, body: impl AsRef<[u8]>) -> ApiResponse {
    let request: Value = match serde_json::from_slice(body.as_ref()) {
        Ok(v) => v,
        Err(e) => {
            warn!("请求体不是合法 JSON: {}", e);
            return ApiResponse::failure(format!("SyntaxError: {}", e));
        }
    };

    match request.get("action").and_then(Value::as_str) {
        Some(ACTION_GET_SCHOOL_DETAILS) => {
            let udise = request.get("udise").map(value_to_cell).unwrap_or_default();
            get_school_details(state, &udise).await
        }
        Some(ACTION_SUBMIT_DATA) => {
            let payload = request.get("payload").cloned().unwrap_or(Value::Null);
            match serde_json::from_value::<SubmitPayload>(payload) {
                Ok(p) => submit_data(state, &p).await,
                Err(e) => {
                    warn!("submitData 载荷格式错误: {}", e);
                    ApiResponse::failure(format!("TypeError: {}", e))
                }
            }
        }
        _ => ApiResponse::failure("Invalid action"),
    }
}

async fn get_school_details(state: &AppState, udise: &str) -> ApiResponse {
    let result = match state.lookup.lookup(udise).await {
        Ok(r) => r,
        Err(e) => return ApiResponse::failure(e.to_string()),
    };
    match serde_json::to_value(SchoolDetails::from(result)) {
        Ok(data) => ApiResponse::ok(data),
        Err(e) => ApiResponse::failure(e.to_string()),
    }
}

async fn submit_data(state: &AppState, payload: &SubmitPayload) -> ApiResponse {
    match state.upsert.submit(payload).await {
        Ok(outcome) => ApiResponse::ok_message(outcome.message()),
        Err(e) => {
            error!("submitData {} 失败: {}", payload.udise, e);
            ApiResponse::failure(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::school::rows::{
        data_header, school_list_header, status_header, DATA_SHEET, SCHOOL_LIST_SHEET,
        STATUS_SHEET,
    };
    use crate::storage::MemoryWorkbook;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn state() -> AppState {
        let wb = Arc::new(
            MemoryWorkbook::new()
                .with_sheet(
                    SCHOOL_LIST_SHEET,
                    vec![
                        school_list_header(),
                        vec![
                            "9050300106".into(),
                            "PS Rampur".into(),
                            "Rampur".into(),
                            "PS".into(),
                        ],
                    ],
                )
                .with_sheet(DATA_SHEET, vec![data_header()])
                .with_sheet(STATUS_SHEET, vec![status_header()]),
        );
        AppState::new(wb, Duration::from_secs(1))
    }

    #[tokio::test]
    async fn get_advises_post() {
        let Json(resp) = get_entry().await;
        assert!(!resp.success);
        assert_eq!(resp.message.as_deref(), Some("Use POST method"));
    }

    #[tokio::test]
    async fn malformed_body_is_a_failure() {
        let resp = dispatch(&state(), "not json").await;
        assert!(!resp.success);
        assert!(resp.message.unwrap().starts_with("SyntaxError"));
    }

    #[tokio::test]
    async fn non_utf8_body_is_a_json_failure() {
        let Json(resp) = post_entry(State(state()), Bytes::from_static(&[0xff, 0xfe, b'{'])).await;
        assert!(!resp.success);
        assert!(resp.message.unwrap().starts_with("SyntaxError"));
    }

    #[tokio::test]
    async fn unknown_action_is_invalid() {
        let resp = dispatch(&state(), r#"{"action":"deleteAll"}"#).await;
        assert_eq!(resp, ApiResponse::failure("Invalid action"));
    }

    #[tokio::test]
    async fn lookup_not_found() {
        let resp = dispatch(&state(), r#"{"action":"getSchoolDetails","udise":"1"}"#).await;
        assert_eq!(resp, ApiResponse::failure("School not found"));
    }

    #[tokio::test]
    async fn lookup_accepts_numeric_udise() {
        let resp = dispatch(&state(), r#"{"action":"getSchoolDetails","udise":9050300106}"#).await;
        assert!(resp.success);
        let data = resp.data.unwrap();
        assert_eq!(data["name"], "PS Rampur");
        assert_eq!(data["type"], "PS");
        assert!(data["existingData"].is_null());
    }

    #[tokio::test]
    async fn submit_then_lookup_returns_saved_values() {
        let st = state();
        let body = json!({
            "action": "submitData",
            "payload": {
                "udise": "9050300106",
                "name": "PS Rampur",
                "panchayat": "Rampur",
                "type": "PS",
                "classData": { "1": { "enrolled": "50", "appeared": "45" } }
            }
        })
        .to_string();

        let first = dispatch(&st, &body).await;
        assert_eq!(first, ApiResponse::ok_message("Data saved successfully"));
        let second = post_entry(State(st.clone()), Bytes::from(body)).await.0;
        assert_eq!(second, ApiResponse::ok_message("Data updated successfully"));

        let resp = dispatch(&st, r#"{"action":"getSchoolDetails","udise":"9050300106"}"#).await;
        let existing = &resp.data.unwrap()["existingData"];
        assert_eq!(existing["1"], json!({ "enrolled": "50", "appeared": "45" }));
    }

    #[tokio::test]
    async fn submit_ignores_out_of_range_and_null_classes() {
        let st = state();
        let body = json!({
            "action": "submitData",
            "payload": {
                "udise": "9050300106",
                "name": "PS Rampur",
                "panchayat": "Rampur",
                "type": "PS",
                "classData": {
                    "1": { "enrolled": "40", "appeared": "30" },
                    "2": null,
                    "300": { "enrolled": "9", "appeared": "9" }
                }
            }
        })
        .to_string();
        assert_eq!(
            dispatch(&st, &body).await,
            ApiResponse::ok_message("Data saved successfully")
        );

        let resp = dispatch(&st, r#"{"action":"getSchoolDetails","udise":"9050300106"}"#).await;
        let existing = &resp.data.unwrap()["existingData"];
        assert_eq!(existing["1"], json!({ "enrolled": "40", "appeared": "30" }));
        assert_eq!(existing["2"], json!({ "enrolled": "", "appeared": "" }));
    }

    #[tokio::test]
    async fn submit_without_payload_fails() {
        let resp = dispatch(&state(), r#"{"action":"submitData"}"#).await;
        assert!(!resp.success);
    }
}
