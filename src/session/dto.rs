use crate::school::SubmitPayload;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ACTION_GET_SCHOOL_DETAILS: &str = "getSchoolDetails";
pub const ACTION_SUBMIT_DATA: &str = "submitData";

/// 端点统一的返回结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T = Value> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn ok_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "action")]
pub enum ApiRequest<'a> {
    #[serde(rename = "getSchoolDetails")]
    GetSchoolDetails { udise: &'a str },
    #[serde(rename = "submitData")]
    SubmitData { payload: &'a SubmitPayload },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_is_tagged_by_action() {
        let v = serde_json::to_value(ApiRequest::GetSchoolDetails { udise: "9050300106" }).unwrap();
        assert_eq!(v, json!({ "action": ACTION_GET_SCHOOL_DETAILS, "udise": "9050300106" }));
    }

    #[test]
    fn typed_response_without_data_parses() {
        use crate::school::SchoolDetails;

        let resp: ApiResponse<SchoolDetails> =
            serde_json::from_str(r#"{"success":false,"message":"School not found"}"#).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.data, None);
        assert_eq!(resp.message.as_deref(), Some("School not found"));

        let resp: ApiResponse<SchoolDetails> = serde_json::from_str(
            r#"{"success":true,"data":{"udise":"1","name":"PS","panchayat":"P","type":"PS","existingData":null}}"#,
        )
        .unwrap();
        assert_eq!(resp.data.unwrap().udise, "1");
    }

    #[test]
    fn failure_omits_data() {
        let v = serde_json::to_value(ApiResponse::<Value>::failure("Use POST method")).unwrap();
        assert_eq!(v, json!({ "success": false, "message": "Use POST method" }));
    }
}
