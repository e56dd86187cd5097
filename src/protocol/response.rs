//! Inbound response envelope
//!
//! `ok` is the only discriminant. A success always has a `result`, a failure
//! always has an `error`; anything else is not a valid envelope.

use super::results::ResourceResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvokeSuccess {
    pub request_id: String,
    pub result: ResourceResult,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvokeFailure {
    pub request_id: String,
    pub error: InvokeError,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Envelope", into = "Envelope")]
pub enum InvokeResponse {
    Success(InvokeSuccess),
    Failure(InvokeFailure),
}

/// Wire form of [`InvokeResponse`]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    ok: bool,
    request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<ResourceResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<InvokeError>,
}

impl TryFrom<Envelope> for InvokeResponse {
    type Error = String;

    fn try_from(envelope: Envelope) -> Result<Self, Self::Error> {
        let request_id = envelope.request_id;
        if envelope.ok {
            let result = envelope
                .result
                .ok_or_else(|| format!("response {} has ok=true but no result", request_id))?;
            Ok(InvokeResponse::Success(InvokeSuccess { request_id, result }))
        } else {
            let error = envelope
                .error
                .ok_or_else(|| format!("response {} has ok=false but no error", request_id))?;
            Ok(InvokeResponse::Failure(InvokeFailure { request_id, error }))
        }
    }
}

impl From<InvokeResponse> for Envelope {
    fn from(response: InvokeResponse) -> Self {
        match response {
            InvokeResponse::Success(s) => Envelope {
                ok: true,
                request_id: s.request_id,
                result: Some(s.result),
                error: None,
            },
            InvokeResponse::Failure(f) => Envelope {
                ok: false,
                request_id: f.request_id,
                result: None,
                error: Some(f.error),
            },
        }
    }
}

impl InvokeResponse {
    pub fn is_ok(&self) -> bool {
        matches!(self, InvokeResponse::Success(_))
    }

    pub fn request_id(&self) -> &str {
        match self {
            InvokeResponse::Success(s) => &s.request_id,
            InvokeResponse::Failure(f) => &f.request_id,
        }
    }

    pub fn result(&self) -> Option<&ResourceResult> {
        match self {
            InvokeResponse::Success(s) => Some(&s.result),
            InvokeResponse::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&InvokeError> {
        match self {
            InvokeResponse::Success(_) => None,
            InvokeResponse::Failure(f) => Some(&f.error),
        }
    }

    /// Split into the result or the server-reported failure
    pub fn into_result(self) -> Result<InvokeSuccess, InvokeFailure> {
        match self {
            InvokeResponse::Success(s) => Ok(s),
            InvokeResponse::Failure(f) => Err(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::results::DbResult;
    use serde_json::json;

    #[test]
    fn test_decode_success() {
        let response: InvokeResponse = serde_json::from_value(json!({
            "ok": true,
            "requestId": "r1",
            "result": { "kind": "database", "rows": [], "rowsAffected": 0 }
        }))
        .unwrap();

        assert!(response.is_ok());
        assert_eq!(response.request_id(), "r1");
        assert_eq!(response.result().map(ResourceResult::kind), Some("database"));
        assert_eq!(
            response.into_result().unwrap().result,
            ResourceResult::Database(DbResult {
                rows: vec![],
                rows_affected: Some(0)
            })
        );
    }

    #[test]
    fn test_decode_failure() {
        let response: InvokeResponse = serde_json::from_value(json!({
            "ok": false,
            "requestId": "r1",
            "error": { "message": "boom" }
        }))
        .unwrap();

        assert!(!response.is_ok());
        assert!(response.result().is_none());
        let failure = response.into_result().unwrap_err();
        assert_eq!(failure.error.message, "boom");
        assert_eq!(failure.error.http_status, None);
    }

    #[test]
    fn test_failure_with_http_status() {
        let response: InvokeResponse = serde_json::from_value(json!({
            "ok": false,
            "requestId": "r2",
            "error": { "message": "forbidden", "httpStatus": 403 }
        }))
        .unwrap();
        assert_eq!(response.error().and_then(|e| e.http_status), Some(403));
    }

    #[test]
    fn test_ok_without_result_rejected() {
        let err = serde_json::from_value::<InvokeResponse>(json!({ "ok": true, "requestId": "r1" })).unwrap_err();
        assert!(err.to_string().contains("no result"));
    }

    #[test]
    fn test_failure_without_error_rejected() {
        assert!(serde_json::from_value::<InvokeResponse>(json!({ "ok": false, "requestId": "r1" })).is_err());
    }

    #[test]
    fn test_missing_ok_rejected() {
        assert!(serde_json::from_value::<InvokeResponse>(json!({
            "requestId": "r1",
            "result": { "kind": "auth", "success": true }
        }))
        .is_err());
    }

    #[test]
    fn test_encode_failure_omits_result() {
        let response = InvokeResponse::Failure(InvokeFailure {
            request_id: "r3".to_string(),
            error: InvokeError {
                message: "nope".to_string(),
                http_status: Some(500),
            },
        });
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "ok": false, "requestId": "r3", "error": { "message": "nope", "httpStatus": 500 } })
        );
    }
}
