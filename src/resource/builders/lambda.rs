//! AWS Lambda
//!
//! Field names are PascalCase to match the AWS Invoke API.

use crate::resource::payload::Payload;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LambdaInvocationType {
    RequestResponse,
    Event,
    DryRun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LambdaLogType {
    None,
    Tail,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LambdaInvokeOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invocation_type: Option<LambdaInvocationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_type: Option<LambdaLogType>,
    /// Version or alias; `$LATEST` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
    /// Base64 client context (sync invocations only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub durable_execution_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LambdaPayload {
    /// Function name, ARN, or partial ARN
    pub function_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(flatten)]
    pub options: LambdaInvokeOptions,
}

pub fn build_lambda_invoke_payload(
    function_name: impl Into<String>,
    payload: Option<Value>,
    options: LambdaInvokeOptions,
) -> Payload {
    Payload::Lambda(LambdaPayload {
        function_name: function_name.into(),
        payload,
        options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::layout::WireLayout;
    use serde_json::json;

    #[test]
    fn test_lambda_pascal_case_fields() {
        let options = LambdaInvokeOptions {
            invocation_type: Some(LambdaInvocationType::Event),
            log_type: Some(LambdaLogType::Tail),
            qualifier: Some("prod".to_string()),
            ..Default::default()
        };
        let wire = build_lambda_invoke_payload("my-fn", Some(json!({ "x": 1 })), options)
            .to_wire(WireLayout::Flat)
            .unwrap();
        assert_eq!(
            wire,
            json!({
                "type": "api",
                "subtype": "lambda",
                "FunctionName": "my-fn",
                "Payload": { "x": 1 },
                "InvocationType": "Event",
                "LogType": "Tail",
                "Qualifier": "prod"
            })
        );
    }

    #[test]
    fn test_lambda_minimal_payload() {
        let wire = build_lambda_invoke_payload("arn:aws:lambda:us-west-2:1:function:f", None, LambdaInvokeOptions::default())
            .to_wire(WireLayout::Flat)
            .unwrap();
        assert_eq!(
            wire,
            json!({ "type": "api", "subtype": "lambda", "FunctionName": "arn:aws:lambda:us-west-2:1:function:f" })
        );
    }
}
