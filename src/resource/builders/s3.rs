//! S3 object storage

use crate::resource::payload::Payload;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum S3Command {
    ListObjectsV2,
    HeadObject,
    GetObjectTagging,
    PutObjectTagging,
    DeleteObject,
    DeleteObjects,
    CopyObject,
    ListBuckets,
    GetBucketLocation,
    GeneratePresignedUrl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Payload {
    pub command: S3Command,
    /// Command input, varies by command (`Bucket`, `Key`, `Prefix`, ...)
    #[serde(default)]
    pub params: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

pub fn build_s3_invoke_payload(command: S3Command, params: Map<String, Value>, timeout_ms: Option<u64>) -> Payload {
    Payload::S3(S3Payload {
        command,
        params,
        timeout_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::layout::WireLayout;
    use serde_json::json;

    #[test]
    fn test_s3_embedded_payload() {
        let mut params = Map::new();
        params.insert("Bucket".to_string(), json!("b"));
        params.insert("Prefix".to_string(), json!("logs/"));
        let wire = build_s3_invoke_payload(S3Command::ListObjectsV2, params, Some(5000))
            .to_wire(WireLayout::Embedded)
            .unwrap();
        assert_eq!(
            wire,
            json!({
                "type": "storage",
                "subtype": "s3",
                "s3": {
                    "command": "ListObjectsV2",
                    "params": { "Bucket": "b", "Prefix": "logs/" },
                    "timeoutMs": 5000
                }
            })
        );
    }

    #[test]
    fn test_s3_flat_payload_without_timeout() {
        let wire = build_s3_invoke_payload(S3Command::ListBuckets, Map::new(), None)
            .to_wire(WireLayout::Flat)
            .unwrap();
        assert_eq!(
            wire,
            json!({ "type": "storage", "subtype": "s3", "command": "ListBuckets", "params": {} })
        );
    }
}
