//! Application access management

use crate::resource::payload::Payload;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthAction {
    Share,
    Revoke,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub action: AuthAction,
    pub email: String,
}

pub fn build_auth_share_access_payload(email: impl Into<String>) -> Payload {
    Payload::MajorAuth(AuthPayload {
        action: AuthAction::Share,
        email: email.into(),
    })
}

pub fn build_auth_revoke_access_payload(email: impl Into<String>) -> Payload {
    Payload::MajorAuth(AuthPayload {
        action: AuthAction::Revoke,
        email: email.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::layout::WireLayout;
    use serde_json::json;

    #[test]
    fn test_share_and_revoke() {
        let share = build_auth_share_access_payload("a@example.com")
            .to_wire(WireLayout::Flat)
            .unwrap();
        assert_eq!(
            share,
            json!({ "type": "auth", "subtype": "majorauth", "action": "share", "email": "a@example.com" })
        );
        let revoke = build_auth_revoke_access_payload("a@example.com")
            .to_wire(WireLayout::Flat)
            .unwrap();
        assert_eq!(revoke["action"], "revoke");
    }
}
