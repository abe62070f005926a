use serde::{Deserialize, Serialize};

/// Path of the single endpoint the widget talks to.
pub const GET_RESPONSE_PATH: &str = "/get_response";

/// Identifier sent with every message when none is configured.
pub const DEFAULT_USER_ID: &str = "user123";

// Sent form-encoded, not as JSON
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GetResponseForm {
    pub message: String,
    pub user_id: String,
}

/// Server reply. Extra fields are ignored.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ReplyBody {
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_ignores_unknown_fields() {
        let body: ReplyBody =
            serde_json::from_str(r#"{"response":"Hi there","extra":42}"#).unwrap();
        assert_eq!(body.response, "Hi there");
    }

    #[test]
    fn reply_requires_response_field() {
        assert!(serde_json::from_str::<ReplyBody>(r#"{"reply":"nope"}"#).is_err());
        assert!(serde_json::from_str::<ReplyBody>(r#"{"response":7}"#).is_err());
    }
}
