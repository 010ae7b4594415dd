//! Wire types exchanged with the reply-generation backend.

use serde::{Deserialize, Serialize};

use crate::chat::ContextEntry;

/// Body of the POST sent to the reply backend.
///
/// `conversation_history` is forwarded in the order the history window built
/// it (newest turn first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendRequest {
    pub message: String,
    pub conversation_history: Vec<ContextEntry>,
}

/// Successful reply from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendReply {
    pub reply: String,
    pub intent: String,
    /// Classifier confidence in `[0, 1]`; the HTTP adapter rejects anything else.
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let req = BackendRequest {
            message: "hello".to_string(),
            conversation_history: vec![ContextEntry::user("hi"), ContextEntry::assistant("hey")],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "hello",
                "conversation_history": [
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "hey"}
                ]
            })
        );
    }

    #[test]
    fn test_reply_parses_backend_body() {
        let reply: BackendReply =
            serde_json::from_str(r#"{"reply":"Hi!","intent":"greeting","confidence":0.87}"#)
                .unwrap();
        assert_eq!(reply.intent, "greeting");
        assert!((reply.confidence - 0.87).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reply_missing_field_is_error() {
        let parsed = serde_json::from_str::<BackendReply>(r#"{"reply":"Hi!"}"#);
        assert!(parsed.is_err());
    }
}
