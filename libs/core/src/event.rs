//! Inbound webhook wire model.
//!
//! Field names mirror the Graph webhook payload exactly; numeric ids travel
//! as JSON strings on the wire and are exposed as `i64` here.

use serde::{Deserialize, Serialize};

/// Top-level webhook payload. One POST carries one envelope with one or more
/// entries, each batching the messaging events for a single page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope {
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    #[serde(with = "id_string", default)]
    pub id: i64,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub messaging: Vec<MessageEvent>,
}

/// One inbound messaging event. `message` is absent for non-text events
/// (delivery receipts, postbacks); those are skipped by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageEvent {
    #[serde(default)]
    pub sender: UserRef,
    #[serde(default)]
    pub recipient: UserRef,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub message: Option<MessageContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageContent {
    #[serde(default)]
    pub mid: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRef {
    #[serde(with = "id_string", default)]
    pub id: i64,
}

impl UserRef {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

/// Graph encodes 64-bit ids as JSON strings.
pub(crate) mod id_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(id: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(id)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_decodes_string_ids() {
        let payload = json!({
            "object": "page",
            "entry": [
                {
                    "id": "1234567890",
                    "time": 1_700_000_000,
                    "messaging": [
                        {
                            "sender": { "id": "42" },
                            "recipient": { "id": "1234567890" },
                            "timestamp": 1_700_000_001,
                            "message": { "mid": "mid.1", "text": "hi" }
                        }
                    ]
                }
            ]
        });

        let envelope: Envelope = serde_json::from_value(payload).unwrap();
        assert_eq!(envelope.object, "page");
        assert_eq!(envelope.entry.len(), 1);
        let entry = &envelope.entry[0];
        assert_eq!(entry.id, 1_234_567_890);
        let event = &entry.messaging[0];
        assert_eq!(event.sender.id, 42);
        assert_eq!(event.message.as_ref().unwrap().text, "hi");
    }

    #[test]
    fn event_without_message_decodes() {
        let payload = json!({
            "sender": { "id": "7" },
            "recipient": { "id": "8" },
            "timestamp": 0
        });

        let event: MessageEvent = serde_json::from_value(payload).unwrap();
        assert!(event.message.is_none());
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        let payload = json!({ "id": "not-a-number" });
        assert!(serde_json::from_value::<UserRef>(payload).is_err());
    }

    #[test]
    fn user_ref_serializes_id_as_string() {
        let value = serde_json::to_value(UserRef::new(42)).unwrap();
        assert_eq!(value, json!({ "id": "42" }));
    }
}
