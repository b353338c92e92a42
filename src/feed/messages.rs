use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Why an inbound data packet could not be read
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payload is not a JSON object")]
    NotAnObject,

    #[error("Message type is not a string")]
    InvalidType,
}

/// Application messages carried on the room data channel
///
/// The `type` field selects the variant. Anything without a recognised
/// `type` lands in `Unknown` and is ignored by listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum DataMessage {
    KnowledgeTransfer(KnowledgePayload),
    Unknown,
}

/// Body of a `knowledgeTransfer` packet as the sender wrote it
///
/// No field is required and no field type is enforced: whatever the
/// sender put in the packet ends up in the feed entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnowledgePayload {
    pub narrative: String,
    pub extra_data: Option<ExtraData>,
    /// Every other field of the packet, kept verbatim
    pub fields: Map<String, Value>,
}

impl KnowledgePayload {
    fn from_object(mut object: Map<String, Value>) -> Self {
        object.remove("type");
        let narrative = object.remove("narrative").map(text_of).unwrap_or_default();
        let extra_data = match object.remove("extraData") {
            Some(Value::Object(extra)) => Some(ExtraData::from_object(extra)),
            Some(Value::Null) | None => None,
            // Not an object: there are no links to read, keep it as sent
            Some(other) => {
                object.insert("extraData".to_string(), other);
                None
            }
        };

        Self {
            narrative,
            extra_data,
            fields: object,
        }
    }
}

/// Display text of a JSON value; `null` reads as empty
fn text_of(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Optional links attached to a narrative
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ExtraData {
    fn from_object(mut object: Map<String, Value>) -> Self {
        let mut link = |key: &str| match object.remove(key) {
            Some(Value::String(url)) => Some(url),
            Some(other) => {
                object.insert(key.to_string(), other);
                None
            }
            None => None,
        };
        let diagram = link("diagram");
        let reference = link("reference");

        Self {
            diagram,
            reference,
            fields: object,
        }
    }
}

/// An entry of the knowledge transfer feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeMessage {
    #[serde(rename = "type")]
    pub kind: String,
    /// Identity of the participant that sent the packet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Local receipt time, epoch milliseconds
    pub ts: i64,
    #[serde(default)]
    pub narrative: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_data: Option<ExtraData>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl KnowledgeMessage {
    pub const KIND: &'static str = "knowledgeTransfer";

    /// Builds a feed entry; sender identity and receipt time always win over
    /// whatever the payload claimed
    pub fn from_payload(payload: KnowledgePayload, from: Option<String>, ts: i64) -> Self {
        let mut fields = payload.fields;
        fields.remove("from");
        fields.remove("ts");

        Self {
            kind: Self::KIND.to_string(),
            from,
            ts,
            narrative: payload.narrative,
            extra_data: payload.extra_data,
            fields,
        }
    }
}

/// Decodes a raw data-channel payload: UTF-8, then JSON, then the `type`
/// discriminator
pub fn decode_data_message(payload: &[u8]) -> Result<DataMessage, DecodeError> {
    let text = std::str::from_utf8(payload)?;
    let value: Value = serde_json::from_str(text)?;

    let Value::Object(object) = value else {
        return Err(DecodeError::NotAnObject);
    };

    match object.get("type") {
        None => Ok(DataMessage::Unknown),
        Some(Value::String(kind)) if kind == KnowledgeMessage::KIND => Ok(
            DataMessage::KnowledgeTransfer(KnowledgePayload::from_object(object)),
        ),
        Some(Value::String(_)) => Ok(DataMessage::Unknown),
        Some(_) => Err(DecodeError::InvalidType),
    }
}
