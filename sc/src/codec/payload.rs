//! Status payload encoding

use serde::{Deserialize, Serialize};

use super::error::DecodeError;

/// Version carried by the JSON envelope
pub const PAYLOAD_VERSION: u32 = 1;

/// Payload encoding used when publishing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
    /// Bare decimal status code (v0)
    #[default]
    Text,
    /// Versioned JSON envelope (v1)
    Json,
}

impl std::str::FromStr for PayloadFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown payload format: {}. Use: text or json", s)),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    v: u32,
    code: i32,
}

/// Encode a status code for the broker
pub fn encode_payload(code: i32, format: PayloadFormat) -> String {
    match format {
        PayloadFormat::Text => code.to_string(),
        PayloadFormat::Json => format!(r#"{{"v":{},"code":{}}}"#, PAYLOAD_VERSION, code),
    }
}

/// Decode a status code from either payload version
pub fn decode_payload(payload: &str) -> Result<i32, DecodeError> {
    if payload.starts_with('{') {
        let envelope: Envelope = serde_json::from_str(payload)?;
        if envelope.v != PAYLOAD_VERSION {
            return Err(DecodeError::UnsupportedVersion(envelope.v));
        }
        return Ok(envelope.code);
    }

    payload.parse::<i32>().map_err(|source| DecodeError::InvalidCode {
        raw: payload.to_string(),
        source,
    })
}
