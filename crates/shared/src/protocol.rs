use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{ExchangeError, FailureKind};

/// Wire dialect spoken by the chat endpoint. The upstream variants never
/// standardized on one key pair, so the widget picks one via configuration.
/// `message_reply` (`{"message": ...}` -> `{"reply": ...}`) is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireFormat {
    #[default]
    MessageReply,
    MsgResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageReplyRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageReplyBody {
    pub reply: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MsgResponseRequest {
    pub msg: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MsgResponseBody {
    pub response: String,
}

/// Request payload for a single POST exchange, typed per dialect.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ChatRequestBody {
    MessageReply(MessageReplyRequest),
    MsgResponse(MsgResponseRequest),
}

#[derive(Debug, Error)]
#[error("unknown wire format '{0}', expected 'message_reply' or 'msg_response'")]
pub struct UnknownWireFormat(String);

impl WireFormat {
    pub fn request_body(&self, text: &str) -> ChatRequestBody {
        match self {
            WireFormat::MessageReply => ChatRequestBody::MessageReply(MessageReplyRequest {
                message: text.to_string(),
            }),
            WireFormat::MsgResponse => ChatRequestBody::MsgResponse(MsgResponseRequest {
                msg: text.to_string(),
            }),
        }
    }

    /// Parses a raw response body into the reply text. Anything that does not
    /// carry the dialect's reply key is a `MalformedReply` failure.
    pub fn decode_reply(&self, raw: &[u8]) -> Result<String, ExchangeError> {
        let decoded = match self {
            WireFormat::MessageReply => {
                serde_json::from_slice::<MessageReplyBody>(raw).map(|body| body.reply)
            }
            WireFormat::MsgResponse => {
                serde_json::from_slice::<MsgResponseBody>(raw).map(|body| body.response)
            }
        };
        decoded.map_err(|err| ExchangeError::new(FailureKind::MalformedReply, err.to_string()))
    }
}

impl FromStr for WireFormat {
    type Err = UnknownWireFormat;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "message_reply" => Ok(WireFormat::MessageReply),
            "msg_response" => Ok(WireFormat::MsgResponse),
            other => Err(UnknownWireFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_reply_dialect_uses_documented_keys() {
        let body = WireFormat::MessageReply.request_body("hello");
        let encoded = serde_json::to_value(&body).expect("encode");
        assert_eq!(encoded, serde_json::json!({ "message": "hello" }));

        let reply = WireFormat::MessageReply
            .decode_reply(br#"{"reply":"hi there"}"#)
            .expect("decode");
        assert_eq!(reply, "hi there");
    }

    #[test]
    fn msg_response_dialect_uses_documented_keys() {
        let body = WireFormat::MsgResponse.request_body("hello");
        let encoded = serde_json::to_value(&body).expect("encode");
        assert_eq!(encoded, serde_json::json!({ "msg": "hello" }));

        let reply = WireFormat::MsgResponse
            .decode_reply(br#"{"response":"hi there"}"#)
            .expect("decode");
        assert_eq!(reply, "hi there");
    }

    #[test]
    fn missing_reply_key_is_malformed() {
        let err = WireFormat::MessageReply
            .decode_reply(br#"{"response":"wrong dialect"}"#)
            .expect_err("must fail");
        assert_eq!(err.kind, FailureKind::MalformedReply);
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = WireFormat::MessageReply
            .decode_reply(b"<html>502 Bad Gateway</html>")
            .expect_err("must fail");
        assert_eq!(err.kind, FailureKind::MalformedReply);
    }

    #[test]
    fn wire_format_parses_from_config_strings() {
        assert_eq!(
            "message_reply".parse::<WireFormat>().expect("parse"),
            WireFormat::MessageReply
        );
        assert_eq!(
            "msg_response".parse::<WireFormat>().expect("parse"),
            WireFormat::MsgResponse
        );
        assert!("chatml".parse::<WireFormat>().is_err());
    }
}
