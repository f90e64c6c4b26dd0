use std::str::FromStr;

use anyhow::{anyhow, Context};
use serde_json::json;
use uuid::Uuid;

use crate::SuggestionId;

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Please write something before submitting")]
    EmptyBody,

    #[error("Null byte in string is not allowed {0:?}")]
    NullByteInString(String),

    #[error("Unknown suggestion {0}")]
    UnknownSuggestion(SuggestionId),
}

impl Error {
    pub fn status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Error::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::PermissionDenied => StatusCode::FORBIDDEN,
            Error::EmptyBody => StatusCode::BAD_REQUEST,
            Error::NullByteInString(_) => StatusCode::BAD_REQUEST,
            Error::UnknownSuggestion(_) => StatusCode::NOT_FOUND,
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        serde_json::to_vec(&match self {
            Error::Unknown(msg) => json!({
                "message": msg,
                "type": "unknown",
            }),
            Error::PermissionDenied => json!({
                "message": "permission denied",
                "type": "permission-denied",
            }),
            Error::EmptyBody => json!({
                "message": "submitted text is empty",
                "type": "empty-body",
            }),
            Error::NullByteInString(s) => json!({
                "message": "there was a null byte in argument string",
                "type": "null-byte",
                "string": s,
            }),
            Error::UnknownSuggestion(id) => json!({
                "message": "no such suggestion on the public board",
                "type": "unknown-suggestion",
                "suggestion": id.0,
            }),
        })
        .expect("serializing error contents")
    }

    pub fn parse(body: &[u8]) -> anyhow::Result<Error> {
        let data: serde_json::Value =
            serde_json::from_slice(body).context("parsing error contents")?;
        Ok(
            match data
                .get("type")
                .and_then(|t| t.as_str())
                .ok_or_else(|| anyhow!("error type is not a string"))?
            {
                "unknown" => Error::Unknown(String::from(
                    data.get("message")
                        .and_then(|msg| msg.as_str())
                        .unwrap_or(""),
                )),
                "permission-denied" => Error::PermissionDenied,
                "empty-body" => Error::EmptyBody,
                "null-byte" => Error::NullByteInString(String::from(
                    data.get("string").and_then(|s| s.as_str()).ok_or_else(|| {
                        anyhow!("error is a null-byte-in-string without a string")
                    })?,
                )),
                "unknown-suggestion" => Error::UnknownSuggestion(SuggestionId(
                    data.get("suggestion")
                        .and_then(|id| id.as_str())
                        .and_then(|id| Uuid::from_str(id).ok())
                        .ok_or_else(|| {
                            anyhow!("error is an unknown suggestion without a proper uuid")
                        })?,
                )),
                _ => return Err(anyhow!("error contents has unknown type")),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(err: Error) {
        let parsed = Error::parse(&err.contents()).expect("parsing serialized error");
        assert_eq!(parsed, err);
    }

    #[test]
    fn errors_round_trip_through_json() {
        round_trip(Error::Unknown(String::from("oops")));
        round_trip(Error::PermissionDenied);
        round_trip(Error::EmptyBody);
        round_trip(Error::NullByteInString(String::from("a\0b")));
        round_trip(Error::UnknownSuggestion(SuggestionId(Uuid::new_v4())));
    }

    #[test]
    fn empty_body_is_a_client_error() {
        assert_eq!(Error::EmptyBody.status_code(), http::StatusCode::BAD_REQUEST);
        assert!(Error::EmptyBody.status_code().is_client_error());
    }

    #[test]
    fn parse_rejects_unknown_type() {
        assert!(Error::parse(br#"{"type":"nope","message":""}"#).is_err());
        assert!(Error::parse(b"not json").is_err());
    }
}
