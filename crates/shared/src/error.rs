use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where an exchange went wrong. The distinction feeds logs and tests; the
/// user-visible outcome is the same fixed failure notice for every kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Network,
    Status,
    MalformedReply,
}

#[derive(Debug, Clone, Error)]
#[error("{kind:?}: {message}")]
pub struct ExchangeError {
    pub kind: FailureKind,
    pub message: String,
}

impl ExchangeError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
