use serde_json::Value;

use crate::{ProviderError, ProviderResult};

/// A downstream HTTP response before any interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReply {
    pub status: u16,
    pub body: String,
}

impl RawReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }
}

/// A classified downstream response.
///
/// Empty bodies are explicit (`None`) so callers decide whether an empty
/// success is acceptable for their step.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderReply {
    Success(Option<Value>),
    Rejected { status: u16, body: Option<Value> },
}

impl ProviderReply {
    /// Classify a raw reply.
    ///
    /// A 2xx body that is present but not JSON is malformed. A non-2xx body
    /// that is not JSON is kept verbatim as a string so it still reaches the caller.
    pub fn classify(provider: &'static str, raw: &RawReply) -> ProviderResult<Self> {
        if raw.is_success() {
            if raw.is_empty() {
                return Ok(ProviderReply::Success(None));
            }
            return serde_json::from_str(&raw.body)
                .map(|body| ProviderReply::Success(Some(body)))
                .map_err(|e| ProviderError::Malformed {
                    provider,
                    reason: format!("response body is not JSON: {}", e),
                    raw: Some(raw.body.clone()),
                });
        }

        let body = if raw.is_empty() {
            None
        } else {
            Some(
                serde_json::from_str(&raw.body)
                    .unwrap_or_else(|_| Value::String(raw.body.clone())),
            )
        };
        Ok(ProviderReply::Rejected { status: raw.status, body })
    }

    /// Turn a rejection into an error, leaving the (possibly empty) success payload
    pub fn into_payload(self, provider: &'static str) -> ProviderResult<Option<Value>> {
        match self {
            ProviderReply::Success(body) => Ok(body),
            ProviderReply::Rejected { status, body } => Err(ProviderError::Rejected {
                provider,
                status,
                details: body,
            }),
        }
    }
}
