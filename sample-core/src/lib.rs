pub mod request;
pub mod fulfillment;
pub mod marketing;
pub mod provider;
pub mod reply;
pub mod secret;

pub use request::SampleRequest;
pub use fulfillment::{FulfillmentOrder, FulfillmentOrderRequest, SampleProduct};
pub use marketing::{IdentifierStrategy, ListMembership, MarketingProfile, ProfileCreated};
pub use provider::{MarketingProvider, ShippingProvider};
pub use reply::{ProviderReply, RawReply};

/// Everything that can go wrong talking to a downstream provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider answered with a non-2xx status.
    #[error("{provider} rejected the request with status {status}")]
    Rejected {
        provider: &'static str,
        status: u16,
        details: Option<serde_json::Value>,
    },
    /// The provider answered 2xx but the body could not be used.
    #[error("{provider} returned an unusable response: {reason}")]
    Malformed {
        provider: &'static str,
        reason: String,
        raw: Option<String>,
    },
    #[error("could not reach {provider}: {reason}")]
    Transport {
        provider: &'static str,
        reason: String,
        timed_out: bool,
    },
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl ProviderError {
    /// Rejected and malformed replies are reported to the caller as a bad request,
    /// transport and unexpected failures as a server error.
    pub fn is_downstream_reply(&self) -> bool {
        matches!(self, ProviderError::Rejected { .. } | ProviderError::Malformed { .. })
    }

    /// Payload handed back to the caller in the `details` field.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            ProviderError::Rejected { details, .. } => details.clone(),
            ProviderError::Malformed { raw, reason, .. } => Some(
                raw.clone()
                    .map(serde_json::Value::String)
                    .unwrap_or_else(|| serde_json::Value::String(reason.clone())),
            ),
            ProviderError::Transport { reason, .. } => {
                Some(serde_json::Value::String(reason.clone()))
            }
            ProviderError::Unexpected(msg) => Some(serde_json::Value::String(msg.clone())),
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;
