use serde::{Deserialize, Serialize};

/// Which integration runs first
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepOrder {
    /// Profile, list membership, then the fulfillment order
    #[default]
    MarketingFirst,
    /// Fulfillment order, then profile and list membership
    FulfillmentFirst,
}

/// How a marketing failure affects the fulfillment order
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The first failing step aborts the request
    #[default]
    Strict,
    /// Marketing failures become warnings; only the fulfillment order can fail the request
    BestEffort,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineSettings {
    #[serde(default)]
    pub order: StepOrder,
    #[serde(default)]
    pub policy: FailurePolicy,
}
