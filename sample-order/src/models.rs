use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single outbound call in the pipeline
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    CreateProfile,
    AttachToList,
    CreateOrder,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::CreateProfile => "create_profile",
            Step::AttachToList => "attach_to_list",
            Step::CreateOrder => "create_order",
        }
    }

    /// Caller-facing message when this step fails
    pub fn failure_message(&self) -> &'static str {
        match self {
            Step::CreateProfile => "Profile creation failed",
            Step::AttachToList => "List attach failed",
            Step::CreateOrder => "Order creation failed",
        }
    }

    /// State reached when this step succeeds
    pub fn completed_state(&self) -> PipelineState {
        match self {
            Step::CreateProfile => PipelineState::ProfileCreated,
            Step::AttachToList => PipelineState::ListAttached,
            Step::CreateOrder => PipelineState::OrderCreated,
        }
    }
}

/// Pipeline lifecycle: Start → ProfileCreated → ListAttached → OrderCreated → Done,
/// with Failed reachable from any non-terminal state.
///
/// Skipped steps are passed through. Under `StepOrder::FulfillmentFirst` the order step
/// runs first, so a trail reads Start → OrderCreated → ProfileCreated → ListAttached → Done.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineState {
    Start,
    ProfileCreated,
    ListAttached,
    OrderCreated,
    Done,
    Failed(Step),
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed(_))
    }
}

/// Transitions taken by one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRun {
    trail: Vec<PipelineState>,
}

impl PipelineRun {
    pub fn new() -> Self {
        Self { trail: vec![PipelineState::Start] }
    }

    pub fn current(&self) -> PipelineState {
        // trail always starts with Start
        self.trail.last().copied().unwrap_or(PipelineState::Start)
    }

    /// Move to `next`. Terminal states are final.
    pub fn advance(&mut self, next: PipelineState) {
        let current = self.current();
        debug_assert!(!current.is_terminal(), "transition out of terminal state {:?}", current);
        if current.is_terminal() {
            return;
        }
        tracing::debug!(from = ?current, to = ?next, "pipeline transition");
        self.trail.push(next);
    }

    pub fn into_trail(self) -> Vec<PipelineState> {
        self.trail
    }
}

impl Default for PipelineRun {
    fn default() -> Self {
        Self::new()
    }
}

/// Marketing results, as far as the steps got
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MarketingOutcome {
    pub profile_id: Option<String>,
    pub profile: Option<Value>,
    pub list: Option<Value>,
}

/// A marketing failure tolerated under the best-effort policy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepWarning {
    pub step: Step,
    pub error: String,
    pub details: Option<Value>,
}

/// Aggregated result of a successful pipeline run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineOutcome {
    pub reference: String,
    pub order_id: String,
    pub order: Value,
    pub marketing: Option<MarketingOutcome>,
    pub warnings: Vec<StepWarning>,
    pub trail: Vec<PipelineState>,
}
