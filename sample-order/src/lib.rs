pub mod models;
pub mod policy;
pub mod orchestrator;

pub use models::{MarketingOutcome, PipelineOutcome, PipelineState, Step, StepWarning};
pub use policy::{FailurePolicy, PipelineSettings, StepOrder};
pub use orchestrator::{MarketingStage, SampleOrchestrator, StepFailure};
