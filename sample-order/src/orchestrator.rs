use chrono::{DateTime, Utc};
use sample_core::{
    FulfillmentOrder, FulfillmentOrderRequest, IdentifierStrategy, ListMembership, MarketingProfile,
    MarketingProvider, ProviderError, SampleProduct, SampleRequest, ShippingProvider,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::models::{
    MarketingOutcome, PipelineOutcome, PipelineRun, PipelineState, Step, StepWarning,
};
use crate::policy::{FailurePolicy, PipelineSettings, StepOrder};

/// Marketing side of the pipeline: profile creation and optional list membership
#[derive(Clone)]
pub struct MarketingStage {
    pub provider: Arc<dyn MarketingProvider>,
    /// List to attach the profile to; no list means no attach step
    pub list_id: Option<String>,
    pub identifier: IdentifierStrategy,
    /// Send the postal address along with the profile
    pub include_address: bool,
}

/// Runs one sample request through the downstream providers in a fixed order
pub struct SampleOrchestrator {
    shipping: Arc<dyn ShippingProvider>,
    marketing: Option<MarketingStage>,
    product: SampleProduct,
    settings: PipelineSettings,
}

impl SampleOrchestrator {
    pub fn new(
        shipping: Arc<dyn ShippingProvider>,
        marketing: Option<MarketingStage>,
        product: SampleProduct,
        settings: PipelineSettings,
    ) -> Self {
        Self { shipping, marketing, product, settings }
    }

    pub fn settings(&self) -> PipelineSettings {
        self.settings
    }

    /// Run the pipeline for a request received now
    pub async fn run(&self, request: &SampleRequest) -> Result<PipelineOutcome, StepFailure> {
        self.run_at(request, Utc::now()).await
    }

    /// Run the pipeline with an explicit timestamp for the order reference
    pub async fn run_at(
        &self,
        request: &SampleRequest,
        now: DateTime<Utc>,
    ) -> Result<PipelineOutcome, StepFailure> {
        let mut run = PipelineRun::new();
        let mut warnings = Vec::new();
        let order_request = FulfillmentOrderRequest::for_sample(request, &self.product, now);

        info!(
            reference = %order_request.reference,
            order = ?self.settings.order,
            policy = ?self.settings.policy,
            "Starting sample pipeline"
        );

        let result = self.execute(request, &order_request, &mut run, &mut warnings).await;
        let (order, marketing) = match result {
            Ok(result) => result,
            Err(failure) => {
                warn!(
                    step = failure.step.as_str(),
                    error = %failure.error,
                    details = ?failure.details(),
                    "Pipeline step failed"
                );
                run.advance(PipelineState::Failed(failure.step));
                return Err(failure);
            }
        };

        run.advance(PipelineState::Done);
        info!(
            reference = %order_request.reference,
            order_id = %order.id,
            "Sample pipeline completed"
        );

        Ok(PipelineOutcome {
            reference: order_request.reference,
            order_id: order.id,
            order: order.data,
            marketing,
            warnings,
            trail: run.into_trail(),
        })
    }

    async fn execute(
        &self,
        request: &SampleRequest,
        order_request: &FulfillmentOrderRequest,
        run: &mut PipelineRun,
        warnings: &mut Vec<StepWarning>,
    ) -> Result<(FulfillmentOrder, Option<MarketingOutcome>), StepFailure> {
        match self.settings.order {
            StepOrder::MarketingFirst => {
                let marketing = self.run_marketing(request, run, warnings).await?;
                let order = self.create_order(order_request, run).await?;
                Ok((order, marketing))
            }
            StepOrder::FulfillmentFirst => {
                let order = match self.create_order(order_request, run).await {
                    Err(failure) if self.settings.policy == FailurePolicy::Strict => {
                        return Err(failure)
                    }
                    other => other,
                };
                // Best effort still delivers the profile when the order failed
                let marketing = self.run_marketing(request, run, warnings).await?;
                Ok((order?, marketing))
            }
        }
    }

    async fn create_order(
        &self,
        order_request: &FulfillmentOrderRequest,
        run: &mut PipelineRun,
    ) -> Result<FulfillmentOrder, StepFailure> {
        match self.shipping.create_order(order_request).await {
            Ok(order) => {
                info!(
                    order_id = %order.id,
                    reference = %order_request.reference,
                    "Fulfillment order created"
                );
                run.advance(Step::CreateOrder.completed_state());
                Ok(order)
            }
            Err(error) => Err(StepFailure { step: Step::CreateOrder, error }),
        }
    }

    /// Profile and list steps. Under the best-effort policy a failure is turned into a warning.
    async fn run_marketing(
        &self,
        request: &SampleRequest,
        run: &mut PipelineRun,
        warnings: &mut Vec<StepWarning>,
    ) -> Result<Option<MarketingOutcome>, StepFailure> {
        let Some(stage) = &self.marketing else {
            return Ok(None);
        };

        let mut outcome = MarketingOutcome::default();
        let mut profile_created = false;

        match self.marketing_steps(stage, request, run, &mut outcome, &mut profile_created).await {
            Ok(()) => Ok(Some(outcome)),
            Err((step, error)) if self.settings.policy == FailurePolicy::BestEffort => {
                warn!(
                    step = step.as_str(),
                    error = %error,
                    details = ?error.details(),
                    "Marketing step failed, continuing"
                );
                warnings.push(StepWarning {
                    step,
                    error: step.failure_message().to_string(),
                    details: error.details(),
                });
                Ok(profile_created.then_some(outcome))
            }
            Err((step, error)) => Err(StepFailure { step, error }),
        }
    }

    async fn marketing_steps(
        &self,
        stage: &MarketingStage,
        request: &SampleRequest,
        run: &mut PipelineRun,
        outcome: &mut MarketingOutcome,
        profile_created: &mut bool,
    ) -> Result<(), (Step, ProviderError)> {
        let country = stage.include_address.then_some(self.product.country.as_str());
        let profile = MarketingProfile::from_request(request, country);

        let created = stage
            .provider
            .create_profile(&profile)
            .await
            .map_err(|e| (Step::CreateProfile, e))?;

        let identifier = created.identifier(stage.identifier, profile.email()).ok_or_else(|| {
            (
                Step::CreateProfile,
                ProviderError::Malformed {
                    provider: "marketing",
                    reason: "profile response carried no data.id".to_string(),
                    raw: created.payload.as_ref().map(|body| body.to_string()),
                },
            )
        })?;

        info!(profile_id = %identifier, "Marketing profile created");
        *profile_created = true;
        outcome.profile_id = Some(identifier.clone());
        outcome.profile = created.payload;
        run.advance(Step::CreateProfile.completed_state());

        if let Some(list_id) = &stage.list_id {
            let membership = ListMembership::new(list_id.clone(), identifier);
            let list = stage
                .provider
                .attach_to_list(&membership)
                .await
                .map_err(|e| (Step::AttachToList, e))?;

            info!(
                list_id = %membership.list_id,
                profile_id = %membership.profile_id,
                "Profile added to list"
            );
            outcome.list = list;
            run.advance(Step::AttachToList.completed_state());
        }

        Ok(())
    }
}

/// The step that stopped the pipeline and why
#[derive(Debug, thiserror::Error)]
#[error("{}: {}", .step.failure_message(), .error)]
pub struct StepFailure {
    pub step: Step,
    #[source]
    pub error: ProviderError,
}

impl StepFailure {
    pub fn message(&self) -> &'static str {
        self.step.failure_message()
    }

    pub fn details(&self) -> Option<serde_json::Value> {
        self.error.details()
    }
}
