pub mod app_config;
pub mod http;
pub mod qls;
pub mod klaviyo;

pub use app_config::Config;
pub use http::{JsonTransport, OutboundRequest, ReqwestTransport};
pub use klaviyo::KlaviyoClient;
pub use qls::QlsClient;

use sample_order::{MarketingStage, SampleOrchestrator};
use std::sync::Arc;

/// Wire the provider clients and the pipeline from configuration
pub fn build_orchestrator(
    config: &Config,
    transport: Arc<dyn JsonTransport>,
) -> SampleOrchestrator {
    let shipping = Arc::new(QlsClient::new(&config.shipping, transport.clone()));

    let marketing = config.marketing.enabled.then(|| MarketingStage {
        provider: Arc::new(KlaviyoClient::new(&config.marketing, transport)),
        list_id: config.marketing.list_id().map(str::to_string),
        identifier: config.marketing.identifier,
        include_address: config.marketing.include_address,
    });

    if marketing.is_none() {
        tracing::info!("Marketing integration disabled, only fulfillment orders will be created");
    }

    SampleOrchestrator::new(shipping, marketing, config.product.clone(), config.pipeline)
}
