use async_trait::async_trait;
use base64::prelude::*;
use sample_core::secret::Secret;
use sample_core::{
    FulfillmentOrder, FulfillmentOrderRequest, ProviderError, ProviderReply, ProviderResult,
    ShippingProvider,
};
use std::sync::Arc;

use crate::app_config::ShippingConfig;
use crate::http::{JsonTransport, OutboundRequest};

const PROVIDER: &str = "qls";

/// Fulfillment orders through the QLS REST API
pub struct QlsClient {
    transport: Arc<dyn JsonTransport>,
    order_url: String,
    authorization: Secret<String>,
}

impl QlsClient {
    pub fn new(config: &ShippingConfig, transport: Arc<dyn JsonTransport>) -> Self {
        let credentials = format!("{}:{}", config.username, config.password.expose());
        Self {
            transport,
            order_url: config.order_url(),
            authorization: Secret::new(format!("Basic {}", BASE64_STANDARD.encode(credentials))),
        }
    }
}

#[async_trait]
impl ShippingProvider for QlsClient {
    async fn create_order(
        &self,
        order: &FulfillmentOrderRequest,
    ) -> ProviderResult<FulfillmentOrder> {
        let body =
            serde_json::to_value(order).map_err(|e| ProviderError::Unexpected(e.to_string()))?;
        let raw = self
            .transport
            .post_json(
                PROVIDER,
                OutboundRequest {
                    url: self.order_url.clone(),
                    authorization: self.authorization.clone(),
                    headers: Vec::new(),
                    content_type: "application/json",
                    body,
                },
            )
            .await?;

        let payload = ProviderReply::classify(PROVIDER, &raw)?.into_payload(PROVIDER)?;

        payload
            .as_ref()
            .and_then(FulfillmentOrder::from_envelope)
            .ok_or_else(|| ProviderError::Malformed {
                provider: PROVIDER,
                reason: "order response carried no data.id".to_string(),
                raw: Some(raw.body.clone()),
            })
    }
}
