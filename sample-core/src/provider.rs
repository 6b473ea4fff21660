use async_trait::async_trait;
use serde_json::Value;

use crate::fulfillment::{FulfillmentOrder, FulfillmentOrderRequest};
use crate::marketing::{ListMembership, MarketingProfile, ProfileCreated};
use crate::ProviderResult;

#[async_trait]
pub trait ShippingProvider: Send + Sync {
    /// Create a fulfillment order with the shipping provider
    async fn create_order(
        &self,
        order: &FulfillmentOrderRequest,
    ) -> ProviderResult<FulfillmentOrder>;
}

#[async_trait]
pub trait MarketingProvider: Send + Sync {
    /// Create a contact profile
    async fn create_profile(&self, profile: &MarketingProfile) -> ProviderResult<ProfileCreated>;

    /// Add a profile to a mailing list. An empty success body yields `None`.
    async fn attach_to_list(&self, membership: &ListMembership) -> ProviderResult<Option<Value>>;
}
