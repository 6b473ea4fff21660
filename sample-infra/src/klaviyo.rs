use async_trait::async_trait;
use sample_core::secret::Secret;
use sample_core::{
    ListMembership, MarketingProfile, MarketingProvider, ProfileCreated, ProviderError,
    ProviderReply, ProviderResult,
};
use serde_json::Value;
use std::sync::Arc;

use crate::app_config::MarketingConfig;
use crate::http::{JsonTransport, OutboundRequest};

const PROVIDER: &str = "klaviyo";
const JSON_API: &str = "application/vnd.api+json";

/// Profiles and list memberships through the Klaviyo JSON:API
pub struct KlaviyoClient {
    transport: Arc<dyn JsonTransport>,
    base_url: String,
    authorization: Secret<String>,
    revision: String,
}

impl KlaviyoClient {
    pub fn new(config: &MarketingConfig, transport: Arc<dyn JsonTransport>) -> Self {
        Self {
            transport,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            authorization: Secret::new(format!(
                "{} {}",
                config.auth_scheme,
                config.api_key.expose()
            )),
            revision: config.revision.clone(),
        }
    }

    async fn post(&self, url: String, body: Value) -> ProviderResult<Option<Value>> {
        let raw = self
            .transport
            .post_json(
                PROVIDER,
                OutboundRequest {
                    url,
                    authorization: self.authorization.clone(),
                    headers: vec![("revision", self.revision.clone())],
                    content_type: JSON_API,
                    body,
                },
            )
            .await?;

        ProviderReply::classify(PROVIDER, &raw)?.into_payload(PROVIDER)
    }
}

#[async_trait]
impl MarketingProvider for KlaviyoClient {
    async fn create_profile(&self, profile: &MarketingProfile) -> ProviderResult<ProfileCreated> {
        let body =
            serde_json::to_value(profile).map_err(|e| ProviderError::Unexpected(e.to_string()))?;
        let payload = self.post(format!("{}/profiles/", self.base_url), body).await?;
        Ok(ProfileCreated::from_payload(payload))
    }

    async fn attach_to_list(&self, membership: &ListMembership) -> ProviderResult<Option<Value>> {
        let url = format!("{}/lists/{}/relationships/profiles/", self.base_url, membership.list_id);
        self.post(url, membership.to_document()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sample_core::{IdentifierStrategy, RawReply, SampleRequest};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct ScriptedTransport {
        replies: Mutex<VecDeque<RawReply>>,
        sent: Mutex<Vec<OutboundRequest>>,
    }

    #[async_trait]
    impl JsonTransport for ScriptedTransport {
        async fn post_json(
            &self,
            _provider: &'static str,
            request: OutboundRequest,
        ) -> ProviderResult<RawReply> {
            self.sent.lock().unwrap().push(request);
            Ok(self.replies.lock().unwrap().pop_front().unwrap_or_else(|| RawReply::new(500, "")))
        }
    }

    fn client(replies: Vec<RawReply>) -> (KlaviyoClient, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport {
            replies: Mutex::new(replies.into()),
            sent: Mutex::new(Vec::new()),
        });
        let config = MarketingConfig {
            enabled: true,
            base_url: "https://a.example.test/api/".to_string(),
            api_key: Secret::from("pk_test"),
            auth_scheme: "Klaviyo-API-Key".to_string(),
            revision: "2024-10-15".to_string(),
            list_id: Some("LIST1".to_string()),
            identifier: IdentifierStrategy::ProviderId,
            include_address: false,
        };
        (KlaviyoClient::new(&config, transport.clone()), transport)
    }

    fn profile() -> MarketingProfile {
        let request = SampleRequest {
            name: "Jan".to_string(),
            email: "jan@x.nl".to_string(),
            ..Default::default()
        };
        MarketingProfile::from_request(&request, None)
    }

    #[tokio::test]
    async fn test_create_profile_extracts_id() {
        let (client, transport) =
            client(vec![RawReply::new(201, r#"{"data":{"type":"profile","id":"01HPROFILE"}}"#)]);

        let created = client.create_profile(&profile()).await.unwrap();

        assert_eq!(created.id.as_deref(), Some("01HPROFILE"));
        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent[0].url, "https://a.example.test/api/profiles/");
        assert_eq!(sent[0].authorization.expose(), "Klaviyo-API-Key pk_test");
        assert_eq!(sent[0].headers, vec![("revision", "2024-10-15".to_string())]);
        assert_eq!(sent[0].content_type, "application/vnd.api+json");
        assert_eq!(sent[0].body["data"]["attributes"]["email"], json!("jan@x.nl"));
    }

    #[tokio::test]
    async fn test_attach_accepts_no_content() {
        let (client, transport) = client(vec![RawReply::new(204, "")]);

        let membership = ListMembership::new("LIST1", "01HPROFILE");

        let list = client.attach_to_list(&membership).await.unwrap();

        assert!(list.is_none());
        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent[0].url, "https://a.example.test/api/lists/LIST1/relationships/profiles/");
        assert_eq!(sent[0].body, json!({ "data": [{ "type": "profile", "id": "01HPROFILE" }] }));
    }

    #[tokio::test]
    async fn test_attach_failure_without_body() {
        let (client, _) = client(vec![RawReply::new(503, "")]);

        let membership = ListMembership::new("LIST1", "01HPROFILE");

        let err = client.attach_to_list(&membership).await.unwrap_err();

        assert!(matches!(err, ProviderError::Rejected { status: 503, details: None, .. }));
    }

    #[tokio::test]
    async fn test_duplicate_profile_is_rejected() {
        let (client, _) = client(vec![RawReply::new(
            409,
            r#"{"errors":[{"status":409,"code":"duplicate_profile","meta":{"id":"01HOLD"}}]}"#,
        )]);

        let err = client.create_profile(&profile()).await.unwrap_err();

        assert!(err.is_downstream_reply());
        assert_eq!(err.details().unwrap()["errors"][0]["code"], json!("duplicate_profile"));
    }
}
