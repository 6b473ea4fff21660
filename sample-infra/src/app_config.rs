use sample_core::secret::Secret;
use sample_core::{IdentifierStrategy, SampleProduct};
use sample_order::PipelineSettings;
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    pub shipping: ShippingConfig,
    pub product: SampleProduct,
    pub marketing: MarketingConfig,
    #[serde(default)]
    pub pipeline: PipelineSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

fn default_host() -> String { "0.0.0.0".to_string() }

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Upper bound for every outbound call
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 { 10 }

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_seconds: default_timeout_seconds() }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShippingConfig {
    #[serde(default = "default_shipping_base_url")]
    pub base_url: String,
    /// `{company_id}` is substituted
    #[serde(default = "default_order_path")]
    pub order_path: String,
    pub username: String,
    pub password: Secret<String>,
    pub company_id: String,
}

fn default_shipping_base_url() -> String { "https://api.pakketdienstqls.nl".to_string() }
fn default_order_path() -> String { "/companies/{company_id}/fulfillment/orders".to_string() }

impl ShippingConfig {
    pub fn order_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.order_path.replace("{company_id}", &self.company_id)
        )
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MarketingConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_marketing_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Secret<String>,
    #[serde(default = "default_auth_scheme")]
    pub auth_scheme: String,
    #[serde(default = "default_revision")]
    pub revision: String,
    #[serde(default)]
    pub list_id: Option<String>,
    #[serde(default)]
    pub identifier: IdentifierStrategy,
    #[serde(default)]
    pub include_address: bool,
}

fn default_enabled() -> bool { true }
fn default_marketing_base_url() -> String { "https://a.klaviyo.com/api".to_string() }
fn default_auth_scheme() -> String { "Klaviyo-API-Key".to_string() }
fn default_revision() -> String { "2024-10-15".to_string() }

impl MarketingConfig {
    /// Configured list, treating a blank value as unset
    pub fn list_id(&self) -> Option<&str> {
        self.list_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Optional per-environment overrides
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `SAMPLE__SHIPPING__PASSWORD=...` sets `shipping.password`
            .add_source(config::Environment::with_prefix("SAMPLE").separator("__"))
            .set_override_option("server.port", env::var("PORT").ok())?;

        Self::from_builder(builder)
    }

    pub fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, config::ConfigError> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot possibly reach the providers
    fn validate(&self) -> Result<(), config::ConfigError> {
        let mut missing = Vec::new();
        if self.shipping.username.trim().is_empty() {
            missing.push("shipping.username");
        }
        if self.shipping.password.expose().is_empty() {
            missing.push("shipping.password");
        }
        if self.shipping.company_id.trim().is_empty() {
            missing.push("shipping.company_id");
        }
        if self.product.brand_id.trim().is_empty() {
            missing.push("product.brand_id");
        }
        if self.product.product_id.trim().is_empty() {
            missing.push("product.product_id");
        }
        if self.marketing.enabled && self.marketing.api_key.expose().is_empty() {
            missing.push("marketing.api_key");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(config::ConfigError::Message(format!(
                "missing required settings: {}",
                missing.join(", ")
            )))
        }
    }
}
