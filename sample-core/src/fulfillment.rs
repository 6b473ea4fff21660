use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::request::SampleRequest;

/// Fixed catalogue data for the free sample box
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SampleProduct {
    pub brand_id: String,
    pub product_id: String,
    #[serde(default = "default_product_name")]
    pub product_name: String,
    #[serde(default = "default_customer_reference")]
    pub customer_reference: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_product_name() -> String { "GRATIS Sample Doosje".to_string() }
fn default_customer_reference() -> String { "Gratis Sample Doosje Campagne".to_string() }
fn default_country() -> String { "NL".to_string() }

/// Body of `POST /companies/{company_id}/fulfillment/orders`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FulfillmentOrderRequest {
    pub brand_id: String,
    pub reference: String,
    pub customer_reference: String,
    pub receiver_contact: ReceiverContact,
    pub products: Vec<OrderProduct>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReceiverContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub housenumber: String,
    pub postalcode: String,
    pub locality: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderProduct {
    pub product_id: String,
    pub name: String,
    pub amount_ordered: u32,
}

impl FulfillmentOrderRequest {
    /// Build the order for one sample box, stamped with `now`
    pub fn for_sample(
        request: &SampleRequest,
        product: &SampleProduct,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            brand_id: product.brand_id.clone(),
            reference: reference_at(now),
            customer_reference: product.customer_reference.clone(),
            receiver_contact: ReceiverContact {
                name: request.name.clone(),
                email: request.email.clone(),
                phone: request.phone.clone(),
                street: request.street.clone(),
                housenumber: request.housenumber.clone(),
                postalcode: request.postalcode.clone(),
                locality: request.city.clone(),
                country: product.country.clone(),
            },
            products: vec![OrderProduct {
                product_id: product.product_id.clone(),
                name: product.product_name.clone(),
                amount_ordered: 1,
            }],
        }
    }
}

/// Order reference: `FREE-{unix millis}`.
///
/// Two orders stamped in the same millisecond share a reference.
pub fn reference_at(now: DateTime<Utc>) -> String {
    format!("FREE-{}", now.timestamp_millis())
}

/// What the shipping provider hands back for a created order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FulfillmentOrder {
    pub id: String,
    /// The full `data` object as returned by the provider
    pub data: serde_json::Value,
}

impl FulfillmentOrder {
    /// Pull the order out of a `{ "data": { "id": ... } }` envelope
    pub fn from_envelope(body: &serde_json::Value) -> Option<Self> {
        let data = body.get("data")?;
        let id = match data.get("id")? {
            serde_json::Value::String(id) => id.clone(),
            serde_json::Value::Number(id) => id.to_string(),
            _ => return None,
        };
        Some(Self { id, data: data.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn product() -> SampleProduct {
        SampleProduct {
            brand_id: "brand-1".to_string(),
            product_id: "product-1".to_string(),
            product_name: default_product_name(),
            customer_reference: default_customer_reference(),
            country: default_country(),
        }
    }

    #[test]
    fn test_order_for_sample_without_phone() {
        let request = SampleRequest {
            name: "Jan".to_string(),
            email: "jan@x.nl".to_string(),
            street: "Kerkstraat".to_string(),
            housenumber: "1".to_string(),
            postalcode: "1234AB".to_string(),
            city: "Utrecht".to_string(),
            phone: String::new(),
        };
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();

        let order = FulfillmentOrderRequest::for_sample(&request, &product(), now);
        let body = serde_json::to_value(&order).unwrap();

        assert_eq!(body["receiver_contact"]["phone"], json!(""));
        assert_eq!(body["receiver_contact"]["locality"], json!("Utrecht"));
        assert_eq!(body["receiver_contact"]["country"], json!("NL"));
        assert_eq!(body["reference"], json!("FREE-1700000000123"));
        assert_eq!(body["products"][0]["amount_ordered"], json!(1));
        assert_eq!(body["customer_reference"], json!("Gratis Sample Doosje Campagne"));
    }

    #[test]
    fn test_reference_is_free_followed_by_digits() {
        let reference = reference_at(Utc::now());
        let digits = reference.strip_prefix("FREE-").unwrap();

        assert!(!digits.is_empty());
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_references_differ_across_milliseconds() {
        let first = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let second = Utc.timestamp_millis_opt(1_700_000_000_001).unwrap();

        assert_ne!(reference_at(first), reference_at(second));
        // Same millisecond collides and is left alone
        assert_eq!(reference_at(first), reference_at(first));
    }

    #[test]
    fn test_order_from_envelope() {
        let body = json!({ "data": { "id": "abc-123", "status": "concept" } });
        let order = FulfillmentOrder::from_envelope(&body).unwrap();
        assert_eq!(order.id, "abc-123");
        assert_eq!(order.data["status"], json!("concept"));

        assert!(FulfillmentOrder::from_envelope(&json!({ "data": {} })).is_none());
        assert!(FulfillmentOrder::from_envelope(&json!({ "errors": [] })).is_none());
    }
}
