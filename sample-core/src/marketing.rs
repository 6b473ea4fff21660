use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::request::SampleRequest;

/// Which identifier is used to add a profile to the mailing list
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierStrategy {
    /// The `data.id` returned when the profile was created
    #[default]
    ProviderId,
    /// The submitted email address
    Email,
}

/// JSON:API profile document for `POST /profiles/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketingProfile {
    pub data: ProfileData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileData {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: ProfileAttributes,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileAttributes {
    pub email: String,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ProfileLocation>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileLocation {
    pub address1: String,
    pub city: String,
    pub zip: String,
    pub country: String,
}

impl MarketingProfile {
    /// Build a profile from the submission. The address is only attached when `country` is given.
    pub fn from_request(request: &SampleRequest, country: Option<&str>) -> Self {
        let (first_name, last_name) = request.split_name();
        let phone = request.phone.trim();

        Self {
            data: ProfileData {
                kind: "profile".to_string(),
                attributes: ProfileAttributes {
                    email: request.email.clone(),
                    first_name: first_name.to_string(),
                    last_name: last_name.map(str::to_string),
                    phone_number: (!phone.is_empty()).then(|| phone.to_string()),
                    location: country.map(|country| ProfileLocation {
                        address1: format!("{} {}", request.street, request.housenumber)
                            .trim()
                            .to_string(),
                        city: request.city.clone(),
                        zip: request.postalcode.clone(),
                        country: country.to_string(),
                    }),
                },
            },
        }
    }

    pub fn email(&self) -> &str {
        &self.data.attributes.email
    }
}

/// Result of a successful profile creation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileCreated {
    /// Provider-assigned id, when the response carried one
    pub id: Option<String>,
    /// Raw response payload, `None` for an empty body
    pub payload: Option<Value>,
}

impl ProfileCreated {
    pub fn from_payload(payload: Option<Value>) -> Self {
        let id = payload
            .as_ref()
            .and_then(|body| body.pointer("/data/id"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Self { id, payload }
    }

    /// Resolve the identifier used for the list membership
    pub fn identifier(&self, strategy: IdentifierStrategy, email: &str) -> Option<String> {
        match strategy {
            IdentifierStrategy::ProviderId => self.id.clone(),
            IdentifierStrategy::Email => Some(email.to_string()),
        }
    }
}

/// Relationship document for `POST /lists/{list_id}/relationships/profiles/`
#[derive(Debug, Clone, PartialEq)]
pub struct ListMembership {
    pub list_id: String,
    pub profile_id: String,
}

impl ListMembership {
    pub fn new(list_id: impl Into<String>, profile_id: impl Into<String>) -> Self {
        Self { list_id: list_id.into(), profile_id: profile_id.into() }
    }

    pub fn to_document(&self) -> Value {
        json!({
            "data": [
                { "type": "profile", "id": self.profile_id }
            ]
        })
    }
}
