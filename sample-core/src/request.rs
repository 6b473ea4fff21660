use serde::{Deserialize, Serialize};

/// A free sample form submission as posted by the storefront.
///
/// Every field is an opaque string. Absent fields deserialize to an empty
/// string and are forwarded as such; only the downstream providers decide
/// whether that is acceptable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SampleRequest {
    pub name: String,
    pub email: String,
    pub street: String,
    pub housenumber: String,
    pub postalcode: String,
    pub city: String,
    pub phone: String,
}

impl SampleRequest {
    /// Names of the required fields that arrived empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("street", &self.street),
            ("housenumber", &self.housenumber),
            ("postalcode", &self.postalcode),
            ("city", &self.city),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Split the free-form name into a first name and an optional remainder
    pub fn split_name(&self) -> (&str, Option<&str>) {
        let trimmed = self.name.trim();
        match trimmed.split_once(char::is_whitespace) {
            Some((first, rest)) if !rest.trim().is_empty() => (first, Some(rest.trim())),
            _ => (trimmed, None),
        }
    }
}
