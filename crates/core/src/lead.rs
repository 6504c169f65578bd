//! Lead (captured submission) domain types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Acquisition channel a lead came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadSource {
    #[default]
    #[serde(rename = "webform")]
    Webform,
    #[serde(rename = "social media")]
    SocialMedia,
    #[serde(rename = "facebook")]
    Facebook,
    #[serde(rename = "linkedin")]
    Linkedin,
    #[serde(rename = "website")]
    Website,
    #[serde(rename = "email")]
    Email,
}

impl LeadSource {
    pub fn as_str(self) -> &'static str {
        match self {
            LeadSource::Webform => "webform",
            LeadSource::SocialMedia => "social media",
            LeadSource::Facebook => "facebook",
            LeadSource::Linkedin => "linkedin",
            LeadSource::Website => "website",
            LeadSource::Email => "email",
        }
    }
}

impl fmt::Display for LeadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known [`LeadSource`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown lead source: {0}")]
pub struct UnknownLeadSource(pub String);

impl FromStr for LeadSource {
    type Err = UnknownLeadSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "webform" => Ok(LeadSource::Webform),
            "social media" => Ok(LeadSource::SocialMedia),
            "facebook" => Ok(LeadSource::Facebook),
            "linkedin" => Ok(LeadSource::Linkedin),
            "website" => Ok(LeadSource::Website),
            "email" => Ok(LeadSource::Email),
            other => Err(UnknownLeadSource(other.to_string())),
        }
    }
}

/// A single submitted value.
///
/// Submissions are not validated field-by-field against the form schema, but
/// every value must be one of these shapes. `Group` carries flat objects such
/// as `showThankYou: { title, desc }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    List(Vec<String>),
    Group(BTreeMap<String, String>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            FieldValue::Group(g) => Some(g),
            _ => None,
        }
    }
}

/// Submitted form data keyed by field name.
pub type FormData = BTreeMap<String, FieldValue>;

/// Look up a non-empty text value in submitted form data.
pub fn text_value<'a>(data: &'a FormData, key: &str) -> Option<&'a str> {
    data.get(key)
        .and_then(FieldValue::as_text)
        .filter(|s| !s.is_empty())
}

/// A captured submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: DbId,
    pub source: LeadSource,
    /// `templateId` of the form the lead was submitted through.
    pub source_id: String,
    pub form_data: FormData,
    pub created_at: Timestamp,
}

/// A lead about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
    pub source: LeadSource,
    pub source_id: String,
    pub form_data: FormData,
}

impl NewLead {
    /// A lead captured through a web form.
    pub fn from_webform(template_id: &str, form_data: FormData) -> Self {
        Self {
            source: LeadSource::Webform,
            source_id: template_id.to_string(),
            form_data,
        }
    }
}
