//! Web form (template) domain types.
//!
//! A [`WebForm`] is the persisted template: its schema, post-submission
//! behaviour, counters and lifecycle flags. [`FormDefinition`] is the
//! operator-supplied input for create and update; validation turns it into a
//! [`FormContent`] that stores persist verbatim.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::analytics;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Field schema
// ---------------------------------------------------------------------------

/// Input control rendered for a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Email,
    Tel,
    Number,
    Date,
    Url,
    Select,
    Radio,
    Checkbox,
    Hidden,
}

impl FieldType {
    /// Whether the field offers a fixed list of options to choose from.
    pub fn is_selectable(self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio)
    }
}

/// One input in a form, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

/// Submit button configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ButtonConfig {
    #[serde(default)]
    #[validate(length(min = 1, message = "button label is required"))]
    pub label: String,
}

// ---------------------------------------------------------------------------
// Post-submission behaviour
// ---------------------------------------------------------------------------

/// What the visitor sees after a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    ShowThankYou,
    RedirectUrl,
}

impl ActionType {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::ShowThankYou => "showThankYou",
            ActionType::RedirectUrl => "redirectUrl",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known [`ActionType`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action type: {0}")]
pub struct UnknownActionType(pub String);

impl FromStr for ActionType {
    type Err = UnknownActionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "showThankYou" => Ok(ActionType::ShowThankYou),
            "redirectUrl" => Ok(ActionType::RedirectUrl),
            other => Err(UnknownActionType(other.to_string())),
        }
    }
}

/// Thank-you page text shown when `actionType == showThankYou`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThankYouMessage {
    pub title: String,
    pub desc: String,
}

impl ThankYouMessage {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.desc.is_empty()
    }
}

/// Thank-you text as supplied by the operator; either part may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ThankYouInput {
    pub title: Option<String>,
    pub desc: Option<String>,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Whether the public form accepts visitors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    #[default]
    Active,
    Inactive,
}

/// One of the three analytics counters kept on every form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Viewed,
    Interacted,
    Submitted,
}

impl Counter {
    /// Column / field name of the counter.
    pub fn as_str(self) -> &'static str {
        match self {
            Counter::Viewed => "viewed",
            Counter::Interacted => "interacted",
            Counter::Submitted => "submitted",
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A stored web form template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebForm {
    pub id: DbId,
    pub template_id: String,
    pub token: String,
    pub title: String,
    pub form_des: String,
    pub fields: Vec<FieldDefinition>,
    pub button: ButtonConfig,
    pub action_type: Option<ActionType>,
    pub show_thank_you: ThankYouMessage,
    pub redirect_url: String,
    pub viewed: i64,
    pub interacted: i64,
    pub submitted: i64,
    pub conversion_rate: String,
    pub status: FormStatus,
    pub created_by: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl WebForm {
    /// Build a fresh record with zeroed counters.
    pub fn from_new(id: DbId, new: NewWebForm, now: Timestamp) -> Self {
        let NewWebForm {
            template_id,
            token,
            created_by,
            content,
        } = new;
        let mut form = Self {
            id,
            template_id,
            token,
            title: String::new(),
            form_des: String::new(),
            fields: Vec::new(),
            button: ButtonConfig::default(),
            action_type: None,
            show_thank_you: ThankYouMessage::default(),
            redirect_url: String::new(),
            viewed: 0,
            interacted: 0,
            submitted: 0,
            conversion_rate: analytics::EMPTY_CONVERSION_RATE.to_string(),
            status: FormStatus::Active,
            created_by,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        form.apply(content, now);
        form
    }

    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }

    pub fn count(&self, counter: Counter) -> i64 {
        match counter {
            Counter::Viewed => self.viewed,
            Counter::Interacted => self.interacted,
            Counter::Submitted => self.submitted,
        }
    }

    /// Increment one counter and recompute the conversion rate.
    pub fn record(&mut self, counter: Counter) {
        match counter {
            Counter::Viewed => self.viewed += 1,
            Counter::Interacted => self.interacted += 1,
            Counter::Submitted => self.submitted += 1,
        }
        self.refresh_conversion_rate();
    }

    pub fn refresh_conversion_rate(&mut self) {
        self.conversion_rate =
            analytics::conversion_rate(self.viewed, self.interacted, self.submitted);
    }

    /// Replace every operator-editable field with `content`.
    pub fn apply(&mut self, content: FormContent, now: Timestamp) {
        self.title = content.title;
        self.form_des = content.form_des;
        self.fields = content.fields;
        self.button = content.button;
        self.action_type = content.action_type;
        self.show_thank_you = content.show_thank_you;
        self.redirect_url = content.redirect_url;
        self.status = content.status;
        self.updated_at = now;
    }
}

/// Operator input for creating or replacing a form.
///
/// Missing text fields deserialize as empty strings so that the validator,
/// not the JSON decoder, reports them.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
    #[serde(default)]
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "formDes is required"))]
    pub form_des: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    #[validate(nested)]
    pub button: ButtonConfig,
    pub action_type: Option<ActionType>,
    pub show_thank_you: Option<ThankYouInput>,
    pub redirect_url: Option<String>,
    pub status: Option<FormStatus>,
    pub created_by: Option<String>,
}

/// Validated, normalized form content ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormContent {
    pub title: String,
    pub form_des: String,
    pub fields: Vec<FieldDefinition>,
    pub button: ButtonConfig,
    pub action_type: Option<ActionType>,
    pub show_thank_you: ThankYouMessage,
    pub redirect_url: String,
    pub status: FormStatus,
}

/// A form about to be inserted, with its freshly generated identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWebForm {
    pub template_id: String,
    pub token: String,
    pub created_by: String,
    pub content: FormContent,
}

/// Result of a soft delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedForm {
    pub template_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> WebForm {
        let content = FormContent {
            title: "Contact".into(),
            form_des: "Get in touch".into(),
            fields: vec![],
            button: ButtonConfig {
                label: "Send".into(),
            },
            action_type: None,
            show_thank_you: ThankYouMessage::default(),
            redirect_url: String::new(),
            status: FormStatus::Active,
        };
        let new = NewWebForm {
            template_id: "aaaa-bbbb-cccc-dddd".into(),
            token: "0".repeat(32),
            created_by: "Admin".into(),
            content,
        };
        WebForm::from_new(1, new, chrono::Utc::now())
    }

    #[test]
    fn new_form_starts_with_zero_counters() {
        let form = sample_form();
        assert_eq!((form.viewed, form.interacted, form.submitted), (0, 0, 0));
        assert_eq!(form.conversion_rate, "0%");
        assert!(form.is_live());
    }

    #[test]
    fn record_updates_counter_and_rate() {
        let mut form = sample_form();
        form.record(Counter::Viewed);
        form.record(Counter::Viewed);
        form.record(Counter::Submitted);
        assert_eq!(form.count(Counter::Viewed), 2);
        assert_eq!(form.count(Counter::Submitted), 1);
        assert_eq!(form.conversion_rate, "50.00%");
    }

    #[test]
    fn action_type_round_trips_through_str() {
        for action in [ActionType::ShowThankYou, ActionType::RedirectUrl] {
            assert_eq!(action.as_str().parse::<ActionType>(), Ok(action));
        }
        assert!("bogus".parse::<ActionType>().is_err());
    }

    #[test]
    fn field_defaults_apply_when_omitted() {
        let field: FieldDefinition = serde_json::from_value(serde_json::json!({
            "name": "email",
            "label": "Email",
            "fieldType": "email"
        }))
        .unwrap();
        assert!(field.required);
        assert!(field.options.is_empty());
    }

    #[test]
    fn web_form_serializes_camel_case() {
        let json = serde_json::to_value(sample_form()).unwrap();
        assert_eq!(json["templateId"], "aaaa-bbbb-cccc-dddd");
        assert_eq!(json["formDes"], "Get in touch");
        assert_eq!(json["conversionRate"], "0%");
        assert_eq!(json["status"], "active");
        assert!(json["deletedAt"].is_null());
    }
}
