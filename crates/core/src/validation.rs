//! Write-time validation for form definitions.
//!
//! Top-level required text is checked through the `validator` derive on
//! [`FormDefinition`]. The field schema rules and the conditional rules that
//! depend on `actionType` are explicit functions here so each branch can be
//! tested on its own.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use validator::Validate;

use crate::error::{CoreError, CoreResult};
use crate::webform::{
    ActionType, FieldDefinition, FormContent, FormDefinition, FormStatus, ThankYouInput,
    ThankYouMessage,
};

/// Accepted redirect targets: `scheme://host...` with an http, https or ftp scheme.
pub const REDIRECT_URL_PATTERN: &str = r"(?i)^(https?|ftp)://[^\s/$.?#].[^\s]*$";

static REDIRECT_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(REDIRECT_URL_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Primitive checks
// ---------------------------------------------------------------------------

/// Whether `url` is an acceptable post-submission redirect target.
pub fn is_valid_redirect_url(url: &str) -> bool {
    REDIRECT_URL_RE.is_match(url)
}

/// Validate the ordered field list of a form.
///
/// Names and labels must be non-empty, names unique, and `options` present
/// exactly for selectable field types.
pub fn validate_fields(fields: &[FieldDefinition]) -> CoreResult<()> {
    let mut seen = HashSet::with_capacity(fields.len());
    for (index, field) in fields.iter().enumerate() {
        if field.name.is_empty() {
            return Err(CoreError::Validation(format!(
                "fields[{index}].name is required"
            )));
        }
        if field.label.is_empty() {
            return Err(CoreError::Validation(format!(
                "fields[{index}].label is required"
            )));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(CoreError::Validation(format!(
                "duplicate field name '{}'",
                field.name
            )));
        }
        if field.field_type.is_selectable() && field.options.is_empty() {
            return Err(CoreError::Validation(format!(
                "field '{}' requires at least one option",
                field.name
            )));
        }
        if !field.field_type.is_selectable() && !field.options.is_empty() {
            return Err(CoreError::Validation(format!(
                "field '{}' does not take options",
                field.name
            )));
        }
    }
    Ok(())
}

/// Enforce the `actionType`-dependent required fields.
///
/// `showThankYou` needs both a title and a description; `redirectUrl` needs a
/// URL matching [`REDIRECT_URL_PATTERN`]. Without an action type nothing is
/// required.
pub fn validate_post_submit(
    action_type: Option<ActionType>,
    thank_you: &ThankYouMessage,
    redirect_url: &str,
) -> CoreResult<()> {
    match action_type {
        Some(ActionType::ShowThankYou) => {
            if thank_you.title.is_empty() || thank_you.desc.is_empty() {
                return Err(CoreError::Validation(
                    "showThankYou.title and showThankYou.desc are required".into(),
                ));
            }
        }
        Some(ActionType::RedirectUrl) => {
            if !is_valid_redirect_url(redirect_url) {
                return Err(CoreError::Validation(format!(
                    "{redirect_url} is not a valid URL!"
                )));
            }
        }
        None => {}
    }
    Ok(())
}

fn validate_definition(def: &FormDefinition) -> CoreResult<()> {
    def.validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    validate_fields(&def.fields)
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalize a definition for creation.
///
/// The post-submission branch is lenient: an incomplete thank-you message
/// collapses to empty strings and an invalid redirect URL to `""`, and the
/// branch not selected by `actionType` is always emptied.
pub fn normalize_for_create(def: FormDefinition) -> CoreResult<FormContent> {
    validate_definition(&def)?;

    let (show_thank_you, redirect_url) = match def.action_type {
        Some(ActionType::ShowThankYou) => (
            complete_thank_you(def.show_thank_you).unwrap_or_default(),
            String::new(),
        ),
        Some(ActionType::RedirectUrl) => {
            let url = def
                .redirect_url
                .filter(|url| is_valid_redirect_url(url))
                .unwrap_or_default();
            (ThankYouMessage::default(), url)
        }
        None => (ThankYouMessage::default(), String::new()),
    };

    Ok(FormContent {
        title: def.title,
        form_des: def.form_des,
        fields: def.fields,
        button: def.button,
        action_type: def.action_type,
        show_thank_you,
        redirect_url,
        status: def.status.unwrap_or_default(),
    })
}

/// Normalize a definition that replaces an existing form.
///
/// Unlike creation, the conditional rules are enforced strictly. An omitted
/// `status` keeps `current_status`.
pub fn normalize_for_update(
    def: FormDefinition,
    current_status: FormStatus,
) -> CoreResult<FormContent> {
    validate_definition(&def)?;

    let (show_thank_you, redirect_url) = match def.action_type {
        Some(ActionType::ShowThankYou) => {
            let input = def.show_thank_you.unwrap_or_default();
            let message = ThankYouMessage {
                title: input.title.unwrap_or_default(),
                desc: input.desc.unwrap_or_default(),
            };
            (message, String::new())
        }
        Some(ActionType::RedirectUrl) => (
            ThankYouMessage::default(),
            def.redirect_url.unwrap_or_default(),
        ),
        None => (ThankYouMessage::default(), String::new()),
    };
    validate_post_submit(def.action_type, &show_thank_you, &redirect_url)?;

    Ok(FormContent {
        title: def.title,
        form_des: def.form_des,
        fields: def.fields,
        button: def.button,
        action_type: def.action_type,
        show_thank_you,
        redirect_url,
        status: def.status.unwrap_or(current_status),
    })
}

fn complete_thank_you(input: Option<ThankYouInput>) -> Option<ThankYouMessage> {
    let input = input?;
    match (input.title, input.desc) {
        (Some(title), Some(desc)) if !title.is_empty() && !desc.is_empty() => {
            Some(ThankYouMessage { title, desc })
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
