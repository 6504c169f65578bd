//! Form lifecycle service.
//!
//! [`FormService`] owns every business rule for web forms: creation with
//! identifier assignment, public display and interaction tracking, lead
//! capture on submission, administrative updates and soft deletion. It holds
//! no state of its own; stores are injected through [`FormService::new`].
//!
//! Token-based operations resolve only live forms. A soft-deleted form is
//! unreachable through its token but stays visible to operations keyed by
//! template identifier.

use std::sync::Arc;

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::identifiers;
use crate::lead::{text_value, FieldValue, FormData, Lead, NewLead};
use crate::store::memory::MemoryStore;
use crate::store::{LeadStore, TemplateStore};
use crate::validation;
use crate::webform::{
    ActionType, Counter, DeletedForm, FormDefinition, FormStatus, NewWebForm, ThankYouMessage,
    WebForm,
};

/// Provenance recorded when a create request does not name its author.
pub const DEFAULT_CREATED_BY: &str = "Admin";

const WEB_FORM: &str = "WebForm";

// ---------------------------------------------------------------------------
// Submission output
// ---------------------------------------------------------------------------

/// What the presentation layer should render after a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SubmitOutcome {
    ThankYou { title: String, desc: String },
    Redirect { url: String },
}

/// The lead captured by a submission and the outcome to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub lead: Lead,
    pub outcome: SubmitOutcome,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

pub struct FormService {
    templates: Arc<dyn TemplateStore>,
    leads: Arc<dyn LeadStore>,
    default_created_by: String,
}

impl FormService {
    pub fn new(templates: Arc<dyn TemplateStore>, leads: Arc<dyn LeadStore>) -> Self {
        Self {
            templates,
            leads,
            default_created_by: DEFAULT_CREATED_BY.to_string(),
        }
    }

    /// A service backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store)
    }

    /// Override the provenance recorded for forms created without `createdBy`.
    pub fn with_default_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.default_created_by = created_by.into();
        self
    }

    pub async fn health_check(&self) -> CoreResult<()> {
        self.templates.health_check().await
    }

    /// Create a form, assigning a fresh token and template identifier.
    pub async fn create_form(&self, definition: FormDefinition) -> CoreResult<WebForm> {
        let created_by = definition
            .created_by
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.default_created_by.clone());
        let content = validation::normalize_for_create(definition)?;

        let new = NewWebForm {
            template_id: identifiers::new_template_id(),
            token: identifiers::new_token(),
            created_by,
            content,
        };
        let form = self.templates.insert(new).await?;

        tracing::info!(
            template_id = %form.template_id,
            action_type = ?form.action_type,
            "Web form created",
        );
        Ok(form)
    }

    /// Fetch a form for public display and count the view.
    ///
    /// Inactive forms are refused with [`CoreError::Forbidden`]. The store
    /// checks status and counts the view in one step, so a form deactivated
    /// concurrently is never counted.
    pub async fn get_form_for_display(&self, token: &str) -> CoreResult<WebForm> {
        match self.templates.increment(token, Counter::Viewed).await? {
            Some(form) => {
                log_bump(&form, Counter::Viewed);
                Ok(form)
            }
            None => {
                let form = self.live_form(token).await?;
                if form.status == FormStatus::Inactive {
                    return Err(CoreError::Forbidden(
                        "This form is inactive and cannot be accessed.".into(),
                    ));
                }
                // Reactivated between the two reads.
                Err(CoreError::not_found(WEB_FORM, token))
            }
        }
    }

    /// Fetch a live form by token without counting a view.
    pub async fn preview_form(&self, token: &str) -> CoreResult<WebForm> {
        self.live_form(token).await
    }

    /// Count a visitor interaction and return the new interaction total.
    ///
    /// Every call increments; de-duplication is the caller's concern.
    pub async fn log_interaction(&self, token: &str) -> CoreResult<i64> {
        let form = self.bump(token, Counter::Interacted).await?;
        Ok(form.interacted)
    }

    /// Capture a submission as a lead and describe the outcome to render.
    ///
    /// The outcome is driven by the `actionType` carried in `form_data`. The
    /// lead insert and the `submitted` increment happen as one store
    /// operation.
    pub async fn submit(&self, token: &str, form_data: FormData) -> CoreResult<Submission> {
        let form = self.live_form(token).await?;

        let action = form_data
            .get("actionType")
            .filter(|v| !matches!(v, FieldValue::Text(s) if s.is_empty()))
            .ok_or_else(|| CoreError::Validation("actionType is missing".into()))?;
        let action = action
            .as_text()
            .and_then(|s| s.parse::<ActionType>().ok())
            .ok_or_else(|| CoreError::Validation("Invalid actionType".into()))?;

        let outcome = match action {
            ActionType::ShowThankYou => {
                let message = thank_you_from_submission(token, &form_data);
                SubmitOutcome::ThankYou {
                    title: message.title,
                    desc: message.desc,
                }
            }
            ActionType::RedirectUrl => {
                let url = text_value(&form_data, "redirectUrl")
                    .ok_or_else(|| CoreError::Validation("redirectUrl is missing".into()))?;
                SubmitOutcome::Redirect {
                    url: url.to_string(),
                }
            }
        };

        let lead = NewLead::from_webform(&form.template_id, form_data);
        let (lead, form) = self
            .leads
            .record_submission(token, lead)
            .await?
            .ok_or_else(|| CoreError::not_found(WEB_FORM, token))?;

        tracing::info!(
            template_id = %form.template_id,
            lead_id = lead.id,
            submitted = form.submitted,
            conversion_rate = %form.conversion_rate,
            "Lead captured",
        );
        Ok(Submission { lead, outcome })
    }

    /// Replace a form's editable content, whether or not it is deleted.
    pub async fn update_form(
        &self,
        template_id: &str,
        definition: FormDefinition,
    ) -> CoreResult<WebForm> {
        let current = self
            .templates
            .find_by_template_id(template_id)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::not_found(WEB_FORM, template_id))?;

        let content = validation::normalize_for_update(definition, current.status)?;
        let form = self
            .templates
            .replace(template_id, content)
            .await?
            .ok_or_else(|| CoreError::not_found(WEB_FORM, template_id))?;

        tracing::info!(template_id = %form.template_id, status = ?form.status, "Web form updated");
        Ok(form)
    }

    /// All live forms.
    pub async fn list_forms(&self) -> CoreResult<Vec<WebForm>> {
        self.templates.list_live().await
    }

    /// Every form with this template identifier, deleted ones included.
    pub async fn list_by_template_id(&self, template_id: &str) -> CoreResult<Vec<WebForm>> {
        let forms = self.templates.find_by_template_id(template_id).await?;
        if forms.is_empty() {
            return Err(CoreError::not_found(WEB_FORM, template_id));
        }
        Ok(forms)
    }

    /// Soft-delete the live form with this template identifier.
    pub async fn soft_delete(&self, template_id: &str) -> CoreResult<DeletedForm> {
        let form = self
            .templates
            .soft_delete(template_id)
            .await?
            .ok_or_else(|| CoreError::not_found(WEB_FORM, template_id))?;

        tracing::info!(template_id = %form.template_id, "Web form soft-deleted");
        Ok(DeletedForm {
            template_id: form.template_id,
        })
    }

    /// Leads captured through a template, deleted templates included.
    pub async fn list_leads(&self, template_id: &str) -> CoreResult<Vec<Lead>> {
        self.list_by_template_id(template_id).await?;
        self.leads.list_by_source_id(template_id).await
    }

    async fn live_form(&self, token: &str) -> CoreResult<WebForm> {
        self.templates
            .find_live_by_token(token)
            .await?
            .ok_or_else(|| CoreError::not_found(WEB_FORM, token))
    }

    async fn bump(&self, token: &str, counter: Counter) -> CoreResult<WebForm> {
        let form = self
            .templates
            .increment(token, counter)
            .await?
            .ok_or_else(|| CoreError::not_found(WEB_FORM, token))?;
        log_bump(&form, counter);
        Ok(form)
    }
}

fn log_bump(form: &WebForm, counter: Counter) {
    tracing::debug!(
        template_id = %form.template_id,
        counter = counter.as_str(),
        value = form.count(counter),
        conversion_rate = %form.conversion_rate,
        "Counter incremented",
    );
}

/// Thank-you text carried by a submission.
///
/// Prefers a complete `showThankYou` group, then the flat `title` / `desc`
/// values a rendered form posts as hidden inputs. Missing text is logged and
/// left empty.
fn thank_you_from_submission(token: &str, form_data: &FormData) -> ThankYouMessage {
    let group = form_data.get("showThankYou").and_then(|v| v.as_group());
    let from_group = group.and_then(|g| {
        let title = g.get("title").filter(|s| !s.is_empty())?;
        let desc = g.get("desc").filter(|s| !s.is_empty())?;
        Some(ThankYouMessage {
            title: title.clone(),
            desc: desc.clone(),
        })
    });
    if let Some(message) = from_group {
        return message;
    }

    tracing::warn!(token, "Title or description is missing for the thank-you action");
    ThankYouMessage {
        title: text_value(form_data, "title").unwrap_or_default().to_string(),
        desc: text_value(form_data, "desc").unwrap_or_default().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
