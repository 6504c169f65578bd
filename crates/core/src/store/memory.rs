//! In-process store used for tests and local development.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::lead::{Lead, NewLead};
use crate::store::{LeadStore, TemplateStore};
use crate::types::DbId;
use crate::webform::{Counter, FormContent, FormStatus, NewWebForm, WebForm};

/// Forms and leads behind a single lock, so a submission updates both
/// atomically.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    forms: Vec<WebForm>,
    leads: Vec<Lead>,
    next_form_id: DbId,
    next_lead_id: DbId,
}

impl Inner {
    fn live_by_token_mut(&mut self, token: &str) -> Option<&mut WebForm> {
        self.forms
            .iter_mut()
            .find(|f| f.token == token && f.is_live())
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateStore for MemoryStore {
    async fn insert(&self, form: NewWebForm) -> CoreResult<WebForm> {
        let mut inner = self.inner.write().await;
        if inner.forms.iter().any(|f| f.token == form.token) {
            return Err(CoreError::Conflict(
                "Duplicate value violates unique constraint: uq_webforms_token".into(),
            ));
        }
        if inner.forms.iter().any(|f| f.template_id == form.template_id) {
            return Err(CoreError::Conflict(
                "Duplicate value violates unique constraint: uq_webforms_template_id".into(),
            ));
        }
        inner.next_form_id += 1;
        let stored = WebForm::from_new(inner.next_form_id, form, Utc::now());
        inner.forms.push(stored.clone());
        Ok(stored)
    }

    async fn find_live_by_token(&self, token: &str) -> CoreResult<Option<WebForm>> {
        let inner = self.inner.read().await;
        Ok(inner
            .forms
            .iter()
            .find(|f| f.token == token && f.is_live())
            .cloned())
    }

    async fn find_by_template_id(&self, template_id: &str) -> CoreResult<Vec<WebForm>> {
        let inner = self.inner.read().await;
        Ok(inner
            .forms
            .iter()
            .filter(|f| f.template_id == template_id)
            .cloned()
            .collect())
    }

    async fn list_live(&self) -> CoreResult<Vec<WebForm>> {
        let inner = self.inner.read().await;
        Ok(inner.forms.iter().filter(|f| f.is_live()).cloned().collect())
    }

    async fn increment(&self, token: &str, counter: Counter) -> CoreResult<Option<WebForm>> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .live_by_token_mut(token)
            .filter(|form| counter != Counter::Viewed || form.status == FormStatus::Active)
            .map(|form| {
                form.record(counter);
                form.clone()
            }))
    }

    async fn replace(
        &self,
        template_id: &str,
        content: FormContent,
    ) -> CoreResult<Option<WebForm>> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .forms
            .iter_mut()
            .find(|f| f.template_id == template_id)
            .map(|form| {
                form.apply(content, Utc::now());
                form.clone()
            }))
    }

    async fn soft_delete(&self, template_id: &str) -> CoreResult<Option<WebForm>> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .forms
            .iter_mut()
            .find(|f| f.template_id == template_id && f.is_live())
            .map(|form| {
                form.deleted_at = Some(Utc::now());
                form.clone()
            }))
    }

    async fn health_check(&self) -> CoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl LeadStore for MemoryStore {
    async fn record_submission(
        &self,
        token: &str,
        lead: NewLead,
    ) -> CoreResult<Option<(Lead, WebForm)>> {
        let mut inner = self.inner.write().await;
        let Some(form) = inner.live_by_token_mut(token) else {
            return Ok(None);
        };
        form.record(Counter::Submitted);
        let form = form.clone();

        inner.next_lead_id += 1;
        let stored = Lead {
            id: inner.next_lead_id,
            source: lead.source,
            source_id: lead.source_id,
            form_data: lead.form_data,
            created_at: Utc::now(),
        };
        inner.leads.push(stored.clone());
        Ok(Some((stored, form)))
    }

    async fn list_by_source_id(&self, source_id: &str) -> CoreResult<Vec<Lead>> {
        let inner = self.inner.read().await;
        Ok(inner
            .leads
            .iter()
            .filter(|l| l.source_id == source_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::webform::{ButtonConfig, ThankYouMessage};

    fn new_form(template_id: &str, token: &str) -> NewWebForm {
        NewWebForm {
            template_id: template_id.into(),
            token: token.into(),
            created_by: "Admin".into(),
            content: FormContent {
                title: "Newsletter".into(),
                form_des: "Sign up".into(),
                fields: vec![],
                button: ButtonConfig {
                    label: "Join".into(),
                },
                action_type: None,
                show_thank_you: ThankYouMessage::default(),
                redirect_url: String::new(),
                status: FormStatus::Active,
            },
        }
    }

    #[tokio::test]
    async fn duplicate_token_is_a_conflict() {
        let store = MemoryStore::new();
        store.insert(new_form("t1", "tok")).await.unwrap();
        let err = store.insert(new_form("t2", "tok")).await.unwrap_err();
        assert_matches!(err, CoreError::Conflict(msg) if msg.contains("token"));
    }

    #[tokio::test]
    async fn duplicate_template_id_is_a_conflict() {
        let store = MemoryStore::new();
        store.insert(new_form("t1", "tok1")).await.unwrap();
        let err = store.insert(new_form("t1", "tok2")).await.unwrap_err();
        assert_matches!(err, CoreError::Conflict(msg) if msg.contains("template_id"));
    }

    #[tokio::test]
    async fn increment_skips_deleted_forms() {
        let store = MemoryStore::new();
        store.insert(new_form("t1", "tok")).await.unwrap();
        store.soft_delete("t1").await.unwrap();
        let result = store.increment("tok", Counter::Viewed).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn views_are_not_counted_on_inactive_forms() {
        let store = MemoryStore::new();
        let mut form = new_form("t1", "tok");
        form.content.status = FormStatus::Inactive;
        store.insert(form).await.unwrap();

        assert!(store
            .increment("tok", Counter::Viewed)
            .await
            .unwrap()
            .is_none());
        let counted = store
            .increment("tok", Counter::Interacted)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(counted.viewed, 0);
        assert_eq!(counted.interacted, 1);
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        let store = std::sync::Arc::new(MemoryStore::new());
        store.insert(new_form("t1", "tok")).await.unwrap();

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let store = std::sync::Arc::clone(&store);
                tokio::spawn(async move { store.increment("tok", Counter::Interacted).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let form = store.find_live_by_token("tok").await.unwrap().unwrap();
        assert_eq!(form.interacted, 50);
    }

    #[tokio::test]
    async fn record_submission_without_live_form_stores_nothing() {
        let store = MemoryStore::new();
        let lead = NewLead::from_webform("t1", Default::default());
        assert!(store.record_submission("missing", lead).await.unwrap().is_none());
        assert!(store.list_by_source_id("t1").await.unwrap().is_empty());
    }
}
