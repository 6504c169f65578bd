//! Integration tests for the web form and lead repositories.
//!
//! `#[sqlx::test]` creates a fresh database per test on the server named by
//! `DATABASE_URL` and applies the migrations.

use assert_matches::assert_matches;
use leadform_core::lead::{FieldValue, FormData, NewLead};
use leadform_core::webform::{
    ActionType, ButtonConfig, Counter, FieldDefinition, FieldType, FormContent, FormStatus,
    NewWebForm, ThankYouMessage,
};
use leadform_db::models::status;
use leadform_db::repositories::{LeadRepo, WebFormRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn content(title: &str) -> FormContent {
    FormContent {
        title: title.to_string(),
        form_des: "repository test".to_string(),
        fields: vec![FieldDefinition {
            name: "email".to_string(),
            label: "Email".to_string(),
            field_type: FieldType::Email,
            options: vec![],
            required: true,
        }],
        button: ButtonConfig {
            label: "Send".to_string(),
        },
        action_type: Some(ActionType::ShowThankYou),
        show_thank_you: ThankYouMessage {
            title: "Thanks".to_string(),
            desc: "We will be in touch".to_string(),
        },
        redirect_url: String::new(),
        status: FormStatus::Active,
    }
}

fn new_form(suffix: &str) -> NewWebForm {
    NewWebForm {
        template_id: format!("tpl-{suffix}"),
        token: format!("tok-{suffix}"),
        created_by: "Admin".to_string(),
        content: content(&format!("Form {suffix}")),
    }
}

fn form_data(email: &str) -> FormData {
    FormData::from([("email".to_string(), FieldValue::Text(email.to_string()))])
}

// ---------------------------------------------------------------------------
// Web forms
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_applies_column_defaults(pool: PgPool) {
    let row = WebFormRepo::create(&pool, &new_form("a")).await.unwrap();

    assert_eq!(row.template_id, "tpl-a");
    assert_eq!(row.viewed, 0);
    assert_eq!(row.interacted, 0);
    assert_eq!(row.submitted, 0);
    assert_eq!(row.conversion_rate, "0%");
    assert_eq!(row.status_id, status::ACTIVE);
    assert_eq!(row.action_type.as_deref(), Some("showThankYou"));
    assert_eq!(row.fields.0.len(), 1);
    assert!(row.deleted_at.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_token_violates_unique_constraint(pool: PgPool) {
    WebFormRepo::create(&pool, &new_form("a")).await.unwrap();

    let mut dup = new_form("b");
    dup.token = "tok-a".to_string();
    let err = WebFormRepo::create(&pool, &dup).await.unwrap_err();

    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_webforms_token"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn increment_updates_counter_and_rate(pool: PgPool) {
    WebFormRepo::create(&pool, &new_form("a")).await.unwrap();

    for _ in 0..4 {
        WebFormRepo::increment(&pool, "tok-a", Counter::Viewed)
            .await
            .unwrap();
    }
    let row = WebFormRepo::increment(&pool, "tok-a", Counter::Submitted)
        .await
        .unwrap()
        .expect("live form");

    assert_eq!(row.viewed, 4);
    assert_eq!(row.submitted, 1);
    assert_eq!(row.conversion_rate, "25.00%");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_increments_are_not_lost(pool: PgPool) {
    WebFormRepo::create(&pool, &new_form("a")).await.unwrap();

    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let pool = pool.clone();
            tokio::spawn(async move {
                WebFormRepo::increment(&pool, "tok-a", Counter::Interacted)
                    .await
                    .unwrap()
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    let row = WebFormRepo::find_live_by_token(&pool, "tok-a")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.interacted, 20);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn soft_delete_hides_form_from_token_lookups(pool: PgPool) {
    WebFormRepo::create(&pool, &new_form("a")).await.unwrap();

    let deleted = WebFormRepo::soft_delete(&pool, "tpl-a").await.unwrap();
    assert_matches!(deleted, Some(row) if row.deleted_at.is_some());

    assert!(WebFormRepo::find_live_by_token(&pool, "tok-a")
        .await
        .unwrap()
        .is_none());
    assert!(WebFormRepo::list_live(&pool).await.unwrap().is_empty());
    assert!(WebFormRepo::increment(&pool, "tok-a", Counter::Viewed)
        .await
        .unwrap()
        .is_none());

    // Still reachable by template identifier.
    let rows = WebFormRepo::find_by_template_id(&pool, "tpl-a").await.unwrap();
    assert_eq!(rows.len(), 1);

    // Second delete is a no-op.
    assert!(WebFormRepo::soft_delete(&pool, "tpl-a")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn replace_overwrites_content_and_keeps_counters(pool: PgPool) {
    let created = WebFormRepo::create(&pool, &new_form("a")).await.unwrap();
    WebFormRepo::increment(&pool, "tok-a", Counter::Viewed)
        .await
        .unwrap();

    let mut updated = content("Renamed");
    updated.action_type = Some(ActionType::RedirectUrl);
    updated.show_thank_you = ThankYouMessage::default();
    updated.redirect_url = "https://example.com/done".to_string();
    updated.status = FormStatus::Inactive;

    let row = WebFormRepo::replace(&pool, "tpl-a", &updated)
        .await
        .unwrap()
        .expect("form exists");

    assert_eq!(row.title, "Renamed");
    assert_eq!(row.action_type.as_deref(), Some("redirectUrl"));
    assert_eq!(row.thank_you_title, "");
    assert_eq!(row.status_id, status::INACTIVE);
    assert_eq!(row.viewed, 1);
    assert!(row.updated_at >= created.updated_at);

    assert!(WebFormRepo::replace(&pool, "tpl-missing", &updated)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn views_only_count_on_active_forms(pool: PgPool) {
    let mut input = new_form("a");
    input.content.status = FormStatus::Inactive;
    WebFormRepo::create(&pool, &input).await.unwrap();

    let viewed = WebFormRepo::increment(&pool, "tok-a", Counter::Viewed)
        .await
        .unwrap();
    assert!(viewed.is_none(), "inactive form must not count a view");

    let row = WebFormRepo::increment(&pool, "tok-a", Counter::Interacted)
        .await
        .unwrap()
        .expect("interactions still count");
    assert_eq!(row.viewed, 0);
    assert_eq!(row.interacted, 1);
}

// ---------------------------------------------------------------------------
// Leads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn record_submission_stores_lead_and_counts_it(pool: PgPool) {
    WebFormRepo::create(&pool, &new_form("a")).await.unwrap();
    let lead = NewLead::from_webform("tpl-a", form_data("ada@example.com"));

    let (lead_row, form_row) = LeadRepo::record_submission(&pool, "tok-a", &lead)
        .await
        .unwrap()
        .expect("live form");

    assert_eq!(lead_row.source, "webform");
    assert_eq!(lead_row.source_id, "tpl-a");
    assert_eq!(lead_row.form_data.0, form_data("ada@example.com"));
    assert_eq!(form_row.submitted, 1);

    let leads = LeadRepo::list_by_source_id(&pool, "tpl-a").await.unwrap();
    assert_eq!(leads.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn record_submission_for_unknown_token_stores_nothing(pool: PgPool) {
    let lead = NewLead::from_webform("tpl-a", form_data("ada@example.com"));

    let result = LeadRepo::record_submission(&pool, "tok-missing", &lead)
        .await
        .unwrap();
    assert!(result.is_none());

    let leads = LeadRepo::list_by_source_id(&pool, "tpl-a").await.unwrap();
    assert!(leads.is_empty());
}
