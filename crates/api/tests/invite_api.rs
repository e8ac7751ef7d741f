//! Integration tests for the testimonial invite lifecycle over HTTP:
//! creation, public redemption, and the bulk send action.

mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use coffer_core::invite::generate_token;
use coffer_db::models::invite::NewTestimonialInvite;
use coffer_db::repositories::{InviteRepo, TestimonialRepo};
use common::{body_json, get_request, json_request, MultipartBody, RecordingMailer, TestApp};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn insert_invite(pool: &PgPool, email: &str, expires_in: Duration) -> (i64, String) {
    let invite = InviteRepo::create(
        pool,
        &NewTestimonialInvite {
            email: email.to_string(),
            token: generate_token(),
            expires_at: Utc::now() + expires_in,
        },
    )
    .await
    .unwrap();
    (invite.id, invite.token.to_string())
}

fn submit_path(token: &str) -> String {
    format!("/testimonial/submit/{token}/")
}

fn submission(name: &str, quote: &str) -> MultipartBody {
    MultipartBody::new()
        .text("name", name)
        .text("role", "Homeowner")
        .text("quote", quote)
}

// ---------------------------------------------------------------------------
// Admin create / list
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_invite_defaults_to_ten_days(pool: PgPool) {
    let app = TestApp::new(pool);
    let token = app.admin_token().await;

    let before = Utc::now();
    let response = app
        .send(json_request(
            Method::POST,
            "/api/v1/admin/testimonial-invites",
            Some(&token),
            serde_json::json!({"email": "  client@example.com "}),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["email"], "client@example.com");
    assert_eq!(json["is_used"], false);
    assert_eq!(json["is_expired"], false);
    assert_eq!(json["state"], "created");
    assert!(json["sent_at"].is_null());

    let invite_token = json["token"].as_str().unwrap();
    assert_eq!(
        json["redemption_url"],
        format!("{}/testimonial/submit/{invite_token}/", common::SITE_URL)
    );

    let expires_at: chrono::DateTime<Utc> =
        serde_json::from_value(json["expires_at"].clone()).unwrap();
    let days = (expires_at - before).num_hours();
    assert!((239..=240).contains(&days), "expected ~10 days, got {days}h");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_invite_rejects_bad_email(pool: PgPool) {
    let app = TestApp::new(pool);
    let token = app.admin_token().await;

    let response = app
        .send(json_request(
            Method::POST,
            "/api/v1/admin/testimonial-invites",
            Some(&token),
            serde_json::json!({"email": "not-an-email"}),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_reports_expired_invites(pool: PgPool) {
    insert_invite(&pool, "late@example.com", -Duration::hours(2)).await;
    let app = TestApp::new(pool);
    let token = app.admin_token().await;

    let response = app
        .send(get_request("/api/v1/admin/testimonial-invites", Some(&token)))
        .await;
    let json = body_json(response).await;

    assert_eq!(json[0]["is_expired"], true);
    assert_eq!(json[0]["state"], "expired");
}

// ---------------------------------------------------------------------------
// Public redemption
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn redemption_page_for_open_invite(pool: PgPool) {
    let (_, token) = insert_invite(&pool, "client@example.com", Duration::days(10)).await;
    let app = TestApp::new(pool);

    let response = app.send(get_request(&submit_path(&token), None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["is_invalid"], false);
    assert_eq!(json["submitted"], false);
    assert_eq!(json["form_error"], "");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_and_malformed_tokens_are_404(pool: PgPool) {
    let app = TestApp::new(pool);

    let response = app.send(get_request(&submit_path("not-a-uuid"), None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let unknown = generate_token().to_string();
    let response = app.send(get_request(&submit_path(&unknown), None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .send(submission("Jane", "Lovely").request(Method::POST, &submit_path(&unknown), None))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn redemption_creates_one_active_testimonial(pool: PgPool) {
    let (invite_id, token) = insert_invite(&pool, "client@example.com", Duration::days(10)).await;
    let app = TestApp::new(pool.clone());

    let response = app
        .send(
            submission("  Jane Doe ", " They rebuilt our loft beautifully. ")
                .file("photo", "me.png", &common::png(40, 40))
                .request(Method::POST, &submit_path(&token), None),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["submitted"], true);
    assert_eq!(json["is_invalid"], false);
    assert_eq!(json["form_data"]["name"], "Jane Doe");

    let testimonials = TestimonialRepo::list(&pool).await.unwrap();
    assert_eq!(testimonials.len(), 1);
    let t = &testimonials[0];
    assert!(t.is_active);
    assert_eq!(t.name, "Jane Doe");
    assert_eq!(t.role, "Homeowner");
    assert_eq!(t.quote, "They rebuilt our loft beautifully.");
    assert!(t.photo.starts_with("testimonials/photos/"));
    assert!(app.media_file(&t.photo).exists());

    let invite = InviteRepo::find_by_id(&pool, invite_id).await.unwrap().unwrap();
    assert!(invite.is_used);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn second_redemption_is_invalid(pool: PgPool) {
    let (_, token) = insert_invite(&pool, "client@example.com", Duration::days(10)).await;
    let app = TestApp::new(pool.clone());

    let first = app
        .send(submission("First", "Great").request(Method::POST, &submit_path(&token), None))
        .await;
    assert_eq!(body_json(first).await["submitted"], true);

    let second = app
        .send(submission("Second", "Also great").request(Method::POST, &submit_path(&token), None))
        .await;
    assert_eq!(second.status(), StatusCode::OK);
    let json = body_json(second).await;
    assert_eq!(json["is_invalid"], true);
    assert_eq!(json["submitted"], false);

    let page = app.send(get_request(&submit_path(&token), None)).await;
    assert_eq!(body_json(page).await["is_invalid"], true);

    assert_eq!(TestimonialRepo::list(&pool).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn expired_invite_accepts_nothing(pool: PgPool) {
    let (_, token) = insert_invite(&pool, "client@example.com", -Duration::minutes(1)).await;
    let app = TestApp::new(pool.clone());

    let response = app
        .send(submission("Jane", "Great").request(Method::POST, &submit_path(&token), None))
        .await;
    let json = body_json(response).await;
    assert_eq!(json["is_invalid"], true);
    assert_eq!(json["submitted"], false);

    assert!(TestimonialRepo::list(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn blank_quote_is_inline_error_with_echo(pool: PgPool) {
    let (invite_id, token) = insert_invite(&pool, "client@example.com", Duration::days(10)).await;
    let app = TestApp::new(pool.clone());

    let response = app
        .send(submission("Jane", "   ").request(Method::POST, &submit_path(&token), None))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["submitted"], false);
    assert_eq!(json["is_invalid"], false);
    assert_eq!(json["form_error"], "Name and testimonial are required.");
    assert_eq!(json["form_data"]["name"], "Jane");
    assert_eq!(json["form_data"]["role"], "Homeowner");

    let invite = InviteRepo::find_by_id(&pool, invite_id).await.unwrap().unwrap();
    assert!(!invite.is_used);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn over_long_name_is_inline_error(pool: PgPool) {
    let (invite_id, token) = insert_invite(&pool, "client@example.com", Duration::days(10)).await;
    let app = TestApp::new(pool.clone());
    let long_name = "J".repeat(121);

    let response = app
        .send(
            submission(&long_name, "Great work")
                .file("photo", "me.png", &common::png(20, 20))
                .request(Method::POST, &submit_path(&token), None),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["submitted"], false);
    assert_eq!(json["is_invalid"], false);
    assert_eq!(json["form_error"], "Name must be at most 120 characters.");
    assert_eq!(json["form_data"]["name"], long_name);
    assert_eq!(json["form_data"]["quote"], "Great work");

    let invite = InviteRepo::find_by_id(&pool, invite_id).await.unwrap().unwrap();
    assert!(!invite.is_used);
    assert!(TestimonialRepo::list(&pool).await.unwrap().is_empty());
    assert!(app.stored_files("testimonials/photos").is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn over_long_role_is_inline_error(pool: PgPool) {
    let (_, token) = insert_invite(&pool, "client@example.com", Duration::days(10)).await;
    let app = TestApp::new(pool);

    let response = app
        .send(
            MultipartBody::new()
                .text("name", "Jane")
                .text("role", &"r".repeat(161))
                .text("quote", "Great work")
                .request(Method::POST, &submit_path(&token), None),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["submitted"], false);
    assert_eq!(json["form_error"], "Role must be at most 160 characters.");
}

// ---------------------------------------------------------------------------
// Bulk send
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn bulk_send_skips_closed_and_continues_past_failures(pool: PgPool) {
    let (open_a, token_a) = insert_invite(&pool, "a@example.com", Duration::days(10)).await;
    let (failing, _) = insert_invite(&pool, "broken@example.com", Duration::days(10)).await;
    let (open_b, _) = insert_invite(&pool, "b@example.com", Duration::days(3)).await;
    let (expired, _) = insert_invite(&pool, "late@example.com", -Duration::days(1)).await;
    let (used, used_token) = insert_invite(&pool, "done@example.com", Duration::days(10)).await;

    let app = TestApp::with_mailer(
        pool.clone(),
        RecordingMailer::failing_for(&["broken@example.com"]),
    );
    let redeemed = app
        .send(submission("Done", "Great").request(Method::POST, &submit_path(&used_token), None))
        .await;
    assert_eq!(body_json(redeemed).await["submitted"], true);

    let token = app.admin_token().await;
    let response = app
        .send(json_request(
            Method::POST,
            "/api/v1/admin/testimonial-invites/send",
            Some(&token),
            serde_json::json!({"ids": [open_a, failing, open_b, expired, used]}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["sent"], 2);
    assert_eq!(json["skipped"], 2);
    assert_eq!(json["failed"], 1);
    assert_eq!(json["failures"].as_array().unwrap().len(), 1);
    assert!(json["failures"][0]
        .as_str()
        .unwrap()
        .starts_with("broken@example.com"));
    assert_eq!(
        json["message"],
        "Sent 2, skipped 2 (used or expired), failed 1"
    );

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 2);
    let first = sent.iter().find(|e| e.to == ["a@example.com"]).unwrap();
    assert_eq!(first.from, common::FROM_EMAIL);
    assert!(first
        .body
        .contains(&format!("{}/testimonial/submit/{token_a}/", common::SITE_URL)));
    assert!(first.body.contains("days (until"));

    let a = InviteRepo::find_by_id(&pool, open_a).await.unwrap().unwrap();
    assert!(a.sent_at.is_some());
    let broken = InviteRepo::find_by_id(&pool, failing).await.unwrap().unwrap();
    assert!(broken.sent_at.is_none());
    let late = InviteRepo::find_by_id(&pool, expired).await.unwrap().unwrap();
    assert!(late.sent_at.is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn bulk_send_caps_failure_reasons(pool: PgPool) {
    let mut ids = Vec::new();
    let mut addresses = Vec::new();
    for i in 0..7 {
        let email = format!("fail{i}@example.com");
        ids.push(insert_invite(&pool, &email, Duration::days(1)).await.0);
        addresses.push(email);
    }
    let refs: Vec<&str> = addresses.iter().map(String::as_str).collect();
    let app = TestApp::with_mailer(pool, RecordingMailer::failing_for(&refs));
    let token = app.admin_token().await;

    let response = app
        .send(json_request(
            Method::POST,
            "/api/v1/admin/testimonial-invites/send",
            Some(&token),
            serde_json::json!({ "ids": ids }),
        ))
        .await;
    let json = body_json(response).await;

    assert_eq!(json["sent"], 0);
    assert_eq!(json["failed"], 7);
    assert_eq!(json["failures"].as_array().unwrap().len(), 5);
}
