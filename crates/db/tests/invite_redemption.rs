//! Integration tests for the single-use invite redemption transaction.

use chrono::{Duration, Utc};
use coffer_core::invite::generate_token;
use coffer_db::models::invite::NewTestimonialInvite;
use coffer_db::models::testimonial::CreateTestimonial;
use coffer_db::repositories::{InviteRepo, TestimonialRepo};
use sqlx::PgPool;

fn submission(name: &str) -> CreateTestimonial {
    CreateTestimonial {
        name: name.to_string(),
        quote: "Great work".to_string(),
        is_active: Some(true),
        ..Default::default()
    }
}

fn new_invite(expires_in: Duration) -> NewTestimonialInvite {
    NewTestimonialInvite {
        email: "client@example.com".into(),
        token: generate_token(),
        expires_at: Utc::now() + expires_in,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_redeem_creates_one_testimonial_and_marks_used(pool: PgPool) {
    let invite = InviteRepo::create(&pool, &new_invite(Duration::days(10)))
        .await
        .unwrap();
    assert!(!invite.is_used);

    let testimonial = InviteRepo::redeem(&pool, invite.token, &submission("Jane Doe"))
        .await
        .unwrap()
        .expect("first redemption should be accepted");
    assert_eq!(testimonial.name, "Jane Doe");
    assert!(testimonial.is_active);

    let invite = InviteRepo::find_by_id(&pool, invite.id).await.unwrap().unwrap();
    assert!(invite.is_used);
    assert!(invite.used_at.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_second_redemption_is_rejected(pool: PgPool) {
    let invite = InviteRepo::create(&pool, &new_invite(Duration::days(10)))
        .await
        .unwrap();

    assert!(InviteRepo::redeem(&pool, invite.token, &submission("First"))
        .await
        .unwrap()
        .is_some());
    assert!(InviteRepo::redeem(&pool, invite.token, &submission("Second"))
        .await
        .unwrap()
        .is_none());

    assert_eq!(TestimonialRepo::list(&pool).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_expired_invite_is_rejected(pool: PgPool) {
    let invite = InviteRepo::create(&pool, &new_invite(-Duration::hours(1)))
        .await
        .unwrap();

    assert!(InviteRepo::redeem(&pool, invite.token, &submission("Late"))
        .await
        .unwrap()
        .is_none());

    let invite = InviteRepo::find_by_id(&pool, invite.id).await.unwrap().unwrap();
    assert!(!invite.is_used);
    assert!(TestimonialRepo::list(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_token_is_rejected(pool: PgPool) {
    assert!(InviteRepo::redeem(&pool, generate_token(), &submission("Nobody"))
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_redemptions_accept_at_most_one(pool: PgPool) {
    let invite = InviteRepo::create(&pool, &new_invite(Duration::days(10)))
        .await
        .unwrap();

    let attempts = (0..8).map(|i| {
        let pool = pool.clone();
        let token = invite.token;
        tokio::spawn(async move {
            InviteRepo::redeem(&pool, token, &submission(&format!("Racer {i}")))
                .await
                .unwrap()
                .is_some()
        })
    });

    let mut accepted = 0;
    for handle in attempts.collect::<Vec<_>>() {
        if handle.await.unwrap() {
            accepted += 1;
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(TestimonialRepo::list(&pool).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_mark_sent_and_list_by_ids(pool: PgPool) {
    let a = InviteRepo::create(&pool, &new_invite(Duration::days(1))).await.unwrap();
    let b = InviteRepo::create(&pool, &new_invite(Duration::days(1))).await.unwrap();

    assert!(InviteRepo::mark_sent(&pool, a.id).await.unwrap());

    let invites = InviteRepo::list_by_ids(&pool, &[b.id, a.id, 424_242]).await.unwrap();
    assert_eq!(invites.len(), 2);
    assert_eq!(invites[0].id, a.id);
    assert!(invites[0].sent_at.is_some());
    assert!(invites[1].sent_at.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_token_rejected(pool: PgPool) {
    let first = new_invite(Duration::days(1));
    InviteRepo::create(&pool, &first).await.unwrap();
    let dup = NewTestimonialInvite {
        email: "other@example.com".into(),
        ..first
    };
    assert!(InviteRepo::create(&pool, &dup).await.is_err());
}
