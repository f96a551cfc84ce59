//! Account and session tests: argon2 hashing, registration defaults and the
//! server-side session store.

use habithero::auth;
use habithero::db;
use habithero::domain::DomainError;
use habithero::models::session;
use habithero::services::user_service;
use sea_orm::{DatabaseConnection, EntityTrait};

async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

#[test]
fn password_hashing_round_trips() {
    let hash = auth::hash_password("hunter2").expect("hashing should succeed");

    assert_ne!(hash, "hunter2");
    assert!(auth::verify_password("hunter2", &hash).expect("verify"));
    assert!(!auth::verify_password("wrong", &hash).expect("verify"));

    // Salted: hashing the same password twice yields different strings
    let other = auth::hash_password("hunter2").expect("hashing should succeed");
    assert_ne!(hash, other);
}

#[tokio::test]
async fn register_creates_user_with_progression_defaults() {
    let db = setup_test_db().await;

    let user = user_service::register(&db, "newbie", "hunter2")
        .await
        .expect("registration should succeed");

    assert_eq!(user.username, "newbie");
    assert_eq!(user.points, 0);
    assert_eq!(user.title, "New Explorer");
    assert_ne!(user.password_hash, "hunter2");
}

#[tokio::test]
async fn register_rejects_duplicates_and_blank_credentials() {
    let db = setup_test_db().await;

    user_service::register(&db, "taken", "hunter2")
        .await
        .expect("first registration should succeed");

    let err = user_service::register(&db, "taken", "other")
        .await
        .expect_err("duplicate username must fail");
    assert!(matches!(err, DomainError::Validation(_)));

    let err = user_service::register(&db, "  ", "hunter2")
        .await
        .expect_err("blank username must fail");
    assert!(matches!(err, DomainError::Validation(_)));

    let err = user_service::register(&db, "nopass", "")
        .await
        .expect_err("empty password must fail");
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn authenticate_checks_credentials() {
    let db = setup_test_db().await;

    let registered = user_service::register(&db, "returning", "hunter2")
        .await
        .expect("registration should succeed");

    let user = user_service::authenticate(&db, "returning", "hunter2")
        .await
        .expect("authenticate query")
        .expect("credentials should match");
    assert_eq!(user.id, registered.id);

    let wrong = user_service::authenticate(&db, "returning", "nope")
        .await
        .expect("authenticate query");
    assert!(wrong.is_none());

    let unknown = user_service::authenticate(&db, "ghost", "hunter2")
        .await
        .expect("authenticate query");
    assert!(unknown.is_none());
}

#[tokio::test]
async fn sessions_are_created_and_destroyed() {
    let db = setup_test_db().await;

    let user = user_service::register(&db, "sessioned", "hunter2")
        .await
        .expect("registration should succeed");

    let token = auth::create_session(&db, user.id)
        .await
        .expect("session should be created");
    assert_eq!(token.len(), 64); // 32 random bytes, hex encoded

    let stored = session::Entity::find_by_id(token.clone())
        .one(&db)
        .await
        .expect("query session")
        .expect("session exists");
    assert_eq!(stored.user_id, user.id);

    auth::destroy_session(&db, &token)
        .await
        .expect("session should be destroyed");

    let gone = session::Entity::find_by_id(token)
        .one(&db)
        .await
        .expect("query session");
    assert!(gone.is_none());
}

#[test]
fn session_cookies_are_http_only() {
    let cookie = auth::session_cookie("abc123");
    assert!(cookie.starts_with("habithero_session=abc123"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));

    let cleared = auth::clear_session_cookie();
    assert!(cleared.contains("Max-Age=0"));
}
