use alumnet_api::auth::jwt::verify_access_token;
use alumnet_api::auth::service;
use alumnet_api::models::{role, user};
use alumnet_api::TestApp;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

#[tokio::test]
async fn test_register_returns_sanitized_user() {
    let app = TestApp::new().await;
    let refs = app.seed_reference_data().await;

    let res = app
        .client
        .post(
            &app.url("/api/auth/register"),
            &app.register_payload(&refs, "12345678", "alumni@test.com", "081234567890"),
        )
        .await;

    assert_eq!(res.status, 201, "body: {}", res.body);
    let data = res.data();
    assert_eq!(data["nim"], "12345678");
    assert_eq!(data["email"], "alumni@test.com");
    assert!(data.get("password_hash").is_none());
    assert!(data.get("refresh_token").is_none());
    assert!(data.get("password").is_none());
}

#[tokio::test]
async fn test_duplicate_conflicts_and_priority() {
    let app = TestApp::new().await;
    let refs = app.seed_reference_data().await;

    app.register_user(&refs, "12345678", "first@test.com", "081111111111")
        .await;

    // Same NIM, everything else fresh
    let res = app
        .client
        .post(
            &app.url("/api/auth/register"),
            &app.register_payload(&refs, "12345678", "other@test.com", "082222222222"),
        )
        .await;
    assert_eq!(res.status, 409);
    assert_eq!(res.error()["message"], "NIM already registered");

    // Same email
    let res = app
        .client
        .post(
            &app.url("/api/auth/register"),
            &app.register_payload(&refs, "99999999", "first@test.com", "082222222222"),
        )
        .await;
    assert_eq!(res.status, 409);
    assert_eq!(res.error()["message"], "Email already registered");

    // Same phone
    let res = app
        .client
        .post(
            &app.url("/api/auth/register"),
            &app.register_payload(&refs, "99999999", "other@test.com", "081111111111"),
        )
        .await;
    assert_eq!(res.status, 409);
    assert_eq!(res.error()["message"], "Phone number already registered");

    // All three collide: NIM wins
    let res = app
        .client
        .post(
            &app.url("/api/auth/register"),
            &app.register_payload(&refs, "12345678", "first@test.com", "081111111111"),
        )
        .await;
    assert_eq!(res.status, 409);
    assert_eq!(res.error()["message"], "NIM already registered");
}

#[tokio::test]
async fn test_register_rejects_city_outside_province() {
    let app = TestApp::new().await;
    let refs = app.seed_reference_data().await;

    let mut payload: serde_json::Value = serde_json::from_str(&app.register_payload(
        &refs,
        "12345678",
        "alumni@test.com",
        "081234567890",
    ))
    .unwrap();
    payload["province_id"] = serde_json::json!(refs.other_province_id);

    let res = app
        .client
        .post(&app.url("/api/auth/register"), &payload.to_string())
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(
        res.error()["message"],
        "City does not belong to the selected province"
    );
}

#[tokio::test]
async fn test_register_rejects_unknown_city() {
    let app = TestApp::new().await;
    let refs = app.seed_reference_data().await;

    let mut payload: serde_json::Value = serde_json::from_str(&app.register_payload(
        &refs,
        "12345678",
        "alumni@test.com",
        "081234567890",
    ))
    .unwrap();
    payload["city_id"] = serde_json::json!(uuid::Uuid::new_v4());

    let res = app
        .client
        .post(&app.url("/api/auth/register"), &payload.to_string())
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.error()["message"], "City not found");
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = TestApp::new().await;
    let refs = app.seed_reference_data().await;

    let mut payload: serde_json::Value = serde_json::from_str(&app.register_payload(
        &refs,
        "123", // too short
        "not-an-email",
        "081234567890",
    ))
    .unwrap();
    payload["password"] = serde_json::json!("pw");

    let res = app
        .client
        .post(&app.url("/api/auth/register"), &payload.to_string())
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.error()["code"], "VALIDATION_ERROR");
    let fields = res.error()["fields"].as_array().unwrap().clone();
    let names: Vec<&str> = fields.iter().map(|f| f["field"].as_str().unwrap()).collect();
    assert!(names.contains(&"nim"));
    assert!(names.contains(&"email"));
    assert!(names.contains(&"password"));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new().await;
    let refs = app.seed_reference_data().await;
    app.register_user(&refs, "12345678", "alumni@test.com", "081234567890")
        .await;

    let wrong_password = app
        .client
        .post(
            &app.url("/api/auth/login"),
            &serde_json::json!({"nim": "12345678", "password": "wrong"}).to_string(),
        )
        .await;
    let unknown_nim = app
        .client
        .post(
            &app.url("/api/auth/login"),
            &serde_json::json!({"nim": "00000000", "password": "password123"}).to_string(),
        )
        .await;

    assert_eq!(wrong_password.status, 401);
    assert_eq!(unknown_nim.status, 401);
    // Byte-identical bodies so the response never reveals which field was wrong.
    assert_eq!(wrong_password.body, unknown_nim.body);
    assert_eq!(wrong_password.error()["message"], "Invalid NIM or password");
}

#[tokio::test]
async fn test_login_then_me_returns_profile() {
    let app = TestApp::new().await;
    let refs = app.seed_reference_data().await;
    app.register_user(&refs, "12345678", "alumni@test.com", "081234567890")
        .await;

    let (access, _refresh) = app.login("12345678", "password123").await;

    let res = app
        .client
        .get_with_auth(&app.url("/api/auth/me"), &access)
        .await;
    assert_eq!(res.status, 200, "body: {}", res.body);

    let data = res.data();
    assert_eq!(data["nim"], "12345678");
    assert_eq!(data["role"], "Alumni");
    assert_eq!(data["province"], "Jawa Barat");
    assert_eq!(data["city"], "Bandung");
    assert_eq!(data["faculty"], "Engineering");
    assert_eq!(data["major"], "Computer Science");
}

#[tokio::test]
async fn test_me_rejects_garbage_token() {
    let app = TestApp::new().await;

    let res = app
        .client
        .get_with_auth(&app.url("/api/auth/me"), "garbage-token")
        .await;
    assert_eq!(res.status, 401);
    assert_eq!(res.error()["message"], "Invalid access token");
}

#[tokio::test]
async fn test_me_without_header() {
    let app = TestApp::new().await;

    let res = app.client.get(&app.url("/api/auth/me")).await;
    assert_eq!(res.status, 401);
    assert_eq!(res.error()["message"], "Missing Authorization header");
}

#[tokio::test]
async fn test_refresh_rotation_is_single_use() {
    let app = TestApp::new().await;
    let refs = app.seed_reference_data().await;
    app.register_user(&refs, "12345678", "alumni@test.com", "081234567890")
        .await;
    let (_access, refresh) = app.login("12345678", "password123").await;

    // First rotation succeeds
    let res = app
        .client
        .post(
            &app.url("/api/auth/refresh"),
            &serde_json::json!({"old_refresh_token": refresh}).to_string(),
        )
        .await;
    assert_eq!(res.status, 200, "body: {}", res.body);
    let new_refresh = res.data()["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(new_refresh, refresh);

    // Replaying the rotated-away token fails
    let replay = app
        .client
        .post(
            &app.url("/api/auth/refresh"),
            &serde_json::json!({"old_refresh_token": refresh}).to_string(),
        )
        .await;
    assert_eq!(replay.status, 401);
    assert_eq!(replay.error()["message"], "Invalid refresh token");

    // The newest token still works
    let res = app
        .client
        .post(
            &app.url("/api/auth/refresh"),
            &serde_json::json!({"old_refresh_token": new_refresh}).to_string(),
        )
        .await;
    assert_eq!(res.status, 200, "body: {}", res.body);
}

#[tokio::test]
async fn test_old_access_token_survives_rotation() {
    let app = TestApp::new().await;
    let refs = app.seed_reference_data().await;
    app.register_user(&refs, "12345678", "alumni@test.com", "081234567890")
        .await;
    let (access, refresh) = app.login("12345678", "password123").await;

    let res = app
        .client
        .post(
            &app.url("/api/auth/refresh"),
            &serde_json::json!({"old_refresh_token": refresh}).to_string(),
        )
        .await;
    assert_eq!(res.status, 200);

    // Access tokens are not revoked by rotation; they expire on their own.
    let res = app
        .client
        .get_with_auth(&app.url("/api/auth/me"), &access)
        .await;
    assert_eq!(res.status, 200);
}

#[tokio::test]
async fn test_second_login_invalidates_first_session() {
    let app = TestApp::new().await;
    let refs = app.seed_reference_data().await;
    app.register_user(&refs, "12345678", "alumni@test.com", "081234567890")
        .await;

    let (_a1, refresh1) = app.login("12345678", "password123").await;
    let (_a2, refresh2) = app.login("12345678", "password123").await;

    // Only the latest login's refresh token is on record.
    let res = app
        .client
        .post(
            &app.url("/api/auth/refresh"),
            &serde_json::json!({"old_refresh_token": refresh1}).to_string(),
        )
        .await;
    assert_eq!(res.status, 401);

    let res = app
        .client
        .post(
            &app.url("/api/auth/refresh"),
            &serde_json::json!({"old_refresh_token": refresh2}).to_string(),
        )
        .await;
    assert_eq!(res.status, 200, "body: {}", res.body);
}

#[tokio::test]
async fn test_refreshed_access_token_keeps_identity() {
    let app = TestApp::new().await;
    let refs = app.seed_reference_data().await;
    app.register_user(&refs, "12345678", "alumni@test.com", "081234567890")
        .await;
    let (login_access, refresh) = app.login("12345678", "password123").await;

    let res = app
        .client
        .post(
            &app.url("/api/auth/refresh"),
            &serde_json::json!({"old_refresh_token": refresh}).to_string(),
        )
        .await;
    assert_eq!(res.status, 200, "body: {}", res.body);
    let new_access = res.data()["access_token"].as_str().unwrap().to_string();

    // The refreshed access token carries the same identity claims as the
    // one issued at login.
    let login_claims = verify_access_token(&login_access, &app.config.access_token_secret)
        .expect("login access token should verify");
    let new_claims = verify_access_token(&new_access, &app.config.access_token_secret)
        .expect("refreshed access token should verify");
    assert_eq!(new_claims.sub, login_claims.sub);
    assert_eq!(new_claims.role, login_claims.role);
    assert_eq!(new_claims.nim, login_claims.nim);

    // And it is accepted by the API like any login-issued token.
    let res = app
        .client
        .get_with_auth(&app.url("/api/auth/me"), &new_access)
        .await;
    assert_eq!(res.status, 200, "body: {}", res.body);
    assert_eq!(res.data()["nim"], "12345678");
    assert_eq!(res.data()["role"], "Alumni");
}

#[tokio::test]
async fn test_token_issue_fails_loudly_without_role_row() {
    let app = TestApp::new().await;
    let refs = app.seed_reference_data().await;

    // A user row pointing at a role that does not exist.
    let now = chrono::Utc::now().naive_utc();
    let orphan = user::Model {
        id: Uuid::new_v4(),
        nim: "55555555".to_string(),
        name: "Orphaned User".to_string(),
        email: "orphan@test.com".to_string(),
        password_hash: "$2b$04$invalidinvalidinvalidinvalidinvalidinvalidinvalidinva".to_string(),
        phone_number: "085555555555".to_string(),
        enrollment_year: 2018,
        graduation_year: 2022,
        role_id: Uuid::new_v4(),
        province_id: refs.province_id,
        city_id: refs.city_id,
        faculty_id: refs.faculty_id,
        major_id: refs.major_id,
        verification_file_url: "https://example.com/ijazah.pdf".to_string(),
        refresh_token: None,
        created_at: now,
        updated_at: now,
    };

    let err = service::issue_tokens(&app.db, &app.config, &orphan)
        .await
        .expect_err("issuing tokens without a role row should fail");
    assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
}

#[tokio::test]
async fn test_register_without_default_role_is_configuration_error() {
    let app = TestApp::new().await;
    let refs = app.seed_reference_data().await;

    role::Entity::delete_many()
        .filter(role::Column::Name.eq("Alumni"))
        .exec(&app.db)
        .await
        .expect("Failed to delete role");

    let res = app
        .client
        .post(
            &app.url("/api/auth/register"),
            &app.register_payload(&refs, "12345678", "alumni@test.com", "081234567890"),
        )
        .await;

    assert_eq!(res.status, 500);
    assert_eq!(res.error()["code"], "CONFIGURATION_ERROR");
}

#[tokio::test]
async fn test_me_from_body() {
    let app = TestApp::new().await;
    let refs = app.seed_reference_data().await;
    app.register_user(&refs, "12345678", "alumni@test.com", "081234567890")
        .await;
    let (access, _) = app.login("12345678", "password123").await;

    let res = app
        .client
        .post(
            &app.url("/api/auth/me"),
            &serde_json::json!({"access_token": access}).to_string(),
        )
        .await;
    assert_eq!(res.status, 200, "body: {}", res.body);
    assert_eq!(res.data()["nim"], "12345678");
}
