use alumnet_api::TestApp;
use uuid::Uuid;

fn job_body(title: &str) -> String {
    serde_json::json!({
        "title": title,
        "company": "Acme Corp",
        "content": "We are hiring.",
        "job_type": "Full-time",
    })
    .to_string()
}

async fn post_job(app: &TestApp, token: &str, title: &str) -> String {
    let res = app
        .client
        .post_with_auth(&app.url("/api/jobs"), token, &job_body(title))
        .await;
    assert_eq!(res.status, 201, "body: {}", res.body);
    res.data()["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_job_list_is_public() {
    let app = TestApp::new().await;

    let res = app.client.get(&app.url("/api/jobs")).await;
    assert_eq!(res.status, 200, "body: {}", res.body);
    assert!(res.data()["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_job_create_requires_auth() {
    let app = TestApp::new().await;

    let res = app
        .client
        .post(&app.url("/api/jobs"), &job_body("Backend Engineer"))
        .await;
    assert_eq!(res.status, 401);
}

#[tokio::test]
async fn test_owner_can_update_and_delete_job() {
    let app = TestApp::new().await;
    let refs = app.seed_reference_data().await;
    app.register_user(&refs, "12345678", "owner@test.com", "081111111111")
        .await;
    let (token, _) = app.login("12345678", "password123").await;

    let job_id = post_job(&app, &token, "Backend Engineer").await;

    let res = app
        .client
        .put_with_auth(
            &app.url(&format!("/api/jobs/{}", job_id)),
            &token,
            &serde_json::json!({"title": "Senior Backend Engineer"}).to_string(),
        )
        .await;
    assert_eq!(res.status, 200, "body: {}", res.body);
    assert_eq!(res.data()["title"], "Senior Backend Engineer");

    let res = app
        .client
        .delete_with_auth(&app.url(&format!("/api/jobs/{}", job_id)), &token)
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.data()["message"], "Job deleted successfully");
}

#[tokio::test]
async fn test_non_owner_cannot_modify_job() {
    let app = TestApp::new().await;
    let refs = app.seed_reference_data().await;
    app.register_user(&refs, "11111111", "owner@test.com", "081111111111")
        .await;
    app.register_user(&refs, "22222222", "other@test.com", "082222222222")
        .await;
    let (owner_token, _) = app.login("11111111", "password123").await;
    let (other_token, _) = app.login("22222222", "password123").await;

    let job_id = post_job(&app, &owner_token, "Backend Engineer").await;

    let res = app
        .client
        .put_with_auth(
            &app.url(&format!("/api/jobs/{}", job_id)),
            &other_token,
            &serde_json::json!({"title": "Hijacked"}).to_string(),
        )
        .await;
    assert_eq!(res.status, 403);
    assert_eq!(
        res.error()["message"],
        "Forbidden: You are not authorized to modify this resource"
    );

    let res = app
        .client
        .delete_with_auth(&app.url(&format!("/api/jobs/{}", job_id)), &other_token)
        .await;
    assert_eq!(res.status, 403);
}

#[tokio::test]
async fn test_admin_overrides_job_ownership() {
    let app = TestApp::new().await;
    let refs = app.seed_reference_data().await;
    app.register_user(&refs, "11111111", "owner@test.com", "081111111111")
        .await;
    let (owner_token, _) = app.login("11111111", "password123").await;
    let (admin_token, _) = app.create_admin(&refs, "90000001", "adminpass").await;

    let job_id = post_job(&app, &owner_token, "Backend Engineer").await;

    let res = app
        .client
        .put_with_auth(
            &app.url(&format!("/api/jobs/{}", job_id)),
            &admin_token,
            &serde_json::json!({"title": "Moderated title"}).to_string(),
        )
        .await;
    assert_eq!(res.status, 200, "body: {}", res.body);

    let res = app
        .client
        .delete_with_auth(&app.url(&format!("/api/jobs/{}", job_id)), &admin_token)
        .await;
    assert_eq!(res.status, 200);
}

#[tokio::test]
async fn test_unknown_job_is_404_for_any_authenticated_caller() {
    let app = TestApp::new().await;
    let refs = app.seed_reference_data().await;
    app.register_user(&refs, "11111111", "user@test.com", "081111111111")
        .await;
    let (token, _) = app.login("11111111", "password123").await;

    let res = app
        .client
        .delete_with_auth(&app.url(&format!("/api/jobs/{}", Uuid::new_v4())), &token)
        .await;
    assert_eq!(res.status, 404);
    assert_eq!(res.error()["message"], "Job not found");
}

#[tokio::test]
async fn test_user_list_requires_auth() {
    let app = TestApp::new().await;

    let res = app.client.get(&app.url("/api/users")).await;
    assert_eq!(res.status, 401);
}

#[tokio::test]
async fn test_alumni_can_list_users() {
    let app = TestApp::new().await;
    let refs = app.seed_reference_data().await;
    app.register_user(&refs, "11111111", "user@test.com", "081111111111")
        .await;
    let (token, _) = app.login("11111111", "password123").await;

    let res = app
        .client
        .get_with_auth(&app.url("/api/users"), &token)
        .await;
    assert_eq!(res.status, 200, "body: {}", res.body);
    assert_eq!(res.data()["meta"]["total"], 1);
}

#[tokio::test]
async fn test_only_admin_can_create_users() {
    let app = TestApp::new().await;
    let refs = app.seed_reference_data().await;
    app.register_user(&refs, "11111111", "user@test.com", "081111111111")
        .await;
    let (alumni_token, _) = app.login("11111111", "password123").await;
    let (admin_token, _) = app.create_admin(&refs, "90000001", "adminpass").await;

    let body = app.register_payload(&refs, "33333333", "new@test.com", "083333333333");

    let res = app
        .client
        .post_with_auth(&app.url("/api/users"), &alumni_token, &body)
        .await;
    assert_eq!(res.status, 403);
    assert_eq!(res.error()["message"], "Forbidden: Admin only");

    let res = app
        .client
        .post_with_auth(&app.url("/api/users"), &admin_token, &body)
        .await;
    assert_eq!(res.status, 201, "body: {}", res.body);
}

#[tokio::test]
async fn test_self_or_admin_on_user_account() {
    let app = TestApp::new().await;
    let refs = app.seed_reference_data().await;
    let me = app
        .register_user(&refs, "11111111", "me@test.com", "081111111111")
        .await;
    let other = app
        .register_user(&refs, "22222222", "other@test.com", "082222222222")
        .await;
    let my_id = me["id"].as_str().unwrap();
    let other_id = other["id"].as_str().unwrap();
    let (my_token, _) = app.login("11111111", "password123").await;

    // Reading my own profile works
    let res = app
        .client
        .get_with_auth(&app.url(&format!("/api/users/{}", my_id)), &my_token)
        .await;
    assert_eq!(res.status, 200, "body: {}", res.body);

    // Reading someone else's is forbidden
    let res = app
        .client
        .get_with_auth(&app.url(&format!("/api/users/{}", other_id)), &my_token)
        .await;
    assert_eq!(res.status, 403);
    assert_eq!(
        res.error()["message"],
        "Forbidden: You can only manage your own account"
    );

    // Updating my own account works
    let res = app
        .client
        .put_with_auth(
            &app.url(&format!("/api/users/{}", my_id)),
            &my_token,
            &serde_json::json!({"name": "Renamed Alumni"}).to_string(),
        )
        .await;
    assert_eq!(res.status, 200, "body: {}", res.body);
    assert_eq!(res.data()["name"], "Renamed Alumni");

    // An admin can update anyone
    let (admin_token, _) = app.create_admin(&refs, "90000001", "adminpass").await;
    let res = app
        .client
        .put_with_auth(
            &app.url(&format!("/api/users/{}", other_id)),
            &admin_token,
            &serde_json::json!({"name": "Admin Renamed"}).to_string(),
        )
        .await;
    assert_eq!(res.status, 200, "body: {}", res.body);
}

#[tokio::test]
async fn test_password_change_rehashes() {
    let app = TestApp::new().await;
    let refs = app.seed_reference_data().await;
    let me = app
        .register_user(&refs, "11111111", "me@test.com", "081111111111")
        .await;
    let my_id = me["id"].as_str().unwrap();
    let (my_token, _) = app.login("11111111", "password123").await;

    let res = app
        .client
        .put_with_auth(
            &app.url(&format!("/api/users/{}", my_id)),
            &my_token,
            &serde_json::json!({"password": "newpassword"}).to_string(),
        )
        .await;
    assert_eq!(res.status, 200, "body: {}", res.body);

    // Old password no longer works, new one does
    let res = app
        .client
        .post(
            &app.url("/api/auth/login"),
            &serde_json::json!({"nim": "11111111", "password": "password123"}).to_string(),
        )
        .await;
    assert_eq!(res.status, 401);

    app.login("11111111", "newpassword").await;
}
