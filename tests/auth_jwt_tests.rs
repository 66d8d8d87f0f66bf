use alumnet_api::auth::jwt::{
    sign_access_token, sign_refresh_token, verify_access_token, verify_refresh_token, Claims,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

const ACCESS_SECRET: &str = "test-access-secret";
const REFRESH_SECRET: &str = "test-refresh-secret";

#[test]
fn test_sign_and_verify_access_token() {
    let user_id = Uuid::new_v4().to_string();

    let token = sign_access_token(&user_id, "Alumni", "12345678", ACCESS_SECRET, 24)
        .expect("Failed to sign token");
    assert!(!token.is_empty());

    let claims = verify_access_token(&token, ACCESS_SECRET).expect("Failed to verify token");
    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.role, "Alumni");
    assert_eq!(claims.nim, "12345678");
}

#[test]
fn test_sign_and_verify_refresh_token() {
    let user_id = Uuid::new_v4().to_string();

    let token = sign_refresh_token(&user_id, "Admin", "87654321", REFRESH_SECRET, 7)
        .expect("Failed to sign token");

    let claims = verify_refresh_token(&token, REFRESH_SECRET).expect("Failed to verify token");
    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.role, "Admin");
}

#[test]
fn test_wrong_secret_fails() {
    let token = sign_access_token("user-1", "Alumni", "11111111", ACCESS_SECRET, 1)
        .expect("Failed to sign token");

    assert!(verify_access_token(&token, "some-other-secret").is_err());
}

#[test]
fn test_access_and_refresh_keys_are_separate() {
    let access = sign_access_token("user-1", "Alumni", "11111111", ACCESS_SECRET, 24)
        .expect("Failed to sign access token");
    let refresh = sign_refresh_token("user-1", "Alumni", "11111111", REFRESH_SECRET, 7)
        .expect("Failed to sign refresh token");

    // A token from one family must not verify under the other's secret.
    assert!(verify_refresh_token(&access, REFRESH_SECRET).is_err());
    assert!(verify_access_token(&refresh, ACCESS_SECRET).is_err());
}

#[test]
fn test_malformed_tokens_fail() {
    let invalid_tokens = vec![
        "not.a.token",
        "random_string",
        "",
        "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid",
    ];

    for token in invalid_tokens {
        let result = verify_access_token(token, ACCESS_SECRET);
        assert!(result.is_err(), "Should fail for invalid token: {}", token);
    }
}

#[test]
fn test_expired_token_fails() {
    // Expiry two hours in the past, well beyond the default 60s leeway.
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: "user-1".to_string(),
        role: "Alumni".to_string(),
        nim: "11111111".to_string(),
        jti: Uuid::new_v4().to_string(),
        iat: (now - 7200) as usize,
        exp: (now - 7200 + 60) as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(ACCESS_SECRET.as_bytes()),
    )
    .expect("Failed to encode token");

    assert!(verify_access_token(&token, ACCESS_SECRET).is_err());
}

#[test]
fn test_verification_failures_share_one_message() {
    let expired_err = verify_access_token("garbage", ACCESS_SECRET).unwrap_err();
    assert_eq!(expired_err.to_string(), "Invalid access token");

    let refresh_err = verify_refresh_token("garbage", REFRESH_SECRET).unwrap_err();
    assert_eq!(refresh_err.to_string(), "Invalid refresh token");
}

#[test]
fn test_tokens_signed_back_to_back_are_distinct() {
    let a = sign_refresh_token("user-1", "Alumni", "11111111", REFRESH_SECRET, 7)
        .expect("Failed to sign token");
    let b = sign_refresh_token("user-1", "Alumni", "11111111", REFRESH_SECRET, 7)
        .expect("Failed to sign token");
    assert_ne!(a, b);
}

#[test]
fn test_expiry_window() {
    let before = chrono::Utc::now().timestamp() as usize;
    let token = sign_access_token("user-1", "Alumni", "11111111", ACCESS_SECRET, 2)
        .expect("Failed to sign token");
    let after = chrono::Utc::now().timestamp() as usize;

    let claims = verify_access_token(&token, ACCESS_SECRET).expect("Failed to verify");
    assert!(claims.iat >= before && claims.iat <= after);
    assert_eq!(claims.exp - claims.iat, 2 * 3600);
}
