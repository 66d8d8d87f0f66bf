use alumnet_api::auth::password::{hash_password, verify_password};

// bcrypt's minimum cost keeps tests fast
const TEST_COST: u32 = 4;

#[test]
fn test_hash_is_not_plaintext() {
    let hash = hash_password("password123", TEST_COST).expect("Failed to hash");
    assert_ne!(hash, "password123");
    assert!(hash.starts_with("$2"));
}

#[test]
fn test_verify_correct_password() {
    let hash = hash_password("password123", TEST_COST).expect("Failed to hash");
    assert!(verify_password("password123", &hash));
}

#[test]
fn test_verify_wrong_password() {
    let hash = hash_password("password123", TEST_COST).expect("Failed to hash");
    assert!(!verify_password("password124", &hash));
    assert!(!verify_password("", &hash));
}

#[test]
fn test_hashes_use_distinct_salts() {
    let a = hash_password("password123", TEST_COST).expect("Failed to hash");
    let b = hash_password("password123", TEST_COST).expect("Failed to hash");
    assert_ne!(a, b);
    assert!(verify_password("password123", &a));
    assert!(verify_password("password123", &b));
}

#[test]
fn test_malformed_hash_is_a_mismatch() {
    assert!(!verify_password("password123", "not-a-bcrypt-hash"));
    assert!(!verify_password("password123", ""));
    assert!(!verify_password("password123", "$9$garbage"));
}

#[test]
fn test_2y_prefix_verifies() {
    // Hashes imported from PHP-stack systems carry the $2y$ prefix.
    let hash = hash_password("password123", TEST_COST).expect("Failed to hash");
    let rest = hash.strip_prefix("$2b$").expect("Unexpected hash prefix");
    let legacy = format!("$2y${}", rest);

    assert!(verify_password("password123", &legacy));
    assert!(!verify_password("wrong", &legacy));
}

#[test]
fn test_2x_prefix_verifies() {
    let hash = hash_password("password123", TEST_COST).expect("Failed to hash");
    let rest = hash.strip_prefix("$2b$").expect("Unexpected hash prefix");
    let legacy = format!("$2x${}", rest);

    assert!(verify_password("password123", &legacy));
}
