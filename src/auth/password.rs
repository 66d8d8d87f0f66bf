use crate::error::ApiError;

/// Default bcrypt work factor.
pub const HASH_COST: u32 = 10;

/// Hash a password with bcrypt at the given cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String, ApiError> {
    bcrypt::hash(password, cost)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a stored bcrypt hash.
///
/// Any failure (malformed hash, unsupported version) is reported as a
/// mismatch rather than an error.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let hash = normalize_hash_prefix(hash);
    bcrypt::verify(password, &hash).unwrap_or(false)
}

/// Rewrite `$2y$` / `$2x$` prefixes to `$2b$` before verification.
///
/// Records migrated from PHP-stack systems carry the `$2y$` variant, which
/// is otherwise identical to `$2b$`.
fn normalize_hash_prefix(hash: &str) -> String {
    if let Some(rest) = hash.strip_prefix("$2y$").or_else(|| hash.strip_prefix("$2x$")) {
        format!("$2b${}", rest)
    } else {
        hash.to_string()
    }
}
