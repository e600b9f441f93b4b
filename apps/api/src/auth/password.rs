//! bcrypt password hashing. Hashing is CPU-bound and runs on the blocking pool.

use anyhow::Context;
use tokio::sync::OnceCell;

use crate::errors::AppError;

/// Stand-in hash verified against when no stored hash exists.
static DUMMY_HASH: OnceCell<String> = OnceCell::const_new();

pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("password hashing task failed")?
        .context("failed to hash password")?;
    Ok(hash)
}

/// `Ok(false)` on mismatch; malformed stored hashes are internal errors.
pub async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("password verification task failed")?
        .context("stored password hash is malformed")?;
    Ok(matches)
}

/// Runs one bcrypt verification against a throwaway hash, so sign-in with an
/// unknown email costs the same as a wrong password.
pub async fn verify_dummy_password(password: String, cost: u32) -> Result<(), AppError> {
    let hash = DUMMY_HASH
        .get_or_try_init(|| hash_password("rezumerai-no-such-account".to_string(), cost))
        .await?
        .clone();
    verify_password(password, hash).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hash = hash_password("correct horse".to_string(), 4).await.unwrap();
        assert_ne!(hash, "correct horse");
        assert!(verify_password("correct horse".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password("wrong horse".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_hash_is_error() {
        let result = verify_password("anything".to_string(), "not-a-hash".to_string()).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_dummy_verification_succeeds_for_any_password() {
        verify_dummy_password("whatever".to_string(), 4).await.unwrap();
        verify_dummy_password(String::new(), 4).await.unwrap();
        assert!(DUMMY_HASH.get().is_some_and(|h| h.starts_with("$2")));
    }
}
