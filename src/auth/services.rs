use lazy_static::lazy_static;
use regex::Regex;
use sqlx::PgPool;
use tracing::warn;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo_types::User;
use crate::error::ApiError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Create an account. The password is hashed here; the repo write path only
/// ever sees the hash.
pub async fn register(db: &PgPool, email: &str, password: &str) -> Result<User, ApiError> {
    if !is_valid_email(email) {
        warn!(email = %email, "register with invalid email");
        return Err(ApiError::InvalidEmail);
    }
    if password.len() < 8 {
        warn!("register with too short password");
        return Err(ApiError::WeakPassword);
    }

    let hash = hash_password(password)?;
    match User::create(db, email, &hash).await? {
        Some(user) => Ok(user),
        None => {
            warn!(email = %email, "email already registered");
            Err(ApiError::EmailTaken)
        }
    }
}

/// Verify submitted credentials against the store.
///
/// Both fields are required; a missing field is a request-shape error, not a
/// credential mismatch. An unknown email and a wrong password are logged
/// differently but surface to the caller as the same generic failure.
pub async fn authenticate(db: &PgPool, email: &str, password: &str) -> Result<User, ApiError> {
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::MissingCredentials);
    }

    let user = match User::find_by_email(db, email).await? {
        Some(u) => u,
        None => {
            warn!(email = %email, "login with unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(email = %email, user_id = %user.id, "login with invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("alice @example.com"));
        assert!(!is_valid_email(""));
    }

    #[tokio::test]
    async fn authenticate_requires_both_fields() {
        // Lazy pool never connects: the shape check must fire before any
        // store access.
        let state = AppState::fake();
        for (email, password) in [("", "secret123"), ("alice@example.com", ""), ("", "")] {
            let err = authenticate(&state.db, email, password).await.unwrap_err();
            assert!(matches!(err, ApiError::MissingCredentials));
        }
    }
}
