use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for session refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub token: String,
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Response for session refresh. `refreshed` is false when the presented
/// token was still inside the refresh cadence and was returned unchanged.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub token: String,
    pub refreshed: bool,
}

/// Public part of the user returned to the client. Never carries the
/// password hash.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_serializes_id_and_email_only() {
        let user = PublicUser {
            id: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("alice@example.com"));
        assert!(json.contains("id"));
        assert!(!json.contains("password"));
    }
}
