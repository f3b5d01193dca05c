use chrono::Duration;
use chrono::Local;
use hmac::{Hmac, Mac};
use jwt::SignWithKey;
use jwt::VerifyWithKey;
use serde::Deserialize;
use serde::Serialize;
use sha2::Sha256;

use crate::constants::JWT_SECRET_ENV;
use crate::database::error::{ApiError, Permission};
use crate::database::schema::{User, UserRole};

use super::permissions::ActionType;

fn session_key() -> Hmac<Sha256> {
    let secret = std::env::var(JWT_SECRET_ENV).unwrap_or_else(|_| String::from("secret"));
    Hmac::new_from_slice(secret.as_bytes()).unwrap()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtSessionData {
    pub user_id: i32,
    pub username: String,
    pub role: UserRole,
    iat: i64,
    exp: i64,
}

impl JwtSessionData {
    pub fn new(id: i32, username: String, role: UserRole) -> Self {
        let now = Local::now();
        let iat = now.timestamp();
        let exp = (now + Duration::hours(1)).timestamp();

        Self {
            user_id: id,
            username,
            role,
            iat,
            exp,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionData {
    pub user_id: i32,
    pub username: String,
    pub role: UserRole,
    pub is_admin: bool,
}

impl SessionData {
    pub fn authenticate(&self, action: ActionType) -> Result<(), ApiError> {
        if !action.authenticate(self) {
            return Err(ApiError::Permission(Permission::Forbidden));
        }
        Ok(())
    }
}

impl From<JwtSessionData> for SessionData {
    fn from(value: JwtSessionData) -> Self {
        SessionData {
            user_id: value.user_id,
            username: value.username,
            is_admin: value.role == UserRole::Admin,
            role: value.role,
        }
    }
}

pub fn generate_jwt_session(user: &User) -> String {
    let claims = JwtSessionData::new(user.id, user.username.to_owned(), user.role.to_owned());

    claims.sign_with_key(&session_key()).unwrap()
}

pub fn verify_jwt_session(token: &str) -> Result<JwtSessionData, ApiError> {
    token
        .verify_with_key(&session_key())
        .map_err(|_| ApiError::Permission(Permission::Unauthorized))
        .map(|session: JwtSessionData| {
            let now = Local::now().timestamp();

            if (session.exp - now).is_negative() {
                return Err(ApiError::Permission(Permission::Unauthorized));
            }
            Ok(session)
        })?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 7,
            username: String::from("chef"),
            email: String::from("chef@example.com"),
            first_name: String::new(),
            last_name: String::new(),
            password: String::from("x"),
            role: UserRole::User,
        }
    }

    #[test]
    fn sign_then_verify_roundtrip() {
        let token = generate_jwt_session(&user());
        let session = verify_jwt_session(&token).unwrap();
        assert_eq!(session.user_id, 7);
        assert_eq!(session.username, "chef");
        assert_eq!(session.role, UserRole::User);
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Local::now().timestamp();
        let claims = JwtSessionData {
            user_id: 7,
            username: String::from("chef"),
            role: UserRole::User,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = claims.sign_with_key(&session_key()).unwrap();

        assert!(verify_jwt_session(&token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(verify_jwt_session("not-a-token").is_err());
    }
}
