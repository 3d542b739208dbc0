use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::models::user::{MockUser, Role, MOCK_USERS};
use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use subtle::ConstantTimeEq;

#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub username: String,
    pub role: Role,
    pub name: String,
    pub token: String,
}

/// Mock credential check against a fixed user table; issues HS256 bearer tokens.
#[derive(Clone)]
pub struct AuthService {
    secret: String,
    ttl_hours: i64,
}

impl AuthService {
    pub fn new(secret: String, ttl_hours: i64) -> Self {
        Self { secret, ttl_hours }
    }

    pub fn login(&self, username: &str, password: &str) -> Result<AuthSession> {
        let user = find_user(username)
            .filter(|u| bool::from(u.password.as_bytes().ct_eq(password.as_bytes())))
            .ok_or_else(|| Error::Unauthorized("Invalid username or password".to_string()))?;

        tracing::info!(username, role = user.role.as_str(), "User logged in");
        self.session_for(user.username, user.role, user.name.to_string())
    }

    /// Registration is not persisted; the caller just receives a `user` token.
    pub fn register(&self, username: &str, first_name: &str, last_name: &str) -> Result<AuthSession> {
        if find_user(username).is_some() {
            return Err(Error::BadRequest(format!("Username {} is taken", username)));
        }
        self.session_for(username, Role::User, format!("{} {}", first_name, last_name))
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )?;
        Ok(data.claims)
    }

    fn session_for(&self, username: &str, role: Role, name: String) -> Result<AuthSession> {
        let exp = crate::utils::time::now() + Duration::hours(self.ttl_hours);
        let claims = Claims {
            sub: username.to_string(),
            exp: exp.timestamp().max(0) as usize,
            role: Some(role.as_str().to_string()),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(AuthSession {
            username: username.to_string(),
            role,
            name,
            token,
        })
    }
}

fn find_user(username: &str) -> Option<&'static MockUser> {
    MOCK_USERS.iter().find(|u| u.username == username)
}
