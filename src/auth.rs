use crate::{
    error::AppError,
    models::{User, ROLE_ADMIN, ROLE_CLUB},
    schema::users,
    DbPool,
};
use argon2::Argon2;
use axum::{
    extract::{FromRequest, RequestParts, TypedHeader},
    headers::{authorization::Bearer, Authorization},
    http::StatusCode,
    Extension,
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jsonwebtoken::{
    errors::Result as JwtResult, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use password_hash::{
    self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use serde::{Deserialize, Serialize};
use std::{ops::Deref, time::Duration};

pub fn hash_password(password: impl AsRef<[u8]>) -> password_hash::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_ref(), &salt)
        .map(|h| h.to_string())
}

pub fn verify_password(
    password: impl AsRef<[u8]>,
    password_hash: impl AsRef<str>,
) -> password_hash::Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash.as_ref())?;
    Ok(Argon2::default()
        .verify_password(password.as_ref(), &parsed_hash)
        .is_ok())
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

lazy_static::lazy_static! {
    // TODO: use jwt_secret from config instead of env var
    static ref KEYS: Keys = {
        let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
        Keys {
            encoding: EncodingKey::from_base64_secret(&secret).expect("JWT_SECRET is not valid base64"),
            decoding: DecodingKey::from_base64_secret(&secret).expect("JWT_SECRET is not valid base64"),
        }
    };
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub role: String,
    pub exp: u64,
}

#[allow(unused_must_use)]
pub fn ensure_jwt_secret_is_valid() {
    KEYS.deref();
}

pub fn generate_jwt(user: &User, exp: Duration) -> JwtResult<String> {
    jsonwebtoken::encode(
        &Header::default(),
        &Claims {
            user_id: user.id,
            role: user.role.clone(),
            exp: jsonwebtoken::get_current_timestamp() + exp.as_secs(),
        },
        &KEYS.encoding,
    )
}

pub fn validate_jwt(token: &str) -> JwtResult<TokenData<Claims>> {
    jsonwebtoken::decode::<Claims>(token, &KEYS.decoding, &Validation::default())
}

/// Session context carried into every authenticated handler. The account flags
/// are read back from the database on each request so an admin suspension takes
/// effect on tokens that are already in the wild.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i32,
    pub role: String,
    pub is_active: bool,
    pub is_staff: bool,
}

impl Session {
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == ROLE_ADMIN {
            Ok(())
        } else {
            Err(AppError::forbidden("access denied"))
        }
    }

    // Django-style staff gate: is_staff and is_active together.
    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.is_staff && self.is_active {
            Ok(())
        } else {
            Err(AppError::forbidden("access denied"))
        }
    }

    pub fn require_active_club(&self) -> Result<(), AppError> {
        if self.role != ROLE_CLUB {
            return Err(AppError::forbidden("access denied"));
        }
        if !self.is_active {
            return Err(AppError::forbidden(
                "Your account is not yet approved by the admin.",
            ));
        }
        Ok(())
    }
}

#[axum::async_trait]
impl<B: Send> FromRequest<B> for Session {
    type Rejection = AppError;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request(req)
                .await
                .map_err(|_| {
                    AppError::from(StatusCode::UNAUTHORIZED, "missing authorization header")
                })?;

        let claims = validate_jwt(bearer.token())
            .map_err(|_| AppError::from(StatusCode::UNAUTHORIZED, "invalid or expired token"))?
            .claims;

        let Extension(pool) = Extension::<DbPool>::from_request(req)
            .await
            .map_err(|_| anyhow::anyhow!("database pool is not attached to the router"))?;
        let conn = &mut pool.get().await?;

        let user = users::table
            .find(claims.user_id)
            .first::<User>(conn)
            .await
            .optional()?
            .ok_or_else(|| AppError::from(StatusCode::UNAUTHORIZED, "unknown user"))?;

        Ok(Session {
            user_id: user.id,
            role: user.role,
            is_active: user.is_active,
            is_staff: user.is_staff,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_roundtrip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }

    fn session(role: &str, is_active: bool, is_staff: bool) -> Session {
        Session {
            user_id: 1,
            role: role.to_string(),
            is_active,
            is_staff,
        }
    }

    #[test]
    fn admin_guard() {
        assert!(session(ROLE_ADMIN, true, true).require_admin().is_ok());
        assert!(session(ROLE_CLUB, true, true).require_admin().is_err());
    }

    #[test]
    fn club_guard_blocks_pending_and_suspended() {
        assert!(session(ROLE_CLUB, true, true).require_active_club().is_ok());
        assert!(session(ROLE_CLUB, false, true)
            .require_active_club()
            .is_err());
        assert!(session(ROLE_ADMIN, true, true)
            .require_active_club()
            .is_err());
    }
}
