use super::MessageResponse;
use crate::{
    auth::{self, Session},
    error::{AppError, AppResult},
    store, workflow, DbPool,
};
use axum::{http::StatusCode, routing::post, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClubRegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthorizedResponse {
    pub token: String,
    pub role: String,
}

/// Self-serve club registration. Creates the login and its club profile; the
/// account stays locked until an admin approves it, so no token is issued.
async fn register_club(
    Extension(pool): Extension<DbPool>,
    Json(req): Json<ClubRegisterRequest>,
) -> AppResult<Json<MessageResponse>> {
    let conn = &mut pool.get().await?;

    let user = store::users::create_club_user(conn, req.username, req.email, req.password).await?;
    let club = store::clubs::create(conn, user.id, user.username.clone(), user.email).await?;

    Ok(Json(MessageResponse::new(format!(
        "Registered club {}. Wait for admin approval before logging in.",
        club.name
    ))))
}

/// Role-routed login. Credentials are checked first; a club whose account is
/// still pending (or suspended) gets a blocking notice instead of a token.
async fn login(
    Extension(pool): Extension<DbPool>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AuthorizedResponse>> {
    let conn = &mut pool.get().await?;

    if let Some(user) = store::users::find_by_username(conn, &req.username).await? {
        if auth::verify_password(req.password, &user.password_hash)? {
            workflow::may_hold_session(&user.role, user.is_active)
                .map_err(AppError::forbidden)?;
            // expires after one day
            let token = auth::generate_jwt(&user, Duration::from_secs(24 * 60 * 60))?;
            return Ok(Json(AuthorizedResponse {
                token,
                role: user.role,
            }));
        }
    }
    Err(AppError::from(
        StatusCode::UNAUTHORIZED,
        "invalid username or password",
    ))
}

// Tokens are stateless; logout is an acknowledgement for the client, which
// drops its copy.
async fn logout(_session: Session) -> Json<MessageResponse> {
    Json(MessageResponse::new("logged out"))
}

pub fn app() -> Router {
    Router::new()
        .route("/register/club", post(register_club))
        .route("/login", post(login))
        .route("/logout", post(logout))
}
