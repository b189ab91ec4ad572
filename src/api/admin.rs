use super::{EventResponse, MessageResponse};
use crate::{
    auth::Session,
    error::{AppError, AppResult},
    models::{Club, ContactMessage, User},
    pagination::{self, PENDING_PAGE_SIZE},
    store, DbPool,
};
use axum::{
    extract::{Path, Query},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Every event with its owning club, approved or not.
async fn dashboard(
    Extension(pool): Extension<DbPool>,
    session: Session,
) -> AppResult<Json<Vec<EventResponse>>> {
    session.require_admin()?;
    let conn = &mut pool.get().await?;

    let events = store::events::list_all_with_clubs(conn).await?;
    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClubAccountResponse {
    user_id: i32,
    username: String,
    email: String,
    is_active: bool,
    club_name: Option<String>,
    contact_email: Option<String>,
}

impl From<(User, Option<Club>)> for ClubAccountResponse {
    fn from((user, club): (User, Option<Club>)) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            email: user.email,
            is_active: user.is_active,
            club_name: club.as_ref().map(|c| c.name.clone()),
            contact_email: club.map(|c| c.contact_email),
        }
    }
}

async fn club_manage(
    Extension(pool): Extension<DbPool>,
    session: Session,
) -> AppResult<Json<Vec<ClubAccountResponse>>> {
    session.require_admin()?;
    let conn = &mut pool.get().await?;

    let accounts = store::users::list_club_accounts(conn).await?;
    Ok(Json(
        accounts.into_iter().map(ClubAccountResponse::from).collect(),
    ))
}

#[derive(Deserialize)]
struct PageQuery {
    page: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PendingQueueResponse {
    events: Vec<EventResponse>,
    page: i64,
    total_pages: i64,
}

/// The pending-approval queue, ten events per page. A bad page parameter is
/// clamped to the nearest valid page instead of failing.
async fn event_manage(
    Extension(pool): Extension<DbPool>,
    Query(query): Query<PageQuery>,
    session: Session,
) -> AppResult<Json<PendingQueueResponse>> {
    session.require_admin()?;
    let conn = &mut pool.get().await?;

    let total = store::events::count_pending(conn).await?;
    let total_pages = pagination::total_pages(total, PENDING_PAGE_SIZE);
    let page = pagination::clamp_page(query.page.as_deref(), total_pages);

    let events = store::events::list_pending_with_clubs(
        conn,
        PENDING_PAGE_SIZE,
        (page - 1) * PENDING_PAGE_SIZE,
    )
    .await?;

    Ok(Json(PendingQueueResponse {
        events: events.into_iter().map(EventResponse::from).collect(),
        page,
        total_pages,
    }))
}

async fn approve_event(
    Extension(pool): Extension<DbPool>,
    Path(event_id): Path<i32>,
    session: Session,
) -> AppResult<Json<MessageResponse>> {
    session.require_admin()?;
    let conn = &mut pool.get().await?;

    if !store::events::set_approved(conn, event_id).await? {
        return Err(AppError::not_found("the event does not exist"));
    }
    Ok(Json(MessageResponse::new("event approved")))
}

// Rejection is destructive: the event row (and its feedback) is removed, not
// flagged.
async fn reject_event(
    Extension(pool): Extension<DbPool>,
    Path(event_id): Path<i32>,
    session: Session,
) -> AppResult<Json<MessageResponse>> {
    session.require_admin()?;
    let conn = &mut pool.get().await?;

    if !store::events::delete(conn, event_id).await? {
        return Err(AppError::not_found("the event does not exist"));
    }
    Ok(Json(MessageResponse::new("event rejected")))
}

async fn approve_club(
    Extension(pool): Extension<DbPool>,
    Path(club_user_id): Path<i32>,
    session: Session,
) -> AppResult<Json<MessageResponse>> {
    session.require_admin()?;
    let conn = &mut pool.get().await?;

    if !store::users::set_club_active(conn, club_user_id, true).await? {
        return Err(AppError::not_found("the club does not exist"));
    }
    Ok(Json(MessageResponse::new("club approved")))
}

async fn suspend_club(
    Extension(pool): Extension<DbPool>,
    Path(club_user_id): Path<i32>,
    session: Session,
) -> AppResult<Json<MessageResponse>> {
    session.require_admin()?;
    let conn = &mut pool.get().await?;

    if !store::users::set_club_active(conn, club_user_id, false).await? {
        return Err(AppError::not_found("the club does not exist"));
    }
    Ok(Json(MessageResponse::new("club suspended")))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContactMessageResponse {
    id: i32,
    name: String,
    email: String,
    message: String,
    submitted_at: NaiveDateTime,
}

impl From<ContactMessage> for ContactMessageResponse {
    fn from(m: ContactMessage) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            message: m.message,
            submitted_at: m.submitted_at,
        }
    }
}

async fn contact_messages(
    Extension(pool): Extension<DbPool>,
    session: Session,
) -> AppResult<Json<Vec<ContactMessageResponse>>> {
    session.require_staff()?;
    let conn = &mut pool.get().await?;

    let messages = store::contact::list_newest_first(conn).await?;
    Ok(Json(
        messages.into_iter().map(ContactMessageResponse::from).collect(),
    ))
}

pub fn app() -> Router {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/club/manage", get(club_manage))
        .route("/event/manage", get(event_manage))
        .route("/approve_event/:event_id", post(approve_event))
        .route("/reject_event/:event_id", post(reject_event))
        .route("/approve_club/:club_user_id", post(approve_club))
        .route("/suspend_club/:club_user_id", post(suspend_club))
        .route("/contact-messages", get(contact_messages))
}
