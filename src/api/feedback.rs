use super::EventResponse;
use crate::{
    auth::Session,
    error::{AppError, AppResult},
    models::Feedback,
    store, DbPool,
};
use axum::{
    extract::Path,
    routing::get,
    Extension, Json, Router,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackResponse {
    id: i32,
    comment: String,
    rating: i32,
    submitted_at: NaiveDateTime,
}

impl From<Feedback> for FeedbackResponse {
    fn from(f: Feedback) -> Self {
        Self {
            id: f.id,
            comment: f.comment,
            rating: f.rating,
            submitted_at: f.submitted_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventFeedbackResponse {
    event: EventResponse,
    feedbacks: Vec<FeedbackResponse>,
}

/// The public feedback page for one event: the event and everything said
/// about it so far.
async fn view(
    Extension(pool): Extension<DbPool>,
    Path(event_id): Path<i32>,
) -> AppResult<Json<EventFeedbackResponse>> {
    let conn = &mut pool.get().await?;

    let (event, club) = store::events::find_with_club(conn, event_id)
        .await?
        .ok_or_else(|| AppError::not_found("the event does not exist"))?;
    let feedbacks = store::feedback::list_for_event(conn, event.id).await?;

    Ok(Json(EventFeedbackResponse {
        event: EventResponse::new(event, &club.name),
        feedbacks: feedbacks.into_iter().map(FeedbackResponse::from).collect(),
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackRequest {
    comment: String,
    rating: i32,
}

// Open to anyone, even before the event happens.
async fn submit(
    Extension(pool): Extension<DbPool>,
    Path(event_id): Path<i32>,
    Json(req): Json<FeedbackRequest>,
) -> AppResult<Json<FeedbackResponse>> {
    let conn = &mut pool.get().await?;

    store::events::find_with_club(conn, event_id)
        .await?
        .ok_or_else(|| AppError::not_found("the event does not exist"))?;

    let feedback = store::feedback::create(conn, event_id, req.comment, req.rating).await?;
    Ok(Json(FeedbackResponse::from(feedback)))
}

/// A club's feedback review: feedback grouped per past event, newest event
/// first. Events that drew no feedback are skipped.
async fn club_view(
    Extension(pool): Extension<DbPool>,
    session: Session,
) -> AppResult<Json<Vec<EventFeedbackResponse>>> {
    let conn = &mut pool.get().await?;
    session.require_active_club()?;

    let club = store::clubs::find_by_user(conn, session.user_id)
        .await?
        .ok_or_else(|| AppError::forbidden("No club profile associated with your account."))?;

    let today = chrono::Local::now().naive_local().date();
    let past_events = store::events::list_past_for_club(conn, club.id, today).await?;
    let grouped = store::feedback::grouped_for_events(conn, &past_events).await?;

    Ok(Json(
        past_events
            .into_iter()
            .zip(grouped)
            .filter(|(_, feedbacks)| !feedbacks.is_empty())
            .map(|(event, feedbacks)| EventFeedbackResponse {
                event: EventResponse::new(event, &club.name),
                feedbacks: feedbacks.into_iter().map(FeedbackResponse::from).collect(),
            })
            .collect(),
    ))
}

pub fn app() -> Router {
    Router::new()
        .route("/feedbacks/:event_id", get(view).post(submit))
        .route("/club_view_feedbacks", get(club_view))
}
