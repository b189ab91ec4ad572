use super::{EventResponse, MessageResponse};
use crate::{
    error::AppResult,
    models::Club,
    pagination::{self, CLUB_BATCH_SIZE, EVENT_BATCH_SIZE},
    store, workflow, DbPool,
};
use axum::{routing::get, Extension, Json, Router};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClubResponse {
    id: i32,
    name: String,
    description: String,
    contact_email: String,
}

impl From<Club> for ClubResponse {
    fn from(club: Club) -> Self {
        Self {
            id: club.id,
            name: club.name,
            description: club.description,
            contact_email: club.contact_email,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HomeResponse {
    next_event: Option<EventResponse>,
    event_batches: Vec<Vec<Option<EventResponse>>>,
    previous_event_batches: Vec<Vec<Option<EventResponse>>>,
    club_batches: Vec<Vec<Option<ClubResponse>>>,
}

/// The public calendar: approved upcoming events in grid batches plus the
/// featured next event, recent past events, and the club directory.
async fn index(Extension(pool): Extension<DbPool>) -> AppResult<Json<HomeResponse>> {
    let conn = &mut pool.get().await?;
    let now = chrono::Local::now().naive_local();

    let approved = store::events::list_approved_with_clubs(conn).await?;
    let (upcoming, previous) = workflow::split_upcoming_previous(approved, now, |(event, _)| event);

    let upcoming: Vec<EventResponse> = upcoming.into_iter().map(EventResponse::from).collect();
    let previous: Vec<EventResponse> = previous.into_iter().map(EventResponse::from).collect();

    let next_event = upcoming.first().cloned();

    let clubs = store::clubs::list_all(conn)
        .await?
        .into_iter()
        .map(ClubResponse::from)
        .collect();

    Ok(Json(HomeResponse {
        next_event,
        event_batches: pagination::batch(upcoming, EVENT_BATCH_SIZE),
        previous_event_batches: pagination::batch(previous, EVENT_BATCH_SIZE),
        club_batches: pagination::batch(clubs, CLUB_BATCH_SIZE),
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContactRequest {
    name: String,
    email: String,
    message: String,
}

async fn contact(
    Extension(pool): Extension<DbPool>,
    Json(req): Json<ContactRequest>,
) -> AppResult<Json<MessageResponse>> {
    let conn = &mut pool.get().await?;

    store::contact::create(conn, req.name, req.email, req.message).await?;

    Ok(Json(MessageResponse::new("Thanks for reaching out!")))
}

// The contact form posts straight to the home page, as the public site does.
pub fn app() -> Router {
    Router::new().route("/home", get(index).post(contact))
}
