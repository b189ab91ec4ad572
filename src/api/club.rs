use super::{EventResponse, MessageResponse};
use crate::{
    auth::Session,
    error::{AppError, AppResult},
    media::{self, MediaConfig},
    models::Club,
    store::{self, events::EventInput},
    workflow, DbPool,
};
use axum::{
    extract::{Multipart, Path},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use diesel_async::pg::AsyncPgConnection;
use serde::Serialize;

/// Resolves the session to its club profile, blocking pending and suspended
/// accounts on the way.
async fn require_club(conn: &mut AsyncPgConnection, session: &Session) -> AppResult<Club> {
    session.require_active_club()?;
    store::clubs::find_by_user(conn, session.user_id)
        .await?
        .ok_or_else(|| AppError::forbidden("No club profile associated with your account."))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClubDashboardResponse {
    club_name: String,
    description: String,
    contact_email: String,
    events: Vec<EventResponse>,
}

async fn dashboard(
    Extension(pool): Extension<DbPool>,
    session: Session,
) -> AppResult<Json<ClubDashboardResponse>> {
    let conn = &mut pool.get().await?;
    let club = require_club(conn, &session).await?;

    let events = store::events::list_for_club(conn, club.id).await?;
    Ok(Json(ClubDashboardResponse {
        events: events
            .into_iter()
            .map(|e| EventResponse::new(e, &club.name))
            .collect(),
        club_name: club.name,
        description: club.description,
        contact_email: club.contact_email,
    }))
}

async fn manage_events(
    Extension(pool): Extension<DbPool>,
    session: Session,
) -> AppResult<Json<Vec<EventResponse>>> {
    let conn = &mut pool.get().await?;
    let club = require_club(conn, &session).await?;

    let events = store::events::list_for_club(conn, club.id).await?;
    Ok(Json(
        events
            .into_iter()
            .map(|e| EventResponse::new(e, &club.name))
            .collect(),
    ))
}

fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::bad_request("date must be formatted YYYY-MM-DD"))
}

fn parse_time(raw: &str) -> AppResult<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| AppError::bad_request("times must be formatted HH:MM"))
}

/// Reads the multipart event form a club submits. Returns the typed fields
/// and the raw image bytes, if a file was attached.
async fn read_event_form(mut multipart: Multipart) -> AppResult<(EventInput, Option<Vec<u8>>)> {
    let mut title = None;
    let mut description = None;
    let mut venue = None;
    let mut date = None;
    let mut start_time = None;
    let mut end_time = None;
    let mut total_seats = None;
    let mut guest = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::bad_request("malformed multipart form"))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "image" {
            let bytes = field
                .bytes()
                .await
                .map_err(|_| AppError::bad_request("failed to read the image upload"))?;
            if !bytes.is_empty() {
                image = Some(bytes.to_vec());
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|_| AppError::bad_request("malformed multipart form"))?;
        match name.as_str() {
            "title" => title = Some(value),
            "description" => description = Some(value),
            "venue" => venue = Some(value),
            "date" => date = Some(parse_date(&value)?),
            "startTime" => start_time = Some(parse_time(&value)?),
            "endTime" => end_time = Some(parse_time(&value)?),
            "totalSeats" => {
                total_seats = Some(value.trim().parse::<i32>().map_err(|_| {
                    AppError::bad_request("total seats must be a whole number")
                })?)
            }
            "guest" => guest = (!value.trim().is_empty()).then_some(value),
            _ => {}
        }
    }

    let missing = |field: &'static str| move || AppError::bad_request(format!("{field} is required"));
    let input = EventInput {
        title: title.ok_or_else(missing("title"))?,
        description: description.ok_or_else(missing("description"))?,
        venue: venue.unwrap_or_else(|| "Campus Auditorium".to_string()),
        date: date.ok_or_else(missing("date"))?,
        start_time: start_time.ok_or_else(missing("startTime"))?,
        end_time: end_time.ok_or_else(missing("endTime"))?,
        total_seats: total_seats.ok_or_else(missing("totalSeats"))?,
        guest,
    };

    Ok((input, image))
}

/// Stores the uploaded image, but only once the form fields have passed
/// validation: a rejected form must not leave an orphaned file under the
/// media root.
async fn save_validated_image(
    media_config: &MediaConfig,
    input: &EventInput,
    image: Option<Vec<u8>>,
    now: NaiveDateTime,
) -> AppResult<Option<String>> {
    input.validate(now)?;
    match image {
        Some(bytes) => Ok(Some(media::save_event_image(media_config, &bytes).await?)),
        None => Ok(None),
    }
}

/// Creates an event for the session's club. The event waits in the pending
/// queue until an admin approves it.
async fn add_event(
    Extension(pool): Extension<DbPool>,
    Extension(media_config): Extension<MediaConfig>,
    session: Session,
    multipart: Multipart,
) -> AppResult<Json<EventResponse>> {
    let conn = &mut pool.get().await?;
    let club = require_club(conn, &session).await?;

    let (input, image) = read_event_form(multipart).await?;
    let now = chrono::Local::now().naive_local();
    let image_url = save_validated_image(&media_config, &input, image, now).await?;

    let event = store::events::create(conn, club.id, input, image_url, now).await?;

    Ok(Json(EventResponse::new(event, &club.name)))
}

async fn edit_event(
    Extension(pool): Extension<DbPool>,
    Extension(media_config): Extension<MediaConfig>,
    Path(event_id): Path<i32>,
    session: Session,
    multipart: Multipart,
) -> AppResult<Json<EventResponse>> {
    let conn = &mut pool.get().await?;
    session.require_active_club()?;

    let (event, owning_club) = store::events::find_with_club(conn, event_id)
        .await?
        .ok_or_else(|| AppError::not_found("the event does not exist"))?;
    if !workflow::owns_event(owning_club.user_id, session.user_id) {
        return Err(AppError::forbidden(
            "You are not allowed to edit this event.",
        ));
    }

    let (input, image) = read_event_form(multipart).await?;
    let now = chrono::Local::now().naive_local();
    let image_url = save_validated_image(&media_config, &input, image, now).await?;

    let updated = store::events::update(conn, event.id, input, image_url, now).await?;

    Ok(Json(EventResponse::new(updated, &owning_club.name)))
}

async fn delete_event(
    Extension(pool): Extension<DbPool>,
    Path(event_id): Path<i32>,
    session: Session,
) -> AppResult<Json<MessageResponse>> {
    let conn = &mut pool.get().await?;
    session.require_active_club()?;

    let (event, owning_club) = store::events::find_with_club(conn, event_id)
        .await?
        .ok_or_else(|| AppError::not_found("the event does not exist"))?;
    if !workflow::owns_event(owning_club.user_id, session.user_id) {
        return Err(AppError::forbidden(
            "You are not allowed to delete this event.",
        ));
    }

    store::events::delete(conn, event.id).await?;
    Ok(Json(MessageResponse::new("event deleted")))
}

pub fn app() -> Router {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/manage/events", get(manage_events))
        .route("/add_event", post(add_event))
        .route("/edit_event/:event_id", post(edit_event))
        .route("/delete_event/:event_id", post(delete_event))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(date: NaiveDate) -> EventInput {
        EventInput {
            title: "Tech Talk".to_string(),
            description: "A talk.".to_string(),
            venue: "Campus Auditorium".to_string(),
            date,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            total_seats: 50,
            guest: None,
        }
    }

    #[tokio::test]
    async fn rejected_form_leaves_no_image_on_disk() {
        let root = std::env::temp_dir().join("campus_event_hub_rejected_form_test");
        let _ = tokio::fs::remove_dir_all(&root).await;
        let media_config = MediaConfig {
            root: root.clone(),
            serve: false,
        };

        let now = NaiveDate::from_ymd_opt(2026, 4, 2)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        // yesterday: the schedule check rejects it
        let past = input(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
        let png = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];

        let result = save_validated_image(&media_config, &past, Some(png), now).await;

        assert!(result.is_err());
        assert!(!root.join("event_images").exists());
    }

    #[tokio::test]
    async fn valid_form_stores_its_image() {
        let root = std::env::temp_dir().join("campus_event_hub_valid_form_test");
        let media_config = MediaConfig {
            root,
            serve: false,
        };

        let now = NaiveDate::from_ymd_opt(2026, 4, 2)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let tomorrow = input(NaiveDate::from_ymd_opt(2026, 4, 3).unwrap());
        let png = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];

        let url = save_validated_image(&media_config, &tomorrow, Some(png), now)
            .await
            .unwrap();

        assert!(url.unwrap().starts_with("/media/event_images/"));
    }
}
