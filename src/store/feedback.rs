use crate::{
    error::{AppError, AppResult},
    models::{Event, Feedback},
    schema::*,
    workflow,
};
use diesel::prelude::*;
use diesel_async::{pg::AsyncPgConnection, RunQueryDsl};

#[derive(Insertable)]
#[diesel(table_name = feedbacks)]
struct NewFeedback {
    event_id: i32,
    comment: String,
    rating: i32,
}

/// Records feedback against an event. Anyone may submit; there is no
/// temporal gate, so feedback on an event that has not happened yet is
/// accepted.
pub async fn create(
    conn: &mut AsyncPgConnection,
    event_id: i32,
    comment: String,
    rating: i32,
) -> AppResult<Feedback> {
    if comment.trim().is_empty() {
        return Err(AppError::bad_request("comment is required"));
    }
    workflow::validate_rating(rating).map_err(AppError::bad_request)?;

    Ok(diesel::insert_into(feedbacks::table)
        .values(NewFeedback {
            event_id,
            comment,
            rating,
        })
        .get_result::<Feedback>(conn)
        .await?)
}

pub async fn list_for_event(
    conn: &mut AsyncPgConnection,
    event_id: i32,
) -> AppResult<Vec<Feedback>> {
    Ok(feedbacks::table
        .filter(feedbacks::event_id.eq(event_id))
        .order(feedbacks::submitted_at.asc())
        .load::<Feedback>(conn)
        .await?)
}

/// Feedback for a batch of events, grouped in the same order as the input.
pub async fn grouped_for_events(
    conn: &mut AsyncPgConnection,
    events: &[Event],
) -> AppResult<Vec<Vec<Feedback>>> {
    Ok(Feedback::belonging_to(events)
        .order(feedbacks::submitted_at.asc())
        .load::<Feedback>(conn)
        .await?
        .grouped_by(events))
}
