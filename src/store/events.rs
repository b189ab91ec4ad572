use crate::{
    error::{AppError, AppResult},
    models::{Club, Event},
    schema::*,
    workflow,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use diesel::prelude::*;
use diesel_async::{pg::AsyncPgConnection, RunQueryDsl};

/// The fields a club submits when creating or editing an event.
#[derive(Debug)]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub venue: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub total_seats: i32,
    pub guest: Option<String>,
}

impl EventInput {
    pub fn validate(&self, now: NaiveDateTime) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::bad_request("title is required"));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::bad_request("description is required"));
        }
        if self.venue.trim().is_empty() {
            return Err(AppError::bad_request("venue is required"));
        }
        workflow::validate_event_schedule(self.date, self.start_time, self.end_time, now)
            .map_err(AppError::bad_request)?;
        workflow::validate_total_seats(self.total_seats).map_err(AppError::bad_request)?;
        Ok(())
    }
}

#[derive(Insertable)]
#[diesel(table_name = events)]
struct NewEvent {
    club_id: i32,
    title: String,
    description: String,
    venue: String,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    total_seats: i32,
    guest: Option<String>,
    image_url: Option<String>,
    approved: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = events)]
pub struct EventChangeset {
    title: String,
    description: String,
    venue: String,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    total_seats: i32,
    guest: Option<Option<String>>,
    // outer None keeps the stored image when the edit form carries no file
    image_url: Option<Option<String>>,
    pub approved: bool,
}

/// Builds the changeset applied on edit. Approval never survives a content
/// change, so the changeset unconditionally clears the flag.
pub fn edit_changeset(input: EventInput, new_image_url: Option<String>) -> EventChangeset {
    EventChangeset {
        title: input.title,
        description: input.description,
        venue: input.venue,
        date: input.date,
        start_time: input.start_time,
        end_time: input.end_time,
        total_seats: input.total_seats,
        guest: Some(input.guest),
        image_url: new_image_url.map(Some),
        approved: false,
    }
}

/// Creates an event for a club. New events always await admin approval.
pub async fn create(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    input: EventInput,
    image_url: Option<String>,
    now: NaiveDateTime,
) -> AppResult<Event> {
    input.validate(now)?;

    Ok(diesel::insert_into(events::table)
        .values(NewEvent {
            club_id,
            title: input.title,
            description: input.description,
            venue: input.venue,
            date: input.date,
            start_time: input.start_time,
            end_time: input.end_time,
            total_seats: input.total_seats,
            guest: input.guest,
            image_url,
            approved: false,
        })
        .get_result::<Event>(conn)
        .await?)
}

/// Applies an edit and drops the event back into the pending queue.
pub async fn update(
    conn: &mut AsyncPgConnection,
    event_id: i32,
    input: EventInput,
    new_image_url: Option<String>,
    now: NaiveDateTime,
) -> AppResult<Event> {
    input.validate(now)?;

    Ok(diesel::update(events::table.filter(events::id.eq(event_id)))
        .set(edit_changeset(input, new_image_url))
        .get_result::<Event>(conn)
        .await?)
}

pub async fn find_with_club(
    conn: &mut AsyncPgConnection,
    event_id: i32,
) -> AppResult<Option<(Event, Club)>> {
    Ok(events::table
        .inner_join(clubs::table)
        .filter(events::id.eq(event_id))
        .first::<(Event, Club)>(conn)
        .await
        .optional()?)
}

/// Deletes the event row; feedback goes with it via the cascade.
pub async fn delete(conn: &mut AsyncPgConnection, event_id: i32) -> AppResult<bool> {
    let deleted = diesel::delete(events::table.filter(events::id.eq(event_id)))
        .execute(conn)
        .await?;
    Ok(deleted > 0)
}

pub async fn set_approved(conn: &mut AsyncPgConnection, event_id: i32) -> AppResult<bool> {
    let updated = diesel::update(events::table.filter(events::id.eq(event_id)))
        .set(events::approved.eq(true))
        .execute(conn)
        .await?;
    Ok(updated > 0)
}

/// Approved events with their clubs, ascending by date then start time. The
/// workflow layer splits this into upcoming and previous.
pub async fn list_approved_with_clubs(
    conn: &mut AsyncPgConnection,
) -> AppResult<Vec<(Event, Club)>> {
    Ok(events::table
        .inner_join(clubs::table)
        .filter(events::approved.eq(true))
        .order((events::date.asc(), events::start_time.asc()))
        .load::<(Event, Club)>(conn)
        .await?)
}

/// Everything, for the admin dashboard.
pub async fn list_all_with_clubs(conn: &mut AsyncPgConnection) -> AppResult<Vec<(Event, Club)>> {
    Ok(events::table
        .inner_join(clubs::table)
        .order((events::date.desc(), events::start_time.desc()))
        .load::<(Event, Club)>(conn)
        .await?)
}

pub async fn count_pending(conn: &mut AsyncPgConnection) -> AppResult<i64> {
    Ok(events::table
        .filter(events::approved.eq(false))
        .count()
        .get_result::<i64>(conn)
        .await?)
}

/// One page of the pending-approval queue, newest date first.
pub async fn list_pending_with_clubs(
    conn: &mut AsyncPgConnection,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<(Event, Club)>> {
    Ok(events::table
        .inner_join(clubs::table)
        .filter(events::approved.eq(false))
        .order((events::date.desc(), events::start_time.desc()))
        .limit(limit)
        .offset(offset)
        .load::<(Event, Club)>(conn)
        .await?)
}

/// A club's own events, newest date first, approval state included.
pub async fn list_for_club(conn: &mut AsyncPgConnection, club_id: i32) -> AppResult<Vec<Event>> {
    Ok(events::table
        .filter(events::club_id.eq(club_id))
        .order((events::date.desc(), events::start_time.desc()))
        .load::<Event>(conn)
        .await?)
}

/// A club's events that already took place, for the feedback review view.
pub async fn list_past_for_club(
    conn: &mut AsyncPgConnection,
    club_id: i32,
    today: NaiveDate,
) -> AppResult<Vec<Event>> {
    Ok(events::table
        .filter(events::club_id.eq(club_id))
        .filter(events::date.lt(today))
        .order((events::date.desc(), events::start_time.desc()))
        .load::<Event>(conn)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> EventInput {
        EventInput {
            title: "Tech Talk".to_string(),
            description: "A talk.".to_string(),
            venue: "Campus Auditorium".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            total_seats: 50,
            guest: None,
        }
    }

    #[test]
    fn edits_always_clear_approval() {
        let changeset = edit_changeset(input(), None);
        assert!(!changeset.approved);
        // untouched image keeps whatever is stored
        assert!(changeset.image_url.is_none());

        let changeset = edit_changeset(input(), Some("/media/event_images/x.png".to_string()));
        assert!(!changeset.approved);
        assert_eq!(
            changeset.image_url,
            Some(Some("/media/event_images/x.png".to_string()))
        );
    }

    #[test]
    fn input_validation_rejects_bad_fields() {
        let now = NaiveDate::from_ymd_opt(2026, 4, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();

        assert!(input().validate(now).is_ok());

        let mut past = input();
        past.date = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        assert!(past.validate(now).is_err());

        let mut inverted = input();
        inverted.end_time = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        assert!(inverted.validate(now).is_err());

        let mut no_seats = input();
        no_seats.total_seats = 0;
        assert!(no_seats.validate(now).is_err());

        let mut untitled = input();
        untitled.title = "  ".to_string();
        assert!(untitled.validate(now).is_err());
    }
}
