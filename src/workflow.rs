//! Approval and visibility rules for clubs and events.
//!
//! Everything here is pure so the business rules can be tested without a
//! database: handlers fetch rows, these functions decide what is visible,
//! valid, or allowed.

use chrono::{NaiveDateTime, NaiveTime};

use crate::models::{Event, ROLE_CLUB};

/// Account-state gate at login. Credentials are the identity layer's
/// business; this decides whether a verified account may hold a session.
/// A club stays locked out while pending approval or suspended.
pub fn may_hold_session(role: &str, is_active: bool) -> Result<(), &'static str> {
    if role == ROLE_CLUB && !is_active {
        return Err("Your account is not yet approved by the admin.");
    }
    Ok(())
}

/// An event is publicly visible iff it is approved and still upcoming:
/// a future date, or today with a start time that has not passed yet.
pub fn is_publicly_visible(event: &Event, now: NaiveDateTime) -> bool {
    event.approved && is_upcoming(event, now)
}

pub fn is_upcoming(event: &Event, now: NaiveDateTime) -> bool {
    event.date > now.date() || (event.date == now.date() && event.start_time >= now.time())
}

/// Splits approved events (already sorted ascending by date then start time)
/// into the upcoming list and the previous list, the latter reversed so it
/// reads newest first.
pub fn split_upcoming_previous<T>(
    items: Vec<T>,
    now: NaiveDateTime,
    event_of: impl Fn(&T) -> &Event,
) -> (Vec<T>, Vec<T>) {
    let (upcoming, mut previous): (Vec<_>, Vec<_>) = items
        .into_iter()
        .partition(|item| is_upcoming(event_of(item), now));
    previous.reverse();
    (upcoming, previous)
}

pub fn validate_event_schedule(
    date: chrono::NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    now: NaiveDateTime,
) -> Result<(), &'static str> {
    if date < now.date() {
        return Err("Event date cannot be in the past.");
    }
    if start_time >= end_time {
        return Err("End time must be after start time.");
    }
    Ok(())
}

pub fn validate_total_seats(total_seats: i32) -> Result<(), &'static str> {
    if total_seats < 1 {
        return Err("Total seats must be a positive number.");
    }
    Ok(())
}

pub fn validate_rating(rating: i32) -> Result<(), &'static str> {
    if !(1..=5).contains(&rating) {
        return Err("Rating must be between 1 and 5.");
    }
    Ok(())
}

/// Ownership rule for event mutation: only the club that created the event
/// may edit or delete it, regardless of its approval state.
pub fn owns_event(club_user_id: i32, session_user_id: i32) -> bool {
    club_user_id == session_user_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    fn dt(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
        )
    }

    fn event(id: i32, date: &str, start: &str, approved: bool) -> Event {
        Event {
            id,
            club_id: 1,
            title: format!("event {id}"),
            description: String::new(),
            venue: "Campus Auditorium".to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            start_time: NaiveTime::parse_from_str(start, "%H:%M").unwrap(),
            end_time: NaiveTime::parse_from_str(start, "%H:%M").unwrap() + chrono::Duration::hours(1),
            total_seats: 100,
            guest: None,
            image_url: None,
            approved,
        }
    }

    #[test]
    fn visibility_requires_approval_and_upcoming() {
        let now = dt("2026-03-10", "12:00");

        // future date
        assert!(is_publicly_visible(&event(1, "2026-03-11", "09:00", true), now));
        // today, start time not passed (boundary: equal counts as upcoming)
        assert!(is_publicly_visible(&event(2, "2026-03-10", "12:00", true), now));
        // today, already started
        assert!(!is_publicly_visible(&event(3, "2026-03-10", "11:59", true), now));
        // past date
        assert!(!is_publicly_visible(&event(4, "2026-03-09", "18:00", true), now));
        // unapproved never shows, date notwithstanding
        assert!(!is_publicly_visible(&event(5, "2026-03-11", "09:00", false), now));
    }

    #[test]
    fn split_keeps_upcoming_ascending_and_previous_descending() {
        let now = dt("2026-03-10", "12:00");
        let sorted_asc = vec![
            event(1, "2026-03-08", "10:00", true),
            event(2, "2026-03-10", "09:00", true),
            event(3, "2026-03-10", "15:00", true),
            event(4, "2026-03-12", "10:00", true),
        ];

        let (upcoming, previous) = split_upcoming_previous(sorted_asc, now, |e| e);

        assert_eq!(
            upcoming.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![3, 4]
        );
        assert_eq!(
            previous.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![2, 1]
        );
    }

    #[test]
    fn schedule_validation() {
        let now = dt("2026-03-10", "12:00");
        let t = |s| NaiveTime::parse_from_str(s, "%H:%M").unwrap();
        let d = |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();

        // yesterday
        assert!(validate_event_schedule(d("2026-03-09"), t("09:00"), t("10:00"), now).is_err());
        // today but start after end
        assert!(validate_event_schedule(d("2026-03-10"), t("10:00"), t("09:00"), now).is_err());
        // start == end is also invalid
        assert!(validate_event_schedule(d("2026-03-10"), t("10:00"), t("10:00"), now).is_err());
        // tomorrow, well-formed
        assert!(validate_event_schedule(d("2026-03-11"), t("09:00"), t("10:00"), now).is_ok());
    }

    #[test]
    fn seat_and_rating_validation() {
        assert!(validate_total_seats(0).is_err());
        assert!(validate_total_seats(1).is_ok());

        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
    }

    #[test]
    fn club_login_gate_follows_the_approval_toggle() {
        use crate::models::ROLE_ADMIN;

        // freshly registered club: pending
        assert!(may_hold_session(ROLE_CLUB, false).is_err());
        // admin approves
        assert!(may_hold_session(ROLE_CLUB, true).is_ok());
        // admin suspends again
        assert!(may_hold_session(ROLE_CLUB, false).is_err());
        // admins are never gated on the flag
        assert!(may_hold_session(ROLE_ADMIN, true).is_ok());
    }

    #[test]
    fn ownership_is_independent_of_approval() {
        assert!(owns_event(7, 7));
        assert!(!owns_event(7, 8));
    }
}
