use crate::schema::*;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use diesel::prelude::*;

pub const ROLE_CLUB: &str = "club";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, Queryable, Identifiable)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(belongs_to(User))]
pub struct Club {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub description: String,
    pub contact_email: String,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(belongs_to(Club))]
pub struct Event {
    pub id: i32,
    pub club_id: i32,
    pub title: String,
    pub description: String,
    pub venue: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub total_seats: i32,
    pub guest: Option<String>,
    pub image_url: Option<String>,
    pub approved: bool,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(belongs_to(Event))]
pub struct Feedback {
    pub id: i32,
    pub event_id: i32,
    pub comment: String,
    pub rating: i32,
    pub submitted_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
pub struct ContactMessage {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub message: String,
    pub submitted_at: NaiveDateTime,
}
