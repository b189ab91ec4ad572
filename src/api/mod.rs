use crate::models::{Club, Event};
use axum::Router;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

pub mod admin;
pub mod auth;
pub mod club;
pub mod feedback;
pub mod home;

pub fn app() -> Router {
    Router::new()
        .merge(home::app())
        .nest("/auth", auth::app())
        .nest("/admin", admin::app())
        .nest("/club", club::app())
        .nest("/events", feedback::app())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: i32,
    pub club_name: String,
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

impl EventResponse {
    pub fn new(event: Event, club_name: &str) -> Self {
        Self {
            id: event.id,
            club_name: club_name.to_string(),
            title: event.title,
            description: event.description,
            venue: event.venue,
            date: event.date,
            start_time: event.start_time,
            end_time: event.end_time,
            total_seats: event.total_seats,
            guest: event.guest,
            image_url: event.image_url,
            approved: event.approved,
        }
    }
}

impl From<(Event, Club)> for EventResponse {
    fn from((event, club): (Event, Club)) -> Self {
        Self::new(event, &club.name)
    }
}
