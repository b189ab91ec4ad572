use crate::{
    error::{AppError, AppResult},
    models::ContactMessage,
    schema::*,
};
use diesel::prelude::*;
use diesel_async::{pg::AsyncPgConnection, RunQueryDsl};

#[derive(Insertable)]
#[diesel(table_name = contact_messages)]
struct NewContactMessage {
    name: String,
    email: String,
    message: String,
}

pub async fn create(
    conn: &mut AsyncPgConnection,
    name: String,
    email: String,
    message: String,
) -> AppResult<ContactMessage> {
    if name.trim().is_empty() || message.trim().is_empty() {
        return Err(AppError::bad_request("name and message are required"));
    }
    if !email.contains('@') {
        return Err(AppError::bad_request("invalid email address"));
    }

    Ok(diesel::insert_into(contact_messages::table)
        .values(NewContactMessage {
            name,
            email,
            message,
        })
        .get_result::<ContactMessage>(conn)
        .await?)
}

pub async fn list_newest_first(conn: &mut AsyncPgConnection) -> AppResult<Vec<ContactMessage>> {
    Ok(contact_messages::table
        .order(contact_messages::submitted_at.desc())
        .load::<ContactMessage>(conn)
        .await?)
}
