use crate::{
    auth,
    error::{AppError, AppResult},
    models::{Club, User, ROLE_CLUB},
    schema::*,
};
use axum::http::StatusCode;
use diesel::prelude::*;
use diesel_async::{pg::AsyncPgConnection, RunQueryDsl};

#[derive(Insertable)]
#[diesel(table_name = users)]
struct NewUser {
    username: String,
    email: String,
    password_hash: String,
    role: String,
    is_active: bool,
    is_staff: bool,
    is_superuser: bool,
}

/// Creates a club login. The account starts out inactive and stays that way
/// until an admin approves it.
pub async fn create_club_user(
    conn: &mut AsyncPgConnection,
    username: String,
    email: String,
    password: String,
) -> AppResult<User> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(AppError::bad_request("username and password are required"));
    }
    if !email.contains('@') {
        return Err(AppError::bad_request("invalid email address"));
    }

    let email_taken = diesel::select(diesel::dsl::exists(
        users::table.filter(users::email.eq(&email)),
    ))
    .get_result::<bool>(conn)
    .await?;
    if email_taken {
        return Err(AppError::from(
            StatusCode::CONFLICT,
            "email is already registered",
        ));
    }

    let new_user = diesel::insert_into(users::table)
        .values(NewUser {
            username,
            email,
            password_hash: auth::hash_password(password)?,
            role: ROLE_CLUB.to_string(),
            is_active: false,
            is_staff: true,
            is_superuser: false,
        })
        .on_conflict(users::username)
        .do_nothing()
        .get_result::<User>(conn)
        .await
        .optional()?;

    new_user.ok_or_else(|| AppError::from(StatusCode::CONFLICT, "username has been taken"))
}

pub async fn find_by_username(
    conn: &mut AsyncPgConnection,
    username: &str,
) -> AppResult<Option<User>> {
    Ok(users::table
        .filter(users::username.eq(username))
        .first::<User>(conn)
        .await
        .optional()?)
}

/// Toggles the approval flag on a club account. Returns false when no club
/// user with that id exists; admin accounts are never touched.
pub async fn set_club_active(
    conn: &mut AsyncPgConnection,
    user_id: i32,
    active: bool,
) -> AppResult<bool> {
    let updated = diesel::update(
        users::table
            .filter(users::id.eq(user_id))
            .filter(users::role.eq(ROLE_CLUB)),
    )
    .set(users::is_active.eq(active))
    .execute(conn)
    .await?;

    Ok(updated > 0)
}

/// All club accounts with their club profile, for the admin management view.
pub async fn list_club_accounts(
    conn: &mut AsyncPgConnection,
) -> AppResult<Vec<(User, Option<Club>)>> {
    Ok(users::table
        .left_join(clubs::table)
        .filter(users::role.eq(ROLE_CLUB))
        .order(users::username.asc())
        .load::<(User, Option<Club>)>(conn)
        .await?)
}
