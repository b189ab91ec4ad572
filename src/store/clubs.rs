use crate::{
    error::AppResult,
    models::Club,
    schema::*,
};
use diesel::prelude::*;
use diesel_async::{pg::AsyncPgConnection, RunQueryDsl};

#[derive(Insertable)]
#[diesel(table_name = clubs)]
struct NewClub {
    user_id: i32,
    name: String,
    description: String,
    contact_email: String,
}

/// Creates the club profile that goes with a freshly registered club user.
/// The profile starts out named after the username with the login email as
/// its contact address.
pub async fn create(
    conn: &mut AsyncPgConnection,
    user_id: i32,
    name: String,
    contact_email: String,
) -> AppResult<Club> {
    Ok(diesel::insert_into(clubs::table)
        .values(NewClub {
            user_id,
            name,
            description: String::new(),
            contact_email,
        })
        .get_result::<Club>(conn)
        .await?)
}

pub async fn find_by_user(conn: &mut AsyncPgConnection, user_id: i32) -> AppResult<Option<Club>> {
    Ok(clubs::table
        .filter(clubs::user_id.eq(user_id))
        .first::<Club>(conn)
        .await
        .optional()?)
}

pub async fn list_all(conn: &mut AsyncPgConnection) -> AppResult<Vec<Club>> {
    Ok(clubs::table
        .order(clubs::name.asc())
        .load::<Club>(conn)
        .await?)
}
