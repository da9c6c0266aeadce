use crate::{db::iso_date, models::User};
use diesel::prelude::*;
use uuid::Uuid;

pub fn find_user_by_uid(conn: &mut SqliteConnection, uid: &str) -> QueryResult<Option<User>> {
    use crate::schema::users::dsl::*;

    users.filter(id.eq(uid)).first::<User>(conn).optional()
}

pub fn find_user_by_email(conn: &mut SqliteConnection, mail: &str) -> QueryResult<Option<User>> {
    use crate::schema::users::dsl::*;

    users.filter(email.eq(mail)).first::<User>(conn).optional()
}

/// `password_hash` must already be hashed; this layer never sees plaintext.
pub fn insert_new_user(
    conn: &mut SqliteConnection,
    un: &str,
    mail: &str,
    password_hash: &str,
) -> QueryResult<User> {
    use crate::schema::users;

    let now = iso_date();
    let new_user = User {
        id: Uuid::new_v4().to_string(),
        username: un.to_owned(),
        email: mail.to_owned(),
        password_hash: password_hash.to_owned(),
        created_at: now.clone(),
        updated_at: now,
    };
    diesel::insert_into(users::table)
        .values(&new_user)
        .execute(conn)?;

    Ok(new_user)
}
