use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    db::iso_date,
    models::{Message, User},
};

pub fn create_message(
    conn: &mut SqliteConnection,
    room_id: &str,
    sender_id: &str,
    content: &str,
) -> QueryResult<Message> {
    use crate::schema::messages;

    // v7 ids are time-ordered, which breaks ties between equal timestamps
    let new_message = Message {
        id: Uuid::now_v7().to_string(),
        room_id: room_id.to_owned(),
        sender_id: sender_id.to_owned(),
        content: content.to_owned(),
        created_at: iso_date(),
    };

    diesel::insert_into(messages::table)
        .values(&new_message)
        .execute(conn)?;

    Ok(new_message)
}

/// Oldest first, windowed by `skip`/`limit`.
pub fn get_room_messages(
    conn: &mut SqliteConnection,
    room_id: &str,
    limit: i64,
    skip: i64,
) -> QueryResult<Vec<(Message, User)>> {
    use crate::schema::{messages, users};

    messages::table
        .inner_join(users::table)
        .filter(messages::room_id.eq(room_id))
        .order((messages::created_at.asc(), messages::id.asc()))
        .limit(limit)
        .offset(skip)
        .select((messages::all_columns, users::all_columns))
        .load::<(Message, User)>(conn)
}

pub fn delete_room_messages(conn: &mut SqliteConnection, room_id: &str) -> QueryResult<usize> {
    use crate::schema::messages;

    diesel::delete(messages::table.filter(messages::room_id.eq(room_id))).execute(conn)
}
