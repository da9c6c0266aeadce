use diesel::prelude::*;

use crate::{db::iso_date, models::RoomUser};

/// Adds the membership row. The (room, user) key makes this an add-to-set: a second
/// insert for the same pair fails with a unique violation instead of duplicating.
pub fn join_room(conn: &mut SqliteConnection, room_id: &str, user_id: &str) -> QueryResult<()> {
    use crate::schema::rooms_users;

    diesel::insert_into(rooms_users::table)
        .values(&RoomUser {
            room_id: room_id.to_owned(),
            user_id: user_id.to_owned(),
            joined_at: iso_date(),
        })
        .execute(conn)?;

    Ok(())
}

pub fn exit_room(conn: &mut SqliteConnection, room_id: &str, user_id: &str) -> QueryResult<usize> {
    use crate::schema::rooms_users;

    diesel::delete(
        rooms_users::table.filter(
            rooms_users::room_id
                .eq(room_id)
                .and(rooms_users::user_id.eq(user_id)),
        ),
    )
    .execute(conn)
}

pub fn is_member(conn: &mut SqliteConnection, room_id: &str, user_id: &str) -> QueryResult<bool> {
    use crate::schema::rooms_users;

    diesel::select(diesel::dsl::exists(
        rooms_users::table.filter(
            rooms_users::room_id
                .eq(room_id)
                .and(rooms_users::user_id.eq(user_id)),
        ),
    ))
    .get_result(conn)
}

pub fn remove_all_members(conn: &mut SqliteConnection, room_id: &str) -> QueryResult<usize> {
    use crate::schema::rooms_users;

    diesel::delete(rooms_users::table.filter(rooms_users::room_id.eq(room_id))).execute(conn)
}
