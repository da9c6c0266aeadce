use crate::schema::{rooms, rooms_users, users};
use crate::{
    db::{iso_date, messages, rooms_users as membership},
    models::{Room, RoomChanges, RoomResponse, User, UserInfo},
};
use diesel::prelude::*;
use rand::{distributions::Alphanumeric, Rng};
use std::collections::HashMap;
use uuid::Uuid;

/// Opaque join code: a fresh v4 uuid plus six random alphanumerics.
pub fn generate_code() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    format!("{}{}", Uuid::new_v4().simple(), suffix.to_lowercase())
}

pub fn find_room(conn: &mut SqliteConnection, room_id: &str) -> QueryResult<Option<Room>> {
    rooms::table.find(room_id).first::<Room>(conn).optional()
}

pub fn find_room_by_code(conn: &mut SqliteConnection, code: &str) -> QueryResult<Option<Room>> {
    rooms::table
        .filter(rooms::code.eq(code))
        .first::<Room>(conn)
        .optional()
}

pub fn find_room_by_name(conn: &mut SqliteConnection, name: &str) -> QueryResult<Option<Room>> {
    rooms::table
        .filter(rooms::name.eq(name))
        .first::<Room>(conn)
        .optional()
}

/// Inserts the room and its owner's membership together.
pub fn create_room(
    conn: &mut SqliteConnection,
    owner_id: &str,
    room_name: &str,
    room_description: &str,
) -> QueryResult<Room> {
    let now = iso_date();
    let new_room = Room {
        id: Uuid::new_v4().to_string(),
        name: room_name.to_owned(),
        description: room_description.to_owned(),
        code: generate_code(),
        owner_id: owner_id.to_owned(),
        created_at: now.clone(),
        updated_at: now,
    };

    conn.transaction(|conn| {
        diesel::insert_into(rooms::table)
            .values(&new_room)
            .execute(conn)?;
        membership::join_room(conn, &new_room.id, owner_id)
    })?;

    Ok(new_room)
}

pub fn get_all_rooms(conn: &mut SqliteConnection) -> QueryResult<Vec<Room>> {
    rooms::table
        .order(rooms::created_at.asc())
        .load::<Room>(conn)
}

pub fn get_rooms_of_user(conn: &mut SqliteConnection, user_id: &str) -> QueryResult<Vec<Room>> {
    rooms::table
        .inner_join(rooms_users::table)
        .filter(rooms_users::user_id.eq(user_id))
        .order(rooms::created_at.asc())
        .select(rooms::all_columns)
        .load::<Room>(conn)
}

/// Returns the number of rows touched (0 when the room is gone).
pub fn update_room(
    conn: &mut SqliteConnection,
    room_id: &str,
    name: Option<String>,
    description: Option<String>,
) -> QueryResult<usize> {
    let changes = RoomChanges {
        name,
        description,
        updated_at: iso_date(),
    };
    diesel::update(rooms::table.find(room_id))
        .set(&changes)
        .execute(conn)
}

/// Deletes the room along with its memberships and messages.
pub fn delete_room(conn: &mut SqliteConnection, room_id: &str) -> QueryResult<usize> {
    conn.transaction(|conn| {
        let deleted = diesel::delete(rooms::table.find(room_id)).execute(conn)?;
        if deleted > 0 {
            membership::remove_all_members(conn, room_id)?;
            messages::delete_room_messages(conn, room_id)?;
        }
        Ok(deleted)
    })
}

/// Resolves owners and members to public projections. Members come back in join order;
/// an owner whose account is gone is reported as `None`.
pub fn with_members(
    conn: &mut SqliteConnection,
    rooms_data: Vec<Room>,
) -> QueryResult<Vec<RoomResponse>> {
    let room_ids: Vec<String> = rooms_data.iter().map(|room| room.id.clone()).collect();
    let owner_ids: Vec<String> = rooms_data
        .iter()
        .map(|room| room.owner_id.clone())
        .collect();

    let member_rows: Vec<(String, User)> = rooms_users::table
        .inner_join(users::table)
        .filter(rooms_users::room_id.eq_any(room_ids))
        .order(rooms_users::joined_at.asc())
        .select((rooms_users::room_id, users::all_columns))
        .load(conn)?;

    let owners: Vec<User> = users::table
        .filter(users::id.eq_any(owner_ids))
        .load(conn)?;
    let owners_map: HashMap<String, UserInfo> = owners
        .into_iter()
        .map(|user| (user.id.clone(), UserInfo::from(user)))
        .collect();

    let mut members_map: HashMap<String, Vec<UserInfo>> = HashMap::new();
    for (room_id, user) in member_rows {
        members_map.entry(room_id).or_default().push(user.into());
    }

    Ok(rooms_data
        .into_iter()
        .map(|room| {
            let owner = owners_map.get(&room.owner_id).cloned();
            if owner.is_none() {
                log::warn!("room {} has no resolvable owner {}", room.id, room.owner_id);
            }
            let members = members_map.remove(&room.id).unwrap_or_default();
            RoomResponse {
                id: room.id,
                name: room.name,
                description: room.description,
                code: room.code,
                owner,
                members,
                created_at: room.created_at,
                updated_at: room.updated_at,
            }
        })
        .collect())
}

pub fn room_with_members(conn: &mut SqliteConnection, room: Room) -> QueryResult<RoomResponse> {
    with_members(conn, vec![room])?
        .pop()
        .ok_or(diesel::result::Error::NotFound)
}
