use actix_web::web;
use diesel::{
    result::{DatabaseErrorKind, Error as DieselError},
    SqliteConnection,
};

use crate::{
    db,
    error::{AppError, AppResult},
    models::{CreateRoomRequest, RoomResponse, UpdateRoomRequest},
    types::DbPool,
};

fn room_not_found() -> AppError {
    AppError::NotFound("Room not found.".to_string())
}

/// Tokens are not re-checked against the users table, so the account may be gone.
fn ensure_account(conn: &mut SqliteConnection, user_id: &str) -> AppResult<()> {
    if db::users::find_user_by_uid(conn, user_id)?.is_none() {
        return Err(AppError::Unauthenticated(
            "The user belonging to this token no longer exists.".to_string(),
        ));
    }
    Ok(())
}

fn already_member() -> AppError {
    AppError::Conflict("You are already a member of this room.".to_string())
}

pub async fn create_room(
    pool: web::Data<DbPool>,
    owner_id: String,
    req: CreateRoomRequest,
) -> AppResult<RoomResponse> {
    let room = web::block(move || -> AppResult<RoomResponse> {
        let mut conn = pool.get()?;

        ensure_account(&mut conn, &owner_id)?;
        if db::rooms::find_room_by_name(&mut conn, &req.name)?.is_some() {
            return Err(AppError::Conflict(
                "Room name already exists. Please choose a different name.".to_string(),
            ));
        }

        let room = db::rooms::create_room(&mut conn, &owner_id, &req.name, &req.description)?;
        Ok(db::rooms::room_with_members(&mut conn, room)?)
    })
    .await??;

    log::info!("room created: {} ({})", room.name, room.id);

    Ok(room)
}

pub async fn get_all_rooms(pool: web::Data<DbPool>) -> AppResult<Vec<RoomResponse>> {
    web::block(move || -> AppResult<Vec<RoomResponse>> {
        let mut conn = pool.get()?;
        let rooms = db::rooms::get_all_rooms(&mut conn)?;
        Ok(db::rooms::with_members(&mut conn, rooms)?)
    })
    .await?
}

pub async fn get_room_by_id(pool: web::Data<DbPool>, room_id: String) -> AppResult<RoomResponse> {
    web::block(move || -> AppResult<RoomResponse> {
        let mut conn = pool.get()?;
        let room = db::rooms::find_room(&mut conn, &room_id)?.ok_or_else(room_not_found)?;
        Ok(db::rooms::room_with_members(&mut conn, room)?)
    })
    .await?
}

pub async fn get_rooms_of_user(
    pool: web::Data<DbPool>,
    user_id: String,
) -> AppResult<Vec<RoomResponse>> {
    web::block(move || -> AppResult<Vec<RoomResponse>> {
        let mut conn = pool.get()?;
        let rooms = db::rooms::get_rooms_of_user(&mut conn, &user_id)?;
        Ok(db::rooms::with_members(&mut conn, rooms)?)
    })
    .await?
}

/// Applies a validated partial update. Ownership is the caller's job.
pub async fn update_room(
    pool: web::Data<DbPool>,
    room_id: String,
    req: UpdateRoomRequest,
) -> AppResult<RoomResponse> {
    web::block(move || -> AppResult<RoomResponse> {
        let mut conn = pool.get()?;

        let updated = db::rooms::update_room(&mut conn, &room_id, req.name, req.description)?;
        if updated == 0 {
            return Err(room_not_found());
        }

        let room = db::rooms::find_room(&mut conn, &room_id)?.ok_or_else(room_not_found)?;
        Ok(db::rooms::room_with_members(&mut conn, room)?)
    })
    .await?
}

/// Ownership is the caller's job.
pub async fn delete_room(pool: web::Data<DbPool>, room_id: String) -> AppResult<()> {
    let deleted = {
        let room_id = room_id.clone();
        web::block(move || -> AppResult<usize> {
            let mut conn = pool.get()?;
            Ok(db::rooms::delete_room(&mut conn, &room_id)?)
        })
        .await??
    };

    if deleted == 0 {
        return Err(room_not_found());
    }
    log::info!("room deleted: {room_id}");

    Ok(())
}

pub async fn join_room(
    pool: web::Data<DbPool>,
    code: String,
    user_id: String,
) -> AppResult<RoomResponse> {
    let room = web::block(move || -> AppResult<RoomResponse> {
        let mut conn = pool.get()?;

        ensure_account(&mut conn, &user_id)?;
        let room = db::rooms::find_room_by_code(&mut conn, &code)?.ok_or_else(room_not_found)?;
        if db::rooms_users::is_member(&mut conn, &room.id, &user_id)? {
            return Err(already_member());
        }

        db::rooms_users::join_room(&mut conn, &room.id, &user_id).map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => already_member(),
            err => AppError::from(err),
        })?;

        Ok(db::rooms::room_with_members(&mut conn, room)?)
    })
    .await??;

    log::info!("user joined room {}", room.id);

    Ok(room)
}

pub async fn leave_room(
    pool: web::Data<DbPool>,
    room_id: String,
    user_id: String,
) -> AppResult<RoomResponse> {
    let room = web::block(move || -> AppResult<RoomResponse> {
        let mut conn = pool.get()?;

        let room = db::rooms::find_room(&mut conn, &room_id)?.ok_or_else(room_not_found)?;
        if !db::rooms_users::is_member(&mut conn, &room.id, &user_id)? {
            return Err(AppError::InvalidState(
                "You are not a member of this room.".to_string(),
            ));
        }
        if room.owner_id == user_id {
            return Err(AppError::Forbidden(
                "Owner cannot leave the room.".to_string(),
            ));
        }

        db::rooms_users::exit_room(&mut conn, &room.id, &user_id)?;

        Ok(db::rooms::room_with_members(&mut conn, room)?)
    })
    .await??;

    log::info!("user left room {}", room.id);

    Ok(room)
}
