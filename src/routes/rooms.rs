use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::AppError,
    middlewares::auth::AuthUser,
    models::{CreateRoomRequest, RoomResponse, UpdateRoomRequest},
    services,
    types::DbPool,
    validation,
};

/// Owner-only gate for update and delete.
fn ensure_owner(room: &RoomResponse, auth: &AuthUser, action: &str) -> Result<(), AppError> {
    let is_owner = room.owner.as_ref().is_some_and(|owner| owner.id == auth.id);
    if !is_owner {
        return Err(AppError::Forbidden(format!(
            "You are not authorized to {action} this room."
        )));
    }
    Ok(())
}

#[post("")]
pub async fn create_room(
    pool: web::Data<DbPool>,
    auth: AuthUser,
    payload: web::Json<CreateRoomRequest>,
) -> Result<HttpResponse, AppError> {
    let req = validation::validate(payload.into_inner())?;
    let room = services::rooms::create_room(pool, auth.id, req).await?;

    Ok(HttpResponse::Created().json(json!({
        "status": "success",
        "message": "Room created successfully!",
        "data": { "room": room },
    })))
}

#[get("")]
pub async fn get_rooms(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let rooms = services::rooms::get_all_rooms(pool).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Rooms fetched successfully!",
        "results": rooms.len(),
        "data": { "rooms": rooms },
    })))
}

#[get("/my-rooms")]
pub async fn get_my_rooms(
    pool: web::Data<DbPool>,
    auth: AuthUser,
) -> Result<HttpResponse, AppError> {
    let rooms = services::rooms::get_rooms_of_user(pool, auth.id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "User rooms fetched successfully!",
        "results": rooms.len(),
        "data": { "rooms": rooms },
    })))
}

#[get("/{id}")]
pub async fn get_room(
    pool: web::Data<DbPool>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let room = services::rooms::get_room_by_id(pool, id.to_string()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Room fetched successfully!",
        "data": { "room": room },
    })))
}

/// The body is decoded only after the ownership check, so a non-owner is refused
/// whatever they send.
#[patch("/{id}")]
pub async fn update_room(
    pool: web::Data<DbPool>,
    auth: AuthUser,
    id: web::Path<Uuid>,
    payload: web::Json<serde_json::Value>,
) -> Result<HttpResponse, AppError> {
    let room_id = id.to_string();
    let room = services::rooms::get_room_by_id(pool.clone(), room_id.clone()).await?;
    ensure_owner(&room, &auth, "update")?;

    let req: UpdateRoomRequest = serde_json::from_value(payload.into_inner())
        .map_err(|err| AppError::InvalidInput(format!("Invalid request body: {err}")))?;
    let req = validation::validate(req)?;
    let room = services::rooms::update_room(pool, room_id, req).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Room updated successfully!",
        "data": { "room": room },
    })))
}

#[delete("/{id}")]
pub async fn delete_room(
    pool: web::Data<DbPool>,
    auth: AuthUser,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let room_id = id.to_string();
    let room = services::rooms::get_room_by_id(pool.clone(), room_id.clone()).await?;
    ensure_owner(&room, &auth, "delete")?;

    services::rooms::delete_room(pool, room_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[post("/{code}/join")]
pub async fn join_room(
    pool: web::Data<DbPool>,
    auth: AuthUser,
    code: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let room = services::rooms::join_room(pool, code.into_inner(), auth.id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Successfully joined the room!",
        "data": { "room": room },
    })))
}

#[post("/{id}/leave")]
pub async fn leave_room(
    pool: web::Data<DbPool>,
    auth: AuthUser,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let room = services::rooms::leave_room(pool, id.to_string(), auth.id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Successfully left the room!",
        "data": { "room": room },
    })))
}
