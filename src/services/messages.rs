use actix_web::web;

use crate::{
    db,
    error::{AppError, AppResult},
    models::{CreateMessageRequest, MessageResponse},
    types::DbPool,
};

/// The sender must be a member at the time of writing.
pub async fn create_message(
    pool: web::Data<DbPool>,
    room_id: String,
    sender_id: String,
    req: CreateMessageRequest,
) -> AppResult<MessageResponse> {
    web::block(move || -> AppResult<MessageResponse> {
        let mut conn = pool.get()?;

        let room = db::rooms::find_room(&mut conn, &room_id)?
            .ok_or_else(|| AppError::NotFound("Room not found.".to_string()))?;
        if !db::rooms_users::is_member(&mut conn, &room.id, &sender_id)? {
            return Err(AppError::Forbidden(
                "You are not a member of this room.".to_string(),
            ));
        }

        let sender = db::users::find_user_by_uid(&mut conn, &sender_id)?
            .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;
        let message = db::messages::create_message(&mut conn, &room.id, &sender_id, &req.content)?;

        Ok(MessageResponse::new(message, sender))
    })
    .await?
}

pub async fn get_room_messages(
    pool: web::Data<DbPool>,
    room_id: String,
    limit: i64,
    skip: i64,
) -> AppResult<Vec<MessageResponse>> {
    web::block(move || -> AppResult<Vec<MessageResponse>> {
        let mut conn = pool.get()?;

        if db::rooms::find_room(&mut conn, &room_id)?.is_none() {
            return Err(AppError::NotFound("Room not found.".to_string()));
        }

        let rows = db::messages::get_room_messages(&mut conn, &room_id, limit, skip)?;
        Ok(rows
            .into_iter()
            .map(|(message, sender)| MessageResponse::new(message, sender))
            .collect())
    })
    .await?
}
