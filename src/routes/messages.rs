use actix_web::{get, post, web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::AppError,
    middlewares::auth::AuthUser,
    models::{CreateMessageRequest, MessagePageQuery},
    services,
    types::DbPool,
    validation,
};

#[post("/{roomId}/messages")]
pub async fn create_message(
    pool: web::Data<DbPool>,
    auth: AuthUser,
    room_id: web::Path<Uuid>,
    payload: web::Json<CreateMessageRequest>,
) -> Result<HttpResponse, AppError> {
    let req = validation::validate(payload.into_inner())?;
    let message =
        services::messages::create_message(pool, room_id.to_string(), auth.id, req).await?;

    Ok(HttpResponse::Created().json(json!({
        "status": "success",
        "message": "Message sent successfully!",
        "data": { "message": message },
    })))
}

// TODO: gate on membership like create_message does; today any signed-in user can read.
#[get("/{roomId}/messages")]
pub async fn get_room_messages(
    pool: web::Data<DbPool>,
    room_id: web::Path<Uuid>,
    page: web::Query<MessagePageQuery>,
) -> Result<HttpResponse, AppError> {
    let messages = services::messages::get_room_messages(
        pool,
        room_id.to_string(),
        page.limit(),
        page.skip(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Messages fetched successfully!",
        "results": messages.len(),
        "data": { "messages": messages },
    })))
}
