use actix_web::{
    get, http::StatusCode, middleware::ErrorHandlers, web, HttpResponse, Scope,
};

use crate::{error, middlewares::auth::Authentication};

pub mod auth;
pub mod messages;
pub mod rooms;

#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().body("Chat Backend API is running!")
}

pub fn create_auth_scope() -> Scope {
    web::scope("/auth")
        .service(auth::register)
        .service(auth::login)
        .service(auth::log_out)
        .service(auth::get_current_user)
}

/// `/my-rooms` must be registered ahead of `/{id}`.
pub fn create_room_scope() -> Scope {
    web::scope("/rooms")
        .service(rooms::get_rooms)
        .service(rooms::create_room)
        .service(rooms::get_my_rooms)
        .service(messages::create_message)
        .service(messages::get_room_messages)
        .service(rooms::join_room)
        .service(rooms::leave_room)
        .service(rooms::get_room)
        .service(rooms::update_room)
        .service(rooms::delete_room)
}

/// Everything the app needs besides the pool and config data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(index)
        .service(
            web::scope("/api")
                .service(create_auth_scope())
                .service(create_room_scope().wrap(Authentication))
                .default_service(web::to(error::not_found))
                .wrap(
                    ErrorHandlers::new()
                        .handler(StatusCode::INTERNAL_SERVER_ERROR, error::internal_error_detail),
                ),
        );
}
