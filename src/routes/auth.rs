use actix_web::{
    cookie::{time::Duration, Cookie, SameSite},
    get, post, web, HttpResponse,
};
use serde_json::json;

use crate::{
    config::Config,
    error::AppError,
    middlewares::auth::{removal_cookie, AuthUser, Authentication},
    models::{LoginRequest, RegisterRequest},
    services, token,
    types::DbPool,
    validation,
};

fn token_cookie(config: &Config, value: &str) -> Cookie<'static> {
    Cookie::build(token::COOKIE_NAME, value.to_owned())
        .http_only(true)
        .secure(config.is_production())
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(Duration::seconds(config.token_ttl_secs))
        .finish()
}

#[post("/register")]
pub async fn register(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let req = validation::validate(payload.into_inner())?;
    let auth = services::auth::register(pool, &config, req).await?;

    Ok(HttpResponse::Created()
        .cookie(token_cookie(&config, &auth.token))
        .json(json!({
            "message": "Registration successful!",
            "user": auth.user,
            "token": auth.token,
        })))
}

#[post("/login")]
pub async fn login(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let req = validation::validate(payload.into_inner())?;
    let auth = services::auth::login(pool, &config, req).await?;

    Ok(HttpResponse::Ok()
        .cookie(token_cookie(&config, &auth.token))
        .json(json!({
            "message": "Logged in successfully",
            "user": auth.user,
            "token": auth.token,
        })))
}

/// Only clears the cookie; a copied token stays valid until it expires.
#[post("/logout")]
pub async fn log_out() -> HttpResponse {
    let mut res = HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Logged out successfully!",
    }));
    if let Err(err) = res.add_removal_cookie(&removal_cookie()) {
        log::error!("could not clear token cookie: {err}");
    }
    res
}

#[get("/me", wrap = "Authentication")]
pub async fn get_current_user(
    pool: web::Data<DbPool>,
    auth: AuthUser,
) -> Result<HttpResponse, AppError> {
    let user = services::auth::current_user(pool, auth.id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "User fetched successfully!",
        "data": { "user": user },
    })))
}
