use actix_web::web;
use bcrypt::{hash, verify};
use chrono::Utc;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::{
    config::Config,
    db,
    error::{AppError, AppResult},
    models::{AuthResponse, LoginRequest, RegisterRequest, User, UserInfo},
    token,
    types::DbPool,
};

/// Creates the account and mints its first token. Expects a validated request.
pub async fn register(
    pool: web::Data<DbPool>,
    config: &Config,
    req: RegisterRequest,
) -> AppResult<AuthResponse> {
    let cost = config.bcrypt_cost;
    let user = web::block(move || -> AppResult<User> {
        let mut conn = pool.get()?;

        if db::users::find_user_by_email(&mut conn, &req.email)?.is_some() {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let password_hash = hash(&req.password, cost)?;

        // a concurrent registration can still win the race; the unique indexes catch it
        db::users::insert_new_user(&mut conn, &req.username, &req.email, &password_hash)
            .map_err(duplicate_user)
    })
    .await??;

    log::info!("user registered: {} ({})", user.username, user.id);

    issue(config, user)
}

/// Unknown email and wrong password fail identically.
pub async fn login(
    pool: web::Data<DbPool>,
    config: &Config,
    req: LoginRequest,
) -> AppResult<AuthResponse> {
    let user = web::block(move || -> AppResult<Option<User>> {
        let mut conn = pool.get()?;

        let Some(user) = db::users::find_user_by_email(&mut conn, &req.email)? else {
            return Ok(None);
        };
        if verify(&req.password, &user.password_hash)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    })
    .await??;

    match user {
        Some(user) => {
            log::info!("user logged in: {}", user.id);
            issue(config, user)
        }
        None => {
            log::warn!("rejected login attempt");
            Err(AppError::InvalidCredentials)
        }
    }
}

pub async fn current_user(pool: web::Data<DbPool>, user_id: String) -> AppResult<UserInfo> {
    let user = web::block(move || -> AppResult<Option<User>> {
        let mut conn = pool.get()?;
        Ok(db::users::find_user_by_uid(&mut conn, &user_id)?)
    })
    .await??;

    user.map(UserInfo::from)
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))
}

fn issue(config: &Config, user: User) -> AppResult<AuthResponse> {
    let token = token::mint(
        &user.id,
        &user.email,
        &config.jwt_secret,
        config.token_ttl_secs,
        Utc::now(),
    )?;

    Ok(AuthResponse {
        user: user.into(),
        token,
    })
}

fn duplicate_user(err: DieselError) -> AppError {
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &err {
        let message = info.message();
        if message.contains("users.username") {
            return AppError::Conflict("Username is already taken.".to_string());
        }
        if message.contains("users.email") {
            return AppError::Conflict("Email is already registered.".to_string());
        }
    }
    AppError::from(err)
}
