use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const COOKIE_NAME: &str = "token";

/// Claims carried by an identity token. `id` is the user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

pub fn mint(
    user_id: &str,
    email: &str,
    secret: &str,
    ttl_secs: i64,
    now: DateTime<Utc>,
) -> Result<String, AppError> {
    let claims = Claims {
        id: user_id.to_owned(),
        email: email.to_owned(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ttl_secs)).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|err| AppError::Internal(format!("token signing failed: {err}")))
}

/// Checks signature and expiry against the given clock. No state is consulted.
pub fn verify(token: &str, secret: &str, now: DateTime<Utc>) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // expiry is compared against `now` below
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let claims = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|err| {
            log::warn!("token verification failed: {err}");
            invalid_token()
        })?;

    if claims.exp <= now.timestamp() {
        log::warn!("token for user {} expired", claims.id);
        return Err(invalid_token());
    }

    Ok(claims)
}

fn invalid_token() -> AppError {
    AppError::Unauthenticated("Token is not valid or expired".to_string())
}
