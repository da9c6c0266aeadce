use actix_web::{
    body::EitherBody,
    cookie::Cookie,
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use chrono::Utc;
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::{config::Config, error::AppError, token};

/// Identity resolved by [`Authentication`], available to handlers as an extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(req.extensions().get::<AuthUser>().cloned().ok_or_else(|| {
            AppError::Unauthenticated("No token, authorization denied".to_string())
        }))
    }
}

/// Cookie first, then `Authorization: Bearer <token>`.
pub fn extract_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(token::COOKIE_NAME) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_owned());
        }
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}

pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(token::COOKIE_NAME, "").path("/").finish()
}

pub struct Authentication;

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticationMiddleware { service }))
    }
}

pub struct AuthenticationMiddleware<S> {
    service: S,
}

fn reject(req: ServiceRequest, err: AppError, clear_cookie: bool) -> ServiceResponse {
    let mut response = err.error_response();
    if clear_cookie {
        if let Err(err) = response.add_removal_cookie(&removal_cookie()) {
            log::error!("could not clear token cookie: {err}");
        }
    }
    let request = req.into_parts().0;
    ServiceResponse::new(request, response)
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(config) = req.app_data::<web::Data<Config>>().cloned() else {
            let res = reject(
                req,
                AppError::Internal("server configuration missing".to_string()),
                false,
            );
            return Box::pin(async move { Ok(res.map_into_right_body()) });
        };

        let Some(raw) = extract_token(req.request()) else {
            let res = reject(
                req,
                AppError::Unauthenticated("No token, authorization denied".to_string()),
                false,
            );
            return Box::pin(async move { Ok(res.map_into_right_body()) });
        };

        match token::verify(&raw, &config.jwt_secret, Utc::now()) {
            Ok(claims) => {
                req.extensions_mut().insert(AuthUser {
                    id: claims.id,
                    email: claims.email,
                });
                let fut = self.service.call(req);
                Box::pin(async move {
                    let res: ServiceResponse<B> = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            Err(err) => {
                let res = reject(req, err, true);
                Box::pin(async move { Ok(res.map_into_right_body()) })
            }
        }
    }
}
