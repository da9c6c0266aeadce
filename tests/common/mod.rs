#![allow(dead_code)]

use actix_web::{body::MessageBody, dev::ServiceResponse, http::StatusCode, test};
use room_chat::{
    config::{Config, Environment},
    db,
    types::DbPool,
};
use serde_json::Value;

pub const SECRET: &str = "integration-test-secret";

pub fn test_config() -> Config {
    Config {
        database_url: ":memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: SECRET.to_string(),
        token_ttl_secs: 3600,
        environment: Environment::Production,
        frontend_url: None,
        bcrypt_cost: 4,
    }
}

pub fn development_config() -> Config {
    Config {
        environment: Environment::Development,
        ..test_config()
    }
}

pub fn test_pool() -> DbPool {
    db::init_pool(":memory:").expect("in-memory database")
}

/// Status plus decoded json body (`Null` when the body is empty).
pub async fn json_of<B: MessageBody>(res: ServiceResponse<B>) -> (StatusCode, Value) {
    let status = res.status();
    let body = test::read_body(res).await;
    if body.is_empty() {
        return (status, Value::Null);
    }
    let json = serde_json::from_slice(&body).expect("json body");
    (status, json)
}
