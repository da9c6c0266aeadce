pub mod config;
pub mod db;
pub mod error;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod schema;
pub mod services;
pub mod token;
pub mod types;
pub mod validation;
