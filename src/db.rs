use chrono::{DateTime, SecondsFormat, Utc};
use diesel::{
    connection::SimpleConnection,
    prelude::*,
    r2d2::{self, ConnectionManager},
};
use std::time::SystemTime;

use crate::{error::AppError, types::DbPool};

pub mod messages;
pub mod rooms;
pub mod rooms_users;
pub mod users;

const SCHEMA: &str = include_str!("../migrations/2024-11-10-000000_create_tables/up.sql");

/// Fixed-width UTC timestamps so lexical order is chronological order.
pub fn iso_date() -> String {
    let now: DateTime<Utc> = SystemTime::now().into();
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Builds the pool and makes sure the tables exist.
///
/// An in-memory database lives only as long as its connection, so `:memory:` pools
/// are capped at a single connection.
pub fn init_pool(database_url: &str) -> Result<DbPool, AppError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let mut builder = r2d2::Pool::builder();
    if database_url == ":memory:" {
        builder = builder.max_size(1).idle_timeout(None).max_lifetime(None);
    }
    let pool = builder.build(manager)?;

    let mut conn = pool.get()?;
    init_schema(&mut conn)?;

    Ok(pool)
}

pub fn init_schema(conn: &mut SqliteConnection) -> Result<(), AppError> {
    conn.batch_execute(SCHEMA)?;
    Ok(())
}
