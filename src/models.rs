use crate::schema::*;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

// db models
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = users)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = rooms)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub description: String,
    pub code: String,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Identifiable, Selectable, Insertable, Queryable, Associations, Debug, Clone)]
#[diesel(belongs_to(Room))]
#[diesel(belongs_to(User))]
#[diesel(table_name = rooms_users)]
#[diesel(primary_key(room_id, user_id))]
pub struct RoomUser {
    pub room_id: String,
    pub user_id: String,
    pub joined_at: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = messages)]
pub struct Message {
    pub id: String,
    pub room_id: String,
    pub sender_id: String,
    pub content: String,
    pub created_at: String,
}

/// Partial room update. `None` columns are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = rooms)]
pub struct RoomChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub updated_at: String,
}

// public projections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub code: String,
    pub owner: Option<UserInfo>,
    pub members: Vec<UserInfo>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub room: String,
    pub sender: UserInfo,
    pub content: String,
    pub created_at: String,
}

impl MessageResponse {
    pub fn new(message: Message, sender: User) -> Self {
        Self {
            id: message.id,
            room: message.room_id,
            sender: sender.into(),
            content: message.content,
            created_at: message.created_at,
        }
    }
}

/// Returned by register and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserInfo,
    pub token: String,
}

// request payloads
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(
        min = 3,
        max = 30,
        message = "Username must be between 3 and 30 characters long."
    ))]
    pub username: String,
    #[serde(default)]
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters long."))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateRoomRequest {
    #[serde(default)]
    #[validate(length(
        min = 3,
        max = 50,
        message = "Room name must be between 3 and 50 characters long."
    ))]
    pub name: String,
    #[serde(default)]
    #[validate(length(
        min = 10,
        max = 200,
        message = "Room description must be between 10 and 200 characters long."
    ))]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateRoomRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Room name must be between 3 and 50 characters long."
    ))]
    pub name: Option<String>,
    #[validate(length(
        min = 10,
        max = 200,
        message = "Room description must be between 10 and 200 characters long."
    ))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateMessageRequest {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 500,
        message = "Message content must be between 1 and 500 characters long."
    ))]
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagePageQuery {
    pub limit: Option<String>,
    pub skip: Option<String>,
}

impl MessagePageQuery {
    pub const DEFAULT_LIMIT: i64 = 50;

    /// Lenient like a query string should be: junk falls back to the defaults.
    pub fn limit(&self) -> i64 {
        self.limit
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(Self::DEFAULT_LIMIT)
    }

    pub fn skip(&self) -> i64 {
        self.skip
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v >= 0)
            .unwrap_or(0)
    }
}
