use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::{ChatMessage, Room};

#[derive(Debug, Deserialize)]
pub struct RoomRequest {
    pub class_name: String,
    pub recipe_name: String,
    #[serde(default)]
    pub recipe_ingredients: Vec<String>,
    #[serde(default)]
    pub recipe_content: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub class_id: i64,
    pub class_name: String,
    pub recipe_name: String,
    pub host_id: uuid::Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Room> for RoomResponse {
    fn from(r: Room) -> Self {
        Self {
            class_id: r.id,
            class_name: r.title,
            recipe_name: r.recipe_name,
            host_id: r.host_id,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClassList {
    pub empty: bool,
    pub rooms: Vec<RoomResponse>,
}

/// Returned to the host after the provider session is opened.
#[derive(Debug, Serialize)]
pub struct SessionRoomResponse {
    pub class_id: i64,
    pub session_id: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct EnterResponse {
    pub class_id: i64,
    pub session_id: String,
    pub token: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct RoomRecipeResponse {
    pub class_id: i64,
    pub class_name: String,
    pub recipe_name: String,
    pub recipe_ingredients: Vec<String>,
    pub recipe_content: String,
}

impl From<Room> for RoomRecipeResponse {
    fn from(r: Room) -> Self {
        Self {
            class_id: r.id,
            class_name: r.title,
            recipe_name: r.recipe_name,
            recipe_ingredients: r.recipe_ingredients,
            recipe_content: r.recipe_content,
        }
    }
}
