use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Portrait reel dimensions applied when the client does not override them.
pub const DEFAULT_WIDTH: i32 = 1080;
pub const DEFAULT_HEIGHT: i32 = 1920;

/// Video record in the database. Keys reference objects in the media store;
/// playback URLs are presigned on the way out.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Video {
    pub id: Uuid,
    pub user_id: Uuid, // owner
    pub title: String,
    pub description: String,
    pub video_key: String,
    pub thumbnail_key: String,
    pub controls: bool,
    pub width: i32,
    pub height: i32,
    pub quality: Option<i32>, // 1..=100 when set
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
