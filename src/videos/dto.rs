use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::videos::repo_types::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Request body for creating a video record after the client uploaded the
/// media through a presigned URL.
#[derive(Debug, Deserialize)]
pub struct CreateVideoRequest {
    pub title: String,
    pub description: String,
    pub video_key: String,
    pub thumbnail_key: String,
    #[serde(default = "default_controls")]
    pub controls: bool,
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    pub quality: Option<i32>,
}

fn default_controls() -> bool {
    true
}
fn default_width() -> i32 {
    DEFAULT_WIDTH
}
fn default_height() -> i32 {
    DEFAULT_HEIGHT
}

/// Video as returned to clients, with presigned playback URLs instead of
/// raw storage keys.
#[derive(Debug, Serialize)]
pub struct VideoResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub controls: bool,
    pub width: i32,
    pub height: i32,
    pub quality: Option<i32>,
    pub created_at: OffsetDateTime,
}

/// Request body for the upload-auth endpoint.
#[derive(Debug, Deserialize)]
pub struct UploadAuthRequest {
    pub filename: String,
    pub content_type: String,
}

/// Signed direct-upload parameters handed to the client.
#[derive(Debug, Serialize)]
pub struct UploadAuthResponse {
    pub key: String,
    pub upload_url: String,
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    20
}

impl Pagination {
    /// Page bounds as actually queried. Out-of-range values from the query
    /// string are clamped; Postgres rejects a negative LIMIT outright.
    pub fn bounds(&self) -> (i64, i64) {
        (self.limit.clamp(1, 100), self.offset.max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_bounds_clamp_hostile_query_values() {
        let p = Pagination {
            limit: -1,
            offset: -5,
        };
        assert_eq!(p.bounds(), (1, 0));

        let p = Pagination {
            limit: 10_000,
            offset: 40,
        };
        assert_eq!(p.bounds(), (100, 40));

        let p = Pagination {
            limit: 20,
            offset: 0,
        };
        assert_eq!(p.bounds(), (20, 0));
    }

    #[test]
    fn create_request_fills_reel_defaults() {
        let req: CreateVideoRequest = serde_json::from_str(
            r#"{"title":"t","description":"d","video_key":"v","thumbnail_key":"th"}"#,
        )
        .unwrap();
        assert!(req.controls);
        assert_eq!(req.width, 1080);
        assert_eq!(req.height, 1920);
        assert_eq!(req.quality, None);
    }
}
