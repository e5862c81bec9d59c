use anyhow::Context;
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use crate::videos::dto::{CreateVideoRequest, UploadAuthResponse, VideoResponse};
use crate::videos::repo_types::Video;

/// Playback URLs stay valid long enough for a feed session.
const PLAYBACK_TTL_SECS: u64 = 30 * 60;

pub async fn create_video(
    st: &AppState,
    user_id: Uuid,
    req: CreateVideoRequest,
) -> Result<Video, ApiError> {
    if req.title.trim().is_empty() || req.description.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "title and description are required".into(),
        ));
    }
    if req.video_key.is_empty() || req.thumbnail_key.is_empty() {
        return Err(ApiError::BadRequest(
            "video_key and thumbnail_key are required".into(),
        ));
    }
    if let Some(q) = req.quality {
        if !(1..=100).contains(&q) {
            return Err(ApiError::BadRequest("quality must be 1..=100".into()));
        }
    }

    let video = Video::create(
        &st.db,
        user_id,
        req.title.trim(),
        req.description.trim(),
        &req.video_key,
        &req.thumbnail_key,
        req.controls,
        req.width,
        req.height,
        req.quality,
    )
    .await?;
    Ok(video)
}

/// Swap storage keys for presigned playback URLs on the way out.
pub async fn to_response(st: &AppState, video: Video) -> anyhow::Result<VideoResponse> {
    let video_url = st
        .storage
        .presign_get(&video.video_key, PLAYBACK_TTL_SECS)
        .await
        .with_context(|| format!("presign video {}", video.video_key))?;
    let thumbnail_url = st
        .storage
        .presign_get(&video.thumbnail_key, PLAYBACK_TTL_SECS)
        .await
        .with_context(|| format!("presign thumbnail {}", video.thumbnail_key))?;

    Ok(VideoResponse {
        id: video.id,
        title: video.title,
        description: video.description,
        video_url,
        thumbnail_url,
        controls: video.controls,
        width: video.width,
        height: video.height,
        quality: video.quality,
        created_at: video.created_at,
    })
}

/// Sign a direct upload for an authenticated user. The server only hands out
/// the signature; the bytes go straight to the media store.
pub async fn upload_auth(
    st: &AppState,
    user_id: Uuid,
    content_type: &str,
) -> Result<UploadAuthResponse, ApiError> {
    let Some(ext) = ext_from_mime(content_type) else {
        warn!(content_type = %content_type, "upload-auth with unsupported content type");
        return Err(ApiError::BadRequest(format!(
            "unsupported content type {content_type}"
        )));
    };

    let key = format!("videos/{}/{}.{}", user_id, Uuid::new_v4(), ext);
    let expires_in = st.config.storage.upload_ttl_seconds;
    let upload_url = st
        .storage
        .presign_put(&key, content_type, expires_in)
        .await
        .with_context(|| format!("presign upload {}", key))?;

    Ok(UploadAuthResponse {
        key,
        upload_url,
        expires_in,
    })
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "video/mp4" => Some("mp4"),
        "video/webm" => Some("webm"),
        "video/quicktime" => Some("mov"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[test]
    fn test_ext_from_mime() {
        assert_eq!(ext_from_mime("video/mp4"), Some("mp4"));
        assert_eq!(ext_from_mime("video/webm"), Some("webm"));
        assert_eq!(ext_from_mime("video/quicktime"), Some("mov"));
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("application/octet-stream"), None);
        assert_eq!(ext_from_mime("whatever/else"), None);
    }

    #[tokio::test]
    async fn upload_auth_signs_a_scoped_key() {
        let state = AppState::fake();
        let user_id = Uuid::new_v4();
        let res = upload_auth(&state, user_id, "video/mp4").await.unwrap();
        assert!(res.key.starts_with(&format!("videos/{}/", user_id)));
        assert!(res.key.ends_with(".mp4"));
        assert!(res.upload_url.contains(&res.key));
        assert_eq!(res.expires_in, 1800);
    }

    #[tokio::test]
    async fn upload_auth_rejects_unknown_content_type() {
        let state = AppState::fake();
        let err = upload_auth(&state, Uuid::new_v4(), "application/zip")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
