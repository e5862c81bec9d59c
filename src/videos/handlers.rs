use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    state::AppState,
    videos::{
        dto::{CreateVideoRequest, Pagination, UploadAuthRequest, UploadAuthResponse, VideoResponse},
        repo_types::Video,
        services,
    },
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/videos", get(list_videos))
        .route("/videos/:id", get(get_video))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/videos", post(create_video))
        .route("/media/upload-auth", post(upload_auth))
}

#[instrument(skip(state))]
pub async fn list_videos(
    State(state): State<AppState>,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<VideoResponse>>, ApiError> {
    let (limit, offset) = p.bounds();
    let videos = Video::list(&state.db, limit, offset).await?;
    let mut items = Vec::with_capacity(videos.len());
    for video in videos {
        items.push(services::to_response(&state, video).await?);
    }
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VideoResponse>, ApiError> {
    let video = Video::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Video"))?;
    Ok(Json(services::to_response(&state, video).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_video(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateVideoRequest>,
) -> Result<(StatusCode, HeaderMap, Json<VideoResponse>), ApiError> {
    let video = services::create_video(&state, user_id, payload).await?;
    info!(user_id = %user_id, video_id = %video.id, "video created");

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/videos/{}", video.id).parse() {
        headers.insert(axum::http::header::LOCATION, location);
    }

    let body = services::to_response(&state, video).await?;
    Ok((StatusCode::CREATED, headers, Json(body)))
}

#[instrument(skip(state, payload))]
pub async fn upload_auth(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UploadAuthRequest>,
) -> Result<Json<UploadAuthResponse>, ApiError> {
    if payload.filename.trim().is_empty() {
        return Err(ApiError::BadRequest("filename is required".into()));
    }
    let res = services::upload_auth(&state, user_id, &payload.content_type).await?;
    info!(user_id = %user_id, key = %res.key, "upload authorized");
    Ok(Json(res))
}
