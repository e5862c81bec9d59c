use crate::videos::repo_types::Video;
use sqlx::PgPool;
use uuid::Uuid;

impl Video {
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        title: &str,
        description: &str,
        video_key: &str,
        thumbnail_key: &str,
        controls: bool,
        width: i32,
        height: i32,
        quality: Option<i32>,
    ) -> Result<Video, sqlx::Error> {
        sqlx::query_as::<_, Video>(
            r#"
            INSERT INTO videos
                (user_id, title, description, video_key, thumbnail_key,
                 controls, width, height, quality)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, user_id, title, description, video_key, thumbnail_key,
                      controls, width, height, quality, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(video_key)
        .bind(thumbnail_key)
        .bind(controls)
        .bind(width)
        .bind(height)
        .bind(quality)
        .fetch_one(db)
        .await
    }

    /// Public feed, newest first.
    pub async fn list(db: &PgPool, limit: i64, offset: i64) -> Result<Vec<Video>, sqlx::Error> {
        sqlx::query_as::<_, Video>(
            r#"
            SELECT id, user_id, title, description, video_key, thumbnail_key,
                   controls, width, height, quality, created_at, updated_at
            FROM videos
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Video>, sqlx::Error> {
        sqlx::query_as::<_, Video>(
            r#"
            SELECT id, user_id, title, description, video_key, thumbnail_key,
                   controls, width, height, quality, created_at, updated_at
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }
}
