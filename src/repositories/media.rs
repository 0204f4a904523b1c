use sqlx::PgConnection;

use crate::{error::AppError, models::media::MediaAsset};

pub async fn find_media_asset(
    conn: &mut PgConnection,
    media_id: i64,
) -> Result<Option<MediaAsset>, AppError> {
    let asset = crate::log_query_fetch_optional!(
        "media.find_by_id",
        sqlx::query_as::<_, MediaAsset>(
            r#"
                SELECT *
                FROM board.media_asset
                WHERE id = $1
            "#,
        )
        .bind(media_id)
        .fetch_optional(&mut *conn)
    )?;

    Ok(asset)
}
