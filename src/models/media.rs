use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "board.media_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    Image,
    Video,
    Audio,
    Pdf,
    Other,
}

/// Entry of the external media catalog. Uploads happen elsewhere; elements
/// only link to an existing asset.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MediaAsset {
    pub id: i64,
    pub board_id: Option<i64>,
    pub uploader_id: Option<Uuid>,
    pub media_type: MediaType,
    pub url: String,
    pub original_filename: Option<String>,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub duration_seconds: Option<f64>,
    pub uploaded_at: DateTime<Utc>,
}

impl MediaAsset {
    /// Unbound assets are shared; bound ones may only be linked from their board.
    pub fn is_usable_on(&self, board_id: i64) -> bool {
        self.board_id.is_none_or(|owner| owner == board_id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{MediaAsset, MediaType};

    fn asset(board_id: Option<i64>) -> MediaAsset {
        MediaAsset {
            id: 1,
            board_id,
            uploader_id: None,
            media_type: MediaType::Image,
            url: "https://cdn.boards.test/photo.png".to_string(),
            original_filename: None,
            mime_type: Some("image/png".to_string()),
            size_bytes: None,
            width: None,
            height: None,
            duration_seconds: None,
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn bound_asset_is_usable_on_its_own_board_only() {
        assert!(asset(Some(3)).is_usable_on(3));
        assert!(!asset(Some(3)).is_usable_on(4));
    }

    #[test]
    fn unbound_asset_is_usable_anywhere() {
        assert!(asset(None).is_usable_on(3));
        assert!(asset(None).is_usable_on(4));
    }
}
