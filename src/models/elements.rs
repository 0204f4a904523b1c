use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "board.element_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementType {
    #[serde(alias = "Shape", alias = "shape")]
    Shape,
    #[serde(alias = "Text", alias = "text")]
    Text,
    #[serde(alias = "Sticky", alias = "sticky")]
    Sticky,
    #[serde(alias = "Arrow", alias = "arrow")]
    Arrow,
    #[serde(alias = "Brush", alias = "brush")]
    Brush,
    #[serde(alias = "Media", alias = "media")]
    Media,
}

/// Element row joined with the public uuid of its group, if any.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BoardElement {
    pub id: i64,
    pub board_id: i64,
    pub element_type: ElementType,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub z_index: i32,
    pub group_id: Option<i64>,
    pub group_uuid: Option<Uuid>,
    pub locked_position: bool,
    pub locked_editing: bool,
    pub media_id: Option<i64>,
    #[sqlx(json)]
    pub properties: serde_json::Value,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BoardElement {
    pub fn belongs_to(&self, board_id: i64) -> bool {
        self.board_id == board_id
    }

    /// Paint order: z-index ascending, ties broken by id ascending.
    pub fn render_cmp(&self, other: &Self) -> Ordering {
        self.z_index
            .cmp(&other.z_index)
            .then_with(|| self.id.cmp(&other.id))
    }
}

pub fn sort_for_render(elements: &mut [BoardElement]) {
    elements.sort_by(BoardElement::render_cmp);
}
