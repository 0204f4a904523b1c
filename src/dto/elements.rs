use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    dto::patch::Patch,
    models::elements::{BoardElement, ElementType},
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardElementRequest {
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: Option<f64>,
    pub z_index: Option<i32>,
    pub group_id: Option<String>,
    pub media_id: Option<i64>,
    pub properties: Option<serde_json::Value>,
}

/// Partial update. Absent fields keep their current value; `groupId` and
/// `mediaId` may additionally be sent as `null` to detach.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBoardElementRequest {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub z_index: Option<i32>,
    #[serde(default)]
    pub group_id: Patch<String>,
    pub locked_position: Option<bool>,
    pub locked_editing: Option<bool>,
    #[serde(default)]
    pub media_id: Patch<i64>,
    pub properties: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformElementRequest {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateElementLocksRequest {
    pub locked_position: Option<bool>,
    pub locked_editing: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupElementsRequest {
    pub element_ids: Vec<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupElementsResponse {
    pub group_id: Uuid,
    pub element_ids: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UngroupElementsRequest {
    pub group_id: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ElementOrder {
    pub id: i64,
    pub z_index: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderElementsRequest {
    pub orders: Vec<ElementOrder>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyElementsRequest {
    pub element_ids: Vec<i64>,
    pub offset_x: f64,
    pub offset_y: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ElementCopy {
    pub source_id: i64,
    pub new_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CopyElementsResponse {
    pub copies: Vec<ElementCopy>,
}

/// Public view of an element. Also the snapshot shape stored in history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoardElementResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub z_index: i32,
    pub group_id: Option<Uuid>,
    pub locked_position: bool,
    pub locked_editing: bool,
    pub media_id: Option<i64>,
    pub properties: serde_json::Value,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&BoardElement> for BoardElementResponse {
    fn from(element: &BoardElement) -> Self {
        Self {
            id: element.id,
            element_type: element.element_type,
            x: element.x,
            y: element.y,
            width: element.width,
            height: element.height,
            rotation: element.rotation,
            z_index: element.z_index,
            group_id: element.group_uuid,
            locked_position: element.locked_position,
            locked_editing: element.locked_editing,
            media_id: element.media_id,
            properties: element.properties.clone(),
            created_by: element.created_by,
            updated_by: element.updated_by,
            created_at: element.created_at,
            updated_at: element.updated_at,
        }
    }
}

impl From<BoardElement> for BoardElementResponse {
    fn from(element: BoardElement) -> Self {
        Self::from(&element)
    }
}
