use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    app::state::AppState,
    auth::ActorContext,
    dto::elements::{
        BoardElementResponse, CopyElementsRequest, CopyElementsResponse,
        CreateBoardElementRequest, GroupElementsRequest, GroupElementsResponse,
        ReorderElementsRequest, TransformElementRequest, UngroupElementsRequest,
        UpdateBoardElementRequest, UpdateElementLocksRequest,
    },
    error::AppError,
    usecases::{
        copies::CopyService, elements::ElementService, groups::GroupService,
        ordering::OrderingService,
    },
};

pub async fn list_board_elements_handle(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(board_id): Path<Uuid>,
) -> Result<Json<Vec<BoardElementResponse>>, AppError> {
    let elements = ElementService::list_elements(&state.db, board_id, actor).await?;
    Ok(Json(elements))
}

pub async fn create_board_element_handle(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(board_id): Path<Uuid>,
    Json(req): Json<CreateBoardElementRequest>,
) -> Result<(StatusCode, Json<BoardElementResponse>), AppError> {
    let element = ElementService::create_element(&state.db, board_id, actor, req).await?;
    Ok((StatusCode::CREATED, Json(element)))
}

pub async fn update_board_element_handle(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path((board_id, element_id)): Path<(Uuid, i64)>,
    Json(req): Json<UpdateBoardElementRequest>,
) -> Result<Json<BoardElementResponse>, AppError> {
    let element =
        ElementService::update_element(&state.db, board_id, element_id, actor, req).await?;
    Ok(Json(element))
}

pub async fn transform_board_element_handle(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path((board_id, element_id)): Path<(Uuid, i64)>,
    Json(req): Json<TransformElementRequest>,
) -> Result<Json<BoardElementResponse>, AppError> {
    let element =
        ElementService::transform_element(&state.db, board_id, element_id, actor, req).await?;
    Ok(Json(element))
}

pub async fn update_board_element_locks_handle(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path((board_id, element_id)): Path<(Uuid, i64)>,
    Json(req): Json<UpdateElementLocksRequest>,
) -> Result<Json<BoardElementResponse>, AppError> {
    let element =
        ElementService::update_locks(&state.db, board_id, element_id, actor, req).await?;
    Ok(Json(element))
}

pub async fn delete_board_element_handle(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path((board_id, element_id)): Path<(Uuid, i64)>,
) -> Result<StatusCode, AppError> {
    ElementService::delete_element(&state.db, board_id, element_id, actor).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn group_board_elements_handle(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(board_id): Path<Uuid>,
    Json(req): Json<GroupElementsRequest>,
) -> Result<Json<GroupElementsResponse>, AppError> {
    let response = GroupService::group_elements(&state.db, board_id, actor, req).await?;
    Ok(Json(response))
}

pub async fn ungroup_board_elements_handle(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(board_id): Path<Uuid>,
    Json(req): Json<UngroupElementsRequest>,
) -> Result<StatusCode, AppError> {
    GroupService::ungroup_elements(&state.db, board_id, actor, req).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reorder_board_elements_handle(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(board_id): Path<Uuid>,
    Json(req): Json<ReorderElementsRequest>,
) -> Result<StatusCode, AppError> {
    OrderingService::reorder(&state.db, board_id, actor, req).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn copy_board_elements_handle(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(board_id): Path<Uuid>,
    Json(req): Json<CopyElementsRequest>,
) -> Result<Json<CopyElementsResponse>, AppError> {
    let response = CopyService::copy_elements(&state.db, board_id, actor, req).await?;
    Ok(Json(response))
}
