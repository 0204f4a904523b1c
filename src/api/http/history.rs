use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use crate::{
    app::state::AppState,
    auth::ActorContext,
    dto::history::{HistoryEventResponse, ListHistoryQuery},
    error::AppError,
    usecases::history::HistoryService,
};

pub async fn list_board_history_handle(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(board_id): Path<Uuid>,
    Query(query): Query<ListHistoryQuery>,
) -> Result<Json<Vec<HistoryEventResponse>>, AppError> {
    let events = HistoryService::list_history(&state.db, board_id, actor, query).await?;
    Ok(Json(events))
}
