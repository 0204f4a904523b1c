use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    auth::ActorContext,
    dto::{
        elements::{
            BoardElementResponse, CreateBoardElementRequest, TransformElementRequest,
            UpdateBoardElementRequest, UpdateElementLocksRequest,
        },
        patch::Patch,
    },
    error::AppError,
    models::{
        boards::Board,
        elements::{BoardElement, sort_for_render},
        groups::ElementGroup,
        history::HistoryEventType,
    },
    repositories::{
        elements::{self as element_repo, CreateElementParams},
        groups as group_repo,
    },
    telemetry::BusinessEvent,
    usecases::{
        boards::BoardDirectory,
        history::{HistoryEntry, HistoryRecorder},
        locks::LockPolicy,
        ordering::default_z_index,
        references,
    },
};

pub struct ElementService;

impl ElementService {
    /// All elements of the board in paint order.
    pub async fn list_elements(
        pool: &PgPool,
        board_uuid: Uuid,
        actor: ActorContext,
    ) -> Result<Vec<BoardElementResponse>, AppError> {
        let board = {
            let mut conn = pool.acquire().await?;
            BoardDirectory::resolve(&mut conn, board_uuid, actor).await?
        };
        let mut elements = element_repo::list_elements_by_board(pool, board.id).await?;
        sort_for_render(&mut elements);
        Ok(elements.into_iter().map(BoardElementResponse::from).collect())
    }

    pub async fn create_element(
        pool: &PgPool,
        board_uuid: Uuid,
        actor: ActorContext,
        req: CreateBoardElementRequest,
    ) -> Result<BoardElementResponse, AppError> {
        validate_position(req.x, req.y)?;
        validate_dimensions(req.width, req.height)?;
        validate_rotation(req.rotation)?;

        let mut tx = pool.begin().await?;
        let board = BoardDirectory::resolve(&mut tx, board_uuid, actor).await?;

        let group_id = match req.group_id.as_deref() {
            Some(raw) => Some(references::resolve_group_ref(&mut tx, &board, raw).await?.id),
            None => None,
        };
        let media_id = match req.media_id {
            Some(id) => Some(references::resolve_media(&mut tx, &board, id).await?.id),
            None => None,
        };
        let z_index = match req.z_index {
            Some(z_index) => z_index,
            None => default_z_index(&mut tx, &board).await?,
        };

        let created = element_repo::create_element(
            &mut tx,
            CreateElementParams {
                board_id: board.id,
                element_type: req.element_type,
                x: req.x,
                y: req.y,
                width: req.width,
                height: req.height,
                rotation: req.rotation.unwrap_or(0.0),
                z_index,
                group_id,
                media_id,
                properties: req.properties.unwrap_or_else(default_properties),
                created_by: actor.user_id,
                created_at: Utc::now(),
            },
        )
        .await?;

        let view = BoardElementResponse::from(&created);
        HistoryRecorder::append(
            &mut tx,
            &board,
            actor,
            HistoryEntry::new(HistoryEventType::ElementCreated)
                .element(created.id)
                .after(&view),
        )
        .await?;
        tx.commit().await?;

        BusinessEvent::ElementCreated {
            board_id: board.uuid,
            element_id: created.id,
            actor_id: actor.user_id,
        }
        .log();

        Ok(view)
    }

    /// Partial update gated by `lockedEditing`. Lock flags sent here are
    /// applied too, but only when the element is not edit-locked.
    pub async fn update_element(
        pool: &PgPool,
        board_uuid: Uuid,
        element_id: i64,
        actor: ActorContext,
        req: UpdateBoardElementRequest,
    ) -> Result<BoardElementResponse, AppError> {
        validate_update(&req)?;

        let mut tx = pool.begin().await?;
        let board = BoardDirectory::resolve(&mut tx, board_uuid, actor).await?;
        let mut element = references::load_element_for_board(&mut tx, &board, element_id).await?;
        LockPolicy::ensure_can_edit(&element)?;

        let group = match req.group_id.as_ref() {
            Patch::Set(raw) => Patch::Set(references::resolve_group_ref(&mut tx, &board, raw).await?),
            Patch::Cleared => Patch::Cleared,
            Patch::Unchanged => Patch::Unchanged,
        };
        let media_id = match req.media_id {
            Patch::Set(id) => Patch::Set(references::resolve_media(&mut tx, &board, id).await?.id),
            Patch::Cleared => Patch::Cleared,
            Patch::Unchanged => Patch::Unchanged,
        };

        let before = BoardElementResponse::from(&element);
        let previous_group = element.group_id;
        apply_update(&mut element, req, group, media_id);
        stamp(&mut element, actor, Utc::now());

        let saved = element_repo::save_element(&mut tx, &element).await?;
        if let Some(vacated) = previous_group.filter(|group_id| saved.group_id != Some(*group_id)) {
            group_repo::delete_empty_groups(&mut tx, &[vacated]).await?;
        }
        let after = Self::record_update(&mut tx, &board, actor, &before, &saved).await?;
        tx.commit().await?;

        log_update(&board, saved.id, actor, "update");
        Ok(after)
    }

    /// Geometry-only replacement gated by `lockedPosition`.
    pub async fn transform_element(
        pool: &PgPool,
        board_uuid: Uuid,
        element_id: i64,
        actor: ActorContext,
        req: TransformElementRequest,
    ) -> Result<BoardElementResponse, AppError> {
        validate_position(req.x, req.y)?;
        validate_dimensions(req.width, req.height)?;
        validate_rotation(Some(req.rotation))?;

        let mut tx = pool.begin().await?;
        let board = BoardDirectory::resolve(&mut tx, board_uuid, actor).await?;
        let mut element = references::load_element_for_board(&mut tx, &board, element_id).await?;
        LockPolicy::ensure_can_transform(&element)?;

        let before = BoardElementResponse::from(&element);
        apply_transform(&mut element, &req);
        stamp(&mut element, actor, Utc::now());

        let saved = element_repo::save_element(&mut tx, &element).await?;
        let after = Self::record_update(&mut tx, &board, actor, &before, &saved).await?;
        tx.commit().await?;

        log_update(&board, saved.id, actor, "transform");
        Ok(after)
    }

    /// Locks are always changeable, whatever their current state.
    pub async fn update_locks(
        pool: &PgPool,
        board_uuid: Uuid,
        element_id: i64,
        actor: ActorContext,
        req: UpdateElementLocksRequest,
    ) -> Result<BoardElementResponse, AppError> {
        let mut tx = pool.begin().await?;
        let board = BoardDirectory::resolve(&mut tx, board_uuid, actor).await?;
        let mut element = references::load_element_for_board(&mut tx, &board, element_id).await?;

        let before = BoardElementResponse::from(&element);
        LockPolicy::apply(&mut element, req.locked_position, req.locked_editing);
        stamp(&mut element, actor, Utc::now());

        let saved = element_repo::save_element(&mut tx, &element).await?;
        let after = Self::record_update(&mut tx, &board, actor, &before, &saved).await?;
        tx.commit().await?;

        log_update(&board, saved.id, actor, "locks");
        Ok(after)
    }

    /// Deletion ignores both lock flags.
    pub async fn delete_element(
        pool: &PgPool,
        board_uuid: Uuid,
        element_id: i64,
        actor: ActorContext,
    ) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;
        let board = BoardDirectory::resolve(&mut tx, board_uuid, actor).await?;
        let element = references::load_element_for_board(&mut tx, &board, element_id).await?;
        let before = BoardElementResponse::from(&element);

        let deleted = element_repo::delete_element(&mut tx, element.id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound(format!(
                "Element not found: {}",
                element_id
            )));
        }
        if let Some(group_id) = element.group_id {
            group_repo::delete_empty_groups(&mut tx, &[group_id]).await?;
        }

        HistoryRecorder::append(
            &mut tx,
            &board,
            actor,
            HistoryEntry::new(HistoryEventType::ElementDeleted)
                .element(element.id)
                .before(&before),
        )
        .await?;
        tx.commit().await?;

        BusinessEvent::ElementDeleted {
            board_id: board.uuid,
            element_id: element.id,
            actor_id: actor.user_id,
        }
        .log();

        Ok(())
    }

    async fn record_update(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        board: &Board,
        actor: ActorContext,
        before: &BoardElementResponse,
        saved: &BoardElement,
    ) -> Result<BoardElementResponse, AppError> {
        let after = BoardElementResponse::from(saved);
        HistoryRecorder::append(
            tx,
            board,
            actor,
            HistoryEntry::new(HistoryEventType::ElementUpdated)
                .element(saved.id)
                .before(before)
                .after(&after),
        )
        .await?;
        Ok(after)
    }
}

fn log_update(board: &Board, element_id: i64, actor: ActorContext, operation: &'static str) {
    BusinessEvent::ElementUpdated {
        board_id: board.uuid,
        element_id,
        actor_id: actor.user_id,
        operation,
    }
    .log();
}

/// Folds a validated partial update into the loaded element. Group and media
/// references arrive already resolved against the board.
fn apply_update(
    element: &mut BoardElement,
    req: UpdateBoardElementRequest,
    group: Patch<ElementGroup>,
    media_id: Patch<i64>,
) {
    if let Some(x) = req.x {
        element.x = x;
    }
    if let Some(y) = req.y {
        element.y = y;
    }
    if let Some(width) = req.width {
        element.width = width;
    }
    if let Some(height) = req.height {
        element.height = height;
    }
    if let Some(rotation) = req.rotation {
        element.rotation = rotation;
    }
    if let Some(z_index) = req.z_index {
        element.z_index = z_index;
    }
    match group {
        Patch::Set(group) => {
            element.group_id = Some(group.id);
            element.group_uuid = Some(group.uuid);
        }
        Patch::Cleared => {
            element.group_id = None;
            element.group_uuid = None;
        }
        Patch::Unchanged => {}
    }
    element.media_id = media_id.apply_to(element.media_id);
    LockPolicy::apply(element, req.locked_position, req.locked_editing);
    if let Some(properties) = req.properties {
        element.properties = properties;
    }
}

fn apply_transform(element: &mut BoardElement, req: &TransformElementRequest) {
    element.x = req.x;
    element.y = req.y;
    element.width = req.width;
    element.height = req.height;
    element.rotation = req.rotation;
}

/// Anonymous actors leave the previous updater in place.
fn stamp(element: &mut BoardElement, actor: ActorContext, now: DateTime<Utc>) {
    if let Some(user_id) = actor.user_id {
        element.updated_by = Some(user_id);
    }
    element.updated_at = now;
}

fn validate_update(req: &UpdateBoardElementRequest) -> Result<(), AppError> {
    validate_optional_coordinate(req.x, "x")?;
    validate_optional_coordinate(req.y, "y")?;
    validate_optional_dimension(req.width, "width")?;
    validate_optional_dimension(req.height, "height")?;
    validate_rotation(req.rotation)?;
    if let Patch::Set(raw) = req.group_id.as_ref() {
        references::parse_group_ref(raw)?;
    }
    Ok(())
}

fn validate_dimensions(width: f64, height: f64) -> Result<(), AppError> {
    if !width.is_finite() || !height.is_finite() {
        return Err(AppError::ValidationError(
            "Element dimensions must be finite numbers".to_string(),
        ));
    }
    if width <= 0.0 || height <= 0.0 {
        return Err(AppError::ValidationError(
            "Element dimensions must be positive".to_string(),
        ));
    }
    Ok(())
}

fn validate_rotation(rotation: Option<f64>) -> Result<(), AppError> {
    match rotation {
        Some(value) if !value.is_finite() => Err(AppError::ValidationError(
            "Rotation must be a finite number".to_string(),
        )),
        _ => Ok(()),
    }
}

fn validate_position(x: f64, y: f64) -> Result<(), AppError> {
    if !x.is_finite() || !y.is_finite() {
        return Err(AppError::ValidationError(
            "Element position must be finite numbers".to_string(),
        ));
    }
    Ok(())
}

fn validate_optional_coordinate(value: Option<f64>, label: &str) -> Result<(), AppError> {
    let Some(value) = value else {
        return Ok(());
    };
    if !value.is_finite() {
        return Err(AppError::ValidationError(format!(
            "Element {} must be a finite number",
            label
        )));
    }
    Ok(())
}

fn validate_optional_dimension(value: Option<f64>, label: &str) -> Result<(), AppError> {
    let Some(value) = value else {
        return Ok(());
    };
    validate_optional_coordinate(Some(value), label)?;
    if value <= 0.0 {
        return Err(AppError::ValidationError(format!(
            "Element {} must be positive",
            label
        )));
    }
    Ok(())
}

fn default_properties() -> serde_json::Value {
    serde_json::json!({})
}
