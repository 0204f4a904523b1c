use axum::{
    Router,
    http::{HeaderValue, Method, StatusCode, header},
    middleware,
    routing::{get, patch, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    api::http::{elements as elements_http, history as history_http},
    app::{middleware::api_response_headers, state::AppState},
    auth::actor_middleware,
    error::AppError,
    telemetry::{REQUEST_ID_HEADER, TRACE_ID_HEADER, request_logging_middleware},
};

pub fn build_router(state: AppState, cors_origin: &str) -> Result<Router, AppError> {
    let origin = cors_origin
        .parse::<HeaderValue>()
        .map_err(|err| AppError::Internal(format!("CORS_ORIGIN invalid: {}", err)))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::HeaderName::from_static(REQUEST_ID_HEADER),
            header::HeaderName::from_static(TRACE_ID_HEADER),
        ]);

    let board_routes = Router::new()
        .route(
            "/api/boards/{board_id}/elements",
            get(elements_http::list_board_elements_handle)
                .post(elements_http::create_board_element_handle),
        )
        .route(
            "/api/boards/{board_id}/elements/group",
            post(elements_http::group_board_elements_handle),
        )
        .route(
            "/api/boards/{board_id}/elements/ungroup",
            post(elements_http::ungroup_board_elements_handle),
        )
        .route(
            "/api/boards/{board_id}/elements/reorder",
            patch(elements_http::reorder_board_elements_handle),
        )
        .route(
            "/api/boards/{board_id}/elements/copy",
            post(elements_http::copy_board_elements_handle),
        )
        .route(
            "/api/boards/{board_id}/elements/{element_id}",
            put(elements_http::update_board_element_handle)
                .delete(elements_http::delete_board_element_handle),
        )
        .route(
            "/api/boards/{board_id}/elements/{element_id}/transform",
            patch(elements_http::transform_board_element_handle),
        )
        .route(
            "/api/boards/{board_id}/elements/{element_id}/lock",
            patch(elements_http::update_board_element_locks_handle),
        )
        .route(
            "/api/boards/{board_id}/history",
            get(history_http::list_board_history_handle),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            actor_middleware,
        ));

    let router = Router::new()
        .route("/health", get(health))
        .merge(board_routes)
        // The last layer wraps everything, so request ids exist before any log line.
        .layer(middleware::from_fn(api_response_headers))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_logging_middleware))
        .with_state(state);

    Ok(router)
}

async fn health() -> StatusCode {
    StatusCode::OK
}
