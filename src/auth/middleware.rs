use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{auth::jwt::JwtConfig, error::AppError};

/// Identity acting on a request. `user_id` is `None` for anonymous callers,
/// which is how ownerless temporary boards are edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActorContext {
    pub user_id: Option<Uuid>,
}

impl ActorContext {
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    pub fn user(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }
}

/// Resolves the optional bearer token into an [`ActorContext`] extension.
/// A missing token is anonymous; a present but invalid token is rejected.
pub async fn actor_middleware(
    State(jwt_config): State<JwtConfig>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|val| val.strip_prefix("Bearer "))
        .map(str::to_string)
        .or_else(|| {
            let query = req.uri().query().unwrap_or("");
            let params: std::collections::HashMap<String, String> =
                serde_urlencoded::from_str(query).unwrap_or_default();
            params.get("token").cloned()
        });

    let actor = match token {
        None => ActorContext::anonymous(),
        Some(token) => {
            let user_id = jwt_config
                .verify_subject(&token)
                .map_err(|err| AppError::Unauthorized(format!("Invalid token: {}", err)))?;
            ActorContext::user(user_id)
        }
    };

    req.extensions_mut().insert(actor);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension, Router,
        body::{Body, to_bytes},
        http::{StatusCode, header},
        routing::get,
    };
    use tower::util::ServiceExt;
    use uuid::Uuid;

    use super::{ActorContext, actor_middleware};
    use crate::auth::jwt::{JwtConfig, sign_for_tests};

    fn jwt_config() -> JwtConfig {
        JwtConfig::new("secret")
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/",
                get(|Extension(actor): Extension<ActorContext>| async move {
                    actor
                        .user_id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "anonymous".to_string())
                }),
            )
            .layer(axum::middleware::from_fn_with_state(
                jwt_config(),
                actor_middleware,
            ))
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn missing_token_is_anonymous() {
        let response = app()
            .oneshot(
                axum::extract::Request::builder()
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "anonymous");
    }

    #[tokio::test]
    async fn valid_token_sets_actor() {
        let user_id = Uuid::new_v4();
        let token = sign_for_tests(&jwt_config(), &user_id.to_string(), Some("access"));

        let response = app()
            .oneshot(
                axum::extract::Request::builder()
                    .uri("/")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, user_id.to_string());
    }

    #[tokio::test]
    async fn invalid_token_is_unauthorized() {
        let response = app()
            .oneshot(
                axum::extract::Request::builder()
                    .uri("/?token=not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
