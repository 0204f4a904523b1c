use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
}

impl AppState {
    pub fn new(db: PgPool, jwt_config: JwtConfig) -> Self {
        Self { db, jwt_config }
    }
}

impl FromRef<AppState> for JwtConfig {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_config.clone()
    }
}
