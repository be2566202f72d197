//! Dashboard session extractor

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use uuid::Uuid;

use malaria_risk_core::session::SessionHandle;

use crate::{AppError, AppState};

/// Session named by the `:id` path segment
#[derive(Clone)]
pub struct SessionContext {
    pub id: Uuid,
    pub session: SessionHandle,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for SessionContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<Uuid>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound("Session not found".to_string()))?;

        let session = state.sessions.get(&id).ok_or_else(|| {
            tracing::debug!("Unknown dashboard session {}", id);
            AppError::NotFound("Session not found".to_string())
        })?;

        Ok(Self { id, session })
    }
}
