/// Install-mode gate middleware
///
/// Runs once per request in front of every `/api/v1/install` route and
/// answers `403 Forbidden` when `LEARNHOUSE_INSTALL_MODE` is off.
use crate::{app::AppState, error::ApiError};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use learnhouse_shared::install::ensure_install_mode_enabled;

pub async fn install_mode_layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    ensure_install_mode_enabled(&state.config.general)?;

    Ok(next.run(req).await)
}
