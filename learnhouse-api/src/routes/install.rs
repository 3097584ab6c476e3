/// Install wizard endpoints
///
/// Thin adapters over [`InstallService`](learnhouse_shared::install::InstallService).
/// All of them sit behind the install-mode gate.
///
/// # Endpoints
///
/// ```text
/// POST /api/v1/install/start              body: any JSON  -> install record
/// GET  /api/v1/install/latest                             -> install record
/// POST /api/v1/install/update?step=N      body: any JSON  -> install record
/// POST /api/v1/install/default_elements                   -> true
/// POST /api/v1/install/org                body: org       -> organization
/// POST /api/v1/install/user?org_slug=S    body: user      -> user (no password)
/// ```
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use learnhouse_shared::models::{
    install::InstallRecord,
    organization::{Organization, OrganizationCreate},
    user::{UserCreate, UserRead},
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Query string of the update endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepQuery {
    /// Step to record
    pub step: i32,
}

/// Query string of the user endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgSlugQuery {
    /// Slug of the organization the user administers
    pub org_slug: String,
}

/// Starts a new install at step 1
pub async fn start_install(
    State(state): State<AppState>,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> ApiResult<Json<InstallRecord>> {
    let Json(data) = payload?;

    let install = state.install.create_install_instance(data).await?;
    Ok(Json(install))
}

/// Returns the latest install record
pub async fn get_latest_install(State(state): State<AppState>) -> ApiResult<Json<InstallRecord>> {
    let install = state.install.get_latest_install_instance().await?;
    Ok(Json(install))
}

/// Records wizard progress on the latest install
pub async fn update_install(
    State(state): State<AppState>,
    query: Result<Query<StepQuery>, QueryRejection>,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> ApiResult<Json<InstallRecord>> {
    let Query(StepQuery { step }) = query?;
    let Json(data) = payload?;

    let install = state.install.update_install_instance(data, step).await?;
    Ok(Json(install))
}

/// Seeds the default global roles
pub async fn install_default_elements(State(state): State<AppState>) -> ApiResult<Json<bool>> {
    let installed = state.install.install_default_elements().await?;
    Ok(Json(installed))
}

/// Creates the first organization
pub async fn create_organization(
    State(state): State<AppState>,
    payload: Result<Json<OrganizationCreate>, JsonRejection>,
) -> ApiResult<Json<Organization>> {
    let Json(org) = payload?;

    let org = state.install.install_create_organization(org).await?;
    Ok(Json(org))
}

/// Creates the organization's admin user
pub async fn create_organization_user(
    State(state): State<AppState>,
    query: Result<Query<OrgSlugQuery>, QueryRejection>,
    payload: Result<Json<UserCreate>, JsonRejection>,
) -> ApiResult<Json<UserRead>> {
    let Query(OrgSlugQuery { org_slug }) = query?;
    let Json(user) = payload?;

    let user = state
        .install
        .install_create_organization_user(user, &org_slug)
        .await?;
    Ok(Json(user))
}
