use crate::config::Config;
use crate::demo::{self, CampaignsResponse, Overview};
use crate::errors::AppError;
use crate::huly_client::HulyClient;
use crate::models::{DataResponse, NewContact, ProjectProgress, SyncResponse};
use crate::twenty_client::{Fetched, TwentyCrmClient};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Client for the Twenty CRM backend.
    pub twenty: TwentyCrmClient,
    /// Client for the Huly project API.
    pub huly: HulyClient,
}

impl From<Fetched<Value>> for DataResponse {
    fn from(fetched: Fetched<Value>) -> Self {
        let fallback = fetched.is_fallback();
        DataResponse {
            data: fetched.into_inner(),
            fallback,
        }
    }
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /api/v1/contacts
pub async fn list_contacts(State(state): State<Arc<AppState>>) -> Json<DataResponse> {
    tracing::info!("GET /contacts");
    Json(state.twenty.get_contacts().await.into())
}

/// POST /api/v1/contacts
///
/// Rejects input without a name or email; everything else is passed to
/// Twenty as given.
pub async fn create_contact(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewContact>,
) -> Result<(StatusCode, Json<DataResponse>), AppError> {
    tracing::info!("POST /contacts - email: {}", payload.email);

    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    if payload.email.trim().is_empty() {
        return Err(AppError::BadRequest("email is required".to_string()));
    }

    let created = state.twenty.create_contact(&payload).await;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// POST /api/v1/contacts/sync
///
/// Reloads contacts from Twenty and reports how many came back.
pub async fn sync_contacts(State(state): State<Arc<AppState>>) -> Json<SyncResponse> {
    let fetched = state.twenty.get_contacts().await;
    let fallback = fetched.is_fallback();
    let count = fetched.data().as_array().map(Vec::len).unwrap_or(0);

    if fallback {
        tracing::warn!("Sync with Twenty served {} fallback contacts", count);
    } else {
        tracing::info!("Synced {} contacts from Twenty", count);
    }

    Json(SyncResponse {
        synced: !fallback,
        fallback,
        count,
    })
}

/// GET /api/v1/analytics
pub async fn analytics(State(state): State<Arc<AppState>>) -> Json<DataResponse> {
    tracing::info!("GET /analytics");
    Json(state.twenty.get_analytics().await.into())
}

/// GET /api/v1/campaigns
pub async fn campaigns() -> Json<CampaignsResponse> {
    Json(demo::campaigns_response())
}

/// GET /api/v1/dashboard
pub async fn dashboard() -> Json<Overview> {
    Json(demo::overview())
}

/// GET /api/v1/projects/:id/progress
///
/// Huly failures surface as 502; there is no fallback for project data.
pub async fn project_progress(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
) -> Result<Json<ProjectProgress>, AppError> {
    tracing::info!("GET /projects/{}/progress", project_id);
    let progress = state.huly.get_project_progress_summary(&project_id).await?;
    Ok(Json(progress))
}
