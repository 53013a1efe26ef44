//! Deck generation handlers: create task, poll progress, download archive.

use super::{CreateApkgQuery, CreateApkgResponse, ProgressLogResponse};
use crate::api::AppState;
use crate::error::{ApiError, Error};
use crate::tasks::{self, TaskId};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// GET /create-apkg/ - Start a deck-generation task
#[utoipa::path(
    get,
    path = "/create-apkg/",
    tag = "decks",
    params(CreateApkgQuery),
    responses(
        (status = 200, description = "Task accepted", body = CreateApkgResponse),
        (status = 422, description = "The url parameter is not a valid URL")
    )
)]
pub async fn create_apkg(
    State(state): State<AppState>,
    Query(query): Query<CreateApkgQuery>,
) -> Response {
    if let Err(e) = url::Url::parse(&query.url) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiError::validation(format!("invalid url parameter: {e}"))),
        )
            .into_response();
    }

    let task_id = state.tasks.create();
    tracing::info!(%task_id, url = %query.url, "Deck generation task created");

    tasks::spawn_generate(
        state.client.clone(),
        state.config.clone(),
        state.tasks.clone(),
        query.url,
        task_id,
    );

    (
        StatusCode::OK,
        Json(CreateApkgResponse {
            task_id: task_id.to_string(),
        }),
    )
        .into_response()
}

/// GET /progress-log/:task_id - Poll a task's progress log
#[utoipa::path(
    get,
    path = "/progress-log/{task_id}",
    tag = "decks",
    params(
        ("task_id" = String, Path, description = "Task id returned by /create-apkg/")
    ),
    responses(
        (status = 200, description = "Progress lines so far", body = ProgressLogResponse),
        (status = 404, description = "Task not found", body = crate::error::ApiError)
    )
)]
pub async fn progress_log(State(state): State<AppState>, Path(task_id): Path<String>) -> Response {
    let Some(id) = TaskId::parse(&task_id) else {
        return Error::NotFound("Task".to_string()).into_response();
    };

    match state.tasks.log(id) {
        Some(log) => (
            StatusCode::OK,
            Json(ProgressLogResponse {
                task_id,
                progress_log: log,
            }),
        )
            .into_response(),
        None => Error::NotFound("Task".to_string()).into_response(),
    }
}

/// GET /download-apkg/:task_id - Download a finished archive
#[utoipa::path(
    get,
    path = "/download-apkg/{task_id}",
    tag = "decks",
    params(
        ("task_id" = String, Path, description = "Task id returned by /create-apkg/")
    ),
    responses(
        (status = 200, description = "The .apkg archive", content_type = "application/octet-stream"),
        (status = 404, description = "File not found", body = crate::error::ApiError)
    )
)]
pub async fn download_apkg(State(state): State<AppState>, Path(task_id): Path<String>) -> Response {
    // Parsing as a task id keeps arbitrary path segments out of the join below
    let Some(id) = TaskId::parse(&task_id) else {
        return Error::NotFound("File".to_string()).into_response();
    };

    let path = state.config.storage.deck_dir.join(format!("{id}.apkg"));
    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (
                    header::CONTENT_TYPE,
                    "application/octet-stream".to_string(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{id}.apkg\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Error::NotFound("File".to_string()).into_response()
        }
        Err(e) => {
            tracing::error!(%id, error = %e, "Failed to read archive");
            Error::Io(e).into_response()
        }
    }
}
