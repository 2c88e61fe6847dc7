use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query,
    },
    http::{StatusCode, Uri},
    response::Json,
    Extension,
};
use modkit::api::problem::{Problem, ProblemResponse};
use modkit::SecurityCtx;
use tracing::{error, info};
use uuid::Uuid;

use crate::api::rest::dto::{
    CreateEntryReq, JournalEntryDto, JournalStatsDto, ListEntriesQuery, StatsQuery,
    UpdateEntryReq,
};
use crate::api::rest::error::{invalid_entry_id, malformed_request, map_domain_error};
use crate::contract::model::JournalEntryPatch;
use crate::domain::service::Service;

fn parse_entry_id(raw: &str, instance: &str) -> Result<Uuid, ProblemResponse> {
    Uuid::parse_str(raw).map_err(|_| {
        info!(entry_id = %raw, "Rejected malformed entry id");
        invalid_entry_id(instance)
    })
}

fn body<T>(req: Result<Json<T>, JsonRejection>, instance: &str) -> Result<T, ProblemResponse> {
    req.map(|Json(v)| v)
        .map_err(|r| malformed_request(r.status(), r.body_text(), instance))
}

fn query<T>(q: Result<Query<T>, QueryRejection>, instance: &str) -> Result<T, ProblemResponse> {
    q.map(|Query(v)| v)
        .map_err(|r| malformed_request(r.status(), r.body_text(), instance))
}

/// Create a new journal entry
#[utoipa::path(
    post,
    path = "/api/v1/journal/entries",
    tag = "journal",
    operation_id = "journaling.create_entry",
    request_body = CreateEntryReq,
    responses(
        (status = 201, description = "Created entry", body = JournalEntryDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Unauthorized", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn create_entry(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    sec: SecurityCtx,
    req: Result<Json<CreateEntryReq>, JsonRejection>,
) -> Result<(StatusCode, Json<JournalEntryDto>), ProblemResponse> {
    let req_body = body(req, uri.path())?;
    info!(user_id = %sec.subject, "Creating journal entry");

    match svc.create_entry(sec.subject, req_body.into()).await {
        Ok(entry) => Ok((StatusCode::CREATED, Json(JournalEntryDto::from(entry)))),
        Err(e) => {
            error!("Failed to create journal entry: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// List the caller's entries, newest first
#[utoipa::path(
    get,
    path = "/api/v1/journal/entries",
    tag = "journal",
    operation_id = "journaling.list_entries",
    params(ListEntriesQuery),
    responses(
        (status = 200, description = "Entries ordered by entry_date descending", body = [JournalEntryDto]),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Unauthorized", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn list_entries(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    sec: SecurityCtx,
    q: Result<Query<ListEntriesQuery>, QueryRejection>,
) -> Result<Json<Vec<JournalEntryDto>>, ProblemResponse> {
    let q = query(q, uri.path())?;
    info!(user_id = %sec.subject, "Listing journal entries with query: {:?}", q);

    match svc.list_entries(sec.subject, q.into()).await {
        Ok(entries) => Ok(Json(entries.into_iter().map(JournalEntryDto::from).collect())),
        Err(e) => {
            error!("Failed to list journal entries: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get one entry by id
#[utoipa::path(
    get,
    path = "/api/v1/journal/entries/{entry_id}",
    tag = "journal",
    operation_id = "journaling.get_entry",
    params(("entry_id" = String, Path, description = "Entry UUID")),
    responses(
        (status = 200, description = "Entry found", body = JournalEntryDto),
        (status = 400, description = "Invalid id", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Unauthorized", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn get_entry(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    sec: SecurityCtx,
    Path(entry_id): Path<String>,
) -> Result<Json<JournalEntryDto>, ProblemResponse> {
    let id = parse_entry_id(&entry_id, uri.path())?;
    info!(user_id = %sec.subject, "Getting journal entry {}", id);

    match svc.get_entry(sec.subject, id).await {
        Ok(entry) => Ok(Json(JournalEntryDto::from(entry))),
        Err(e) => {
            error!("Failed to get journal entry {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Partially update an entry
#[utoipa::path(
    put,
    path = "/api/v1/journal/entries/{entry_id}",
    tag = "journal",
    operation_id = "journaling.update_entry",
    params(("entry_id" = String, Path, description = "Entry UUID")),
    request_body = UpdateEntryReq,
    responses(
        (status = 200, description = "Updated entry", body = JournalEntryDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Unauthorized", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn update_entry(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    sec: SecurityCtx,
    Path(entry_id): Path<String>,
    req: Result<Json<UpdateEntryReq>, JsonRejection>,
) -> Result<Json<JournalEntryDto>, ProblemResponse> {
    let id = parse_entry_id(&entry_id, uri.path())?;
    let patch: JournalEntryPatch = body(req, uri.path())?.into();
    info!(
        user_id = %sec.subject,
        entry_id = %id,
        fields = ?patch.supplied_fields(),
        "Updating journal entry"
    );

    match svc.update_entry(sec.subject, id, patch).await {
        Ok(entry) => Ok(Json(JournalEntryDto::from(entry))),
        Err(e) => {
            error!("Failed to update journal entry {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Delete an entry
#[utoipa::path(
    delete,
    path = "/api/v1/journal/entries/{entry_id}",
    tag = "journal",
    operation_id = "journaling.delete_entry",
    params(("entry_id" = String, Path, description = "Entry UUID")),
    responses(
        (status = 204, description = "Entry deleted"),
        (status = 400, description = "Invalid id", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Unauthorized", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn delete_entry(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    sec: SecurityCtx,
    Path(entry_id): Path<String>,
) -> Result<StatusCode, ProblemResponse> {
    let id = parse_entry_id(&entry_id, uri.path())?;
    info!(user_id = %sec.subject, "Deleting journal entry {}", id);

    match svc.delete_entry(sec.subject, id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete journal entry {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Aggregate statistics over the caller's entries
#[utoipa::path(
    get,
    path = "/api/v1/journal/stats",
    tag = "journal",
    operation_id = "journaling.stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Statistics", body = JournalStatsDto),
        (status = 401, description = "Unauthorized", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn get_stats(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    sec: SecurityCtx,
    q: Result<Query<StatsQuery>, QueryRejection>,
) -> Result<Json<JournalStatsDto>, ProblemResponse> {
    let q = query(q, uri.path())?;
    info!(user_id = %sec.subject, "Computing journal stats");

    match svc.stats(sec.subject, q.as_of).await {
        Ok(stats) => Ok(Json(JournalStatsDto::from(stats))),
        Err(e) => {
            error!("Failed to compute journal stats: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}
