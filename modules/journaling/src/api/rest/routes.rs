use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};
use crate::domain::service::Service;

/// Prefix shared by every journaling route.
pub const API_PREFIX: &str = "/api/v1";

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_entry,
        handlers::list_entries,
        handlers::get_entry,
        handlers::update_entry,
        handlers::delete_entry,
        handlers::get_stats,
    ),
    components(schemas(
        dto::JournalEntryDto,
        dto::CreateEntryReq,
        dto::UpdateEntryReq,
        dto::JournalStatsDto,
        dto::MoodTrendPointDto,
        modkit::Problem,
        modkit::ValidationError,
    )),
    tags((name = "journal", description = "Journal entries and mood statistics"))
)]
pub struct JournalingApiDoc;

/// Mount the journaling routes on `router` and merge their description into `openapi`.
pub fn register_routes(
    router: Router,
    openapi: &mut utoipa::openapi::OpenApi,
    service: Arc<Service>,
) -> anyhow::Result<Router> {
    let entries = format!("{API_PREFIX}/journal/entries");

    let router = router
        .route(
            &entries,
            post(handlers::create_entry).get(handlers::list_entries),
        )
        .route(
            &format!("{entries}/{{entry_id}}"),
            get(handlers::get_entry)
                .put(handlers::update_entry)
                .delete(handlers::delete_entry),
        )
        .route(
            &format!("{API_PREFIX}/journal/stats"),
            get(handlers::get_stats),
        )
        .layer(Extension(service));

    openapi.merge(JournalingApiDoc::openapi());
    Ok(router)
}
