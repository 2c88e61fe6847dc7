use utoipa::openapi::{InfoBuilder, OpenApi};

pub const TITLE: &str = "MindJournal API";

/// Stamp document-level metadata onto the paths and schemas merged in by modules.
pub fn finalize_document(mut doc: OpenApi) -> OpenApi {
    doc.info = InfoBuilder::new()
        .title(TITLE)
        .version(env!("CARGO_PKG_VERSION"))
        .description(Some(
            "Journal entries with mood and energy tracking, filtered listing and statistics",
        ))
        .build();
    doc
}
