mod common;

use std::collections::HashMap;
use std::sync::Arc;

use modkit::{ConfigProvider, DbModule, Module, ModuleCtx, ModuleCtxBuilder};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use journaling::contract::model::ListQuery;
use journaling::{Journaling, MODULE_NAME};

struct Sections(HashMap<String, Value>);

impl ConfigProvider for Sections {
    fn get_module_config(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

fn ctx_with(db: Option<Arc<modkit_db::DbHandle>>, section: Option<Value>) -> ModuleCtx {
    let mut b = ModuleCtxBuilder::new(CancellationToken::new());
    if let Some(db) = db {
        b = b.with_db(db);
    }
    if let Some(v) = section {
        let mut m = HashMap::new();
        m.insert(MODULE_NAME.to_string(), v);
        b = b.with_config_provider(Arc::new(Sections(m)));
    }
    b.build().for_module(MODULE_NAME)
}

#[tokio::test]
async fn init_requires_a_database() {
    let module = Journaling::default();
    let err = module.init(&ctx_with(None, None)).await.unwrap_err();
    assert!(err.to_string().contains("DB required"));
}

#[tokio::test]
async fn client_is_unavailable_before_init() {
    assert!(Journaling::default().client().is_err());
}

#[tokio::test]
async fn inconsistent_page_sizes_fail_init() {
    let db = common::test_db().await;
    let module = Journaling::default();
    let section = json!({ "default_page_size": 500, "max_page_size": 100 });
    assert!(module.init(&ctx_with(Some(db), Some(section))).await.is_err());
}

#[tokio::test]
async fn misspelled_config_key_fails_init() {
    let db = common::test_db().await;
    let module = Journaling::default();
    let section = json!({ "max_page_sise": 50 });
    let err = module
        .init(&ctx_with(Some(db), Some(section)))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("invalid journaling config"), "{err}");
    assert!(module.client().is_err());
}

#[tokio::test]
async fn missing_section_uses_defaults() {
    let db = common::test_db().await;
    let module = Journaling::default();
    module.init(&ctx_with(Some(db.clone()), None)).await.unwrap();
    module.migrate(&db).await.unwrap();

    let client = module.client().unwrap();
    let listed = client
        .list_entries(
            Uuid::new_v4(),
            ListQuery {
                limit: Some(1000),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn configured_limits_reach_the_service() {
    let db = common::test_db().await;
    let module = Journaling::default();
    module
        .init(&ctx_with(Some(db.clone()), Some(json!({ "max_page_size": 5, "default_page_size": 5 }))))
        .await
        .unwrap();
    module.migrate(&db).await.unwrap();

    let client = module.client().unwrap();
    let err = client
        .list_entries(
            Uuid::new_v4(),
            ListQuery {
                limit: Some(6),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.to_string().contains("limit"));
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = common::test_db().await;
    let module = Journaling::default();
    module.migrate(&db).await.unwrap();
    module.migrate(&db).await.unwrap();
}
