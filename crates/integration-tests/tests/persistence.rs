//! State surviving a simulated process restart.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use nebula_integration_tests::{TestContext, password};
use nebula_storefront::db::{BackingStore, NullBackingStore, blobs};
use nebula_storefront::services::latency::LatencyProfile;
use nebula_storefront::{AppState, StorefrontConfig};

#[tokio::test]
async fn test_accounts_and_session_survive_restart() {
    let mut ctx = TestContext::new().unwrap();
    let session = ctx.sign_up("ada@nebula.test").await.unwrap();

    ctx.restart().unwrap();
    assert_eq!(ctx.state.session(), Some(session.clone()));

    ctx.state.backend().auth.sign_out().await.unwrap();
    ctx.restart().unwrap();
    assert!(ctx.state.session().is_none());

    let again = ctx
        .state
        .backend()
        .auth
        .sign_in("ada@nebula.test", &password())
        .await
        .unwrap();
    assert_eq!(again.uid, session.uid);
}

#[tokio::test]
async fn test_products_and_cart_survive_restart() {
    let mut ctx = TestContext::new().unwrap();
    ctx.sign_up("seller@nebula.test").await.unwrap();
    let lamp = ctx.list("Lamp", 10).await.unwrap();
    ctx.state.cart().add_to_cart(&lamp);
    ctx.state.cart().add_to_cart(&lamp);

    ctx.restart().unwrap();

    let products = ctx.state.catalog().list_products().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, lamp.id);
    assert_eq!(ctx.state.cart().get_item_count(), 2);
}

#[tokio::test]
async fn test_blobs_use_stable_names() {
    let ctx = TestContext::new().unwrap();
    ctx.sign_up("seller@nebula.test").await.unwrap();
    let lamp = ctx.list("Lamp", 10).await.unwrap();
    ctx.state.cart().add_to_cart(&lamp);
    ctx.state.chat().send("hello").await.unwrap();

    for name in [blobs::ACCOUNTS, blobs::SESSION, blobs::PRODUCTS, blobs::CART, blobs::CHAT] {
        let path = ctx.data_dir().join(format!("{name}.json"));
        assert!(path.exists(), "{name} should be persisted");
    }

    let raw = std::fs::read_to_string(ctx.data_dir().join(format!("{}.json", blobs::ACCOUNTS))).unwrap();
    let pairs: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(pairs[0][0], "seller@nebula.test");
}

#[tokio::test]
async fn test_corrupt_blob_starts_empty() {
    let mut ctx = TestContext::new().unwrap();
    ctx.sign_up("seller@nebula.test").await.unwrap();
    ctx.list("Lamp", 10).await.unwrap();

    std::fs::write(
        ctx.data_dir().join(format!("{}.json", blobs::PRODUCTS)),
        b"{ truncated",
    )
    .unwrap();
    ctx.restart().unwrap();

    assert!(ctx.state.catalog().list_products().await.unwrap().is_empty());
    assert!(ctx.state.session().is_some());
}

#[tokio::test]
async fn test_null_store_forgets_everything() {
    let config = StorefrontConfig {
        latency: LatencyProfile::instant(),
        ..StorefrontConfig::default()
    };
    let store: Arc<dyn BackingStore> = Arc::new(NullBackingStore);

    let state = AppState::with_store(config.clone(), &store).unwrap();
    state
        .backend()
        .auth
        .sign_up("ada@nebula.test", &password())
        .await
        .unwrap();
    assert!(state.session().is_some());

    let restarted = AppState::with_store(config, &store).unwrap();
    assert!(restarted.session().is_none());
}
