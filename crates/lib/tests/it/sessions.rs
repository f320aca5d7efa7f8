//! Session lifecycle through the SessionStore trait object.

use std::sync::Arc;

use filedesk::{
    FixedClock,
    constants::SESSION_TTL_MILLIS,
    session::{MemorySessionStore, SessionStore},
};

use crate::helpers::TestContext;

#[tokio::test]
async fn login_creates_a_session_carrying_the_identity_snapshot() {
    let ctx = TestContext::new().await;
    let alice = ctx.create_user("alice@x.com", "pw1").await;

    let user = ctx.users.authenticate("alice@x.com", "pw1").await.unwrap();
    let session = ctx.sessions.create(user.identity()).await.unwrap();

    let identity = ctx.sessions.resolve(&session.token).await.unwrap().unwrap();
    assert_eq!(identity.id, alice.id);
    assert_eq!(identity.email, "alice@x.com");
    assert!(!identity.is_admin());
}

#[tokio::test]
async fn session_dies_after_a_day_even_when_used() {
    let clock = Arc::new(FixedClock::default());
    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new(clock.clone()));
    let ctx = TestContext::new().await;
    let alice = ctx.create_user("alice@x.com", "pw").await;

    let session = store.create(alice.identity()).await.unwrap();
    clock.advance(SESSION_TTL_MILLIS - 10);
    assert!(store.resolve(&session.token).await.unwrap().is_some());
    clock.advance(10);
    assert!(store.resolve(&session.token).await.unwrap().is_none());
}

#[tokio::test]
async fn logout_is_final() {
    let ctx = TestContext::new().await;
    let alice = ctx.create_user("alice@x.com", "pw").await;
    let session = ctx.sessions.create(alice.identity()).await.unwrap();

    ctx.sessions.destroy(&session.token).await.unwrap();
    assert!(ctx.sessions.resolve(&session.token).await.unwrap().is_none());
    ctx.sessions.destroy(&session.token).await.unwrap();
}
