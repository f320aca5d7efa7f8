//! Credential store behaviour through the public API.

use filedesk::{
    Error,
    files::Upload,
    user::{NewUser, Role, UserError},
};

use crate::helpers::{TestContext, all_backends};

#[tokio::test]
async fn user_ids_increase_in_creation_order_and_are_not_reused() {
    for (name, backend) in all_backends().await {
        let ctx = TestContext::with_backend(backend);
        let a = ctx.create_user("a@x.com", "pw").await;
        let b = ctx.create_user("b@x.com", "pw").await;
        assert_eq!((a.user_id, b.user_id), (1, 2), "{name}");

        ctx.users.delete(&b.id).await.unwrap();
        let c = ctx.create_user("c@x.com", "pw").await;
        assert_eq!(c.user_id, 3, "{name}");
    }
}

#[tokio::test]
async fn duplicate_registration_is_a_validation_error() {
    let ctx = TestContext::new().await;
    ctx.create_user("alice@x.com", "pw1").await;

    let new_user = NewUser::new("alice@x.com", "other", Role::User);
    let err = ctx.users.register(new_user, "other").await.unwrap_err();
    assert!(matches!(err, Error::User(UserError::EmailAlreadyRegistered { .. })));
    assert!(err.is_validation_error());
    assert_eq!(ctx.users.count().await.unwrap(), 1);
}

#[tokio::test]
async fn password_is_stored_hashed() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user("alice@x.com", "pw1").await;
    assert_ne!(user.password_hash, "pw1");
    assert!(user.password_hash.starts_with("$argon2"));

    let logged_in = ctx.users.authenticate("alice@x.com", "pw1").await.unwrap();
    assert_eq!(logged_in.id, user.id);
}

#[tokio::test]
async fn admin_delete_cascades_to_files() {
    for (name, backend) in all_backends().await {
        let ctx = TestContext::with_backend(backend);
        let alice = ctx.create_user("alice@x.com", "pw").await;
        let bob = ctx.create_user("bob@x.com", "pw").await;
        for n in 0..3 {
            let upload = Upload::new(format!("{n}.txt"), "text/plain", vec![n]);
            ctx.files.create(alice.id, upload).await.unwrap();
        }
        let upload = Upload::new("bob.txt", "text/plain", b"b".to_vec());
        ctx.files.create(bob.id, upload).await.unwrap();

        let deleted = ctx.users.delete(&alice.id).await.unwrap();
        assert_eq!(deleted.user_id, alice.user_id, "{name}");
        assert_eq!(deleted.files_removed, 3, "{name}");
        let remaining = ctx.files.list_by_owner(&alice.id).await.unwrap();
        assert!(remaining.is_empty(), "{name}");
        assert_eq!(ctx.files.count().await.unwrap(), 1, "{name}");
        let err = ctx.users.get(&alice.id).await.unwrap_err();
        assert!(err.is_not_found(), "{name}");
    }
}

#[tokio::test]
async fn summaries_carry_file_counts() {
    let ctx = TestContext::new().await;
    let admin = ctx.create_admin("root@x.com", "pw").await;
    let alice = ctx.create_user("alice@x.com", "pw").await;
    let upload = Upload::new("a", "text/plain", b"a".to_vec());
    ctx.files.create(alice.id, upload).await.unwrap();

    let summaries = ctx.users.summaries().await.unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].id, admin.id);
    assert_eq!(summaries[0].role, Role::Admin);
    assert_eq!(summaries[0].file_count, 0);
    assert_eq!(summaries[1].email, "alice@x.com");
    assert_eq!(summaries[1].file_count, 1);
}

#[tokio::test]
async fn deleting_unknown_user_is_not_found() {
    let ctx = TestContext::new().await;
    let err = ctx.users.delete(&uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(err.is_not_found());
}
