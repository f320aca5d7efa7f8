//! The end-to-end flow: two users register, log in, upload, and alice tries
//! to read bob's file.

use filedesk::{
    auth::{Access, Denial, authorize},
    constants::MAX_UPLOAD_BYTES,
    files::Upload,
    ids::FileRef,
    session::SessionStore,
    user::{NewUser, Role},
};

use crate::helpers::{TestContext, all_backends};

const BINARY: &str = "application/octet-stream";

#[tokio::test]
async fn two_users_upload_and_ownership_holds() {
    for (name, backend) in all_backends().await {
        let ctx = TestContext::with_backend(backend);

        let new_user = NewUser::new("alice@x.com", "pw1", Role::User);
        let alice = ctx.users.register(new_user, "pw1").await.unwrap();
        let new_user = NewUser::new("bob@x.com", "pw2", Role::User);
        let bob = ctx.users.register(new_user, "pw2").await.unwrap();
        assert_eq!(alice.user_id, 1, "{name}");
        assert_eq!(bob.user_id, 2, "{name}");

        // Alice logs in and uploads 100 bytes
        let alice_login = ctx.users.authenticate("alice@x.com", "pw1").await.unwrap();
        let alice_session = ctx.sessions.create(alice_login.identity()).await.unwrap();
        let resolved = ctx.sessions.resolve(&alice_session.token).await.unwrap();
        let access = authorize(resolved.as_ref(), Access::Authenticated);
        let alice_identity = access.unwrap();
        let alice_id = alice_identity.id;
        let upload = Upload::new("notes.txt", "text/plain", vec![b'a'; 100]);
        let alice_file = ctx.files.create(alice_id, upload).await.unwrap();
        let expected = format!("{}_1", alice.id);
        assert_eq!(alice_file.file_id.to_string(), expected, "{name}");

        // Bob's counter is independent of alice's
        let bob_login = ctx.users.authenticate("bob@x.com", "pw2").await.unwrap();
        let bob_session = ctx.sessions.create(bob_login.identity()).await.unwrap();
        let resolved = ctx.sessions.resolve(&bob_session.token).await.unwrap();
        let bob_identity = resolved.unwrap();
        let upload = Upload::new("b.bin", BINARY, vec![1, 2]);
        let bob_file = ctx.files.create(bob_identity.id, upload).await.unwrap();
        assert!(bob_file.file_id.to_string().ends_with("_1"), "{name}");

        // Alice cannot download bob's file
        let file = FileRef::Composite(bob_file.file_id);
        let err = ctx.files.download(&file, &alice_id).await.unwrap_err();
        assert!(err.is_forbidden(), "{name}");

        // Neither of them passes the administrator guard
        assert_eq!(
            authorize(Some(alice_identity), Access::Admin),
            Err(Denial::NotAdmin),
            "{name}"
        );

        // An oversized upload leaves alice's listing untouched
        let upload = Upload::new("huge", BINARY, vec![0; MAX_UPLOAD_BYTES + 1]);
        let err = ctx.files.create(alice_id, upload).await.unwrap_err();
        assert!(err.is_payload_too_large(), "{name}");
        let listing = ctx.files.list_by_owner(&alice.id).await.unwrap();
        assert_eq!(listing.len(), 1, "{name}");
        assert_eq!(listing[0].file_id, alice_file.file_id, "{name}");

        // After logout the session no longer resolves
        ctx.sessions.destroy(&alice_session.token).await.unwrap();
        let gone = ctx.sessions.resolve(&alice_session.token).await.unwrap();
        assert_eq!(
            authorize(gone.as_ref(), Access::Authenticated),
            Err(Denial::Unauthenticated),
            "{name}"
        );
    }
}
