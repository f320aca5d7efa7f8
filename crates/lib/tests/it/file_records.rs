//! File record store behaviour through the public API.

use filedesk::{
    constants::MAX_UPLOAD_BYTES,
    files::Upload,
    ids::{FileId, FileRef},
};

use crate::helpers::{TestContext, all_backends};

const BINARY: &str = "application/octet-stream";

#[tokio::test]
async fn download_returns_exactly_what_was_uploaded() {
    for (name, backend) in all_backends().await {
        let ctx = TestContext::with_backend(backend);
        let alice = ctx.create_user("alice@x.com", "pw").await;
        let payload: Vec<u8> = (0..=255u8).cycle().take(4096).collect();

        let upload = Upload::new("photo.png", "image/png", payload.clone())
            .with_declared_size(payload.len() as u64);
        let meta = ctx.files.create(alice.id, upload).await.unwrap();
        assert_eq!(meta.size, 4096, "{name}");

        let file = FileRef::Composite(meta.file_id);
        let download = ctx.files.download(&file, &alice.id).await.unwrap();
        assert_eq!(download.data, payload, "{name}");
        assert_eq!(download.size, 4096, "{name}");
        assert_eq!(download.mimetype, "image/png", "{name}");
        assert_eq!(download.original_name, "photo.png", "{name}");
        assert_eq!(
            download.content_disposition(),
            "attachment; filename=\"photo.png\"",
            "{name}"
        );
    }
}

#[tokio::test]
async fn ownership_is_enforced_regardless_of_role() {
    for (name, backend) in all_backends().await {
        let ctx = TestContext::with_backend(backend);
        let alice = ctx.create_user("alice@x.com", "pw").await;
        let admin = ctx.create_admin("root@x.com", "pw").await;
        let upload = Upload::new("a.txt", "text/plain", b"secret".to_vec());
        let meta = ctx.files.create(alice.id, upload).await.unwrap();
        let file = FileRef::Internal(meta.id);

        let err = ctx.files.download(&file, &admin.id).await.unwrap_err();
        assert!(err.is_forbidden(), "{name}");
        let err = ctx.files.rename(&file, &admin.id, "x").await.unwrap_err();
        assert!(err.is_forbidden(), "{name}");
        let err = ctx.files.delete(&file, &admin.id).await.unwrap_err();
        assert!(err.is_forbidden(), "{name}");

        // Nothing changed
        let still = ctx.files.get(&file).await.unwrap();
        assert_eq!(still.meta.original_name, "a.txt", "{name}");
    }
}

#[tokio::test]
async fn rename_keeps_upload_date() {
    let ctx = TestContext::new().await;
    let alice = ctx.create_user("alice@x.com", "pw").await;
    let upload = Upload::new("a.txt", "text/plain", b"a".to_vec());
    let meta = ctx.files.create(alice.id, upload).await.unwrap();
    ctx.clock.advance(60_000);

    let file = FileRef::Internal(meta.id);
    let renamed = ctx.files.rename(&file, &alice.id, "b.txt").await.unwrap();
    assert_eq!(renamed.original_name, "b.txt");

    let stored = ctx.files.get(&file).await.unwrap();
    assert_eq!(stored.meta.original_name, "b.txt");
    assert_eq!(stored.meta.upload_date, meta.upload_date);
}

#[tokio::test]
async fn upload_over_limit_is_rejected_before_anything_is_stored() {
    for (name, backend) in all_backends().await {
        let ctx = TestContext::with_backend(backend);
        let alice = ctx.create_user("alice@x.com", "pw").await;

        let data = vec![0u8; MAX_UPLOAD_BYTES + 1];
        let upload = Upload::new("big.bin", BINARY, data);
        let err = ctx.files.create(alice.id, upload).await.unwrap_err();
        assert!(err.is_payload_too_large(), "{name}");
        let stored = ctx.files.list_by_owner(&alice.id).await.unwrap();
        assert!(stored.is_empty(), "{name}");

        // Exactly at the limit is accepted
        let data = vec![0u8; MAX_UPLOAD_BYTES];
        let upload = Upload::new("edge.bin", BINARY, data);
        ctx.files.create(alice.id, upload).await.unwrap();
    }
}

#[tokio::test]
async fn composite_ids_are_globally_unique() {
    let ctx = TestContext::new().await;
    let alice = ctx.create_user("alice@x.com", "pw").await;
    let bob = ctx.create_user("bob@x.com", "pw").await;

    let upload = Upload::new("a", "text/plain", b"a".to_vec());
    let a = ctx.files.create(alice.id, upload).await.unwrap();
    let upload = Upload::new("b", "text/plain", b"b".to_vec());
    let b = ctx.files.create(bob.id, upload).await.unwrap();

    assert_eq!(a.sequential_id, b.sequential_id);
    assert_ne!(a.file_id, b.file_id);
    assert_eq!(a.file_id, FileId::new(alice.id, 1));
    assert_eq!(b.file_id.to_string(), format!("{}_1", bob.id));
}
