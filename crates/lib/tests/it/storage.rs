//! Backend trait behaviour, checked against every available implementation.

use std::sync::Arc;

use chrono::Utc;
use filedesk::{
    Error,
    backend::{Backend, BackendError, FileOrder, database::InMemory},
    files::{FileMeta, StoredFile},
    ids::FileId,
    user::{Role, User},
};
use uuid::Uuid;

use crate::helpers::all_backends;

fn user(user_id: i64, email: &str) -> User {
    User {
        id: Uuid::new_v4(),
        user_id,
        email: email.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        role: Role::User,
        created_at: Utc::now(),
    }
}

fn file(owner: Uuid, sequential_id: i64, name: &str, upload_millis: i64) -> StoredFile {
    StoredFile {
        meta: FileMeta {
            id: Uuid::new_v4(),
            file_id: FileId::new(owner, sequential_id),
            sequential_id,
            original_name: name.to_string(),
            mimetype: "application/octet-stream".to_string(),
            size: 4,
            uploaded_by: owner,
            upload_date: filedesk::clock::millis_to_datetime(upload_millis),
        },
        data: vec![1, 2, 3, 4],
    }
}

#[tokio::test]
async fn sequences_start_at_one_and_are_scoped() {
    for (name, backend) in all_backends().await {
        assert_eq!(backend.next_sequence("users").await.unwrap(), 1, "{name}");
        assert_eq!(backend.next_sequence("users").await.unwrap(), 2, "{name}");
        assert_eq!(backend.next_sequence("files:a").await.unwrap(), 1, "{name}");
        assert_eq!(backend.next_sequence("users").await.unwrap(), 3, "{name}");
    }
}

async fn next_race_value(backend: Arc<dyn Backend>) -> i64 {
    backend.next_sequence("race").await.unwrap()
}

async fn allocate_concurrently(backend: Arc<dyn Backend>) -> Vec<i64> {
    let mut handles = Vec::new();
    for _ in 0..20 {
        handles.push(tokio::spawn(next_race_value(backend.clone())));
    }
    let mut values = Vec::new();
    for handle in handles {
        values.push(handle.await.unwrap());
    }
    values.sort();
    values
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sequence_allocation_never_repeats() {
    let expected: Vec<i64> = (1..=20).collect();
    let in_memory = Arc::new(InMemory::new());
    assert_eq!(allocate_concurrently(in_memory).await, expected);

    #[cfg(feature = "sqlite")]
    {
        use filedesk::backend::database::Sqlite;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("race.db");
        let backend = Sqlite::open_sqlite(path).await.unwrap();
        assert_eq!(allocate_concurrently(Arc::new(backend)).await, expected);
    }
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    for (name, backend) in all_backends().await {
        backend.insert_user(user(1, "alice@x.com")).await.unwrap();
        let err = backend
            .insert_user(user(2, "alice@x.com"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, Error::Backend(BackendError::DuplicateEmail { .. })),
            "{name}: {err:?}"
        );
        // Case-sensitive: a differently cased email is a different account
        backend.insert_user(user(3, "ALICE@x.com")).await.unwrap();
        assert_eq!(backend.count_users().await.unwrap(), 2, "{name}");
    }
}

#[tokio::test]
async fn users_list_by_sequential_id() {
    for (name, backend) in all_backends().await {
        backend.insert_user(user(2, "b@x.com")).await.unwrap();
        backend.insert_user(user(1, "a@x.com")).await.unwrap();
        let ids: Vec<i64> = backend
            .list_users()
            .await
            .unwrap()
            .iter()
            .map(|u| u.user_id)
            .collect();
        assert_eq!(ids, [1, 2], "{name}");

        let found = backend.find_user_by_email("b@x.com").await.unwrap().unwrap();
        assert_eq!(found.user_id, 2, "{name}");
        assert!(backend.delete_user(&found.id).await.unwrap(), "{name}");
        assert!(!backend.delete_user(&found.id).await.unwrap(), "{name}");
        let gone = backend.get_user(&found.id).await.unwrap();
        assert!(gone.is_none(), "{name}");
    }
}

#[tokio::test]
async fn file_round_trip_and_ordering() {
    for (name, backend) in all_backends().await {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let older = file(owner, 1, "older", 1_000);
        let newer = file(owner, 2, "newer", 2_000);
        backend.insert_file(older.clone()).await.unwrap();
        backend.insert_file(newer.clone()).await.unwrap();
        let theirs = file(other, 1, "theirs", 3_000);
        backend.insert_file(theirs).await.unwrap();

        let fetched = backend.get_file(&older.meta.id).await.unwrap().unwrap();
        assert_eq!(fetched, older, "{name}");
        let composite = newer.meta.file_id;
        let by_composite = backend.find_file(&composite).await.unwrap().unwrap();
        assert_eq!(by_composite.meta.id, newer.meta.id, "{name}");

        let newest_first: Vec<String> = backend
            .list_files(&owner, FileOrder::NewestFirst)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.original_name)
            .collect();
        assert_eq!(newest_first, ["newer", "older"], "{name}");

        let sequential: Vec<i64> = backend
            .list_files(&owner, FileOrder::Sequential)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.sequential_id)
            .collect();
        assert_eq!(sequential, [1, 2], "{name}");

        assert_eq!(backend.count_files().await.unwrap(), 3, "{name}");
        assert_eq!(backend.count_files_by_owner(&owner).await.unwrap(), 2, "{name}");
    }
}

#[tokio::test]
async fn duplicate_file_id_is_a_conflict() {
    for (name, backend) in all_backends().await {
        let owner = Uuid::new_v4();
        backend.insert_file(file(owner, 1, "a", 0)).await.unwrap();
        let duplicate = file(owner, 1, "b", 0);
        let err = backend.insert_file(duplicate).await.unwrap_err();
        assert!(err.is_validation_error(), "{name}: {err:?}");
    }
}

#[tokio::test]
async fn rename_and_delete() {
    for (name, backend) in all_backends().await {
        let owner = Uuid::new_v4();
        let stored = file(owner, 1, "before", 5_000);
        backend.insert_file(stored.clone()).await.unwrap();

        let id = stored.meta.id;
        assert!(backend.rename_file(&id, "after").await.unwrap(), "{name}");
        let renamed = backend.get_file(&id).await.unwrap().unwrap();
        assert_eq!(renamed.meta.original_name, "after", "{name}");
        let uploaded = stored.meta.upload_date;
        assert_eq!(renamed.meta.upload_date, uploaded, "{name}");

        assert!(backend.delete_file(&id).await.unwrap(), "{name}");
        assert!(!backend.delete_file(&id).await.unwrap(), "{name}");
        assert!(!backend.rename_file(&id, "gone").await.unwrap(), "{name}");
    }
}

#[tokio::test]
async fn delete_files_by_owner_leaves_others() {
    for (name, backend) in all_backends().await {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        backend.insert_file(file(owner, 1, "a", 0)).await.unwrap();
        backend.insert_file(file(owner, 2, "b", 0)).await.unwrap();
        backend.insert_file(file(other, 1, "c", 0)).await.unwrap();

        assert_eq!(backend.delete_files_by_owner(&owner).await.unwrap(), 2, "{name}");
        assert_eq!(backend.count_files().await.unwrap(), 1, "{name}");
    }
}

#[tokio::test]
async fn kind_names_the_engine() {
    for (name, backend) in all_backends().await {
        assert_eq!(backend.kind(), name);
    }
}
