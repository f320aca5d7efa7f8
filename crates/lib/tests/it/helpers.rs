use std::sync::Arc;

use filedesk::{
    FixedClock,
    backend::{Backend, database::InMemory},
    files::FileStore,
    session::MemorySessionStore,
    user::{CredentialStore, NewUser, Role, User},
};

/// Creates a test backend based on the TEST_BACKEND env var.
///
/// Supported values:
/// - "inmemory" or unset: InMemory backend (default)
/// - "sqlite": SQLite in-memory backend (requires `sqlite` feature)
/// - "postgres": PostgreSQL backend in an isolated schema (requires `postgres`
///   feature and TEST_POSTGRES_URL)
///
/// ```bash
/// TEST_BACKEND=sqlite cargo test
/// TEST_BACKEND=postgres TEST_POSTGRES_URL="postgres://localhost/filedesk_test" cargo test
/// ```
pub async fn test_backend() -> Arc<dyn Backend> {
    match std::env::var("TEST_BACKEND").as_deref() {
        Ok("sqlite") => {
            #[cfg(feature = "sqlite")]
            {
                Arc::new(
                    filedesk::backend::database::Sqlite::sqlite_in_memory()
                        .await
                        .expect("Failed to create SQLite backend"),
                )
            }
            #[cfg(not(feature = "sqlite"))]
            {
                panic!("TEST_BACKEND=sqlite requires the 'sqlite' feature to be enabled")
            }
        }
        Ok("postgres") => {
            #[cfg(feature = "postgres")]
            {
                let url = std::env::var("TEST_POSTGRES_URL")
                    .unwrap_or_else(|_| "postgres://localhost/filedesk_test".to_string());
                Arc::new(
                    filedesk::backend::database::Postgres::connect_postgres_isolated(&url)
                        .await
                        .expect("Failed to connect to PostgreSQL"),
                )
            }
            #[cfg(not(feature = "postgres"))]
            {
                panic!("TEST_BACKEND=postgres requires the 'postgres' feature to be enabled")
            }
        }
        _ => Arc::new(InMemory::new()),
    }
}

/// Every backend these tests can always run against, labelled for assertion messages.
pub async fn all_backends() -> Vec<(&'static str, Arc<dyn Backend>)> {
    let mut backends: Vec<(&'static str, Arc<dyn Backend>)> =
        vec![("inmemory", Arc::new(InMemory::new()))];
    #[cfg(feature = "sqlite")]
    backends.push((
        "sqlite",
        Arc::new(
            filedesk::backend::database::Sqlite::sqlite_in_memory()
                .await
                .expect("Failed to create SQLite backend"),
        ),
    ));
    backends
}

/// The stores a request handler works with, sharing one backend and clock.
pub struct TestContext {
    pub backend: Arc<dyn Backend>,
    pub clock: Arc<FixedClock>,
    pub users: CredentialStore,
    pub files: FileStore,
    pub sessions: MemorySessionStore,
}

impl TestContext {
    pub fn with_backend(backend: Arc<dyn Backend>) -> Self {
        let clock = Arc::new(FixedClock::default());
        Self {
            users: CredentialStore::new(backend.clone(), clock.clone()),
            files: FileStore::new(backend.clone(), clock.clone()),
            sessions: MemorySessionStore::new(clock.clone()),
            backend,
            clock,
        }
    }

    pub async fn new() -> Self {
        Self::with_backend(test_backend().await)
    }

    pub async fn create_user(&self, email: &str, password: &str) -> User {
        self.users
            .create(NewUser::new(email, password, Role::User))
            .await
            .expect("Failed to create user")
    }

    pub async fn create_admin(&self, email: &str, password: &str) -> User {
        self.users
            .create(NewUser::new(email, password, Role::Admin))
            .await
            .expect("Failed to create admin")
    }
}
