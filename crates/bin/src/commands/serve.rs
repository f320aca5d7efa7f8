//! Serve command - runs the filedesk web server.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use filedesk::{
    Clock, SystemClock,
    backend::database::InMemory,
    files::FileStore,
    session::{MemorySessionStore, SessionStore},
    user::CredentialStore,
};
use tokio::signal::unix::{SignalKind, signal};

use crate::backend::{SNAPSHOT_FILE, backend_label, create_backend, data_dir};
use crate::cli::ServeArgs;
use crate::session::cookie_key;
use crate::web::{AppState, build_router, cors_layer};

/// How often expired sessions are swept out of the store
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Run the filedesk server
pub async fn run(args: &ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let backend = create_backend(&args.backend_config).await?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new(clock.clone()));
    let app_state = AppState {
        backend: backend.clone(),
        users: CredentialStore::new(backend.clone(), clock.clone()),
        files: FileStore::new(backend.clone(), clock),
        sessions: sessions.clone(),
        cookie_key: cookie_key(args.session_secret.as_deref()),
        api_require_session: args.api_require_session,
    };

    if !args.api_require_session {
        tracing::warn!(
            "The /api routes accept requests without a session; pass --api-require-session to require login"
        );
    }

    let app = build_router(app_state, cors_layer(&args.frontend_url)?);

    // Expired sessions are dropped lazily on lookup; this catches abandoned ones
    let sweeper = tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            match sessions.purge_expired().await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "Purged expired sessions"),
                Err(e) => tracing::warn!("Failed to purge expired sessions: {e}"),
            }
        }
    });

    // Bind server
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    // Print startup message
    println!("filedesk server started");
    println!();
    println!("Web Interface: http://localhost:{}", local_addr.port());
    println!("Storage:       {}", backend_label(&args.backend_config));
    println!();
    println!("Available endpoints:");
    println!("  GET  /login, /register      - Sign in / create an account");
    println!("  GET  /user/dashboard        - Your files (requires login)");
    println!("  POST /upload                - Upload a file (multipart field 'file')");
    println!("  GET  /download/{{fileId}}     - Download one of your files");
    println!("  GET  /admin/dashboard       - Admin console (requires admin)");
    println!("  *    /api/users, /api/files - JSON API");
    println!("  GET  /health                - Health check");
    println!();
    println!("Press Ctrl+C to shutdown");

    let snapshot_path = data_dir(&args.backend_config).join(SNAPSHOT_FILE);

    // Start server with graceful shutdown
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to set up SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("failed to set up SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => tracing::info!("Received SIGTERM, shutting down"),
            _ = sigint.recv() => tracing::info!("Received SIGINT, shutting down"),
        }

        sweeper.abort();

        // Save database on shutdown (only needed for InMemory backend)
        if let Some(in_memory_backend) = backend.as_any().downcast_ref::<InMemory>() {
            match in_memory_backend.save_to_file(&snapshot_path).await {
                Ok(_) => {
                    tracing::info!("Database saved to {}", snapshot_path.display());
                    println!("\nDatabase saved successfully");
                }
                Err(e) => {
                    tracing::error!("Failed to save database: {e:?}");
                    eprintln!("Failed to save database: {e:?}");
                }
            }
        }
    })
    .await?;

    println!("Server shut down");
    Ok(())
}
