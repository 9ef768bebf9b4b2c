use std::net::SocketAddr;
use std::process::ExitCode;

use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::auth::AdminCredentials;
use crate::library::Catalog;
use crate::server::{self, AppState};

mod logging;
mod settings;
mod startup;

use startup::StartupError;

/// Start the server and run until interrupted.
///
/// Every startup failure is logged and mapped onto its own exit status.
pub async fn run() -> ExitCode {
    logging::init();

    match serve().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "trackshelf: fatal startup error");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn serve() -> Result<(), StartupError> {
    let settings = settings::load_settings()?;
    info!(?settings, "config loaded");

    let (store, tracks) = startup::load_catalog(&settings)?;
    info!(tracks = tracks.len(), data_dir = %store.root().display(), "catalog loaded");

    let state = AppState {
        store,
        catalog: Catalog::new(tracks),
        admin: AdminCredentials::new(&settings.admin_username, &settings.admin_password),
        pages_dir: settings.pages_dir.clone(),
        max_upload_bytes: settings.max_upload_bytes,
    };

    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind { addr: addr.clone(), source })?;

    let local: Option<SocketAddr> = listener.local_addr().ok();
    info!(addr = ?local, "listening");

    axum::serve(listener, server::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler the server simply runs until killed.
        warn!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
