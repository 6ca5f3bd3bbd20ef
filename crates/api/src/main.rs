//! `pothole-api` -- the authority holding the shared pothole collection.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pothole_api::config::ServerConfig;
use pothole_api::report::{regular_font_path, reports_enabled};
use pothole_api::router::build_app_router;
use pothole_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pothole_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    let addr = config.bind_addr().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid bind address");
        std::process::exit(1);
    });
    tracing::info!(
        %addr,
        data_dir = %config.data_dir.display(),
        reports = reports_enabled(),
        "Loaded server configuration",
    );
    check_report_fonts(&config);

    let app = build_app_router(AppState::new(config.clone()), &config);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "Authority listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server stopped with an error");
        std::process::exit(1);
    }
    tracing::info!("Shut down cleanly");
}

fn check_report_fonts(config: &ServerConfig) {
    if !reports_enabled() {
        tracing::info!("Built without the `report` feature; /generate_pdf answers 501");
        return;
    }
    match regular_font_path(&config.report_fonts()) {
        Some(font) if !font.exists() => {
            tracing::warn!(path = %font.display(), "Report font missing; /generate_pdf will fail");
        }
        Some(font) => tracing::info!(path = %font.display(), "Using report fonts from disk"),
        None => tracing::debug!("Using embedded report fonts"),
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!("Interrupted, shutting down"),
        () = terminate => tracing::info!("Terminated, shutting down"),
    }
}
