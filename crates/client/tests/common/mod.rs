#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use pothole_api::config::ServerConfig;
use pothole_api::router::build_app_router;
use pothole_api::state::AppState;
use pothole_client::api::AuthorityApi;
use pothole_client::store::CollectionStore;

/// A real authority served on an ephemeral local port.
pub struct TestAuthority {
    pub base_url: String,
    /// Holds the data directory for the lifetime of the test.
    pub data_dir: TempDir,
}

pub async fn spawn_authority() -> TestAuthority {
    let data_dir = tempfile::tempdir().expect("tempdir");
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        data_dir: data_dir.path().to_path_buf(),
        report_font_dir: None,
        report_font_name: "DejaVuSans".to_string(),
    };
    let app = build_app_router(AppState::new(config.clone()), &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("authority server");
    });

    TestAuthority {
        base_url: format!("http://{addr}"),
        data_dir,
    }
}

pub fn api_client(base_url: &str) -> AuthorityApi {
    AuthorityApi::new(base_url, Duration::from_secs(10)).expect("http client")
}

pub fn store_for(base_url: &str) -> CollectionStore<AuthorityApi> {
    CollectionStore::new(Arc::new(api_client(base_url)))
}
