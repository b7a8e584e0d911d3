use box_sdk::{BoxApiConnection, BoxConfig};
use wiremock::MockServer;

#[allow(dead_code)]
pub const TOKEN: &str = "test-token";

/// A mock Box API plus a connection pointed at it. Uploads go to `/upload/`.
pub async fn setup() -> (MockServer, BoxApiConnection) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let server = MockServer::start().await;
    let mut cfg = BoxConfig::default();
    cfg.api.base_url = format!("{}/", server.uri());
    cfg.api.base_upload_url = format!("{}/upload/", server.uri());
    cfg.api.access_token = TOKEN.to_owned();
    let api = BoxApiConnection::from_config(&cfg).expect("connection");
    (server, api)
}
