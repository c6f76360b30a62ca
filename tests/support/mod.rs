//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use tempfile::TempDir;
use tinypaste::commands::serve::router;
use tinypaste::config::Config;
use tinypaste::db::Database;
use tinypaste::App;

pub fn test_config(temp_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.port = 0;
    config.database.url = format!(
        "sqlite://{}?mode=rwc",
        temp_dir.path().join("test.db").display()
    );
    config
}

pub async fn test_server_with_database(config: Config) -> (TestServer, Database) {
    let database = Database::connect(&config.database.url, config.database.max_connections)
        .await
        .expect("open db");
    database.migrate().await.expect("migrate");
    let server = TestServer::new(router(App::new(config, database.clone()))).expect("server");
    (server, database)
}

pub async fn test_server_for_config(config: Config) -> TestServer {
    test_server_with_database(config).await.0
}

pub async fn setup_test_server() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let config = test_config(&temp_dir);
    let server = test_server_for_config(config).await;
    (server, temp_dir)
}
