use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;

use posture_guard::config::{AnalysisConfig, Config};
use posture_guard::routes::build_router;
use posture_guard::state::AppState;
use posture_guard::store::Store;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
    _temp_dir: TempDir,
}

async fn spawn_with_analysis(analysis: AnalysisConfig) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let sled_path = temp_dir.path().join("posture-test.sled");

    // Built directly so parallel tests never race on process env vars.
    let config = Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 3000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        sled_path: sled_path.to_string_lossy().to_string(),
        cors_origin: "http://localhost:5173".to_string(),
        analysis,
    };

    let store = Arc::new(Store::open(&config.sled_path).expect("open store"));
    store.run_migrations().expect("run migrations");

    let state = AppState::new(store, &config);
    let app = build_router(state.clone());

    TestApp {
        app,
        state,
        config,
        _temp_dir: temp_dir,
    }
}

pub async fn spawn_test_server() -> TestApp {
    spawn_with_analysis(AnalysisConfig::default()).await
}

pub async fn spawn_test_server_with_frame_limit(max_frames_per_request: usize) -> TestApp {
    spawn_with_analysis(AnalysisConfig {
        max_frames_per_request,
        ..AnalysisConfig::default()
    })
    .await
}
