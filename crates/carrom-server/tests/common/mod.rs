use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use carrom_core::config::CarromConfig;
use carrom_server::build_app;
use carrom_server::config::{LeaderboardConfig, ServerConfig};

pub struct TestServer {
    pub addr: SocketAddr,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a test server with an in-memory leaderboard.
    pub async fn new() -> Self {
        let config = ServerConfig {
            leaderboard: LeaderboardConfig {
                path: None,
                ..LeaderboardConfig::default()
            },
            ..ServerConfig::default()
        };
        Self::from_config(config).await
    }

    /// Start a test server persisting its leaderboard to `path`.
    pub async fn with_scores_file(path: &std::path::Path) -> Self {
        let config = ServerConfig {
            leaderboard: LeaderboardConfig {
                path: Some(path.to_string_lossy().into_owned()),
                ..LeaderboardConfig::default()
            },
            ..ServerConfig::default()
        };
        Self::from_config(config).await
    }

    pub async fn from_config(mut config: ServerConfig) -> Self {
        config.ai.rng_seed = Some(1);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (app, _state) = build_app(config, CarromConfig::classic());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            _shutdown: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url())
    }
}

/// A unique path under the system temp dir.
pub fn temp_scores_path(tag: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "carrom-it-{tag}-{}-{n}.json",
        std::process::id()
    ))
}

/// JSON body for a score submission.
pub fn score_body(name: &str, score: u32) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "score": score,
        "shots": 12,
        "mode": "classic",
        "time_secs": 95.5,
    })
}
