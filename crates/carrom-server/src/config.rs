use serde::Deserialize;

/// Top-level server configuration, loaded from `carrom-server.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Static files for the browser client.
    pub web_root: String,
    pub leaderboard: LeaderboardConfig,
    pub ai: AiConfig,
    /// Largest accepted request body.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            web_root: "web".to_string(),
            leaderboard: LeaderboardConfig::default(),
            ai: AiConfig::default(),
            max_body_bytes: 64 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    /// JSON file the leaderboard is persisted to. `None` keeps it in memory.
    pub path: Option<String>,
    pub capacity: usize,
    pub max_name_chars: usize,
    pub max_mode_chars: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            path: Some("scores.json".to_string()),
            capacity: 10,
            max_name_chars: 24,
            max_mode_chars: 32,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Requests with more coins than this are rejected.
    pub max_coins: usize,
    /// Fixed seed for planner noise, for reproducible runs.
    pub rng_seed: Option<u64>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            max_coins: 64,
            rng_seed: None,
        }
    }
}

impl ServerConfig {
    /// Problems that should stop the server from starting.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            issues.push(format!(
                "listen_addr {:?} is not a valid socket address",
                self.listen_addr
            ));
        }
        if self.leaderboard.capacity == 0 {
            issues.push("leaderboard.capacity must be > 0".to_string());
        }
        if self.leaderboard.max_name_chars == 0 {
            issues.push("leaderboard.max_name_chars must be > 0".to_string());
        }
        if self.ai.max_coins == 0 {
            issues.push("ai.max_coins must be > 0".to_string());
        }
        if self.max_body_bytes < 1024 {
            issues.push("max_body_bytes must be at least 1024".to_string());
        }
        issues
    }

    /// Load config from `carrom-server.toml` if it exists, then apply env var
    /// overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string("carrom-server.toml") {
            Ok(content) => match toml::from_str::<ServerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from carrom-server.toml");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse carrom-server.toml: {e}, using defaults");
                    ServerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No carrom-server.toml found, using defaults");
                ServerConfig::default()
            },
        };

        if let Ok(addr) = std::env::var("CARROM_LISTEN_ADDR")
            && !addr.is_empty()
        {
            config.listen_addr = addr;
        }
        if let Ok(root) = std::env::var("CARROM_WEB_ROOT")
            && !root.is_empty()
        {
            config.web_root = root;
        }
        if let Ok(path) = std::env::var("CARROM_SCORES_PATH") {
            // Empty disables persistence.
            config.leaderboard.path = (!path.is_empty()).then_some(path);
        }
        if let Ok(val) = std::env::var("CARROM_LEADERBOARD_CAPACITY")
            && let Ok(n) = val.parse::<usize>()
        {
            config.leaderboard.capacity = n;
        }
        if let Ok(val) = std::env::var("CARROM_AI_SEED")
            && let Ok(n) = val.parse::<u64>()
        {
            config.ai.rng_seed = Some(n);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.listen_addr, "0.0.0.0:8080");
        assert_eq!(cfg.leaderboard.capacity, 10);
        assert_eq!(cfg.leaderboard.path.as_deref(), Some("scores.json"));
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn parse_minimal_toml() {
        let toml_str = r#"
listen_addr = "127.0.0.1:9090"

[leaderboard]
path = "/var/lib/carrom/scores.json"
capacity = 25

[ai]
rng_seed = 7
"#;
        let cfg: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.listen_addr, "127.0.0.1:9090");
        assert_eq!(cfg.leaderboard.capacity, 25);
        assert_eq!(cfg.leaderboard.max_name_chars, 24, "unset fields keep defaults");
        assert_eq!(cfg.ai.rng_seed, Some(7));
        assert_eq!(cfg.web_root, "web");
    }

    #[test]
    fn validate_flags_bad_values() {
        let cfg = ServerConfig {
            listen_addr: "not an addr".to_string(),
            leaderboard: LeaderboardConfig {
                capacity: 0,
                ..LeaderboardConfig::default()
            },
            ..ServerConfig::default()
        };
        let issues = cfg.validate();
        assert_eq!(issues.len(), 2, "{issues:?}");
    }
}
