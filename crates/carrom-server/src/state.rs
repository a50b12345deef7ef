use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{Mutex, RwLock};

use carrom_core::config::CarromConfig;

use crate::config::ServerConfig;
use crate::score_store::ScoreStore;

pub type SharedScoreStore = Arc<RwLock<ScoreStore>>;

#[derive(Clone)]
pub struct AppState {
    pub scores: SharedScoreStore,
    /// Held from leaderboard update through the file write, so writes land in
    /// update order.
    pub persist: Arc<Mutex<()>>,
    /// Board and physics constants the planner simulates with.
    pub game: Arc<CarromConfig>,
    /// Seeds per-request planner RNGs.
    pub rng: Arc<Mutex<StdRng>>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig, game: CarromConfig) -> Self {
        let store = match &config.leaderboard.path {
            Some(path) => ScoreStore::open(path, config.leaderboard.capacity),
            None => ScoreStore::in_memory(config.leaderboard.capacity),
        };
        let rng = match config.ai.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            scores: Arc::new(RwLock::new(store)),
            persist: Arc::new(Mutex::new(())),
            game: Arc::new(game),
            rng: Arc::new(Mutex::new(rng)),
            config: Arc::new(config),
        }
    }
}
