use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;

/// How a drag vector maps onto striker velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotPolicy {
    /// Striker travels along the drag, speed capped at `max_speed`.
    #[default]
    Forward,
    /// Pull back and release: striker travels against the drag, uncapped.
    Reverse,
}

/// Who controls side two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Opponent {
    Human,
    #[default]
    Ai,
}

/// AI difficulty label, shared by the local bot and the remote planner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }
}

/// A ring of coins seeded around the board center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoinRing {
    pub count: u32,
    pub radius: f32,
}

/// Board geometry and per-role body constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Side length of the square board.
    pub size: f32,
    pub pocket_radius: f32,
    /// Distance of each pocket center from the two adjacent board edges.
    pub pocket_inset: f32,
    /// Striker start position. Also where it returns after a foul.
    pub baseline: Vec2,
    pub striker_radius: f32,
    pub striker_mass: f32,
    /// Inset from each edge that bounds the striker's center.
    pub striker_border: f32,
    pub coin_radius: f32,
    pub coin_mass: f32,
    pub coin_value: u32,
    pub coin_border: f32,
    pub queen_mass: f32,
    pub queen_value: u32,
    /// Coin rings around the queen, innermost first. Colors alternate.
    pub rings: Vec<CoinRing>,
    /// The bot prefers coins near this point (its "home" corner).
    pub ai_home: Vec2,
}

impl Default for BoardConfig {
    fn default() -> Self {
        let size = 600.0;
        Self {
            size,
            pocket_radius: 28.0,
            pocket_inset: 28.0,
            baseline: Vec2::new(size / 2.0, size * 0.83),
            striker_radius: 16.0,
            striker_mass: 2.0,
            striker_border: 20.0,
            coin_radius: 12.0,
            coin_mass: 1.0,
            coin_value: 10,
            coin_border: 18.0,
            queen_mass: 1.1,
            queen_value: 50,
            rings: vec![
                CoinRing {
                    count: 6,
                    radius: 26.0,
                },
                CoinRing {
                    count: 12,
                    radius: 51.0,
                },
            ],
            ai_home: Vec2::new(size - 70.0, size - 70.0),
        }
    }
}

/// Integration and contact constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Per-tick velocity multiplier for table friction.
    pub friction: f32,
    /// Second per-tick multiplier compounding with friction. 1.0 disables it.
    pub air_resistance: f32,
    /// Fraction of the normal velocity kept on a rail bounce.
    pub restitution: f32,
    /// Extra push beyond the penetration depth when separating bodies.
    pub separation_epsilon: f32,
    /// A body is at rest when both velocity components are below this.
    pub settle_threshold: f32,
    /// Consecutive rest ticks required before a turn resolves.
    pub settle_ticks: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            friction: 0.988,
            air_resistance: 0.9955,
            restitution: 0.82,
            separation_epsilon: 1.0,
            settle_threshold: 0.2,
            settle_ticks: 30,
        }
    }
}

/// Drag-to-velocity translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotConfig {
    pub policy: ShotPolicy,
    /// Forward policy: drag length that maps to full power.
    pub power_span: f32,
    /// Forward policy: speed at full power. Also the AI fallback's speed basis.
    pub max_speed: f32,
    /// Reverse policy: speed per unit of drag.
    pub reverse_scale: f32,
    /// Drags shorter than this are discarded.
    pub min_drag: f32,
    /// Drag length shown as a full power meter.
    pub meter_span: f32,
    /// A drag starts only within `striker_radius * grab_radius_factor`.
    pub grab_radius_factor: f32,
}

impl Default for ShotConfig {
    fn default() -> Self {
        Self {
            policy: ShotPolicy::Forward,
            power_span: 40.0,
            max_speed: 18.0,
            reverse_scale: 0.25,
            min_drag: 15.0,
            meter_span: 40.0,
            grab_radius_factor: 2.5,
        }
    }
}

/// Turn and match rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub opponent: Opponent,
    /// Match ends once a side reaches this score. `None` plays until the board is clear.
    pub target_score: Option<u32>,
    /// A side that pockets a coin shoots again.
    pub bonus_shot_on_capture: bool,
    /// Return the striker to the baseline whenever a turn resolves.
    pub reset_striker_after_shot: bool,
    pub difficulty: Difficulty,
    /// Seed for the bot and fallback shots. `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            opponent: Opponent::Ai,
            target_score: None,
            bonus_shot_on_capture: false,
            reset_striker_after_shot: false,
            difficulty: Difficulty::Normal,
            rng_seed: None,
        }
    }
}

/// Data-driven configuration for a carrom match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarromConfig {
    pub board: BoardConfig,
    pub physics: PhysicsConfig,
    pub shot: ShotConfig,
    pub rules: RulesConfig,
    /// Fixed simulation rate used when advancing by wall-clock time.
    pub tick_rate_hz: f32,
}

impl Default for CarromConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl CarromConfig {
    /// Single player against the AI. Forward flicks, heavier queen, no bonus
    /// shots, and the match runs until every coin is pocketed.
    pub fn classic() -> Self {
        Self {
            board: BoardConfig::default(),
            physics: PhysicsConfig::default(),
            shot: ShotConfig::default(),
            rules: RulesConfig::default(),
            tick_rate_hz: 60.0,
        }
    }

    /// Two players at one board. Pull-back shots, bonus shot on capture,
    /// first to 10 points.
    pub fn local() -> Self {
        let size = 600.0;
        Self {
            board: BoardConfig {
                pocket_inset: 40.0,
                baseline: Vec2::new(size / 2.0, size - 70.0),
                coin_value: 1,
                queen_value: 5,
                queen_mass: 1.0,
                rings: vec![CoinRing {
                    count: 7,
                    radius: 28.0,
                }],
                ..BoardConfig::default()
            },
            physics: PhysicsConfig {
                friction: 0.98,
                air_resistance: 1.0,
                restitution: 0.9,
                settle_threshold: 0.3,
                settle_ticks: 10,
                ..PhysicsConfig::default()
            },
            shot: ShotConfig {
                policy: ShotPolicy::Reverse,
                meter_span: 120.0,
                grab_radius_factor: 1.0,
                ..ShotConfig::default()
            },
            rules: RulesConfig {
                opponent: Opponent::Human,
                target_score: Some(10),
                bonus_shot_on_capture: true,
                reset_striker_after_shot: true,
                ..RulesConfig::default()
            },
            tick_rate_hz: 60.0,
        }
    }

    /// Load config from `CARROM_CONFIG` or `config/carrom.toml`, falling back
    /// to the classic preset.
    pub fn load() -> Self {
        let path =
            std::env::var("CARROM_CONFIG").unwrap_or_else(|_| "config/carrom.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(cfg) => {
                    tracing::info!(path, "Loaded carrom configuration");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    Self::classic()
                },
            },
            Err(_) => Self::classic(),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Check the configuration for values the simulation cannot honor.
    /// Returns one message per problem; empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let b = &self.board;
        let p = &self.physics;
        let s = &self.shot;

        if !(p.friction > 0.0 && p.friction < 1.0) {
            issues.push(format!("physics.friction must be in (0, 1), got {}", p.friction));
        }
        if !(p.air_resistance > 0.0 && p.air_resistance <= 1.0) {
            issues.push(format!(
                "physics.air_resistance must be in (0, 1], got {}",
                p.air_resistance
            ));
        }
        if !(0.0..=1.0).contains(&p.restitution) {
            issues.push(format!(
                "physics.restitution must be in [0, 1], got {}",
                p.restitution
            ));
        }
        if p.settle_threshold <= 0.0 {
            issues.push("physics.settle_threshold must be > 0".to_string());
        }
        if p.separation_epsilon < 0.0 {
            issues.push("physics.separation_epsilon must be >= 0".to_string());
        }

        if b.striker_radius <= 0.0 || b.coin_radius <= 0.0 {
            issues.push("board radii must be > 0".to_string());
        }
        if b.striker_mass <= b.coin_mass {
            issues.push(format!(
                "board.striker_mass ({}) must exceed board.coin_mass ({})",
                b.striker_mass, b.coin_mass
            ));
        }
        if b.coin_mass <= 0.0 || b.queen_mass <= 0.0 {
            issues.push("coin masses must be > 0".to_string());
        }
        if b.pocket_radius <= b.coin_radius {
            issues.push("board.pocket_radius must exceed board.coin_radius".to_string());
        }
        if b.striker_border < b.striker_radius || b.coin_border < b.coin_radius {
            issues.push("borders must be at least the body radius".to_string());
        }
        if b.size <= 2.0 * b.striker_border.max(b.coin_border) {
            issues.push("board.size is too small for its borders".to_string());
        }
        let lo = b.striker_border;
        let hi = b.size - b.striker_border;
        if !(lo..=hi).contains(&b.baseline.x) || !(lo..=hi).contains(&b.baseline.y) {
            issues.push("board.baseline lies outside the striker's playable area".to_string());
        }

        if s.max_speed <= 0.0 || s.power_span <= 0.0 || s.meter_span <= 0.0 {
            issues.push("shot spans and max_speed must be > 0".to_string());
        }
        if s.reverse_scale <= 0.0 {
            issues.push("shot.reverse_scale must be > 0".to_string());
        }
        if s.min_drag < 0.0 {
            issues.push("shot.min_drag must be >= 0".to_string());
        }
        if self.tick_rate_hz <= 0.0 {
            issues.push("tick_rate_hz must be > 0".to_string());
        }

        issues
    }
}
