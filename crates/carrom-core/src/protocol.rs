use serde::{Deserialize, Serialize};

use crate::body::{Body, BodyKind, BodyStatus};
use crate::config::{BoardConfig, Difficulty};
use crate::geometry::Vec2;

/// Maximum encoded snapshot size in bytes.
pub const MAX_SNAPSHOT_SIZE: usize = 64 * 1024; // 64 KiB

#[derive(Debug)]
pub enum ProtocolError {
    PayloadTooLarge(usize),
    SerializeError(String),
    DeserializeError(String),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PayloadTooLarge(size) => {
                write!(
                    f,
                    "payload too large: {size} bytes (max {MAX_SNAPSHOT_SIZE})"
                )
            },
            Self::SerializeError(e) => write!(f, "serialize error: {e}"),
            Self::DeserializeError(e) => write!(f, "deserialize error: {e}"),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Encode a snapshot for a renderer or a remote observer as msgpack.
pub fn encode_snapshot<T: Serialize>(snapshot: &T) -> Result<Vec<u8>, ProtocolError> {
    let bytes =
        rmp_serde::to_vec(snapshot).map_err(|e| ProtocolError::SerializeError(e.to_string()))?;
    if bytes.len() > MAX_SNAPSHOT_SIZE {
        return Err(ProtocolError::PayloadTooLarge(bytes.len()));
    }
    Ok(bytes)
}

pub fn decode_snapshot<T: for<'de> Deserialize<'de>>(data: &[u8]) -> Result<T, ProtocolError> {
    if data.len() > MAX_SNAPSHOT_SIZE {
        return Err(ProtocolError::PayloadTooLarge(data.len()));
    }
    rmp_serde::from_slice(data).map_err(|e| ProtocolError::DeserializeError(e.to_string()))
}

/// A disc as it travels over the AI decision API. Flat fields so a browser
/// client can post its own board state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscState {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub vx: f32,
    #[serde(default)]
    pub vy: f32,
    pub radius: f32,
    pub mass: f32,
    #[serde(default)]
    pub value: u32,
    #[serde(default)]
    pub pocketed: bool,
    #[serde(default)]
    pub kind: Option<BodyKind>,
}

impl From<&Body> for DiscState {
    fn from(body: &Body) -> Self {
        Self {
            x: body.position.x,
            y: body.position.y,
            vx: body.velocity.x,
            vy: body.velocity.y,
            radius: body.radius,
            mass: body.mass,
            value: body.value,
            pocketed: body.status == BodyStatus::Captured,
            kind: Some(body.kind),
        }
    }
}

impl DiscState {
    /// Rebuild a body for simulation. Kind defaults to striker or white coin;
    /// borders come from `board`, everything else from the wire.
    pub fn to_body(&self, is_striker: bool, board: &BoardConfig) -> Body {
        let position = Vec2::new(self.x, self.y);
        let mut body = if is_striker {
            Body {
                position,
                ..Body::striker(board)
            }
        } else {
            let kind = self.kind.filter(|k| k.is_coin()).unwrap_or(BodyKind::White);
            Body::coin(kind, position, board)
        };
        body.velocity = Vec2::new(self.vx, self.vy);
        if self.radius > 0.0 {
            body.radius = self.radius;
        }
        if self.mass > 0.0 {
            body.mass = self.mass;
        }
        if !is_striker {
            body.value = self.value;
        }
        if self.pocketed && !is_striker {
            body.status = BodyStatus::Captured;
        }
        body
    }
}

/// Body of `POST /api/v1/ai-shot`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiShotRequest {
    pub striker: DiscState,
    pub coins: Vec<DiscState>,
    #[serde(default)]
    pub difficulty: Difficulty,
}

/// Striker velocity chosen by a decision source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiShotResponse {
    pub vx: f32,
    pub vy: f32,
}

impl AiShotResponse {
    pub fn velocity(self) -> Vec2 {
        Vec2::new(self.vx, self.vy)
    }
}

impl From<Vec2> for AiShotResponse {
    fn from(v: Vec2) -> Self {
        Self { vx: v.x, vy: v.y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disc_state_preserves_coin_fields() {
        let board = BoardConfig::default();
        let mut queen = Body::coin(BodyKind::Queen, Vec2::new(100.0, 200.0), &board);
        queen.velocity = Vec2::new(1.5, -2.0);
        let wire = DiscState::from(&queen);
        let back = wire.to_body(false, &board);
        assert_eq!(back, queen);
    }

    #[test]
    fn minimal_browser_payload_parses() {
        let json = r#"{
            "striker": {"x": 300, "y": 498, "vx": 0, "vy": 0, "radius": 16, "mass": 2},
            "coins": [
                {"x": 300, "y": 300, "vx": 0, "vy": 0, "radius": 12, "mass": 1.1,
                 "value": 50, "pocketed": false},
                {"x": 28, "y": 28, "radius": 12, "mass": 1, "value": 10, "pocketed": true}
            ],
            "difficulty": "hard"
        }"#;
        let req: AiShotRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.difficulty, Difficulty::Hard);
        assert_eq!(req.coins.len(), 2);
        let board = BoardConfig::default();
        let striker = req.striker.to_body(true, &board);
        assert!(striker.kind.is_striker());
        assert_eq!(striker.position, Vec2::new(300.0, 498.0));
        assert_eq!(striker.border, board.striker_border);
        let pocketed = req.coins[1].to_body(false, &board);
        assert!(!pocketed.is_active());
        assert_eq!(pocketed.value, 10);
    }

    #[test]
    fn coin_tagged_as_striker_becomes_white() {
        let board = BoardConfig::default();
        let wire = DiscState {
            x: 200.0,
            y: 210.0,
            vx: 1.0,
            vy: 0.0,
            radius: 0.0,
            mass: 0.0,
            value: 10,
            pocketed: false,
            kind: Some(BodyKind::Striker),
        };
        let coin = wire.to_body(false, &board);
        assert_eq!(coin.kind, BodyKind::White);
        assert_eq!(coin.mass, board.coin_mass);
        assert_eq!(coin.border, board.coin_border);
        assert_eq!(coin.velocity, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn difficulty_defaults_to_normal() {
        let json = r#"{"striker": {"x": 1, "y": 1, "radius": 16, "mass": 2}, "coins": []}"#;
        let req: AiShotRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.difficulty, Difficulty::Normal);
    }

    #[test]
    fn snapshot_roundtrip_and_garbage() {
        let board = BoardConfig::default();
        let body = Body::striker(&board);
        let bytes = encode_snapshot(&body).unwrap();
        let back: Body = decode_snapshot(&bytes).unwrap();
        assert_eq!(back, body);
        assert!(decode_snapshot::<Body>(&[0xc1, 0x00]).is_err());
    }
}
