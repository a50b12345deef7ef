pub mod client;
pub mod config;
pub mod driver;

pub use client::{AdvisorError, RemoteAdvisor, ShotAdvisor};
pub use config::RemoteAiConfig;
pub use driver::{AiTurnDriver, DriverEvent};
