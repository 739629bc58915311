use super::event::GameEvent;
use super::session::GameSession;
use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Bumped whenever an event variant changes shape.
pub const EVENT_LOG_VERSION: u32 = 2;

/// Persistable form of a session: the ordered event log plus the seed that
/// fed the shuffles, so a restored session keeps dealing the same way.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventLog {
    #[serde(default = "default_version")]
    pub version: u32,
    pub seed: u64,
    pub events: Vec<GameEvent>,
}

fn default_version() -> u32 {
    EVENT_LOG_VERSION
}

impl EventLog {
    pub fn capture(session: &GameSession) -> Self {
        EventLog {
            version: EVENT_LOG_VERSION,
            seed: session.seed(),
            events: session.events().to_vec(),
        }
    }

    /// Replays the log through a fresh engine seeded with the recorded seed.
    pub fn restore(&self) -> Result<GameSession, EngineError> {
        GameSession::replay_with_seed(self.seed, &self.events)
    }

    pub fn to_json(session: &GameSession) -> serde_json::Result<String> {
        let log = Self::capture(session);
        serde_json::to_string_pretty(&log)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// One event per line, for streaming consumers.
    pub fn to_json_lines(&self) -> serde_json::Result<String> {
        let mut out = String::new();
        for event in &self.events {
            out.push_str(&serde_json::to_string(event)?);
            out.push('\n');
        }
        Ok(out)
    }
}
