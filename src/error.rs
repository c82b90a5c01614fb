//! Error types for the fantasy insights CLI

use thiserror::Error;

use crate::cli::types::Platform;

pub type Result<T> = std::result::Result<T, InsightsError>;

#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("No league selected: pass --league-id, set {env_var}, or link an account")]
    MissingLeague { env_var: String },

    #[error("No team selected: pass --team-id, set {env_var}, or link an account with a team")]
    MissingTeam { env_var: String },

    #[error("No account labelled '{label}' is linked")]
    UnknownAccount { label: String },

    #[error("Failed to parse number: {0}")]
    InvalidNumber(#[from] std::num::ParseIntError),

    #[error("Unknown platform: {name}")]
    InvalidPlatform { name: String },

    #[error("Invalid position: {position}")]
    InvalidPosition { position: String },

    #[error("Invalid lineup slot: {slot}")]
    InvalidSlot { slot: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("{platform} response missing field `{field}`")]
    MissingField { platform: Platform, field: String },

    #[error("{platform} requires credentials: set {env_var}")]
    MissingCredentials { platform: Platform, env_var: String },

    #[error("Team not found: {team}")]
    TeamNotFound { team: String },

    #[error("Player not found: {name}")]
    PlayerNotFound { name: String },
}

impl InsightsError {
    pub(crate) fn missing_field(platform: Platform, field: impl Into<String>) -> Self {
        InsightsError::MissingField {
            platform,
            field: field.into(),
        }
    }
}
