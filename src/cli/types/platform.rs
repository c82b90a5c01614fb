//! Supported fantasy platforms.

use crate::error::InsightsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Third-party fantasy football provider whose API is read.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Sleeper,
    Espn,
    Yahoo,
}

impl Platform {
    /// Short lowercase tag used in cache keys and the history database.
    pub fn tag(&self) -> &'static str {
        match self {
            Platform::Sleeper => "sleeper",
            Platform::Espn => "espn",
            Platform::Yahoo => "yahoo",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Platform::Sleeper => "Sleeper",
            Platform::Espn => "ESPN",
            Platform::Yahoo => "Yahoo",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Platform {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sleeper" => Ok(Platform::Sleeper),
            "espn" => Ok(Platform::Espn),
            "yahoo" => Ok(Platform::Yahoo),
            other => Err(InsightsError::InvalidPlatform {
                name: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parse_case_insensitive() {
        assert_eq!("ESPN".parse::<Platform>().unwrap(), Platform::Espn);
        assert_eq!(" sleeper ".parse::<Platform>().unwrap(), Platform::Sleeper);
        assert!("fleaflicker".parse::<Platform>().is_err());
    }

    #[test]
    fn test_platform_serde_lowercase() {
        let json = serde_json::to_string(&Platform::Yahoo).unwrap();
        assert_eq!(json, "\"yahoo\"");
        assert_eq!(Platform::Espn.tag(), "espn");
        assert_eq!(Platform::Espn.to_string(), "ESPN");
    }
}
