//! ID types shared across fantasy platforms.
//!
//! Every platform identifies leagues, teams and players differently: Sleeper
//! hands out long numeric strings, ESPN uses integers and Yahoo uses dotted
//! keys such as `423.l.12345`. All of them are carried as strings.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(
    /// League identifier on a fantasy platform.
    ///
    /// ```rust
    /// use fantasy_insights::LeagueId;
    ///
    /// let league_id = LeagueId::from(123456u64);
    /// assert_eq!(league_id.as_str(), "123456");
    /// ```
    LeagueId
);

string_id!(
    /// Fantasy team identifier within a league (Sleeper roster id, ESPN team id, Yahoo team key).
    TeamId
);

string_id!(
    /// Player identifier in a platform's player universe.
    PlayerId
);
