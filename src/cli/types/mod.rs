//! Type-safe wrappers and enums for fantasy football data.

pub mod ids;
pub mod platform;
pub mod position;
pub mod time;

pub use ids::{LeagueId, PlayerId, TeamId};
pub use platform::Platform;
pub use position::{LineupSlot, Position};
pub use time::{Season, Week};
