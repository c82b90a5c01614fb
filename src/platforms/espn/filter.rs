//! ESPN `X-Fantasy-Filter` header for the `/players` endpoint.
//!
//! ESPN honours only a handful of server-side filters:
//!
//! - **filterActive**: only players on an active NFL roster
//! - **filterSlotIds**: only players eligible for the given lineup slots
//! - **limit**: cap on returned players, ordered by ownership
//!
//! Everything else (free-agent status, injuries) is filtered client-side.

use reqwest::header::HeaderValue;
use serde::Serialize;

use crate::error::Result;

pub const FANTASY_FILTER_HEADER: &str = "x-fantasy-filter";

/// Slot ids for QB, RB, WR, TE, D/ST and K.
pub const FANTASY_SLOT_IDS: [u8; 6] = [0, 2, 4, 6, 16, 17];

/// ESPN wraps every filter value as `{"value": ...}`.
#[derive(Debug, Serialize)]
pub struct Val<T> {
    pub value: T,
}

#[derive(Debug, Default, Serialize)]
pub struct PlayersFilter {
    #[serde(rename = "filterActive", skip_serializing_if = "Option::is_none")]
    pub filter_active: Option<Val<bool>>,

    #[serde(rename = "filterSlotIds", skip_serializing_if = "Option::is_none")]
    pub filter_slot_ids: Option<Val<Vec<u8>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl PlayersFilter {
    /// Active players at fantasy positions, capped at `limit`.
    pub fn player_pool(limit: u32) -> Self {
        Self {
            filter_active: Some(Val { value: true }),
            filter_slot_ids: Some(Val {
                value: FANTASY_SLOT_IDS.to_vec(),
            }),
            limit: Some(limit),
        }
    }
}

/// Any `Serialize` → JSON → `HeaderValue`.
pub trait IntoHeaderValue {
    fn to_header_value(&self) -> Result<HeaderValue>;
}

impl<T> IntoHeaderValue for T
where
    T: Serialize,
{
    fn to_header_value(&self) -> Result<HeaderValue> {
        let s = serde_json::to_string(self)?;
        Ok(HeaderValue::from_str(&s)?)
    }
}
