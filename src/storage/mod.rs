//! Weekly points history kept in SQLite
//!
//! Platforms only serve one week of points per request, so every week a
//! command needs is fetched once and kept here:
//! - `schema`: connection and table management
//! - `queries`: upserts and history reads

pub mod queries;
pub mod schema;

#[cfg(test)]
mod tests;

pub use schema::PerformanceStore;
