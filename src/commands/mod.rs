//! Command implementations for the fantasy insights CLI

pub mod accounts;
pub mod common;
pub mod insights;
pub mod lineup;
pub mod scores;
pub mod sync;
pub mod teams;
pub mod trade;
pub mod waivers;

#[cfg(test)]
mod tests;

pub use common::CommandContext;
