//! Data ingestion and storage
//!
//! Riot API payload models, the API client and the on-disk layout.

pub mod riot;
pub mod riot_api;
pub mod store;

#[cfg(test)]
pub(crate) mod fixtures;

pub use riot::{MatchRecord, Timeline};
pub use store::DataLayout;
