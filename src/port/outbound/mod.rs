//! Outbound ports (driven side): marketplaces, dedup storage, messaging and
//! credentials.

pub mod dedup;
pub mod messaging;
pub mod source;
pub mod token;
