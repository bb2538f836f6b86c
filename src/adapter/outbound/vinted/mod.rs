//! Vinted marketplace adapter.

mod client;
pub mod dto;
mod settings;

pub use client::VintedClient;
pub use settings::VintedConfig;
