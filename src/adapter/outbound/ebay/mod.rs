//! eBay marketplace adapter.

mod client;
pub mod dto;
mod settings;

pub use client::EbayClient;
pub use settings::EbayConfig;
