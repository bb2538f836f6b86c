//! Outbound adapters: marketplace clients, messaging and persistence.

pub mod ebay;
pub mod http;
pub(crate) mod loose;
pub mod memory;
pub mod sqlite;
pub mod token;
pub mod vinted;
pub mod whatsapp;
