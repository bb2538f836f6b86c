//! Infrastructure configuration modules.

pub mod alerts;
pub mod fees;
pub mod logging;
pub mod risk;
pub mod rules;
pub mod scheduler;
pub mod search;
pub mod settings;

pub use fees::FeeConfig;
pub use settings::Config;
