//! Rule resolution, profit scoring and risk assessment.

mod book;
mod engine;
mod risk;

pub use book::{RuleBook, RuleSource, SharedRuleBook};
pub use engine::RuleEngine;
pub use risk::RiskPolicy;
