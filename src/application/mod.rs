//! Application layer: normalization, rule evaluation, alert delivery and the
//! polling loop that ties them together.

pub mod normalize;
pub mod notify;
pub mod pipeline;
pub mod rules;
pub mod scheduler;
