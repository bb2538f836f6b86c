//! Adapters connecting the application to the outside world.
//!
//! - [`inbound`]: the command-line interface driving the application.
//! - [`outbound`]: implementations of the outbound ports.

pub mod inbound;
pub mod outbound;
