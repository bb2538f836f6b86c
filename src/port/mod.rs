//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                 ┌─────────────────────────┐
//!                 │       Application       │
//!     ┌───────────┤  scheduler · pipeline   ├────────────┐
//!     │           └────────────┬────────────┘            │
//!     ▼                        ▼                         ▼
//! ┌─────────┐           ┌─────────────┐          ┌──────────────┐
//! │ Listing │           │   Dedup     │          │   Message    │
//! │ Source  │           │   Store     │          │   Sender     │
//! └─────────┘           └─────────────┘          └──────────────┘
//! ```

pub mod outbound;
