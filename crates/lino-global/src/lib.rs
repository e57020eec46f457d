// crates/lino-global/src/lib.rs
//
// lino-global: the protocol-wide pool every donation feeds.
//
// Holds the consumption friction rate (from parameters), cumulative
// consumption, the content-creator inflation pool that friction flows into,
// and the queue of deferred reward events.

pub mod evaluate;
pub mod manager;

// Re-export key types for ergonomic access from downstream crates.
pub use evaluate::evaluate_consumption;
pub use manager::{GlobalManager, GlobalMeta};
