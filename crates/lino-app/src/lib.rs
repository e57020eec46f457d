// crates/lino-app/src/lib.rs
//
// lino-app: the replicated state machine.
//
// Decodes messages into the `Msg` sum type, routes each variant to its
// handler inside a per-message `Context`, and commits the staged writes as a
// single batch only when the handler succeeds.

pub mod app;
pub mod genesis;
pub mod handler;
pub mod msg;

// Re-export key types for ergonomic access from downstream crates.
pub use app::{LinoApp, TxResult};
pub use genesis::{Genesis, GenesisAccount, GenesisDeveloper, GenesisVoter};
pub use msg::Msg;
